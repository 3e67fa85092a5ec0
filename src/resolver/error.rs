use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveFailure {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("no MX or address records for {domain}")]
    ServerNotFound { domain: String },
}

impl ResolveFailure {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn not_found(domain: &str) -> Self {
        Self::ServerNotFound {
            domain: domain.to_string(),
        }
    }
}
