//! Mail server discovery: MX lookup with the implicit-MX fallback.
//!
//! [`resolve_candidates`] works against any [`LookupMailServers`]
//! implementation; [`system_resolver`] builds the one backed by the host's
//! DNS configuration.

mod error;
mod types;

pub use error::ResolveFailure;
pub use types::{CandidateServer, CandidateSource, MxRecord};

use std::collections::HashSet;

use trust_dns_resolver::{Resolver, error::ResolveError};

/// The DNS queries mail server discovery needs.
pub trait LookupMailServers {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;

    /// Whether `domain` has at least one A/AAAA record.
    fn has_address(&self, domain: &str) -> bool;
}

impl<T: LookupMailServers + ?Sized> LookupMailServers for &T {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        (**self).lookup_mx(domain)
    }

    fn has_address(&self, domain: &str) -> bool {
        (**self).has_address(domain)
    }
}

impl LookupMailServers for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = Resolver::mx_lookup(self, domain)?;
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }

    fn has_address(&self, domain: &str) -> bool {
        match Resolver::lookup_ip(self, domain) {
            Ok(lookup) => lookup.iter().next().is_some(),
            Err(err) => {
                tracing::debug!(domain, error = %err, "address lookup failed");
                false
            }
        }
    }
}

pub fn system_resolver() -> Result<Resolver, ResolveFailure> {
    Resolver::from_system_conf().map_err(ResolveFailure::resolver_init)
}

/// Returns the servers to probe for `ascii_domain`, best preference first.
///
/// A failed MX query is handled like an empty answer: the domain itself is
/// used when it resolves to an address. A null MX (`0 .`, RFC 7505) is an
/// answer, so it never falls back to the domain's address.
pub fn resolve_candidates<R>(
    resolver: &R,
    ascii_domain: &str,
) -> Result<Vec<CandidateServer>, ResolveFailure>
where
    R: LookupMailServers + ?Sized,
{
    let mut records = match resolver.lookup_mx(ascii_domain) {
        Ok(records) => records,
        Err(err) => {
            tracing::debug!(domain = ascii_domain, error = %err, "MX lookup failed");
            Vec::new()
        }
    };

    if !records.is_empty() && records.iter().all(|r| r.exchange.is_empty()) {
        tracing::debug!(domain = ascii_domain, "null MX, domain accepts no mail");
        return Err(ResolveFailure::not_found(ascii_domain));
    }

    records.sort();
    let mut seen = HashSet::new();
    records.retain(|r| !r.exchange.is_empty() && seen.insert(r.exchange.clone()));

    if !records.is_empty() {
        tracing::debug!(domain = ascii_domain, count = records.len(), "MX records found");
        return Ok(records
            .into_iter()
            .map(|r| CandidateServer {
                host: r.exchange,
                source: CandidateSource::Mx {
                    preference: r.preference,
                },
            })
            .collect());
    }

    if resolver.has_address(ascii_domain) {
        tracing::debug!(domain = ascii_domain, "no MX records, using implicit MX");
        return Ok(vec![CandidateServer {
            host: ascii_domain.to_string(),
            source: CandidateSource::ImplicitMx,
        }]);
    }

    Err(ResolveFailure::not_found(ascii_domain))
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

#[cfg(test)]
pub(crate) mod tests;
