use std::io;

use thiserror::Error;

/// Transport and protocol failures of a single SMTP session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
    #[error("unexpected greeting from {host}: {code} {text}")]
    Greeting { host: String, code: i32, text: String },
    #[error("{command} rejected: {code} {text}")]
    Rejected {
        command: &'static str,
        code: i32,
        text: String,
    },
    #[error("not connected")]
    NotConnected,
}

impl SessionError {
    pub(crate) fn connect(host: &str, source: io::Error) -> Self {
        Self::Connect {
            host: host.to_string(),
            source,
        }
    }

    pub(crate) fn rejected(command: &'static str, code: i32, text: &str) -> Self {
        Self::Rejected {
            command,
            code,
            text: text.to_string(),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}
