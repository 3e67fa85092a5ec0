use std::fmt;
use std::sync::Arc;

use crate::session::{SessionError, SmtpReply};

/// Pseudo reply codes used when no SMTP server produced a usable reply.
///
/// None of them is ever in the accepted set.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogCode {
    BadSyntax,
    ConnectionFailed,
    ServerNotFound,
}

impl CatalogCode {
    pub const ALL: [Self; 3] = [Self::BadSyntax, Self::ConnectionFailed, Self::ServerNotFound];

    pub fn code(self) -> i32 {
        match self {
            Self::BadSyntax => 1000,
            Self::ConnectionFailed => 1001,
            Self::ServerNotFound => 1002,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::BadSyntax => "Bad syntax",
            Self::ConnectionFailed => "Connection failed",
            Self::ServerNotFound => "Mail server not found",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for CatalogCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.text())
    }
}

/// Result of one check.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Outcome {
    pub accepted: bool,
    pub reply_code: i32,
    pub reply_text: String,
    /// Last transport or protocol error seen during the check. Cleared when
    /// the address is accepted.
    #[cfg_attr(feature = "with-serde", serde(skip))]
    pub error: Option<Arc<SessionError>>,
}

impl Outcome {
    pub fn catalog(code: CatalogCode) -> Self {
        Self {
            accepted: false,
            reply_code: code.code(),
            reply_text: code.text().to_string(),
            error: None,
        }
    }

    pub(crate) fn from_reply(reply: &SmtpReply) -> Self {
        Self {
            accepted: false,
            reply_code: reply.code,
            reply_text: reply.text.clone(),
            error: None,
        }
    }

    /// The pseudo code this outcome carries, if any.
    pub fn catalog_code(&self) -> Option<CatalogCode> {
        CatalogCode::from_code(self.reply_code)
    }

    pub fn reply(&self) -> (i32, &str) {
        (self.reply_code, self.reply_text.as_str())
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.accepted == other.accepted
            && self.reply_code == other.reply_code
            && self.reply_text == other.reply_text
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.accepted { "accepted" } else { "rejected" };
        write!(f, "{verdict} ({} {})", self.reply_code, self.reply_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries() {
        assert_eq!(CatalogCode::BadSyntax.code(), 1000);
        assert_eq!(CatalogCode::ConnectionFailed.text(), "Connection failed");
        assert_eq!(
            CatalogCode::from_code(1002),
            Some(CatalogCode::ServerNotFound)
        );
        assert_eq!(CatalogCode::from_code(550), None);
    }

    #[test]
    fn catalog_outcome_is_never_accepted() {
        for code in CatalogCode::ALL {
            let outcome = Outcome::catalog(code);
            assert!(!outcome.accepted);
            assert_eq!(outcome.catalog_code(), Some(code));
        }
    }

    #[test]
    fn display() {
        let outcome = Outcome::catalog(CatalogCode::ServerNotFound);
        assert_eq!(outcome.to_string(), "rejected (1002 Mail server not found)");
    }
}
