#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Strict,
    Relaxed,
}

/// An address split into its envelope parts.
///
/// `ascii_domain` is the IDNA form of `domain` and is what DNS and the SMTP
/// dialogue use.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub local: String,
    pub domain: String,
    pub ascii_domain: String,
}

impl ParsedAddress {
    /// The address as sent in `RCPT TO`.
    pub fn envelope(&self) -> String {
        format!("{}@{}", self.local, self.ascii_domain)
    }
}
