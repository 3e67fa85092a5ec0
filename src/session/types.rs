use std::fmt;

/// Reply code recorded when no numeric reply was obtained (timeout, closed
/// connection, unparsable line).
pub const NO_REPLY: i32 = -1;

/// A raw SMTP reply, preserving the numeric status code and message text.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: i32,
    pub text: String,
}

impl SmtpReply {
    pub fn new(code: i32, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    pub fn none() -> Self {
        Self::new(NO_REPLY, String::new())
    }

    pub fn is_none(&self) -> bool {
        self.code == NO_REPLY
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl Default for SmtpReply {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("no reply")
        } else {
            write!(f, "{} {}", self.code, self.text)
        }
    }
}
