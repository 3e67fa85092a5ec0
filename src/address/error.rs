use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("bad syntax: {}", .reasons.join("; "))]
    Syntax { reasons: Vec<String> },
}

impl AddressError {
    pub(crate) fn syntax(reasons: Vec<String>) -> Self {
        Self::Syntax { reasons }
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            Self::Syntax { reasons } => reasons,
        }
    }
}
