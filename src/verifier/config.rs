use std::collections::BTreeSet;
use std::time::Duration;

use crate::session::DEFAULT_PORT;

use super::CatalogCode;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_ACCEPTED_CODES: [i32; 2] = [250, 251];

/// Settings read at the start of every check.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub connect_timeout: Duration,
    pub accepted_codes: BTreeSet<i32>,
    pub port: u16,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accepted_codes: DEFAULT_ACCEPTED_CODES.into_iter().collect(),
            port: DEFAULT_PORT,
        }
    }
}

impl VerifierConfig {
    pub fn set_timeout_secs(&mut self, seconds: u64) {
        self.connect_timeout = Duration::from_secs(seconds);
    }

    /// Adds `codes` to the accepted set. Never removes a code; pseudo codes
    /// from the error catalog are ignored.
    pub fn accept_codes<I>(&mut self, codes: I)
    where
        I: IntoIterator<Item = i32>,
    {
        for code in codes {
            if CatalogCode::from_code(code).is_some() {
                tracing::debug!(code, "ignoring pseudo code in accepted set");
                continue;
            }
            self.accepted_codes.insert(code);
        }
    }

    pub fn is_accepted(&self, code: i32) -> bool {
        self.accepted_codes.contains(&code)
    }
}
