//! Address syntax checks (RFC 5321/5322 subset).
//!
//! [`parse_address`] never touches the network: it either splits the input
//! into a [`ParsedAddress`] or lists every reason the input was rejected.

mod domain;
mod error;
mod local;
mod types;

pub use error::AddressError;
pub use types::{ParseMode, ParsedAddress};

use domain::check_domain;
use local::{is_local_relaxed, is_local_strict};

const MAX_ADDRESS_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

pub fn parse_address(email: &str, mode: ParseMode) -> Result<ParsedAddress, AddressError> {
    let input = email.trim();

    let mut reasons = Vec::new();

    if input.len() > MAX_ADDRESS_LEN {
        reasons.push(format!("total length {} > {MAX_ADDRESS_LEN}", input.len()));
    }

    let Some((local, domain)) = input.rsplit_once('@') else {
        reasons.push("must contain an '@'".to_string());
        return Err(AddressError::syntax(reasons));
    };
    if local.contains('@') && !local.starts_with('"') {
        reasons.push("must contain exactly one '@'".to_string());
        return Err(AddressError::syntax(reasons));
    }

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        reasons.push(format!(
            "local part length {} invalid (1..={MAX_LOCAL_LEN})",
            local.len()
        ));
    } else {
        let local_ok = match mode {
            ParseMode::Strict => is_local_strict(local),
            ParseMode::Relaxed => is_local_relaxed(local),
        };
        if !local_ok {
            reasons.push(match mode {
                ParseMode::Strict => "invalid local part (strict rules)".into(),
                ParseMode::Relaxed => "invalid local part (relaxed rules)".into(),
            });
        }
    }

    let ascii_domain = check_domain(domain, &mut reasons);

    match ascii_domain {
        Some(ascii_domain) if reasons.is_empty() => Ok(ParsedAddress {
            local: local.to_string(),
            domain: domain.to_lowercase(),
            ascii_domain,
        }),
        _ => Err(AddressError::syntax(reasons)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let parsed = parse_address("  alice@Example.com \n", ParseMode::Strict).unwrap();
        assert_eq!(parsed.local, "alice");
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.envelope(), "alice@example.com");
    }

    #[test]
    fn rejects_missing_at() {
        let err = parse_address("alice.example.com", ParseMode::Strict).unwrap_err();
        assert!(err.reasons().iter().any(|r| r.contains("'@'")));
    }

    #[test]
    fn rejects_empty_local() {
        let err = parse_address("@example.com", ParseMode::Strict).unwrap_err();
        assert!(err.reasons().iter().any(|r| r.contains("local part length 0")));
    }

    #[test]
    fn rejects_double_at() {
        assert!(parse_address("a@@example.com", ParseMode::Strict).is_err());
        assert!(parse_address("a@b@example.com", ParseMode::Relaxed).is_err());
    }

    #[test]
    fn quoted_local_only_in_relaxed_mode() {
        assert!(parse_address("\"john doe\"@example.com", ParseMode::Strict).is_err());
        let parsed = parse_address("\"john doe\"@example.com", ParseMode::Relaxed).unwrap();
        assert_eq!(parsed.local, "\"john doe\"");
    }

    #[test]
    fn idn_domain_keeps_both_forms() {
        let parsed = parse_address("user@exämple.com", ParseMode::Strict).unwrap();
        assert_eq!(parsed.domain, "exämple.com");
        assert_eq!(parsed.ascii_domain, "xn--exmple-cua.com");
    }

    proptest! {
        #[test]
        fn inputs_without_at_never_parse(s in "[a-z0-9.]{0,40}") {
            prop_assert!(parse_address(&s, ParseMode::Relaxed).is_err());
        }

        #[test]
        fn simple_addresses_parse(local in "[a-z][a-z0-9]{0,20}", label in "[a-z][a-z0-9]{0,20}") {
            let email = format!("{local}@{label}.com");
            let parsed = parse_address(&email, ParseMode::Strict).unwrap();
            prop_assert_eq!(parsed.local, local);
            prop_assert_eq!(parsed.ascii_domain, format!("{label}.com"));
        }
    }
}
