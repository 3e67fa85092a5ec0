#![forbid(unsafe_code)]
//! rcptcheck — e-mail deliverability checks over SMTP
//!
//! The address is parsed locally, the domain's mail servers are looked up
//! (MX, then the domain's own address records) and each server is asked
//! whether it would accept the recipient, stopping at `RCPT TO`.
//!
//! ```no_run
//! use rcptcheck::{Identity, Verifier};
//!
//! let mut verifier = Verifier::new(Identity::from_host(None, None))?;
//! verifier.set_timeout(10).set_accepted_reply_codes([252]);
//! let ok = verifier.check_email("someone@example.com");
//! println!("{ok} {:?}", verifier.last_outcome());
//! # Ok::<(), rcptcheck::VerifyError>(())
//! ```

pub mod address;
pub mod resolver;
pub mod session;
pub mod verifier;

pub use address::{AddressError, ParseMode, ParsedAddress, parse_address};
pub use resolver::{
    CandidateServer, CandidateSource, LookupMailServers, MxRecord, ResolveFailure,
    resolve_candidates, system_resolver,
};
pub use session::{
    Connector, DEFAULT_PORT, NO_REPLY, SessionError, SmtpReply, SmtpSession, TcpConnector,
    TcpSession,
};
pub use verifier::{
    CandidateStep, CatalogCode, DEFAULT_ACCEPTED_CODES, DEFAULT_TIMEOUT_SECS, HostEnvironment,
    Identity, Outcome, ProbeState, Verifier, VerifierConfig, VerifyError,
};
