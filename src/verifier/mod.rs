//! Deliverability checks with a partial SMTP transaction.
//!
//! [`Verifier::verify`] parses the address, discovers the domain's mail
//! servers and walks them in preference order with `EHLO`, `MAIL FROM` and
//! `RCPT TO`. No message is ever sent. A server that never answers sends the
//! loop on to the next candidate; the first real reply at the sender or
//! recipient stage ends it, and that reply is checked against the accepted
//! code set.

mod config;
mod error;
mod identity;
mod outcome;
mod state;

pub use config::{DEFAULT_ACCEPTED_CODES, DEFAULT_TIMEOUT_SECS, VerifierConfig};
pub use error::VerifyError;
pub use identity::{HostEnvironment, Identity};
pub use outcome::{CatalogCode, Outcome};
pub use state::{CandidateStep, ProbeState};

use std::sync::Arc;

use trust_dns_resolver::Resolver;

use crate::address::{AddressError, ParseMode, parse_address};
use crate::resolver::{CandidateServer, LookupMailServers, resolve_candidates, system_resolver};
use crate::session::{Connector, NO_REPLY, SessionError, SmtpReply, SmtpSession, TcpConnector};

/// Runs checks with a fixed [`Identity`] and a mutable [`VerifierConfig`].
///
/// The last outcome is kept for [`last_outcome`](Self::last_outcome) and
/// [`last_error`](Self::last_error), so a verifier should not be shared
/// between concurrent callers.
pub struct Verifier<R = Resolver, C = TcpConnector> {
    identity: Identity,
    config: VerifierConfig,
    parse_mode: ParseMode,
    resolver: R,
    connector: C,
    last: Option<Outcome>,
}

impl Verifier {
    /// A verifier using the system DNS configuration and plain TCP sessions.
    pub fn new(identity: Identity) -> Result<Self, VerifyError> {
        let resolver = system_resolver()?;
        Ok(Self::with_parts(identity, resolver, TcpConnector))
    }
}

struct CandidateReport {
    step: CandidateStep,
    outcome: Outcome,
    error: Option<SessionError>,
}

impl<R, C> Verifier<R, C>
where
    R: LookupMailServers,
    C: Connector,
{
    pub fn with_parts(identity: Identity, resolver: R, connector: C) -> Self {
        Self {
            identity,
            config: VerifierConfig::default(),
            parse_mode: ParseMode::default(),
            resolver,
            connector,
            last: None,
        }
    }

    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn set_identity(&mut self, identity: Identity) -> &mut Self {
        self.identity = identity;
        self
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Connect timeout for the following checks. Zero disables the deadline.
    pub fn set_timeout(&mut self, seconds: u64) -> &mut Self {
        self.config.set_timeout_secs(seconds);
        self
    }

    /// Adds reply codes that count as "deliverable". Cumulative; the
    /// defaults (250, 251) are never removed.
    pub fn set_accepted_reply_codes<I>(&mut self, codes: I) -> &mut Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.config.accept_codes(codes);
        self
    }

    /// `(reply code, reply text)` of the most recent check.
    pub fn last_outcome(&self) -> Option<(i32, &str)> {
        self.last.as_ref().map(Outcome::reply)
    }

    /// Transport error retained by the most recent check, `None` when it was
    /// accepted.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last.as_ref().and_then(|o| o.error.as_deref())
    }

    /// Convenience wrapper around [`verify`](Self::verify).
    pub fn check_email(&mut self, address: &str) -> bool {
        self.verify(address).is_ok_and(|outcome| outcome.accepted)
    }

    /// Checks `address`. Only a syntax error is returned as `Err`; it is
    /// also recorded as a `1000 Bad syntax` outcome.
    pub fn verify(&mut self, address: &str) -> Result<Outcome, AddressError> {
        let result = self.run(address);
        self.last = Some(match &result {
            Ok(outcome) => outcome.clone(),
            Err(_) => Outcome::catalog(CatalogCode::BadSyntax),
        });
        result
    }

    fn run(&self, address: &str) -> Result<Outcome, AddressError> {
        let parsed = parse_address(address, self.parse_mode).inspect_err(|err| {
            tracing::debug!(address, error = %err, "address rejected before any lookup");
        })?;

        let candidates = match resolve_candidates(&self.resolver, &parsed.ascii_domain) {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::info!(domain = %parsed.ascii_domain, error = %err, "no mail server");
                return Ok(self.classify(Outcome::catalog(CatalogCode::ServerNotFound)));
            }
        };

        let recipient = parsed.envelope();
        let mut state = ProbeState::Trying;
        let mut outcome = Outcome::from_reply(&SmtpReply::none());
        let mut last_error = None;

        for candidate in &candidates {
            let report = self.probe_candidate(candidate, &recipient);
            outcome = report.outcome;
            if report.error.is_some() {
                last_error = report.error;
            }
            state = state.advance(report.step);
            if state.is_terminal() {
                break;
            }
        }
        let state = state.finish();
        tracing::debug!(%recipient, ?state, tried = candidates.len(), "candidate loop done");

        outcome.error = last_error.map(Arc::new);
        Ok(self.classify(outcome))
    }

    /// Opens one session, runs the probe and always disconnects.
    fn probe_candidate(&self, candidate: &CandidateServer, recipient: &str) -> CandidateReport {
        let mut session = self.connector.session(
            &candidate.host,
            self.config.port,
            &self.identity.fqdn,
        );
        let report = self.probe(&mut session, recipient);
        session.disconnect();
        if let Some(err) = &report.error {
            tracing::warn!(
                host = %candidate.host,
                error = %err,
                step = ?report.step,
                "candidate failed"
            );
        }
        report
    }

    fn probe(&self, session: &mut C::Session, recipient: &str) -> CandidateReport {
        if let Err(err) = session.connect(self.config.connect_timeout) {
            return CandidateReport {
                step: CandidateStep::NoReply,
                outcome: Outcome::catalog(CatalogCode::ConnectionFailed),
                error: Some(err),
            };
        }

        let sender = self.identity.sender.as_str();
        if let Err(err) = session.identify().and_then(|()| session.mail_from(sender)) {
            let reply = session.last_reply();
            let (step, outcome) = if reply.is_none() {
                (
                    CandidateStep::NoReply,
                    Outcome::catalog(CatalogCode::ConnectionFailed),
                )
            } else {
                (CandidateStep::Definitive, Outcome::from_reply(reply))
            };
            return CandidateReport {
                step,
                outcome,
                error: Some(err),
            };
        }

        let error = session.rcpt_to(recipient).err();
        let reply = session.last_reply();
        let step = if reply.is_none() {
            CandidateStep::NoReply
        } else {
            CandidateStep::Definitive
        };
        CandidateReport {
            step,
            outcome: Outcome::from_reply(reply),
            error,
        }
    }

    fn classify(&self, mut outcome: Outcome) -> Outcome {
        if outcome.reply_code == NO_REPLY {
            let error = outcome.error.take();
            outcome = Outcome::catalog(CatalogCode::ConnectionFailed);
            outcome.error = error;
        }
        outcome.accepted = self.config.is_accepted(outcome.reply_code);
        if outcome.accepted {
            outcome.error = None;
        }
        tracing::info!(
            accepted = outcome.accepted,
            code = outcome.reply_code,
            text = %outcome.reply_text,
            "verification finished"
        );
        outcome
    }
}
