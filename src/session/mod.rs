//! The SMTP transport the verifier drives.
//!
//! A session is opened per candidate host. Every command reports success or
//! failure and leaves the raw reply available through
//! [`SmtpSession::last_reply`]; a reply code of [`NO_REPLY`] means the server
//! never answered.

mod error;
mod tcp;
mod types;

pub use error::SessionError;
pub use tcp::{TcpConnector, TcpSession};
pub use types::{NO_REPLY, SmtpReply};

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 25;

pub trait SmtpSession {
    /// Opens the connection and reads the greeting. A zero `timeout` means
    /// no deadline.
    fn connect(&mut self, timeout: Duration) -> Result<(), SessionError>;

    /// `EHLO` with the local name given at construction, `HELO` when the
    /// server refuses `EHLO`.
    fn identify(&mut self) -> Result<(), SessionError>;

    /// `MAIL FROM`. Succeeds on 250 only.
    fn mail_from(&mut self, sender: &str) -> Result<(), SessionError>;

    /// `RCPT TO`. Succeeds on 250 or 251.
    fn rcpt_to(&mut self, recipient: &str) -> Result<(), SessionError>;

    fn last_reply(&self) -> &SmtpReply;

    /// `QUIT` and close. Best effort, safe to call when not connected.
    fn disconnect(&mut self);
}

/// Creates unconnected sessions.
pub trait Connector {
    type Session: SmtpSession;

    fn session(&self, host: &str, port: u16, local_name: &str) -> Self::Session;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Session = C::Session;

    fn session(&self, host: &str, port: u16, local_name: &str) -> Self::Session {
        (**self).session(host, port, local_name)
    }
}
