use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use super::{Connector, SessionError, SmtpReply, SmtpSession};

/// RFC 5321 reply line limit, CRLF included.
const MAX_LINE_LEN: u64 = 512;
const MAX_REPLY_LINES: usize = 100;

/// Opens plain TCP sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Session = TcpSession;

    fn session(&self, host: &str, port: u16, local_name: &str) -> TcpSession {
        TcpSession::new(host, port, local_name)
    }
}

struct Connection {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Connection {
    /// Reads one reply that must be complete within `timeout` (zero means
    /// no deadline), however slowly the server feeds its lines.
    fn read_reply(&mut self, timeout: Duration) -> io::Result<SmtpReply> {
        let deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);
        let stream = &self.stream;
        read_reply(&mut self.reader, || match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "reply not complete before the deadline",
                    ));
                }
                stream.set_read_timeout(Some(remaining))
            }
            None => Ok(()),
        })
    }
}

pub struct TcpSession {
    host: String,
    port: u16,
    local_name: String,
    conn: Option<Connection>,
    timeout: Duration,
    last_reply: SmtpReply,
}

impl TcpSession {
    pub fn new(host: &str, port: u16, local_name: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            local_name: local_name.to_string(),
            conn: None,
            timeout: Duration::ZERO,
            last_reply: SmtpReply::none(),
        }
    }

    fn open_stream(
        &self,
        addrs: &[SocketAddr],
        timeout: Duration,
    ) -> Result<TcpStream, SessionError> {
        let deadline = (!timeout.is_zero()).then_some(timeout);
        let mut last_err = None;
        for addr in addrs {
            let attempt = match deadline {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    stream.set_read_timeout(deadline)?;
                    stream.set_write_timeout(deadline)?;
                    return Ok(stream);
                }
                Err(err) => {
                    tracing::debug!(
                        host = %self.host,
                        %addr,
                        error = %err,
                        "connect attempt failed"
                    );
                    last_err = Some(err);
                }
            }
        }
        let source = last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no socket address available")
        });
        Err(SessionError::connect(&self.host, source))
    }

    /// Sends `command` and reads its reply. Any failure leaves the
    /// no-reply marker as the last reply.
    fn command(&mut self, command: &str) -> Result<&SmtpReply, SessionError> {
        self.last_reply = SmtpReply::none();
        let conn = self.conn.as_mut().ok_or(SessionError::NotConnected)?;
        tracing::debug!(host = %self.host, "C: {command}");
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        conn.stream.write_all(&line)?;
        conn.stream.flush()?;
        self.read_reply()
    }

    fn read_reply(&mut self) -> Result<&SmtpReply, SessionError> {
        self.last_reply = SmtpReply::none();
        let conn = self.conn.as_mut().ok_or(SessionError::NotConnected)?;
        let reply = conn.read_reply(self.timeout)?;
        tracing::debug!(host = %self.host, "S: {} {}", reply.code, reply.text);
        self.last_reply = reply;
        Ok(&self.last_reply)
    }
}

impl SmtpSession for TcpSession {
    fn connect(&mut self, timeout: Duration) -> Result<(), SessionError> {
        self.disconnect();
        self.last_reply = SmtpReply::none();
        self.timeout = timeout;

        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|source| SessionError::Resolve {
                host: self.host.clone(),
                source,
            })?
            .collect();
        let stream = self.open_stream(&addrs, timeout)?;
        let reader = BufReader::new(stream.try_clone()?);
        self.conn = Some(Connection { stream, reader });

        let greeting = match self.read_reply().cloned() {
            Ok(reply) => reply,
            Err(err) => {
                self.close();
                return Err(err);
            }
        };
        if greeting.code != 220 {
            self.close();
            return Err(SessionError::Greeting {
                host: self.host.clone(),
                code: greeting.code,
                text: greeting.text,
            });
        }
        Ok(())
    }

    fn identify(&mut self) -> Result<(), SessionError> {
        let ehlo = format!("EHLO {}", self.local_name);
        if self.command(&ehlo)?.is_positive_completion() {
            return Ok(());
        }
        let helo = format!("HELO {}", self.local_name);
        let reply = self.command(&helo)?;
        if reply.is_positive_completion() {
            Ok(())
        } else {
            Err(SessionError::rejected("HELO", reply.code, &reply.text))
        }
    }

    fn mail_from(&mut self, sender: &str) -> Result<(), SessionError> {
        let reply = self.command(&format!("MAIL FROM:<{sender}>"))?;
        if reply.code == 250 {
            Ok(())
        } else {
            Err(SessionError::rejected("MAIL FROM", reply.code, &reply.text))
        }
    }

    fn rcpt_to(&mut self, recipient: &str) -> Result<(), SessionError> {
        let reply = self.command(&format!("RCPT TO:<{recipient}>"))?;
        if matches!(reply.code, 250 | 251) {
            Ok(())
        } else {
            Err(SessionError::rejected("RCPT TO", reply.code, &reply.text))
        }
    }

    fn last_reply(&self) -> &SmtpReply {
        &self.last_reply
    }

    fn disconnect(&mut self) {
        let Some(conn) = self.conn.as_mut() else {
            return;
        };
        tracing::debug!(host = %self.host, "C: QUIT");
        if conn.stream.write_all(b"QUIT\r\n").is_ok() && conn.stream.flush().is_ok() {
            if let Ok(reply) = conn.read_reply(self.timeout) {
                tracing::debug!(host = %self.host, "S: {} {}", reply.code, reply.text);
            }
        }
        self.close();
    }
}

impl TcpSession {
    fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = conn.stream.shutdown(Shutdown::Both);
        }
    }
}

impl Drop for TcpSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Reads one (possibly multi-line) reply. Lines are joined with `\n`.
///
/// `before_line` runs before every line is read and aborts the reply when
/// it fails. Overlong lines and replies with too many lines are rejected.
pub(crate) fn read_reply<R, F>(reader: &mut R, mut before_line: F) -> io::Result<SmtpReply>
where
    R: BufRead,
    F: FnMut() -> io::Result<()>,
{
    let mut code = None;
    let mut message_lines = Vec::new();
    loop {
        before_line()?;
        let mut raw = String::new();
        let bytes = reader.by_ref().take(MAX_LINE_LEN).read_line(&mut raw)?;
        if bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ));
        }
        if bytes as u64 == MAX_LINE_LEN && !raw.ends_with('\n') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("SMTP reply line longer than {MAX_LINE_LEN} bytes"),
            ));
        }
        if raw.ends_with('\n') {
            raw.pop();
            if raw.ends_with('\r') {
                raw.pop();
            }
        }

        if raw.len() < 3 || !raw.is_char_boundary(3) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid SMTP reply: '{raw}'"),
            ));
        }
        let code_part = &raw[..3];
        let parsed_code = code_part.parse::<i32>().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid SMTP status code: '{code_part}'"),
            )
        })?;
        if let Some(existing) = code {
            if existing != parsed_code {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("inconsistent SMTP reply codes: {existing} vs {parsed_code}"),
                ));
            }
        } else {
            code = Some(parsed_code);
        }
        let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
        let text = raw.get(4..).unwrap_or_default().to_string();
        message_lines.push(text);
        if !continuation {
            break;
        }
        if message_lines.len() >= MAX_REPLY_LINES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("SMTP reply has more than {MAX_REPLY_LINES} lines"),
            ));
        }
    }
    let code = code.ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "SMTP reply missing status code")
    })?;
    Ok(SmtpReply::new(code, message_lines.join("\n")))
}
