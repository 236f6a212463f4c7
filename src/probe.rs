//! The mail send probe: one STARTTLS-protected, authenticated submission of a fixed message.
//!
//! ```no_run
//! # async fn run() -> Result<(), channel_probe::smtp::error::Error> {
//! channel_probe::probe::send(
//!     "user",
//!     "secret",
//!     "mail.example.org",
//!     "probe@example.org",
//!     "ops@example.org",
//!     "Testing!",
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

use async_native_tls::TlsConnector;
use log::{debug, info};
use tokio::io::{AsyncRead as Read, AsyncWrite as Write};
use tokio::net::TcpStream;

use crate::smtp::authentication::{Credentials, DEFAULT_ENCRYPTED_MECHANISMS};
use crate::smtp::error::{Error, SmtpResult};
use crate::smtp::extension::ClientId;
use crate::smtp::response::Response;
use crate::smtp::{SmtpClient, SmtpTransport, SMTP_PORT};
use crate::{EmailAddress, Envelope, SendableEmail};

/// Message id used in log lines for the probe message
const PROBE_MESSAGE_ID: &str = "mail-probe";

/// Connects to `host` on port 25, upgrades with STARTTLS, logs in and sends `message`
/// from `fromaddr` to `toaddr`.
pub async fn send(
    username: &str,
    password: &str,
    host: &str,
    fromaddr: &str,
    toaddr: &str,
    message: &str,
) -> SmtpResult {
    MailProbe::new(
        host,
        Credentials::new(username.to_string(), password.to_string()),
        fromaddr.parse()?,
        toaddr.parse()?,
    )
    .send(message)
    .await
}

/// Builds the probe message: `From` and `To` headers followed by the body.
pub fn compose_message(from: &EmailAddress, to: &EmailAddress, body: &str) -> String {
    format!("From: {}\r\nTo: {}\r\n\r\n{}\n", from, to, body)
}

/// Everything needed to send the probe message
#[derive(Debug, Clone)]
pub struct MailProbe {
    host: String,
    port: u16,
    credentials: Credentials,
    from: EmailAddress,
    to: EmailAddress,
    hello_name: ClientId,
}

impl MailProbe {
    /// Creates a probe talking to `host` on the default SMTP port
    pub fn new(host: &str, credentials: Credentials, from: EmailAddress, to: EmailAddress) -> Self {
        MailProbe {
            host: host.to_string(),
            port: SMTP_PORT,
            credentials,
            from,
            to,
            hello_name: ClientId::default(),
        }
    }

    /// Use another port than 25
    pub fn port(self, port: u16) -> Self {
        Self { port, ..self }
    }

    /// Set the name used during EHLO
    pub fn hello_name(self, hello_name: ClientId) -> Self {
        Self { hello_name, ..self }
    }

    /// Composes the probe message for `body`
    pub fn message(&self, body: &str) -> Result<SendableEmail, Error> {
        let envelope = Envelope::new(Some(self.from.clone()), vec![self.to.clone()])?;
        Ok(SendableEmail::new(
            envelope,
            PROBE_MESSAGE_ID,
            compose_message(&self.from, &self.to, body),
        ))
    }

    /// Runs the probe and returns the server's reply to the message data.
    pub async fn send(&self, body: &str) -> SmtpResult {
        let email = self.message(body)?;

        let tcp_stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        info!("connected to {}:{}", self.host, self.port);

        let tcp_stream = self.starttls(tcp_stream).await?;
        let tls_stream = TlsConnector::new()
            .connect(self.host.as_str(), tcp_stream)
            .await?;
        debug!("connection encrypted");

        let mut transport = SmtpTransport::new(self.client().without_greeting(), tls_stream).await?;
        self.deliver(&mut transport, email).await
    }

    fn client(&self) -> SmtpClient {
        SmtpClient::new().hello_name(self.hello_name.clone())
    }

    /// Reads the greeting, sends EHLO and STARTTLS, and hands back the stream to encrypt.
    pub async fn starttls<S: Read + Write + Unpin>(&self, stream: S) -> Result<S, Error> {
        let transport = SmtpTransport::new(self.client(), stream).await?;
        transport.starttls().await
    }

    /// Authenticates and sends `email` on an established session, then says QUIT.
    pub async fn deliver<S: Read + Write + Unpin>(
        &self,
        transport: &mut SmtpTransport<S>,
        email: SendableEmail,
    ) -> Result<Response, Error> {
        transport
            .try_login(&self.credentials, DEFAULT_ENCRYPTED_MECHANISMS)
            .await?;
        let response = transport.send(email).await?;
        transport.quit().await?;
        Ok(response)
    }
}
