use std::iter;

use log::{debug, info};
use tokio::io::{AsyncRead as Read, AsyncWrite as Write};

use crate::smtp::authentication::{Credentials, Mechanism};
use crate::smtp::commands::*;
use crate::smtp::error::{Error, SmtpResult};
use crate::smtp::extension::{ClientId, Extension, ServerInfo};
use crate::smtp::stream::SmtpStream;
use crate::SendableEmail;

/// Maximum number of `334` challenges answered during one AUTH exchange
const MAX_CHALLENGES: u8 = 10;

/// Contains client configuration
#[derive(Debug, Clone)]
pub struct SmtpClient {
    /// Name sent during EHLO
    hello_name: ClientId,
    /// Whether to expect greeting.
    /// Normally the server sends a greeting after connection,
    /// but not after STARTTLS.
    expect_greeting: bool,
}

impl Default for SmtpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the SMTP `SmtpTransport`
impl SmtpClient {
    /// Creates a new SMTP client expecting a greeting and sending the local hostname with EHLO.
    ///
    /// It does not connect to the server, but only creates the `SmtpTransport`.
    pub fn new() -> Self {
        SmtpClient {
            hello_name: Default::default(),
            expect_greeting: true,
        }
    }

    /// Set the name used during EHLO
    pub fn hello_name(self, name: ClientId) -> SmtpClient {
        Self {
            hello_name: name,
            ..self
        }
    }

    /// Do not expect greeting.
    ///
    /// Used for the second session on a connection upgraded by STARTTLS.
    pub fn without_greeting(self) -> SmtpClient {
        Self {
            expect_greeting: false,
            ..self
        }
    }
}

/// Structure that implements the high level SMTP client
#[derive(Debug)]
pub struct SmtpTransport<S: Read + Write + Unpin> {
    /// Information about the server
    server_info: ServerInfo,
    /// Low level client
    stream: SmtpStream<S>,
}

impl<S: Read + Write + Unpin> SmtpTransport<S> {
    /// Creates a new SMTP transport on an established stream.
    ///
    /// Reads the greeting when expected and sends EHLO.
    pub async fn new(builder: SmtpClient, stream: S) -> Result<Self, Error> {
        let mut stream = SmtpStream::new(stream);
        if builder.expect_greeting {
            let _greeting = stream.read_response().await?;
        }
        let ehlo_response = stream.ehlo(builder.hello_name.clone()).await?;
        let server_info = ServerInfo::from_response(&ehlo_response)?;

        // Print server information
        debug!("server {}", server_info);

        Ok(SmtpTransport {
            server_info,
            stream,
        })
    }

    /// Try to login with the first of the accepted mechanisms the server supports.
    ///
    /// Fails when the server supports none of them.
    pub async fn try_login(
        &mut self,
        credentials: &Credentials,
        accepted_mechanisms: &[Mechanism],
    ) -> SmtpResult {
        match accepted_mechanisms
            .iter()
            .find(|mechanism| self.server_info.supports_auth_mechanism(**mechanism))
        {
            Some(mechanism) => {
                info!("authenticating as {} with {}", credentials.username(), mechanism);
                self.auth(*mechanism, credentials).await
            }
            None => {
                info!("No supported authentication mechanisms available");
                Err(Error::Client("no supported authentication mechanism"))
            }
        }
    }

    /// Sends STARTTLS command if the server supports it.
    ///
    /// Returns inner stream which should be upgraded to TLS.
    pub async fn starttls(mut self) -> Result<S, Error> {
        if !self.supports_feature(Extension::StartTls) {
            return Err(From::from("server does not support STARTTLS"));
        }

        self.stream.command(StarttlsCommand).await?;

        // Return the stream, so the caller can upgrade it to TLS.
        Ok(self.stream.into_inner())
    }

    fn supports_feature(&self, keyword: Extension) -> bool {
        self.server_info.supports_feature(keyword)
    }

    /// Closes the SMTP transaction if possible.
    pub async fn quit(&mut self) -> Result<(), Error> {
        self.stream.command(QuitCommand).await?;

        Ok(())
    }

    /// Sends an AUTH command with the given mechanism, and handles challenge if needed
    pub async fn auth(&mut self, mechanism: Mechanism, credentials: &Credentials) -> SmtpResult {
        let mut challenges = MAX_CHALLENGES;
        let mut response = self
            .stream
            .command(AuthCommand::new(mechanism, credentials.clone(), None)?)
            .await?;

        while challenges > 0 && response.has_code(334) {
            challenges -= 1;
            response = self
                .stream
                .command(AuthCommand::new_from_response(
                    mechanism,
                    credentials.clone(),
                    &response,
                )?)
                .await?;
        }

        if challenges == 0 {
            Err(Error::ResponseParsing("Unexpected number of challenges"))
        } else {
            Ok(response)
        }
    }

    /// Sends the envelope and the message, pipelining the envelope when the server allows it.
    pub async fn send(&mut self, email: SendableEmail) -> SmtpResult {
        let eight_bit_mime = self.supports_feature(Extension::EightBitMime);
        let envelope: Vec<String> =
            iter::once(MailCommand::new(email.envelope().from().cloned(), eight_bit_mime).to_string())
                .chain(
                    email
                        .envelope()
                        .to()
                        .iter()
                        .map(|to| RcptCommand::new(to.clone()).to_string()),
                )
                .chain(iter::once(DataCommand.to_string()))
                .collect();

        if self.supports_feature(Extension::Pipelining) {
            for command in &envelope {
                self.stream.send_command(command).await?;
            }
            for _ in &envelope {
                self.stream.read_response().await?;
            }
        } else {
            for command in &envelope {
                self.stream.command(command).await?;
            }
        }
        for to in email.envelope().to() {
            debug!("{}: to=<{}>", email.message_id(), to);
        }

        let response = self.stream.message(email.message()).await?;
        info!(
            "{}: status=sent ({})",
            email.message_id(),
            response.first_line().unwrap_or("no response")
        );
        Ok(response)
    }
}
