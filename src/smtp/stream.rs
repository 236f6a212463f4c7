use std::fmt::Display;
use std::string::String;

use log::debug;
use tokio::io::{
    AsyncBufReadExt, AsyncRead as Read, AsyncWrite as Write, AsyncWriteExt, BufReader,
};

use crate::smtp::codec::ClientCodec;
use crate::smtp::commands::*;
use crate::smtp::error::{Error, SmtpResult};
use crate::smtp::extension::ClientId;
use crate::smtp::response::parse_response;

/// SMTP stream.
#[derive(Debug)]
pub struct SmtpStream<S: Read + Write + Unpin> {
    /// Inner stream.
    inner: BufReader<S>,
}

impl<S: Read + Write + Unpin> SmtpStream<S> {
    /// Creates new SMTP stream.
    pub fn new(stream: S) -> Self {
        Self {
            inner: BufReader::new(stream),
        }
    }

    /// Returns inner stream.
    ///
    /// Should only be used when there are no unread responses,
    /// because the buffer of `BufReader` may be lost.
    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }

    /// Sends EHLO command and returns server response.
    pub async fn ehlo(&mut self, client_id: ClientId) -> SmtpResult {
        self.command(EhloCommand::new(client_id)).await
    }

    /// Send the given SMTP command to the server.
    pub async fn command(&mut self, command: impl Display) -> SmtpResult {
        self.send_command(command).await?;
        self.read_response().await
    }

    /// Sends the given SMTP command to the server without waiting for response.
    pub async fn send_command(&mut self, command: impl Display) -> Result<(), Error> {
        self.write(command.to_string().as_bytes()).await
    }

    /// Writes the given data to the server.
    async fn write(&mut self, string: &[u8]) -> Result<(), Error> {
        self.inner.get_mut().write_all(string).await?;
        self.inner.get_mut().flush().await?;

        debug!(
            ">> {}",
            escape_crlf(String::from_utf8_lossy(string).as_ref())
        );
        Ok(())
    }

    /// Read an SMTP response from the wire.
    pub async fn read_response(&mut self) -> SmtpResult {
        let reader = &mut self.inner;
        let mut buffer = String::with_capacity(100);

        loop {
            let read = reader.read_line(&mut buffer).await?;
            if read == 0 {
                break;
            }
            debug!("<< {}", escape_crlf(&buffer));
            match parse_response(&buffer) {
                Ok((_remaining, response)) => {
                    if response.is_positive() {
                        return Ok(response);
                    }

                    return Err(response.into());
                }
                Err(nom::Err::Failure(e)) => {
                    return Err(Error::Parsing(e.code));
                }
                Err(nom::Err::Incomplete(_)) => { /* read more */ }
                Err(nom::Err::Error(e)) => {
                    return Err(Error::Parsing(e.code));
                }
            }
        }

        Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "incomplete").into())
    }

    /// Sends the message content and the end-of-data marker.
    pub(crate) async fn message(&mut self, message: &[u8]) -> SmtpResult {
        let mut codec = ClientCodec::new();

        codec.encode(message, self.inner.get_mut()).await?;
        codec.encode(&[], self.inner.get_mut()).await?;
        self.inner.get_mut().flush().await?;
        debug!(">> <{} bytes of message data>", message.len());

        self.read_response().await
    }
}

/// Returns the string replacing all the CRLF with "\<CRLF\>"
/// Used for debug displays
fn escape_crlf(string: &str) -> String {
    string.replace("\r\n", "<CRLF>")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::smtp::error::Error;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_escape_crlf() {
        assert_eq!(escape_crlf("\r\n"), "<CRLF>");
        assert_eq!(escape_crlf("EHLO my_name\r\n"), "EHLO my_name<CRLF>");
        assert_eq!(
            escape_crlf("EHLO my_name\r\nSIZE 42\r\n"),
            "EHLO my_name<CRLF>SIZE 42<CRLF>"
        );
    }

    #[tokio::test]
    async fn test_read_multiline_response() {
        let (client, mut server) = tokio::io::duplex(1024);
        server
            .write_all(b"250-mail.example.org\r\n250-STARTTLS\r\n250 AUTH PLAIN\r\n")
            .await
            .unwrap();

        let mut stream = SmtpStream::new(client);
        let response = stream.read_response().await.unwrap();
        assert!(response.has_code(250));
        assert_eq!(response.message.len(), 3);
    }

    #[tokio::test]
    async fn test_negative_response_is_error() {
        let (client, mut server) = tokio::io::duplex(1024);
        server
            .write_all(b"454 4.7.0 TLS not available\r\n")
            .await
            .unwrap();

        let mut stream = SmtpStream::new(client);
        assert!(matches!(
            stream.command(StarttlsCommand).await,
            Err(Error::Transient(_))
        ));

        let mut sent = vec![0u8; 10];
        server.read_exact(&mut sent).await.unwrap();
        assert_eq!(&sent, b"STARTTLS\r\n");
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let (client, server) = tokio::io::duplex(1024);
        drop(server);

        let mut stream = SmtpStream::new(client);
        assert!(matches!(stream.read_response().await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_garbage_response() {
        let (client, mut server) = tokio::io::duplex(1024);
        server.write_all(b"hello there\r\n").await.unwrap();

        let mut stream = SmtpStream::new(client);
        assert!(matches!(
            stream.read_response().await,
            Err(Error::Parsing(_))
        ));
    }
}
