use std::io;

use tokio::io::{AsyncWrite as Write, AsyncWriteExt};

/// Line state of the message body as seen by the codec
const MID_LINE: u8 = 0;
const AFTER_CR: u8 = 1;
const LINE_START: u8 = 2;

/// The codec used for transparency
#[derive(Clone, Copy, Debug)]
pub struct ClientCodec {
    escape_count: u8,
}

impl Default for ClientCodec {
    fn default() -> Self {
        // The first byte after DATA is at the beginning of a line.
        ClientCodec {
            escape_count: LINE_START,
        }
    }
}

impl ClientCodec {
    /// Creates a new client codec
    pub fn new() -> Self {
        ClientCodec::default()
    }
}

impl ClientCodec {
    /// Adds transparency and sends bare LF as CRLF.
    ///
    /// An empty frame terminates the message body.
    pub async fn encode<W: Write + Unpin>(&mut self, frame: &[u8], mut buf: W) -> io::Result<()> {
        if frame.is_empty() {
            match self.escape_count {
                MID_LINE => buf.write_all(b"\r\n.\r\n").await?,
                AFTER_CR => buf.write_all(b"\n.\r\n").await?,
                _ => buf.write_all(b".\r\n").await?,
            }
            self.escape_count = LINE_START;
            return Ok(());
        }

        let mut encoded = Vec::with_capacity(frame.len() + 8);
        for byte in frame {
            match (self.escape_count, *byte) {
                (AFTER_CR, b'\n') => {
                    encoded.push(b'\n');
                    self.escape_count = LINE_START;
                }
                (_, b'\n') => {
                    encoded.extend_from_slice(b"\r\n");
                    self.escape_count = LINE_START;
                }
                (LINE_START, b'.') => {
                    encoded.extend_from_slice(b"..");
                    self.escape_count = MID_LINE;
                }
                (_, b'\r') => {
                    encoded.push(b'\r');
                    self.escape_count = AFTER_CR;
                }
                (_, other) => {
                    encoded.push(other);
                    self.escape_count = MID_LINE;
                }
            }
        }
        buf.write_all(&encoded).await
    }
}
