//! The operator gate after account creation.
//!
//! Accounts may need out-of-band verification (a confirmation email) before they can log
//! in, so the harness waits for the operator before moving on.

use std::io;

use async_trait::async_trait;
use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Something that decides when the run may continue
#[async_trait]
pub trait Confirmation: Send {
    /// Show `prompt` and return once the operator confirmed
    async fn confirm(&mut self, prompt: &str) -> io::Result<()>;
}

/// Prints the prompt on stdout and waits for a line on stdin. There is no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmation;

#[async_trait]
impl Confirmation for StdinConfirmation {
    async fn confirm(&mut self, prompt: &str) -> io::Result<()> {
        prompt_for_line(
            &mut BufReader::new(tokio::io::stdin()),
            &mut tokio::io::stdout(),
            prompt,
        )
        .await
    }
}

/// Writes `prompt` and waits for one line. End of input means nobody confirmed.
async fn prompt_for_line<R, W>(reader: &mut R, writer: &mut W, prompt: &str) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(prompt.as_bytes()).await?;
    writer.flush().await?;

    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before the account was confirmed",
        ));
    }
    Ok(())
}

/// Continues immediately, for unattended runs against a backend that needs no verification.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&mut self, prompt: &str) -> io::Result<()> {
        info!("{} (continuing without waiting)", prompt);
        Ok(())
    }
}
