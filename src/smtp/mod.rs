//! The SMTP client used by the mail probe
//!
//! It sends a message over an established stream: greeting, EHLO, optional STARTTLS
//! hand-off, AUTH, then MAIL/RCPT/DATA.
//!

pub mod authentication;
pub mod codec;
pub mod commands;
pub mod error;
pub mod extension;
pub mod response;
pub mod smtp_client;
pub mod stream;

pub use self::smtp_client::{SmtpClient, SmtpTransport};

/// Default smtp port, the one the probe submits on
pub const SMTP_PORT: u16 = 25;
