//! Operator-run smoke tests for a channel builder deployment.
//!
//! * [`probe`] logs into a mail server over STARTTLS and sends one test message.
//! * [`harness`] drives the channel builder API through account creation,
//!   authentication and a channel descriptor fetch, reporting pass/fail per step.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    missing_debug_implementations,
    clippy::unwrap_used
)]

pub mod error;
pub mod harness;
pub mod probe;
pub mod smtp;
mod types;

pub use types::*;

pub use crate::smtp::{SmtpClient, SmtpTransport};
