//! Error and result type for the API harness

use std::io;

use crate::harness::Role;

/// Faults that stop the run. A non-200 status is not an error, it is a failed step.
#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    /// Connection refused, malformed response, ...
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    /// Reading the operator's confirmation failed
    #[error("io: {0}")]
    Io(#[from] io::Error),
    /// Authentication succeeded but no session cookie came back
    #[error("authenticate_{0} returned 200 without a set-cookie header")]
    MissingSessionCookie(Role),
}

/// Harness result type
pub type HarnessResult<T> = Result<T, HarnessError>;
