//! Integration harness for the channel builder API
//!
//! A [`ChannelBuilderClient`] holds the account under test and the session tokens it
//! obtained; [`run_steps`] walks a fixed list of [`Step`]s and collects one
//! [`TestResult`] per step. A step passes when the backend answers exactly `200`.
//!

mod client;
mod config;
mod confirm;
mod error;
mod role;
mod session;
mod steps;

pub use self::client::ChannelBuilderClient;
pub use self::config::{Account, EndpointConfig};
pub use self::confirm::{AutoConfirm, Confirmation, StdinConfirmation};
pub use self::error::{HarnessError, HarnessResult};
pub use self::role::Role;
pub use self::session::{extract_session_token, SessionCache, SessionKey};
pub use self::steps::{print_report, run_steps, Step, TestResult};
