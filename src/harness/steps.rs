use std::fmt::{self, Display, Formatter};

use log::info;

use crate::harness::client::ChannelBuilderClient;
use crate::harness::confirm::Confirmation;
use crate::harness::error::HarnessResult;
use crate::harness::Role;

/// One named check of the run
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Step {
    CreateAccount,
    AuthenticateFrontend,
    AuthenticateRoku,
    GetChannelXmlRoku,
    ValidateSessionFrontend,
    ValidateSessionRoku,
}

impl Step {
    /// The standard run, in order
    pub const DEFAULT: [Step; 4] = [
        Step::CreateAccount,
        Step::AuthenticateFrontend,
        Step::AuthenticateRoku,
        Step::GetChannelXmlRoku,
    ];

    /// Appended to the standard run by `--check-sessions`
    pub const SESSION_CHECKS: [Step; 2] = [Step::ValidateSessionFrontend, Step::ValidateSessionRoku];

    pub fn name(self) -> &'static str {
        match self {
            Step::CreateAccount => "Create Account",
            Step::AuthenticateFrontend => "Authenticate Frontend",
            Step::AuthenticateRoku => "Authenticate Roku",
            Step::GetChannelXmlRoku => "Get Channel XML Roku",
            Step::ValidateSessionFrontend => "Validate Session Frontend",
            Step::ValidateSessionRoku => "Validate Session Roku",
        }
    }

    pub async fn run<C: Confirmation>(self, client: &mut ChannelBuilderClient<C>) -> HarnessResult<bool> {
        match self {
            Step::CreateAccount => client.create_fresh_account().await,
            Step::AuthenticateFrontend => client.authenticate_frontend().await,
            Step::AuthenticateRoku => client.authenticate_roku().await,
            Step::GetChannelXmlRoku => client.channel_xml_roku().await,
            Step::ValidateSessionFrontend => client.validate_session(Role::Frontend).await,
            Step::ValidateSessionRoku => client.validate_session(Role::Roku).await,
        }
    }
}

/// Outcome of one step
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TestResult {
    pub name: &'static str,
    pub passed: bool,
}

impl Display for TestResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.passed)
    }
}

/// Runs `steps` one after the other. A transport fault ends the run.
pub async fn run_steps<C: Confirmation>(
    client: &mut ChannelBuilderClient<C>,
    steps: &[Step],
) -> HarnessResult<Vec<TestResult>> {
    let mut results = Vec::with_capacity(steps.len());
    for step in steps {
        info!("running {}", step.name());
        let passed = step.run(client).await?;
        results.push(TestResult {
            name: step.name(),
            passed,
        });
    }
    Ok(results)
}

pub fn print_report(results: &[TestResult]) {
    for result in results {
        println!("{}", result);
    }
}
