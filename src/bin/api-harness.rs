use anyhow::{Context, Result};
use channel_probe::harness::{
    print_report, run_steps, Account, AutoConfirm, ChannelBuilderClient, Confirmation,
    EndpointConfig, StdinConfirmation, Step,
};
use clap::Parser;

/// Drive the channel builder API through signup, login and channel fetch
#[derive(Parser, Debug)]
#[command(name = "api-harness")]
struct Opt {
    /// Backend host
    #[arg(long, env = "CHANNEL_TESTER_HOST")]
    host: String,

    /// Port of the API server
    #[arg(long, env = "CHANNEL_TESTER_API_PORT", default_value_t = 3031)]
    api_port: u16,

    /// Port of the frontend, used for origin and referer
    #[arg(long, env = "CHANNEL_TESTER_FRONTEND_PORT", default_value_t = 8080)]
    frontend_port: u16,

    /// Username of a fresh account
    #[arg(long, env = "CHANNEL_TESTER_USERNAME")]
    username: String,

    /// Password of the fresh account
    #[arg(long, env = "CHANNEL_TESTER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Talk https instead of http
    #[arg(long, env = "CHANNEL_TESTER_HTTPS")]
    https: bool,

    /// Don't wait for the operator after account creation
    #[arg(long)]
    no_wait: bool,

    /// Also validate the frontend and roku sessions
    #[arg(long)]
    check_sessions: bool,
}

async fn run<C: Confirmation>(opt: &Opt, confirmation: C) -> Result<()> {
    let config =
        EndpointConfig::new(opt.host.clone(), opt.api_port, opt.frontend_port).use_https(opt.https);
    let account = Account::new(opt.username.clone(), opt.password.clone());
    let mut client = ChannelBuilderClient::new(config, account, confirmation)?;

    let mut steps = Step::DEFAULT.to_vec();
    if opt.check_sessions {
        steps.extend_from_slice(&Step::SESSION_CHECKS);
    }

    let results = run_steps(&mut client, &steps)
        .await
        .with_context(|| format!("run against {} aborted", client.origin()))?;
    print_report(&results);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::parse();
    if opt.no_wait {
        run(&opt, AutoConfirm).await
    } else {
        run(&opt, StdinConfirmation).await
    }
}
