use anyhow::{Context, Result};
use channel_probe::probe::MailProbe;
use channel_probe::smtp::authentication::Credentials;
use channel_probe::EmailAddress;
use clap::Parser;

/// Log into a mail server over STARTTLS and send one test message
#[derive(Parser, Debug)]
#[command(name = "mail-probe")]
struct Opt {
    /// Mail server to talk to
    #[arg(long, env = "MAIL_PROBE_HOST")]
    host: String,

    /// SMTP port
    #[arg(long, env = "MAIL_PROBE_PORT", default_value_t = 25)]
    port: u16,

    /// Login name
    #[arg(long, env = "MAIL_PROBE_USERNAME")]
    username: String,

    /// Login password
    #[arg(long, env = "MAIL_PROBE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Mail from
    #[arg(long, env = "MAIL_PROBE_FROM")]
    from: EmailAddress,

    /// Rcpt to
    #[arg(long, env = "MAIL_PROBE_TO")]
    to: EmailAddress,

    /// Message body
    #[arg(long, default_value = "Testing!")]
    message: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::parse();
    let probe = MailProbe::new(
        &opt.host,
        Credentials::new(opt.username, opt.password),
        opt.from,
        opt.to,
    )
    .port(opt.port);

    let response = probe
        .send(&opt.message)
        .await
        .with_context(|| format!("could not send test message through {}", opt.host))?;

    println!("Email sent. Response: {:?}", response);
    Ok(())
}
