//! pwseal CLI - Seal and open password envelopes from the shell
//!
//! The password comes from `--password`, the `PWSEAL_PASSWORD` environment
//! variable, or an interactive prompt, in that order.

mod cli;
mod commands;
mod io;
mod password;

use clap::Parser;
use pwseal_core::SealPool;
use tracing::debug;

use cli::{Args, Command};
use password::resolve_password;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries envelopes and plaintext
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let pool = SealPool::default();
    debug!("Envelope pool width: {}", pool.max_concurrent());

    match args.command {
        Command::Encrypt { input, output } => {
            let password =
                resolve_password(args.password, true, |p| rpassword::prompt_password(p))?;
            commands::encrypt(&pool, &password, input.as_deref(), output.as_deref()).await
        }
        Command::Decrypt { input, output } => {
            let password =
                resolve_password(args.password, false, |p| rpassword::prompt_password(p))?;
            commands::decrypt(&pool, &password, input.as_deref(), output.as_deref()).await
        }
        Command::Inspect { input, json } => commands::inspect(input.as_deref(), json),
    }
}
