use clap::Parser;
use color_eyre::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use moodlog::cli::{self, Cli};
use moodlog::error::MoodlogError;

/// Environment variable holding the log filter, e.g. `moodlog=debug`.
const LOG_ENV: &str = "MOODLOG_LOG";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli::run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(report) => match report.downcast_ref::<MoodlogError>() {
            Some(err) => {
                eprintln!("Error: {}", err.user_message());
                eprintln!("{}", err.recovery_hint());
                Ok(ExitCode::FAILURE)
            }
            None => Err(report),
        },
    }
}
