//! Command-line front end.
//!
//! Each subcommand stands in for one screen of the app:
//!
//! ```ignore
//! use clap::Parser;
//! use moodlog::cli::{run, Cli};
//!
//! let cli = Cli::parse();
//! run(cli).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{Cli, Command};
pub use version::VERSION;

use color_eyre::Result;

use crate::client::MoodlogClient;
use crate::config::ClientConfig;

/// Build the client from the environment and flags, then run the command.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    let client = MoodlogClient::from_config(config)?;
    commands::dispatch(&client, cli.command).await
}
