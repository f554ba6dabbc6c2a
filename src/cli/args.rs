//! Command-line arguments for moodlog.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "moodlog")]
#[command(version = super::version::VERSION)]
#[command(about = "Write diary entries and read their emotional analysis", long_about = None)]
pub struct Cli {
    /// Backend URL (overrides MOODLOG_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Status,
    /// Create an account interactively
    Signup,
    /// List diary entries
    List {
        /// Only entries whose title or content contains this text
        #[arg(long, conflicts_with = "date")]
        search: Option<String>,
        /// Only entries written on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show the days of a month that have entries
    Dates {
        /// Month as YYYY-MM
        #[arg(long, value_parser = parse_month)]
        month: (i32, u32),
    },
    /// Show one entry
    Show { id: String },
    /// Write a new entry and start its analysis
    Write {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Change an existing entry
    Edit {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete an entry
    Delete { id: String },
    /// Analyze an entry and show the result
    Analyze {
        id: String,
        /// Keep polling until the analysis completes
        #[arg(long)]
        wait: bool,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Status => "status",
            Command::Signup => "signup",
            Command::List { .. } => "list",
            Command::Dates { .. } => "dates",
            Command::Show { .. } => "show",
            Command::Write { .. } => "write",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::Analyze { .. } => "analyze",
        }
    }

    /// Whether the command needs a signed-in session.
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Logout | Command::Status | Command::Signup
        )
    }
}

/// Parse `YYYY-MM`.
fn parse_month(value: &str) -> Result<(i32, u32), String> {
    let invalid = || format!("expected YYYY-MM, got '{}'", value);
    let (year, month) = value.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("moodlog").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_list() {
        let cli = parse(&["list", "--date", "2025-05-02", "--page", "2"]).unwrap();
        assert_eq!(
            cli.command,
            Command::List {
                search: None,
                date: NaiveDate::from_ymd_opt(2025, 5, 2),
                page: 2,
            }
        );
    }

    #[test]
    fn test_search_conflicts_with_date() {
        assert!(parse(&["list", "--search", "x", "--date", "2025-05-02"]).is_err());
    }

    #[test]
    fn test_parse_analyze_wait() {
        let cli = parse(&["analyze", "7", "--wait", "--api-url", "http://x"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Analyze {
                id: "7".to_string(),
                wait: true
            }
        );
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-05"), Ok((2025, 5)));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("May").is_err());
    }

    #[test]
    fn test_requires_session() {
        assert!(!Command::Status.requires_session());
        assert!(Command::Delete { id: "1".into() }.requires_session());
    }
}
