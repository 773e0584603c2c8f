//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// nexusboard - Your calendars at a glance
#[derive(Debug, Parser)]
#[command(name = "nexusboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "NEXUSBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Calendar feed URL (can be repeated; replaces the configured feeds)
    #[arg(long = "feed", global = true, action = clap::ArgAction::Append)]
    pub feeds: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show events for the next seven days, grouped by day
    Agenda {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the current month with event days marked
    Month {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Fetch and parse a single feed
    Check {
        /// Feed URL (webcal:// is accepted)
        url: String,
    },

    /// Keep refreshing the feeds and redraw the agenda after each refresh
    Watch {
        /// Refresh interval in seconds (overrides the configuration)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn feeds_are_repeatable_and_global() {
        let cli = Cli::try_parse_from([
            "nexusboard",
            "agenda",
            "--feed",
            "https://a.example/cal.ics",
            "--feed",
            "webcal://b.example/cal.ics",
        ])
        .unwrap();

        assert_eq!(cli.feeds.len(), 2);
        assert!(matches!(cli.command, Some(Command::Agenda { json: false })));
    }

    #[test]
    fn month_json() {
        let cli = Cli::try_parse_from(["nexusboard", "--debug", "month", "--json"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Some(Command::Month { json: true })));
    }

    #[test]
    fn check_requires_url() {
        assert!(Cli::try_parse_from(["nexusboard", "check"]).is_err());

        let cli = Cli::try_parse_from(["nexusboard", "check", "webcal://x.example/"]).unwrap();
        match cli.command {
            Some(Command::Check { url }) => assert_eq!(url, "webcal://x.example/"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn watch_interval_must_be_positive() {
        assert!(Cli::try_parse_from(["nexusboard", "watch", "--interval", "0"]).is_err());

        let cli = Cli::try_parse_from(["nexusboard", "watch", "--interval", "30"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Watch { interval: Some(30) })));
    }

    #[test]
    fn config_subcommands() {
        let cli = Cli::try_parse_from(["nexusboard", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));
    }
}
