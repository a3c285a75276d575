//! Command-line interface definition for tatsu.
//!
//! This module defines the CLI structure using clap derive macros,
//! including all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::Period;

/// tatsu - Command-line client for the Tatsu API
///
/// Reads and modifies Tatsu points, scores and rankings, and looks up
/// user profiles and store listings. Results are printed as JSON.
#[derive(Debug, Parser)]
#[command(name = "tatsu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TATSU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tatsu API key (overrides the configuration file and TATSU_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Increase verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level requested by the verbose/quiet flags.
    ///
    /// `None` means no flag was given and the configured level applies.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }

        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a guild member's points
    Points(MemberArgs),

    /// Add (positive amount) or remove (negative amount) a member's points
    UpdatePoints(UpdateArgs),

    /// Add (positive amount) or remove (negative amount) a member's score
    UpdateScore(UpdateArgs),

    /// Show a guild member's ranking over a period
    MemberRanking(MemberRankingArgs),

    /// Show a guild's leaderboard
    Rankings(RankingsArgs),

    /// Show a user's profile
    User(UserArgs),

    /// Show a store listing
    Listing(ListingArgs),

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Arguments identifying a guild member.
#[derive(Debug, Args)]
pub struct MemberArgs {
    /// Discord guild ID
    #[arg(short, long)]
    pub guild: u64,

    /// Discord user ID of the member
    #[arg(short, long)]
    pub member: u64,
}

/// Arguments for the `update-points` and `update-score` subcommands.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: MemberArgs,

    /// Amount to add; negative values remove (1 to 100000 either way)
    #[arg(short, long, allow_negative_numbers = true)]
    pub amount: i64,
}

/// Arguments for the `member-ranking` subcommand.
#[derive(Debug, Args)]
pub struct MemberRankingArgs {
    #[command(flatten)]
    pub target: MemberArgs,

    /// Time range: all, month or week
    #[arg(short, long, default_value = "all", value_parser = parse_period)]
    pub period: Period,
}

/// Arguments for the `rankings` subcommand.
#[derive(Debug, Args)]
pub struct RankingsArgs {
    /// Discord guild ID
    #[arg(short, long)]
    pub guild: u64,

    /// Time range: all, month or week
    #[arg(short, long, default_value = "all", value_parser = parse_period)]
    pub period: Period,

    /// First rank to include (1-based)
    #[arg(long, default_value = "1")]
    pub start: u64,

    /// Last rank to include; fetches as many pages as needed
    #[arg(long)]
    pub end: Option<u64>,
}

/// Arguments for the `user` subcommand.
#[derive(Debug, Args)]
pub struct UserArgs {
    /// Discord user ID
    #[arg(short, long)]
    pub user: u64,
}

/// Arguments for the `listing` subcommand.
#[derive(Debug, Args)]
pub struct ListingArgs {
    /// Store listing ID
    #[arg(long)]
    pub id: String,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration file
    Validate,

    /// Show the current configuration
    Show,
}

/// Parse a ranking period from a string.
fn parse_period(s: &str) -> Result<Period, String> {
    s.parse().map_err(|e: crate::error::TatsuError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        // Verify CLI can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_points_command() {
        let cli = Cli::parse_from(["tatsu", "points", "-g", "602735169090224139", "-m", "42"]);

        match cli.command {
            Commands::Points(args) => {
                assert_eq!(args.guild, 602735169090224139);
                assert_eq!(args.member, 42);
            }
            _ => panic!("Expected Points command"),
        }
    }

    #[test]
    fn test_update_points_negative_amount() {
        let cli = Cli::parse_from([
            "tatsu",
            "update-points",
            "--guild",
            "1",
            "--member",
            "2",
            "--amount",
            "-50",
        ]);

        match cli.command {
            Commands::UpdatePoints(args) => {
                assert_eq!(args.target.guild, 1);
                assert_eq!(args.target.member, 2);
                assert_eq!(args.amount, -50);
            }
            _ => panic!("Expected UpdatePoints command"),
        }
    }

    #[test]
    fn test_update_score_command() {
        let cli = Cli::parse_from(["tatsu", "update-score", "-g", "1", "-m", "2", "-a", "10"]);

        match cli.command {
            Commands::UpdateScore(args) => assert_eq!(args.amount, 10),
            _ => panic!("Expected UpdateScore command"),
        }
    }

    #[test]
    fn test_member_ranking_period() {
        let cli = Cli::parse_from(["tatsu", "member-ranking", "-g", "1", "-m", "2"]);
        match cli.command {
            Commands::MemberRanking(args) => assert_eq!(args.period, Period::All),
            _ => panic!("Expected MemberRanking command"),
        }

        let cli = Cli::parse_from(["tatsu", "member-ranking", "-g", "1", "-m", "2", "-p", "week"]);
        match cli.command {
            Commands::MemberRanking(args) => assert_eq!(args.period, Period::Week),
            _ => panic!("Expected MemberRanking command"),
        }
    }

    #[test]
    fn test_invalid_period_rejected() {
        let result = Cli::try_parse_from(["tatsu", "rankings", "-g", "1", "-p", "year"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rankings_command() {
        let cli = Cli::parse_from([
            "tatsu", "rankings", "-g", "1", "-p", "month", "--start", "114", "--end", "250",
        ]);

        match cli.command {
            Commands::Rankings(args) => {
                assert_eq!(args.guild, 1);
                assert_eq!(args.period, Period::Month);
                assert_eq!(args.start, 114);
                assert_eq!(args.end, Some(250));
            }
            _ => panic!("Expected Rankings command"),
        }
    }

    #[test]
    fn test_rankings_defaults() {
        let cli = Cli::parse_from(["tatsu", "rankings", "-g", "1"]);

        match cli.command {
            Commands::Rankings(args) => {
                assert_eq!(args.period, Period::All);
                assert_eq!(args.start, 1);
                assert!(args.end.is_none());
            }
            _ => panic!("Expected Rankings command"),
        }
    }

    #[test]
    fn test_user_and_listing_commands() {
        let cli = Cli::parse_from(["tatsu", "user", "-u", "158646501696864256"]);
        assert!(matches!(cli.command, Commands::User(UserArgs { user: 158646501696864256 })));

        let cli = Cli::parse_from(["tatsu", "listing", "--id", "background_1"]);
        match cli.command {
            Commands::Listing(args) => assert_eq!(args.id, "background_1"),
            _ => panic!("Expected Listing command"),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["tatsu", "config", "validate"]);
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Validate)));

        let cli = Cli::parse_from(["tatsu", "config", "show"]);
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_from([
            "tatsu",
            "-c",
            "/custom/tatsu.yaml",
            "--token",
            "abc",
            "user",
            "-u",
            "1",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/custom/tatsu.yaml")));
        assert_eq!(cli.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_verbose_levels() {
        let cli = Cli::parse_from(["tatsu", "user", "-u", "1"]);
        assert_eq!(cli.log_level(), None);

        let cli = Cli::parse_from(["tatsu", "-v", "user", "-u", "1"]);
        assert_eq!(cli.log_level(), Some("debug"));

        let cli = Cli::parse_from(["tatsu", "-vvv", "user", "-u", "1"]);
        assert_eq!(cli.log_level(), Some("trace"));
    }

    #[test]
    fn test_quiet_mode() {
        let cli = Cli::parse_from(["tatsu", "-q", "user", "-u", "1"]);
        assert_eq!(cli.log_level(), Some("error"));
    }
}
