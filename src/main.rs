//! tatsu - Command-line client for the Tatsu API
//!
//! Entry point for the tatsu application.

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tatsu::cli::{Cli, Commands, ConfigCommands};
use tatsu::config::{Config, LogFormat, REDACTED_TOKEN};
use tatsu::error::exit_code;
use tatsu::{Client, TatsuError};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging depends on the config file, so a broken config is reported on stderr.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(exit_code::GENERAL_ERROR as u8);
    }

    // Execute the command
    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Initialize the tracing subscriber from CLI flags and configuration.
///
/// `RUST_LOG` takes precedence over both.
fn init_logging(
    cli: &Cli,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = cli
        .log_level()
        .unwrap_or_else(|| config.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Json => builder.json().try_init()?,
        LogFormat::Text => builder.try_init()?,
    }

    Ok(())
}

/// Main application logic.
fn run(cli: &Cli, config: Config) -> tatsu::Result<()> {
    if let Commands::Config(subcmd) = &cli.command {
        return cmd_config(subcmd, &config);
    }

    let client = Client::from_config(&config)?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        TatsuError::config_with_source("Failed to create async runtime", e)
    })?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Points(args) => {
                print_json(&client.get_member_points(args.guild, args.member).await?)
            }
            Commands::UpdatePoints(args) => print_json(
                &client
                    .update_member_points(args.target.guild, args.target.member, args.amount)
                    .await?,
            ),
            Commands::UpdateScore(args) => print_json(
                &client
                    .update_member_score(args.target.guild, args.target.member, args.amount)
                    .await?,
            ),
            Commands::MemberRanking(args) => print_json(
                &client
                    .get_member_ranking(args.target.guild, args.target.member, args.period)
                    .await?,
            ),
            Commands::Rankings(args) => print_json(
                &client
                    .get_guild_rankings(args.guild, args.period, args.start, args.end)
                    .await?,
            ),
            Commands::User(args) => print_json(&client.get_user(args.user).await?),
            Commands::Listing(args) => print_json(&client.get_store_listing(&args.id).await?),
            Commands::Config(_) => Ok(()),
        }
    })
}

/// Handle the `config` subcommand.
fn cmd_config(subcmd: &ConfigCommands, config: &Config) -> tatsu::Result<()> {
    match subcmd {
        ConfigCommands::Validate => {
            // Loading already validated it.
            println!("✓ Configuration is valid");
            tracing::debug!(
                base_url = %config.client.base_url,
                has_token = config.client.token.is_some(),
                "Validated configuration"
            );
            Ok(())
        }
        ConfigCommands::Show => {
            let mut shown = config.clone();
            if shown.client.token.is_some() {
                shown.client.token = Some(REDACTED_TOKEN.to_string());
            }
            let yaml = serde_yaml::to_string(&shown).map_err(|e| {
                TatsuError::config_with_source("Failed to serialize configuration", e)
            })?;
            println!("{}", yaml);
            Ok(())
        }
    }
}

/// Load configuration, with `--token` taking precedence over `TATSU_TOKEN`.
fn load_config(cli: &Cli) -> tatsu::Result<Config> {
    Config::load_with(cli.config.as_deref(), |key| match (key, &cli.token) {
        ("TATSU_TOKEN", Some(token)) => Some(token.clone()),
        _ => std::env::var(key).ok(),
    })
}

/// Print a response model as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> tatsu::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
