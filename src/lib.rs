//! tatsu - Asynchronous client for the Tatsu API
//!
//! This crate exposes the [Tatsu](https://tatsu.gg) REST API through typed
//! async calls built on `reqwest` and `tokio`.
//!
//! # Overview
//!
//! [`Client`] is the entry point. It decodes responses into the models in
//! [`types`] and handles Tatsu's per-minute rate limit: requests that hit
//! HTTP 429 wait for the window to reset and are retried, and every
//! request sharing the client waits with them.
//!
//! ```no_run
//! # async fn example() -> tatsu::Result<()> {
//! let client = tatsu::Client::new("your-api-key")?;
//! let points = client.get_member_points(602735169090224139, 158646501696864256).await?;
//! println!("{} points, rank {}", points.points, points.rank);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`client`] - High-level API client
//! - [`config`] - Configuration file parsing and validation
//! - [`error`] - Error types and error handling
//! - [`http`] - Routes, raw requests and rate limit handling
//! - [`types`] - Response models and enumerations

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

// Re-exports for convenience
pub use cli::Cli;
pub use client::Client;
pub use config::Config;
pub use error::{ApiErrorCode, Result, TatsuError};
pub use http::HttpClient;
pub use types::{
    ActionType, CurrencyType, GuildMemberPoints, GuildMemberRanking, GuildMemberScore,
    GuildRankings, Period, Ranking, StoreListing, StorePrice, SubscriptionType, User,
};
