//! Tatsu API client.
//!
//! This module provides the client that serves as the user interface for
//! the Tatsu API.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::iter::StepBy;
use std::ops::Range;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::{ClientConfig, Config, RateLimitConfig};
use crate::error::{Result, TatsuError};
use crate::http::HttpClient;
use crate::types::{
    ActionType, GuildMemberPoints, GuildMemberRanking, GuildMemberScore, GuildRankings, Period,
    StoreListing, User,
};

/// Rankings the API returns per page.
pub const RANKINGS_PAGE_SIZE: u64 = 100;

/// Ranking pages requested at the same time.
const MAX_CONCURRENT_PAGES: usize = 4;

/// Client for the Tatsu API.
///
/// The connection pool is released when the client is dropped.
#[derive(Debug)]
pub struct Client {
    /// HTTP client that talks to the API.
    http: HttpClient,
}

impl Client {
    /// Creates a client for the given API key with default settings.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(
            token,
            &ClientConfig::default(),
            &RateLimitConfig::default(),
        )
    }

    /// Creates a client with explicit client and rate limit settings.
    pub fn with_config(
        token: impl Into<String>,
        config: &ClientConfig,
        rate_limit: &RateLimitConfig,
    ) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(token, config, rate_limit)?,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.require_token()?;
        Self::with_config(token, &config.client, &config.rate_limit)
    }

    /// Returns the underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Gets a guild member's points.
    pub async fn get_member_points(
        &self,
        guild_id: u64,
        member_id: u64,
    ) -> Result<GuildMemberPoints> {
        let data = self
            .http
            .get_guild_member_points(guild_id, member_id)
            .await?;
        decode(&data)
    }

    /// Modifies a guild member's points and returns the updated points.
    ///
    /// A negative `amount` removes points, anything else adds them.
    pub async fn update_member_points(
        &self,
        guild_id: u64,
        member_id: u64,
        amount: i64,
    ) -> Result<GuildMemberPoints> {
        let action = ActionType::for_amount(amount);
        info!(guild_id, member_id, amount, "Modifying member points");
        let data = self
            .http
            .modify_guild_member_points(guild_id, member_id, action, amount.unsigned_abs())
            .await?;
        decode(&data)
    }

    /// Modifies a guild member's score and returns the updated score.
    ///
    /// A negative `amount` removes score, anything else adds it.
    pub async fn update_member_score(
        &self,
        guild_id: u64,
        member_id: u64,
        amount: i64,
    ) -> Result<GuildMemberScore> {
        let action = ActionType::for_amount(amount);
        info!(guild_id, member_id, amount, "Modifying member score");
        let data = self
            .http
            .modify_guild_member_score(guild_id, member_id, action, amount.unsigned_abs())
            .await?;
        decode(&data)
    }

    /// Gets the ranking of a guild member over some period of time.
    pub async fn get_member_ranking(
        &self,
        guild_id: u64,
        member_id: u64,
        period: Period,
    ) -> Result<GuildMemberRanking> {
        let data = self
            .http
            .get_guild_member_ranking(guild_id, member_id, period)
            .await?;
        decode(&data)
    }

    /// Gets the rankings within a guild over some period of time.
    ///
    /// Ranks are 1-based. Without `end`, a single page starting at `start`
    /// is returned as the API sends it. With `end`, the pages covering
    /// `start..=end` are fetched a few at a time and the result holds
    /// exactly the rankings in that range. Fetching stops early at the
    /// first short page, so a large `end` only costs the pages that exist.
    ///
    /// # Errors
    /// `InvalidArgument` if `start` is 0, or `end` is 0 or not greater than `start`.
    pub async fn get_guild_rankings(
        &self,
        guild_id: u64,
        period: Period,
        start: u64,
        end: Option<u64>,
    ) -> Result<GuildRankings> {
        let offsets = ranking_offsets(start, end)?;

        let Some(end) = end else {
            let data = self
                .http
                .get_guild_rankings(guild_id, period, start - 1)
                .await?;
            return decode(&data);
        };

        debug!(
            guild_id,
            period = %period,
            start,
            end,
            "Fetching guild rankings"
        );

        let mut pages = stream::iter(offsets)
            .map(|offset| self.http.get_guild_rankings(guild_id, period, offset))
            .buffered(MAX_CONCURRENT_PAGES);

        let mut rankings = Vec::new();
        while let Some(data) = pages.try_next().await? {
            let page: GuildRankings = decode(&data)?;
            let last_page = (page.rankings.len() as u64) < RANKINGS_PAGE_SIZE;
            rankings.extend(
                page.rankings
                    .into_iter()
                    .filter(|ranking| (start..=end).contains(&ranking.rank)),
            );
            if last_page {
                break;
            }
        }

        Ok(GuildRankings {
            guild_id: guild_id.to_string(),
            rankings,
        })
    }

    /// Gets a user's profile.
    pub async fn get_user(&self, user_id: u64) -> Result<User> {
        let data = self.http.get_user_profile(user_id).await?;
        decode(&data)
    }

    /// Gets a listing from the Tatsu store.
    pub async fn get_store_listing(&self, listing_id: &str) -> Result<StoreListing> {
        let data = self.http.get_store_listing(listing_id).await?;
        decode(&data)
    }
}

/// Decodes a JSON response body.
fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(data)?)
}

/// Validates a 1-based rank range and returns the 0-indexed page offsets to fetch.
///
/// The offsets are generated lazily.
fn ranking_offsets(start: u64, end: Option<u64>) -> Result<StepBy<Range<u64>>> {
    if start < 1 {
        return Err(TatsuError::invalid_argument(
            "Start parameter must be greater than or equal to 1.",
        ));
    }

    // A single page is one step past its own offset.
    let Some(end) = end else {
        return Ok((start - 1..start).step_by(RANKINGS_PAGE_SIZE as usize));
    };

    if end < 1 {
        return Err(TatsuError::invalid_argument(
            "End parameter must be greater than or equal to 1.",
        ));
    }
    if end <= start {
        return Err(TatsuError::invalid_argument(
            "End must be greater than start if used.",
        ));
    }

    // The last wanted rank sits at 0-indexed offset `end - 1`.
    Ok((start - 1..end).step_by(RANKINGS_PAGE_SIZE as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new("token").unwrap();
        assert_eq!(client.http().base_url().as_str(), "https://api.tatsu.gg/v1/");
    }

    #[test]
    fn test_debug_masks_token() {
        let mut config = Config::default();
        config.client.token = Some("SUPER-SECRET-KEY".to_string());

        let client = Client::from_config(&config).unwrap();
        assert!(!format!("{:?}", client).contains("SUPER-SECRET-KEY"));
        assert!(!format!("{:?}", config).contains("SUPER-SECRET-KEY"));
    }

    #[test]
    fn test_from_config_requires_token() {
        let config = Config::default();
        assert!(matches!(
            Client::from_config(&config),
            Err(TatsuError::Config { .. })
        ));

        let mut config = Config::default();
        config.client.token = Some("token".to_string());
        assert!(Client::from_config(&config).is_ok());
    }

    fn offsets(start: u64, end: Option<u64>) -> Vec<u64> {
        ranking_offsets(start, end).unwrap().collect()
    }

    #[test]
    fn test_ranking_offsets_single_page() {
        assert_eq!(offsets(1, None), vec![0]);
        assert_eq!(offsets(114, None), vec![113]);
    }

    #[test]
    fn test_ranking_offsets_multiple_pages() {
        assert_eq!(offsets(1, Some(100)), vec![0]);
        assert_eq!(offsets(1, Some(101)), vec![0, 100]);
        assert_eq!(offsets(1, Some(102)), vec![0, 100]);
        assert_eq!(offsets(114, Some(250)), vec![113, 213]);
    }

    #[test]
    fn test_ranking_offsets_huge_end_is_lazy() {
        let mut pages = ranking_offsets(1, Some(u64::MAX)).unwrap();
        assert_eq!(pages.next(), Some(0));
        assert_eq!(pages.next(), Some(100));
        assert_eq!(pages.nth(997), Some(99_900));
    }

    #[test]
    fn test_ranking_offsets_validation() {
        let err = ranking_offsets(0, None).unwrap_err();
        assert!(err.to_string().contains("Start parameter"));

        let err = ranking_offsets(5, Some(0)).unwrap_err();
        assert!(err.to_string().contains("End parameter"));

        let err = ranking_offsets(5, Some(5)).unwrap_err();
        assert!(err.to_string().contains("greater than start"));
    }

    #[test]
    fn test_decode_error() {
        let result: Result<GuildMemberPoints> = decode(b"{\"guild_id\": 1}");
        assert!(matches!(result, Err(TatsuError::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_guild_rankings_rejects_bad_range() {
        let client = Client::new("token").unwrap();
        let result = client
            .get_guild_rankings(1, Period::All, 10, Some(3))
            .await;
        assert!(matches!(result, Err(TatsuError::InvalidArgument { .. })));
    }
}
