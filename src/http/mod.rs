//! HTTP layer for the Tatsu API.
//!
//! [`HttpClient`] sends authorised requests, waits out rate limits and
//! returns raw response bodies. Decoding into models happens in
//! [`crate::client`].

pub mod ratelimit;
pub mod route;

pub use ratelimit::{RateLimitInfo, RateLimiter};
pub use route::Route;

use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::config::{ClientConfig, RateLimitConfig, REDACTED_TOKEN};
use crate::error::{Result, TatsuError};
use crate::types::{ActionType, Period};

/// Largest amount of points or score a single modification may move.
pub const MAX_MODIFY_AMOUNT: u64 = 100_000;

/// Body of a points or score modification.
#[derive(Debug, Clone, Copy, Serialize)]
struct ModifyRequest {
    action: ActionType,
    amount: u64,
}

/// A small HTTP client that sends requests to the Tatsu API.
pub struct HttpClient {
    /// HTTP client.
    client: reqwest::Client,
    /// Base URL routes are resolved against.
    base_url: Url,
    /// API key sent as the Authorization header.
    token: String,
    /// User-Agent header value.
    user_agent: String,
    /// Shared rate limit state.
    limiter: RateLimiter,
    /// Attempts per request before giving up on 429s.
    max_attempts: u32,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(
        token: impl Into<String>,
        config: &ClientConfig,
        rate_limit: &RateLimitConfig,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            TatsuError::config_with_source(format!("Invalid base URL: {}", config.base_url), e)
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TatsuError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
            user_agent: config.user_agent(),
            limiter: RateLimiter::new(rate_limit),
            max_attempts: rate_limit.max_attempts.max(1),
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the rate limiter shared by this client's requests.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Sends a request to an API route and returns the response body.
    ///
    /// HTTP 429 responses are retried after the rate limit window resets,
    /// up to the configured number of attempts.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        route: &Route,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        let url = route.url(&self.base_url)?;
        let method = route.method();

        for attempt in 1..=self.max_attempts {
            self.limiter.acquire().await;

            let mut builder = self
                .client
                .request(method.clone(), url.clone())
                .header(USER_AGENT, &self.user_agent)
                .header(AUTHORIZATION, &self.token);
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TatsuError::connection_with_source(url.as_str(), e))?;

            let status = response.status();
            debug!(
                method = %method,
                url = %response.url(),
                status = status.as_u16(),
                attempt,
                "Request completed"
            );

            let info = RateLimitInfo::from_headers(response.headers());
            debug!(
                limit = ?info.limit,
                remaining = ?info.remaining,
                reset = ?info.reset,
                "Rate limit info"
            );
            self.limiter.observe(&info);

            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    route = %route,
                    attempt,
                    max_attempts = self.max_attempts,
                    wait_ms = self
                        .limiter
                        .time_until_reset()
                        .map(|d| d.as_millis() as u64),
                    "Hit a rate limit"
                );
                if attempt < self.max_attempts {
                    self.limiter.wait_for_reset().await;
                }
                continue;
            }

            let data = response
                .bytes()
                .await
                .map_err(|e| TatsuError::connection_with_source(url.as_str(), e))?;

            if !status.is_success() {
                return Err(TatsuError::from_response(status.as_u16(), &data));
            }

            return Ok(data.to_vec());
        }

        Err(TatsuError::RateLimited {
            attempts: self.max_attempts,
        })
    }

    async fn get(&self, route: &Route, query: &[(&str, String)]) -> Result<Vec<u8>> {
        self.request::<()>(route, query, None).await
    }

    /// Fetches a guild member's points.
    pub async fn get_guild_member_points(&self, guild_id: u64, member_id: u64) -> Result<Vec<u8>> {
        let route = Route::get("guilds/{guild_id}/members/{member_id}/points")
            .param("guild_id", guild_id)
            .param("member_id", member_id);
        self.get(&route, &[]).await
    }

    /// Adds or removes a guild member's points.
    pub async fn modify_guild_member_points(
        &self,
        guild_id: u64,
        member_id: u64,
        action: ActionType,
        amount: u64,
    ) -> Result<Vec<u8>> {
        check_amount("Points", amount)?;

        let route = Route::patch("guilds/{guild_id}/members/{member_id}/points")
            .param("guild_id", guild_id)
            .param("member_id", member_id);
        let body = ModifyRequest { action, amount };
        self.request(&route, &[], Some(&body)).await
    }

    /// Adds or removes a guild member's score.
    pub async fn modify_guild_member_score(
        &self,
        guild_id: u64,
        member_id: u64,
        action: ActionType,
        amount: u64,
    ) -> Result<Vec<u8>> {
        check_amount("Score", amount)?;

        let route = Route::patch("guilds/{guild_id}/members/{member_id}/score")
            .param("guild_id", guild_id)
            .param("member_id", member_id);
        let body = ModifyRequest { action, amount };
        self.request(&route, &[], Some(&body)).await
    }

    /// Fetches a guild member's ranking over a period.
    pub async fn get_guild_member_ranking(
        &self,
        guild_id: u64,
        user_id: u64,
        period: Period,
    ) -> Result<Vec<u8>> {
        let route = Route::get("guilds/{guild_id}/rankings/members/{user_id}/{time_range}")
            .param("guild_id", guild_id)
            .param("user_id", user_id)
            .param("time_range", period);
        self.get(&route, &[]).await
    }

    /// Fetches one page of a guild's rankings, starting at a 0-indexed offset.
    pub async fn get_guild_rankings(
        &self,
        guild_id: u64,
        period: Period,
        offset: u64,
    ) -> Result<Vec<u8>> {
        let route = Route::get("guilds/{guild_id}/rankings/{time_range}")
            .param("guild_id", guild_id)
            .param("time_range", period);
        self.get(&route, &[("offset", offset.to_string())]).await
    }

    /// Fetches a user's profile.
    pub async fn get_user_profile(&self, user_id: u64) -> Result<Vec<u8>> {
        let route = Route::get("users/{user_id}/profile").param("user_id", user_id);
        self.get(&route, &[]).await
    }

    /// Fetches a store listing.
    pub async fn get_store_listing(&self, listing_id: &str) -> Result<Vec<u8>> {
        let route = Route::get("store/listings/{listing_id}").param("listing_id", listing_id);
        self.get(&route, &[]).await
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &REDACTED_TOKEN)
            .field("user_agent", &self.user_agent)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

fn check_amount(what: &str, amount: u64) -> Result<()> {
    if !(1..=MAX_MODIFY_AMOUNT).contains(&amount) {
        return Err(TatsuError::invalid_argument(format!(
            "{} amount must be between 1 and 100,000.",
            what
        )));
    }
    Ok(())
}
