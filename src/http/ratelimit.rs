//! Client-side rate limit tracking.
//!
//! Tatsu reports `X-RateLimit-*` headers, but its reset timestamp is
//! relative to the first call and drifts from local time, so the window
//! is tracked locally instead: the first response after a window expires
//! opens a new one lasting [`RateLimitConfig::window`].

use reqwest::header::HeaderMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::config::RateLimitConfig;

/// Rate limit headers of one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed per window.
    pub limit: Option<u64>,
    /// Requests left in the current window.
    pub remaining: Option<u64>,
    /// Server-reported reset timestamp.
    pub reset: Option<u64>,
}

impl RateLimitInfo {
    /// Reads the `X-RateLimit-*` headers. Missing or malformed values are `None`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        };

        Self {
            limit: read("x-ratelimit-limit"),
            remaining: read("x-ratelimit-remaining"),
            reset: read("x-ratelimit-reset"),
        }
    }
}

#[derive(Debug, Default)]
struct Window {
    reset_at: Option<Instant>,
    exhausted: bool,
}

/// Shared rate limit state for one HTTP client.
///
/// Requests pass through a gate before being sent. While a 429 is being
/// waited out the gate is closed and every other request queues behind it.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    gate: RwLock<()>,
    state: Mutex<Window>,
}

impl RateLimiter {
    /// Creates a limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_window(config.window())
    }

    /// Creates a limiter with an explicit window length.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            gate: RwLock::new(()),
            state: Mutex::new(Window::default()),
        }
    }

    /// Waits until a request may be sent.
    pub async fn acquire(&self) {
        drop(self.gate.read().await);

        if self.exhausted_for().is_some() {
            debug!("Rate limit window exhausted, holding requests until it resets");
            self.wait_for_reset().await;
        }
    }

    /// Records a response's rate limit headers.
    pub fn observe(&self, info: &RateLimitInfo) {
        let now = Instant::now();
        let mut state = self.state();

        if state.reset_at.map_or(true, |reset_at| reset_at < now) {
            state.reset_at = Some(now + self.window);
            state.exhausted = false;
        }

        if info.remaining == Some(0) {
            state.exhausted = true;
        }
    }

    /// Closes the gate and sleeps until the current window resets.
    pub async fn wait_for_reset(&self) {
        let _gate = self.gate.write().await;

        let wait = {
            let state = self.state();
            match state.reset_at {
                Some(reset_at) => reset_at.saturating_duration_since(Instant::now()),
                None => self.window,
            }
        };

        // Another waiter may already have slept through this window.
        if !wait.is_zero() {
            debug!(
                wait_ms = wait.as_millis() as u64,
                "Waiting for rate limit window to reset"
            );
            tokio::time::sleep(wait).await;
        }

        self.state().exhausted = false;
    }

    /// Time left until reset when the window has no requests left.
    pub fn exhausted_for(&self) -> Option<Duration> {
        let state = self.state();
        if !state.exhausted {
            return None;
        }
        state
            .reset_at
            .map(|reset_at| reset_at.saturating_duration_since(Instant::now()))
            .filter(|wait| !wait.is_zero())
    }

    /// Time left in the current window, if one is open.
    pub fn time_until_reset(&self) -> Option<Duration> {
        self.state()
            .reset_at
            .map(|reset_at| reset_at.saturating_duration_since(Instant::now()))
    }

    fn state(&self) -> MutexGuard<'_, Window> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimitConfig::default())
    }
}
