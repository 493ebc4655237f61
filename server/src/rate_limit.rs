//! In-memory rate limiting for AI-assisted ISBN intake.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<Uuid, VecDeque<Instant>>`.
//! Two limits enforced:
//! - Per-user: 10 lookups/min
//! - Global: 30 LLM-backed lookups/min
//!
//! Counters live behind a `Mutex` shared by `AppState` clones; contention
//! is negligible at office scale.

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

const DEFAULT_PER_USER_LIMIT: usize = 10;
const DEFAULT_PER_USER_WINDOW_SECS: u64 = 60;

const DEFAULT_GLOBAL_LIMIT: usize = 30;
const DEFAULT_GLOBAL_WINDOW_SECS: u64 = 60;

#[derive(Clone, Copy)]
struct RateLimitConfig {
    per_user_limit: usize,
    per_user_window: Duration,
    global_limit: usize,
    global_window: Duration,
}

impl RateLimitConfig {
    fn from_env() -> Self {
        Self {
            per_user_limit: env_parse("RATE_LIMIT_PER_USER", DEFAULT_PER_USER_LIMIT),
            per_user_window: Duration::from_secs(env_parse(
                "RATE_LIMIT_PER_USER_WINDOW_SECS",
                DEFAULT_PER_USER_WINDOW_SECS,
            )),
            global_limit: env_parse("RATE_LIMIT_GLOBAL", DEFAULT_GLOBAL_LIMIT),
            global_window: Duration::from_secs(env_parse(
                "RATE_LIMIT_GLOBAL_WINDOW_SECS",
                DEFAULT_GLOBAL_WINDOW_SECS,
            )),
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("per-user rate limit exceeded (max {limit} requests/{window_secs}s)")]
    PerUserExceeded { limit: usize, window_secs: u64 },
    #[error("global rate limit exceeded (max {limit} requests/{window_secs}s)")]
    GlobalExceeded { limit: usize, window_secs: u64 },
}

// =============================================================================
// LIMITER
// =============================================================================

struct Counters {
    per_user: HashMap<Uuid, VecDeque<Instant>>,
    global: VecDeque<Instant>,
}

/// Clone-cheap sliding-window rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    counters: Arc<Mutex<Counters>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RateLimitConfig::from_env(),
            counters: Arc::new(Mutex::new(Counters { per_user: HashMap::new(), global: VecDeque::new() })),
        }
    }

    /// Record one request for `user_id`, rejecting it when either window
    /// is full.
    ///
    /// # Errors
    ///
    /// Returns a [`RateLimitError`] naming the exhausted window.
    pub fn check_and_record(&self, user_id: Uuid) -> Result<(), RateLimitError> {
        self.check_and_record_at(user_id, Instant::now())
    }

    fn check_and_record_at(&self, user_id: Uuid, now: Instant) -> Result<(), RateLimitError> {
        let mut counters = self.counters.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        prune(&mut counters.global, self.config.global_window, now);
        if counters.global.len() >= self.config.global_limit {
            return Err(RateLimitError::GlobalExceeded {
                limit: self.config.global_limit,
                window_secs: self.config.global_window.as_secs(),
            });
        }

        let user_hits = counters.per_user.entry(user_id).or_default();
        prune(user_hits, self.config.per_user_window, now);
        if user_hits.len() >= self.config.per_user_limit {
            return Err(RateLimitError::PerUserExceeded {
                limit: self.config.per_user_limit,
                window_secs: self.config.per_user_window.as_secs(),
            });
        }

        user_hits.push_back(now);
        counters.global.push_back(now);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop timestamps older than `window` before `now`.
fn prune(hits: &mut VecDeque<Instant>, window: Duration, now: Instant) {
    while let Some(oldest) = hits.front() {
        if now.duration_since(*oldest) >= window {
            hits.pop_front();
        } else {
            break;
        }
    }
}
