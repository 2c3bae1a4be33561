// wellkeep-core/src/limiter.rs
//! Sliding-window limiting of login attempts and request bursts.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::config::{RateLimitPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_MS};

/// A sliding-window attempt limiter keyed by caller identifier.
///
/// Each identifier keeps the instants of its attempts inside the window.
/// An attempt is admitted while fewer than `max_attempts` remain in it.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: HashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    /// e.g., max_attempts: 5, window: 60s
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: HashMap::new(),
        }
    }

    /// Attempt limiter (logins, form submissions) from the policy.
    pub fn from_policy(policy: &RateLimitPolicy) -> Self {
        Self::new(policy.max_attempts, Duration::from_millis(policy.window_ms))
    }

    /// Request-budget limiter: `max_requests_per_window` over the same window.
    pub fn requests_from_policy(policy: &RateLimitPolicy) -> Self {
        Self::new(policy.max_requests_per_window, Duration::from_millis(policy.window_ms))
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records an attempt for `id` and returns true if it was permitted.
    /// Rejected attempts are not recorded.
    pub fn is_allowed(&mut self, id: &str) -> bool {
        let now = Instant::now();
        let window = self.window;
        // Identifiers whose attempts have all aged out are dropped.
        self.attempts.retain(|_, history| {
            prune(history, now, window);
            !history.is_empty()
        });

        let in_window = self.attempts.get(id).map_or(0, VecDeque::len);
        if in_window >= self.max_attempts {
            debug!("Rate limit reached: {} attempts in window.", in_window);
            return false;
        }

        self.attempts.entry(id.to_string()).or_default().push_back(now);
        true
    }

    /// Number of identifiers with attempts still inside the window.
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }

    /// Time until `id` may attempt again; zero when under the limit.
    pub fn remaining_time(&self, id: &str) -> Duration {
        let Some(history) = self.attempts.get(id) else {
            return Duration::ZERO;
        };
        let now = Instant::now();
        let live: Vec<&Instant> = history
            .iter()
            .filter(|t| now.duration_since(**t) < self.window)
            .collect();
        if live.len() < self.max_attempts {
            return Duration::ZERO;
        }
        live.first()
            .map(|oldest| self.window.saturating_sub(now.duration_since(**oldest)))
            .unwrap_or(Duration::ZERO)
    }

    /// Forgets all attempts for `id`, e.g. after a successful login.
    pub fn reset(&mut self, id: &str) {
        self.attempts.remove(id);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::from_millis(DEFAULT_WINDOW_MS))
    }
}

fn prune(history: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while history
        .front()
        .is_some_and(|oldest| now.duration_since(*oldest) >= window)
    {
        history.pop_front();
    }
}

pub type SharedRateLimiter = Arc<Mutex<RateLimiter>>;
