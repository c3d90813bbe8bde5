//! Process-wide sliding-window rate limiter.
//!
//! Tracks timestamps of admitted calls in a trailing window and rejects
//! new calls once the window is full, reporting how long the caller must
//! wait for the oldest entry to expire. This is the only state in the
//! crate whose lifetime exceeds a single request: one instance is shared
//! (via `Arc`) across all concurrent requests and lives for the process.
//!
//! The check-and-append is atomic with respect to other callers — the
//! window sits behind a mutex held only for the admit check, never across
//! a provider call. Nothing persists across process restarts.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::error::AgentError;

/// Sliding-window limiter over admitted call timestamps.
#[derive(Debug)]
pub struct RateLimiter {
    /// Trailing window length.
    window: Duration,
    /// Maximum admitted calls per window.
    max_requests: usize,
    /// Timestamps of admitted calls, oldest first.
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting `max_requests` calls per `window`.
    #[must_use]
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            timestamps: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Admits or rejects a call.
    ///
    /// Prunes entries older than the window, then either rejects with the
    /// seconds until the oldest entry expires or records the current
    /// timestamp and succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::RateLimited`] when the window is full.
    pub fn admit(&self) -> Result<(), AgentError> {
        let now = Instant::now();
        let mut window = self
            .timestamps
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while window.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
            window.pop_front();
        }

        if window.len() >= self.max_requests {
            // +1 rounds up so the hint is never zero while still blocked.
            let wait_secs = window.front().map_or(1, |oldest| {
                self.window
                    .saturating_sub(now.duration_since(*oldest))
                    .as_secs()
                    + 1
            });
            return Err(AgentError::RateLimited {
                wait_secs,
                limit: self.max_requests,
                window_secs: self.window.as_secs(),
            });
        }

        window.push_back(now);
        Ok(())
    }

    /// Number of admitted calls currently inside the window.
    #[must_use]
    pub fn current_count(&self) -> usize {
        let now = Instant::now();
        let mut window = self
            .timestamps
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while window.front().is_some_and(|t| now.duration_since(*t) >= self.window) {
            window.pop_front();
        }
        window.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_admits_up_to_limit() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 10);
        for _ in 0..10 {
            assert!(limiter.admit().is_ok());
        }
        assert_eq!(limiter.current_count(), 10);
    }

    #[test]
    fn test_rejects_over_limit_with_wait_hint() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 10);
        for _ in 0..10 {
            assert!(limiter.admit().is_ok());
        }
        match limiter.admit() {
            Err(AgentError::RateLimited {
                wait_secs,
                limit,
                window_secs,
            }) => {
                assert!(wait_secs > 0);
                assert_eq!(limit, 10);
                assert_eq!(window_secs, 60);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_does_not_consume_budget() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        assert!(limiter.admit().is_ok());
        assert!(limiter.admit().is_ok());
        assert!(limiter.admit().is_err());
        assert_eq!(limiter.current_count(), 2);
    }

    #[test]
    fn test_admits_again_after_window_elapses() {
        let limiter = RateLimiter::new(Duration::from_millis(50), 1);
        assert!(limiter.admit().is_ok());
        assert!(limiter.admit().is_err());
        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.admit().is_ok());
    }

    #[test]
    fn test_concurrent_admits_never_exceed_limit() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 10));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(std::thread::spawn(move || {
                let mut admitted = 0_usize;
                for _ in 0..5 {
                    if limiter.admit().is_ok() {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }
        let total: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(0))
            .sum();
        assert_eq!(total, 10);
        assert_eq!(limiter.current_count(), 10);
    }
}
