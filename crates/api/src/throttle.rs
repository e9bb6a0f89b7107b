//! Per-principal fixed-window request throttling.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use marketplace_core::UserId;

/// Tracked principals above which expired windows are dropped.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<UserId, Window>>,
    prune_threshold: usize,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
            prune_threshold: PRUNE_THRESHOLD,
        }
    }

    /// Count one request for `key` at `now`.
    ///
    /// Returns the requests left in the current window, or how long until the
    /// window resets once the limit is hit.
    pub fn check(&self, key: UserId, now: Instant) -> Result<u32, Duration> {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() >= self.prune_threshold {
            windows.retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        }

        let window = windows.entry(key).or_insert(Window { started: now, count: 0 });
        if now.saturating_duration_since(window.started) >= self.window {
            *window = Window { started: now, count: 0 };
        }

        if window.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(window.started);
            return Err(self.window.saturating_sub(elapsed));
        }

        window.count += 1;
        Ok(self.max_requests - window.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_max_then_rejects() {
        let limiter = RateLimiter::new(30, Duration::from_secs(60));
        let now = Instant::now();
        let user = UserId::new(1);

        for i in 0..30 {
            assert_eq!(limiter.check(user, now), Ok(29 - i));
        }
        let retry = limiter.check(user, now).unwrap_err();
        assert_eq!(retry, Duration::from_secs(60));
    }

    #[test]
    fn window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        let user = UserId::new(1);

        assert!(limiter.check(user, start).is_ok());
        assert!(limiter.check(user, start + Duration::from_secs(9)).is_err());
        assert!(limiter.check(user, start + Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn principals_are_counted_separately() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let now = Instant::now();

        assert!(limiter.check(UserId::new(1), now).is_ok());
        assert!(limiter.check(UserId::new(2), now).is_ok());
        assert!(limiter.check(UserId::new(1), now).is_err());
    }

    #[test]
    fn expired_windows_are_pruned() {
        let limiter = RateLimiter {
            prune_threshold: 4,
            ..RateLimiter::new(1, Duration::from_secs(10))
        };
        let start = Instant::now();
        for id in 1..=4 {
            limiter.check(UserId::new(id), start).unwrap();
        }

        let later = start + Duration::from_secs(10);
        limiter.check(UserId::new(5), later).unwrap();

        let windows = limiter.windows.lock().unwrap();
        assert_eq!(windows.len(), 1);
        assert!(windows.contains_key(&UserId::new(5)));
    }

    #[test]
    fn live_windows_survive_pruning() {
        let limiter = RateLimiter {
            prune_threshold: 2,
            ..RateLimiter::new(1, Duration::from_secs(10))
        };
        let start = Instant::now();
        limiter.check(UserId::new(1), start).unwrap();
        limiter.check(UserId::new(2), start).unwrap();

        // Still inside the window: user 1 stays throttled after pruning runs.
        assert!(limiter.check(UserId::new(1), start + Duration::from_secs(5)).is_err());
        assert_eq!(limiter.windows.lock().unwrap().len(), 2);
    }
}
