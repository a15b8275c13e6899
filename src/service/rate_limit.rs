//! Submission Rate Limiter
//!
//! Per-caller cooldown between write-path submissions. Injected into the
//! service; its state lives and dies with the instance. Callers without an
//! identity are not tracked, so they never share a cooldown.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Debug)]
pub struct SubmissionRateLimiter {
    cooldown: Duration,
    last_submission: Mutex<HashMap<String, Instant>>,
}

impl SubmissionRateLimiter {
    /// A zero cooldown disables limiting.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_submission: Mutex::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Reserves a submission slot for `caller`.
    ///
    /// Returns `Err(retry_after)` without recording when the previous
    /// submission is younger than the cooldown. A reservation whose write
    /// fails is handed back with [`release`](Self::release).
    pub async fn check(&self, caller: Option<&str>) -> Result<(), Duration> {
        let Some(caller) = caller.filter(|c| !self.cooldown.is_zero() && !c.is_empty()) else {
            return Ok(());
        };

        let now = Instant::now();
        let mut last = self.last_submission.lock().await;

        if let Some(previous) = last.get(caller) {
            let elapsed = now.duration_since(*previous);
            if elapsed < self.cooldown {
                return Err(self.cooldown - elapsed);
            }
        }

        last.insert(caller.to_string(), now);
        Ok(())
    }

    /// Drops the reservation made by `check`, so a caller whose write failed
    /// may retry immediately.
    pub async fn release(&self, caller: Option<&str>) {
        if let Some(caller) = caller {
            self.last_submission.lock().await.remove(caller);
        }
    }

    /// Forgets callers whose cooldown has passed. Returns how many were dropped.
    pub async fn prune(&self) -> usize {
        let mut last = self.last_submission.lock().await;
        let before = last.len();
        let cooldown = self.cooldown;
        last.retain(|_, at| at.elapsed() < cooldown);
        before - last.len()
    }

    pub async fn tracked_callers(&self) -> usize {
        self.last_submission.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_submission_inside_cooldown_is_rejected() {
        let limiter = SubmissionRateLimiter::new(Duration::from_secs(60));

        assert!(limiter.check(Some("user_a")).await.is_ok());
        let retry = limiter.check(Some("user_a")).await.unwrap_err();
        assert!(retry <= Duration::from_secs(60));
        assert!(retry > Duration::from_secs(50));
    }

    #[tokio::test]
    async fn test_callers_are_independent() {
        let limiter = SubmissionRateLimiter::new(Duration::from_secs(60));

        assert!(limiter.check(Some("user_a")).await.is_ok());
        assert!(limiter.check(Some("user_b")).await.is_ok());
        assert_eq!(limiter.tracked_callers().await, 2);
    }

    #[tokio::test]
    async fn test_callers_without_identity_are_not_tracked() {
        let limiter = SubmissionRateLimiter::new(Duration::from_secs(60));

        assert!(limiter.check(None).await.is_ok());
        assert!(limiter.check(None).await.is_ok());
        assert!(limiter.check(Some("")).await.is_ok());
        assert_eq!(limiter.tracked_callers().await, 0);
    }

    #[tokio::test]
    async fn test_release_allows_immediate_retry() {
        let limiter = SubmissionRateLimiter::new(Duration::from_secs(60));

        assert!(limiter.check(Some("user_a")).await.is_ok());
        limiter.release(Some("user_a")).await;
        assert!(limiter.check(Some("user_a")).await.is_ok());
        assert!(limiter.check(Some("user_a")).await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_limiter_allows_everything() {
        let limiter = SubmissionRateLimiter::disabled();
        for _ in 0..5 {
            assert!(limiter.check(Some("user_a")).await.is_ok());
        }
        assert_eq!(limiter.tracked_callers().await, 0);
    }

    #[tokio::test]
    async fn test_prune_after_cooldown() {
        let limiter = SubmissionRateLimiter::new(Duration::from_millis(20));
        limiter.check(Some("user_a")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(limiter.prune().await, 1);
        assert!(limiter.check(Some("user_a")).await.is_ok());
    }
}
