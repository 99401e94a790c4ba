use std::time::Duration;
use tokio::time::Instant;

/// Spaces readings `delay` apart, letting the first `burst` through at once
/// so a fresh session reports immediately.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    burst: u64,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay: Duration, burst: u64) -> Self {
        Self {
            delay,
            burst,
            last: None,
        }
    }

    pub async fn ready(&mut self) {
        if self.burst > 0 {
            self.burst -= 1;
        } else {
            let deadline = match self.last {
                Some(last) => last + self.delay,
                None => Instant::now() + self.delay,
            };
            tokio::time::sleep_until(deadline).await;
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_is_not_delayed() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60), 2);
        let start = Instant::now();
        limiter.ready().await;
        limiter.ready().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_spacing_after_burst() {
        let delay = Duration::from_millis(40);
        let mut limiter = RateLimiter::new(delay, 1);
        let start = Instant::now();

        limiter.ready().await;
        limiter.ready().await;
        limiter.ready().await;

        assert!(start.elapsed() >= delay * 2);
    }
}
