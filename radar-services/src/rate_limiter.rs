//! Request pacing for the news search provider
//!
//! The provider throttles bursts, so every search goes through a limiter
//! that hands out evenly spaced time slots. Slots are reserved under the lock
//! and waited on outside it, which keeps concurrent callers apart.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use radar_core::{Article, NewsSearchParams};
use radar_news::{ArticleSource, NewsError};

/// Minimum delay between Naver API requests (100ms = max 10 req/sec)
pub const NAVER_MIN_REQUEST_INTERVAL_MS: u64 = 100;

/// Enforces a minimum delay between requests
#[derive(Debug)]
pub struct RateLimiter {
    /// Next free slot, in milliseconds since `epoch`
    next_available_ms: Mutex<u64>,
    epoch: Instant,
    min_interval: Duration,
    name: String,
    total_requests: AtomicU64,
    waited_requests: AtomicU64,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64, name: &str) -> Self {
        Self {
            next_available_ms: Mutex::new(0),
            epoch: Instant::now(),
            min_interval: Duration::from_millis(min_interval_ms),
            name: name.to_string(),
            total_requests: AtomicU64::new(0),
            waited_requests: AtomicU64::new(0),
        }
    }

    /// Limiter configured for the Naver search API
    pub fn for_naver() -> Arc<Self> {
        Arc::new(Self::new(NAVER_MIN_REQUEST_INTERVAL_MS, "Naver"))
    }

    fn elapsed_ms(&self) -> u64 {
        Instant::now().duration_since(self.epoch).as_millis() as u64
    }

    /// Wait until this caller's slot comes up
    pub async fn acquire(&self) {
        let request_num = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;
        let interval_ms = self.min_interval.as_millis() as u64;
        let now_ms = self.elapsed_ms();

        let slot_ms = {
            let mut next_available = self.next_available_ms.lock().await;
            let slot = (*next_available).max(now_ms);
            *next_available = slot + interval_ms;
            slot
        };

        if slot_ms > now_ms {
            self.waited_requests.fetch_add(1, Ordering::Relaxed);
            let target = self.epoch + Duration::from_millis(slot_ms);
            debug!(
                "[RATE_LIMITER:{}] #{} waiting {}ms for slot",
                self.name,
                request_num,
                slot_ms - now_ms
            );
            tokio::time::sleep_until(target).await;
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            waited_requests: self.waited_requests.load(Ordering::Relaxed),
            min_interval_ms: self.min_interval.as_millis() as u64,
            name: self.name.clone(),
        }
    }
}

/// Statistics about rate limiter usage
#[derive(Debug, Clone)]
pub struct RateLimiterStats {
    pub total_requests: u64,
    pub waited_requests: u64,
    pub min_interval_ms: u64,
    pub name: String,
}

/// Article source whose searches are paced by a shared limiter
pub struct RateLimitedSource<S> {
    inner: S,
    limiter: Arc<RateLimiter>,
}

impl<S: ArticleSource> RateLimitedSource<S> {
    pub fn new(inner: S, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }

}

#[async_trait]
impl<S: ArticleSource> ArticleSource for RateLimitedSource<S> {
    fn ensure_configured(&self) -> Result<(), NewsError> {
        self.inner.ensure_configured()
    }

    async fn search(&self, params: &NewsSearchParams) -> Result<Vec<Article>, NewsError> {
        self.limiter.acquire().await;
        self.inner.search(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoSource;

    #[async_trait]
    impl ArticleSource for EchoSource {
        fn ensure_configured(&self) -> Result<(), NewsError> {
            Ok(())
        }

        async fn search(&self, params: &NewsSearchParams) -> Result<Vec<Article>, NewsError> {
            Ok(vec![Article::new(&params.query, "", "")])
        }
    }

    #[tokio::test]
    async fn test_first_request_immediate() {
        let limiter = RateLimiter::new(100, "test");

        let start = Instant::now();
        limiter.acquire().await;

        assert!(start.elapsed().as_millis() < 20);
    }

    #[tokio::test]
    async fn test_second_request_waits() {
        let limiter = RateLimiter::new(100, "test");
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();

        assert!(elapsed.as_millis() >= 90, "Only waited {:?}", elapsed);
        assert!(elapsed.as_millis() < 150, "Waited too long: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_concurrent_requests_spaced() {
        let limiter = Arc::new(RateLimiter::new(50, "concurrent_test"));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                start.elapsed()
            }));
        }

        let mut times = Vec::new();
        for handle in handles {
            times.push(handle.await.unwrap());
        }
        times.sort();

        for pair in times.windows(2) {
            assert!(
                (pair[1] - pair[0]).as_millis() >= 40,
                "Requests too close: {:?}",
                times
            );
        }
        assert_eq!(limiter.stats().total_requests, 4);
        assert!(limiter.stats().waited_requests >= 3);
    }

    #[tokio::test]
    async fn test_limited_source_paces_searches() {
        let limiter = Arc::new(RateLimiter::new(60, "source"));
        let source = RateLimitedSource::new(EchoSource, limiter.clone());
        let params = NewsSearchParams::new("지진");

        let start = Instant::now();
        source.search(&params).await.unwrap();
        let articles = source.search(&params).await.unwrap();

        assert_eq!(articles[0].title, "지진");
        assert!(start.elapsed().as_millis() >= 50);
        assert_eq!(limiter.stats().waited_requests, 1);
    }
}
