//! 시가총액 TTL 캐시.
//!
//! 종목 코드별로 마지막으로 조회한 시가총액(만 위안)과 조회 시각을 보관합니다.
//! 유효 시간이 지난 항목은 조회 시 없는 것으로 취급할 뿐 삭제하지 않으며,
//! 다음 조회 성공 시 덮어씁니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// 기본 유효 시간 (5분).
pub const DEFAULT_QUOTE_TTL: Duration = Duration::from_secs(300);

/// 캐시가 사용하는 단조 시계.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// 시스템 단조 시계.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 수동으로 진행시키는 시계.
///
/// 실제로 기다리지 않고 만료를 재현할 때 사용합니다.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// 시계를 `by`만큼 진행합니다.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.base + offset
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedMktcap {
    value: f64,
    fetched_at: Instant,
}

/// 종목 코드 → 시가총액 캐시.
///
/// 맵 전체에 하나의 읽기/쓰기 락을 사용합니다.
#[derive(Clone)]
pub struct QuoteCache {
    entries: Arc<RwLock<HashMap<String, CachedMktcap>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl QuoteCache {
    /// 시스템 시계를 사용하는 캐시를 생성합니다.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// 지정한 시계를 사용하는 캐시를 생성합니다.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 유효한 값을 조회합니다. 없거나 만료되었으면 `None`.
    pub async fn get(&self, key: &str) -> Option<f64> {
        let entries = self.entries.read().await;
        let cached = entries.get(key)?;

        let age = self.clock.now().saturating_duration_since(cached.fetched_at);
        if age > self.ttl {
            return None;
        }
        Some(cached.value)
    }

    /// 현재 시각으로 값을 기록합니다.
    pub async fn put(&self, key: impl Into<String>, value: f64) {
        let fetched_at = self.clock.now();
        self.entries
            .write()
            .await
            .insert(key.into(), CachedMktcap { value, fetched_at });
    }

    /// 만료 여부와 관계없이 보관 중인 항목 수.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_TTL)
    }
}

impl std::fmt::Debug for QuoteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_clock() -> (QuoteCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = QuoteCache::with_clock(DEFAULT_QUOTE_TTL, clock.clone());
        (cache, clock)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (cache, _) = cache_with_clock();
        cache.put("600000", 30_819_684.0).await;
        assert_eq!(cache.get("600000").await, Some(30_819_684.0));
        assert_eq!(cache.get("000001").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_lazily() {
        let (cache, clock) = cache_with_clock();
        cache.put("600000", 1.0).await;

        clock.advance(Duration::from_secs(300));
        assert_eq!(cache.get("600000").await, Some(1.0));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("600000").await, None);
        // 만료된 항목도 그대로 보관
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_overwrites_stale_entry() {
        let (cache, clock) = cache_with_clock();
        cache.put("600000", 1.0).await;
        clock.advance(Duration::from_secs(600));
        assert_eq!(cache.get("600000").await, None);

        cache.put("600000", 2.0).await;
        assert_eq!(cache.get("600000").await, Some(2.0));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let cache = QuoteCache::default();
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let key = format!("{:06}", i % 4);
                cache.put(key.clone(), i as f64).await;
                cache.get(&key).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(cache.len().await, 4);
    }
}
