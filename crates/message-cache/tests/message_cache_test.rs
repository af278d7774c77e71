//! Tests for [`message_cache::MessageCache`]: eviction, cache hits, history fallback and merge.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dbot_core::{CachedMessage, DbotError, MessageHistory, Result};
use message_cache::{MessageCache, DEFAULT_CAPACITY};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const CHANNEL: u64 = 42;

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn cached(id: u64, content: &str) -> CachedMessage {
    CachedMessage {
        id,
        channel_id: CHANNEL,
        author_id: 7,
        author_name: "alice".to_string(),
        is_bot: false,
        content: content.to_string(),
        timestamp: at(id as i64),
    }
}

/// History provider that serves a fixed channel log (oldest first) most-recent-first, and records calls.
struct MockHistory {
    log: Vec<CachedMessage>,
    calls: AtomicUsize,
    limits: Mutex<Vec<usize>>,
    fail: bool,
}

impl MockHistory {
    fn new(log: Vec<CachedMessage>) -> Self {
        Self {
            log,
            calls: AtomicUsize::new(0),
            limits: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageHistory for MockHistory {
    async fn fetch(&self, _channel_id: u64, limit: usize) -> Result<Vec<CachedMessage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.limits.lock().unwrap().push(limit);
        if self.fail {
            return Err(DbotError::History("missing access".to_string()));
        }
        Ok(self.log.iter().rev().take(limit).cloned().collect())
    }
}

/// **Test: 600 records into one channel leave exactly #101..#600 in order.**
#[tokio::test]
async fn test_record_evicts_oldest_beyond_capacity() {
    let cache = MessageCache::new(Arc::new(MockHistory::new(vec![])));
    for id in 1..=600 {
        cache.record(cached(id, &format!("m{}", id))).await;
    }
    let snapshot = cache.snapshot(CHANNEL).await;
    assert_eq!(snapshot.len(), DEFAULT_CAPACITY);
    assert_eq!(snapshot.first().unwrap().id, 101);
    assert_eq!(snapshot.last().unwrap().id, 600);
    assert!(snapshot.windows(2).all(|w| w[0].id + 1 == w[1].id));
}

/// **Test: A full buffer serves get_recent(C, 500) without touching history.**
#[tokio::test]
async fn test_get_recent_served_from_cache() {
    let history = Arc::new(MockHistory::new(vec![]));
    let cache = MessageCache::new(history.clone());
    for id in 1..=600 {
        cache.record(cached(id, "x")).await;
    }

    let all = cache.get_recent(CHANNEL, 500).await.unwrap();
    assert_eq!(all.len(), 500);
    assert_eq!(all[0].id, 101);

    let tail = cache.get_recent(CHANNEL, 3).await.unwrap();
    let ids: Vec<u64> = tail.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![598, 599, 600]);
    assert_eq!(history.calls(), 0);
}

/// **Test: A short buffer triggers exactly one fetch with the requested limit; result is chronological.**
#[tokio::test]
async fn test_get_recent_falls_back_to_history() {
    let log: Vec<CachedMessage> = (1..=50).map(|id| cached(id, "h")).collect();
    let history = Arc::new(MockHistory::new(log));
    let cache = MessageCache::new(history.clone());
    cache.record(cached(50, "h")).await;

    let recent = cache.get_recent(CHANNEL, 20).await.unwrap();
    assert_eq!(history.calls(), 1);
    assert_eq!(*history.limits.lock().unwrap(), vec![20]);
    let ids: Vec<u64> = recent.iter().map(|m| m.id).collect();
    assert_eq!(ids, (31..=50).collect::<Vec<u64>>());

    // Merged without duplicating #50; the next request of the same size is a hit.
    assert_eq!(cache.len(CHANNEL).await, 20);
    cache.get_recent(CHANNEL, 20).await.unwrap();
    assert_eq!(history.calls(), 1);
}

/// **Test: Messages recorded before the fetch completes survive the merge.**
#[tokio::test]
async fn test_merge_keeps_newer_recorded_messages() {
    let log: Vec<CachedMessage> = (1..=10).map(|id| cached(id, "old")).collect();
    let cache = MessageCache::new(Arc::new(MockHistory::new(log)));
    cache.record(cached(11, "new")).await;

    let fetched = cache.get_recent(CHANNEL, 5).await.unwrap();
    assert_eq!(fetched.len(), 5);
    assert!(fetched.iter().all(|m| m.id <= 10));

    let snapshot = cache.snapshot(CHANNEL).await;
    let ids: Vec<u64> = snapshot.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10, 11]);
}

/// **Test: A merge larger than capacity keeps only the newest entries.**
#[tokio::test]
async fn test_merge_truncates_to_capacity() {
    let log: Vec<CachedMessage> = (1..=30).map(|id| cached(id, "h")).collect();
    let cache = MessageCache::with_capacity(Arc::new(MockHistory::new(log)), 10);

    let fetched = cache.get_recent(CHANNEL, 25).await.unwrap();
    assert_eq!(fetched.len(), 25);
    let snapshot = cache.snapshot(CHANNEL).await;
    assert_eq!(snapshot.len(), 10);
    assert_eq!(snapshot[0].id, 21);
}

/// **Test: Channels are independent.**
#[tokio::test]
async fn test_channels_are_isolated() {
    let cache = MessageCache::new(Arc::new(MockHistory::new(vec![])));
    cache.record(cached(1, "a")).await;
    let mut other = cached(2, "b");
    other.channel_id = CHANNEL + 1;
    cache.record(other).await;
    assert_eq!(cache.len(CHANNEL).await, 1);
    assert_eq!(cache.len(CHANNEL + 1).await, 1);
    assert_eq!(cache.len(CHANNEL + 2).await, 0);
}

/// **Test: History errors propagate and leave the cache unchanged.**
#[tokio::test]
async fn test_fetch_error_propagates() {
    let cache = MessageCache::new(Arc::new(MockHistory::failing()));
    cache.record(cached(1, "a")).await;
    let err = cache.get_recent(CHANNEL, 10).await.unwrap_err();
    assert!(matches!(err, DbotError::History(_)));
    assert_eq!(cache.len(CHANNEL).await, 1);
}
