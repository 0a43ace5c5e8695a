//! Nonce and timestamp replay defense.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AuthError;

/// Default ring capacity.
pub const DEFAULT_NONCE_CAPACITY: usize = 20_000;

/// Default timestamp freshness window in seconds.
pub const DEFAULT_TIMESTAMP_WINDOW_SECS: u64 = 300;

/// Replay scope for one observation.
///
/// Nonces are tracked per consumer/token pair so one client's nonce can
/// never shadow another's. `token_key` is `None` for the consumer-only
/// request-token step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonceKey {
    /// Presenting consumer.
    pub consumer_key: String,
    /// Token presented with the request, if any.
    pub token_key: Option<String>,
    /// The `oauth_nonce` value.
    pub nonce: String,
}

/// Bounded guard over recently observed nonces.
///
/// A fixed-capacity ring: insertion appends at the tail and the oldest entry
/// is evicted once capacity is exceeded. Because capacity is finite, a flood
/// of `capacity` distinct nonces inside the freshness window can evict a
/// legitimate nonce and allow its replay. That is the accepted cost of
/// bounded memory; size the capacity generously relative to expected request
/// rate times window length.
///
/// One instance is shared across all verifications of a process.
#[derive(Debug)]
pub struct ReplayGuard {
    window_secs: u64,
    inner: Mutex<Ring>,
}

#[derive(Debug)]
struct Ring {
    capacity: usize,
    order: VecDeque<NonceKey>,
    seen: HashSet<NonceKey>,
}

impl ReplayGuard {
    /// Create a guard with the given ring capacity and freshness window.
    pub fn new(capacity: usize, window_secs: u64) -> Self {
        Self {
            window_secs,
            inner: Mutex::new(Ring {
                capacity,
                order: VecDeque::with_capacity(capacity.min(1024)),
                seen: HashSet::new(),
            }),
        }
    }

    /// Check `oauth_timestamp` freshness against the current clock.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StaleTimestamp`] if the value is unparseable or
    /// further than the window from now, in either direction.
    pub fn check_timestamp(&self, raw: &str) -> Result<(), AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);
        self.check_timestamp_at(raw, now)
    }

    fn check_timestamp_at(&self, raw: &str, now: i64) -> Result<(), AuthError> {
        let Ok(given) = raw.parse::<i64>() else {
            return Err(AuthError::StaleTimestamp {
                detail: format!("unparseable oauth_timestamp {raw:?}"),
            });
        };
        if now.abs_diff(given) > self.window_secs {
            return Err(AuthError::StaleTimestamp {
                detail: format!(
                    "given {given}, now {now}, window {} seconds",
                    self.window_secs
                ),
            });
        }
        Ok(())
    }

    /// Reject a replayed nonce, otherwise record it.
    ///
    /// The contains-then-insert sequence runs under a single lock
    /// acquisition, so two concurrent requests with the same nonce cannot
    /// both pass. The lock is never held across an await point.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NonceReplayed`] if the key is still in the ring.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn check_and_record(&self, key: NonceKey) -> Result<(), AuthError> {
        let mut ring = self.inner.lock().unwrap();
        if ring.seen.contains(&key) {
            return Err(AuthError::NonceReplayed);
        }
        if ring.order.len() >= ring.capacity
            && let Some(evicted) = ring.order.pop_front()
        {
            ring.seen.remove(&evicted);
        }
        ring.order.push_back(key.clone());
        ring.seen.insert(key);
        Ok(())
    }

    /// Number of nonces currently tracked.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().order.len()
    }

    /// Whether the ring is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_CAPACITY, DEFAULT_TIMESTAMP_WINDOW_SECS)
    }
}
