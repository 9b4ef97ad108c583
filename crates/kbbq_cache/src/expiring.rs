//! Keys that stay active until a deadline.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A map of key → deadline, used for cooldowns and resend suppression.
///
/// Every method takes `now` so callers (and tests) control the clock.
#[derive(Debug)]
pub struct ExpiringMap<K> {
    ttl: Duration,
    deadlines: Mutex<HashMap<K, Instant>>,
}

impl<K: Eq + Hash + Clone> ExpiringMap<K> {
    /// Create a map whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            deadlines: Mutex::new(HashMap::new()),
        }
    }

    /// How long an entry stays active.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `key` is still active at `now`.
    pub fn is_active(&self, key: &K, now: Instant) -> bool {
        self.deadlines
            .lock()
            .get(key)
            .is_some_and(|deadline| now < *deadline)
    }

    /// Activate `key` until `now + ttl`.
    pub fn touch(&self, key: K, now: Instant) {
        let deadline = self.deadline(now);
        self.deadlines.lock().insert(key, deadline);
    }

    /// Activate `key` unless it is already active; true when activated.
    ///
    /// # Examples
    ///
    /// ```
    /// use kbbq_cache::ExpiringMap;
    /// use std::time::{Duration, Instant};
    ///
    /// let cooldowns = ExpiringMap::new(Duration::from_secs(60));
    /// let now = Instant::now();
    /// assert!(cooldowns.try_acquire(1u64, now));
    /// assert!(!cooldowns.try_acquire(1u64, now + Duration::from_secs(30)));
    /// assert!(cooldowns.try_acquire(1u64, now + Duration::from_secs(60)));
    /// ```
    pub fn try_acquire(&self, key: K, now: Instant) -> bool {
        let mut deadlines = self.deadlines.lock();
        match deadlines.get(&key) {
            Some(deadline) if now < *deadline => false,
            _ => {
                deadlines.insert(key, self.deadline(now));
                true
            }
        }
    }

    /// `now + ttl`, clamped to the furthest instant the platform can represent.
    fn deadline(&self, now: Instant) -> Instant {
        let mut ttl = self.ttl;
        loop {
            if let Some(deadline) = now.checked_add(ttl) {
                return deadline;
            }
            if ttl.is_zero() {
                return now;
            }
            ttl /= 2;
        }
    }

    /// Deactivate `key`.
    pub fn remove(&self, key: &K) {
        self.deadlines.lock().remove(key);
    }

    /// Drop expired entries and every entry `keep` rejects; returns the count dropped.
    pub fn retain(&self, now: Instant, mut keep: impl FnMut(&K) -> bool) -> usize {
        let mut deadlines = self.deadlines.lock();
        let before = deadlines.len();
        deadlines.retain(|key, deadline| now < *deadline && keep(key));
        before - deadlines.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.deadlines.lock().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.deadlines.lock().is_empty()
    }
}
