//! Keyed store whose entries lapse after a fixed time-to-live.
//!
//! Expiry is **lazy**: an entry older than the TTL is invisible to every read
//! (`get`, `len`, `values`, `contains`) as soon as its age exceeds the TTL, but
//! it stays in memory until it is overwritten, removed, or purged with
//! [`ExpiringSet::cleanup_expired`]. There is no background sweeper.

use super::clock::{Clock, SystemClock};
use super::keyed::KeyedSet;
use std::time::{Duration, SystemTime};

/// A stored value and the time it was last added.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    pub value: V,
    pub inserted_at: SystemTime,
}

impl<V> Entry<V> {
    /// `now - inserted_at > ttl`. An entry stamped in the future never expires.
    #[inline]
    pub fn is_expired(&self, now: SystemTime, ttl: Duration) -> bool {
        now.duration_since(self.inserted_at)
            .map(|age| age > ttl)
            .unwrap_or(false)
    }
}

/// A [`KeyedSet`] where each entry lives for `ttl` after its latest `add`.
///
/// # Examples
///
/// ```
/// use geocluster::store::{ExpiringSet, ManualClock};
/// use std::time::{Duration, SystemTime};
///
/// let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
/// let mut seen = ExpiringSet::with_clock(Duration::from_secs(600), clock.clone());
///
/// seen.add("driver-1", ());
/// clock.advance(Duration::from_secs(601));
/// assert_eq!(seen.len(), 0);
/// ```
#[derive(Debug)]
pub struct ExpiringSet<V, C = SystemClock> {
    entries: KeyedSet<Entry<V>>,
    ttl: Duration,
    clock: C,
}

impl<V> ExpiringSet<V, SystemClock> {
    /// Expiring set driven by wall-clock time.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<V, C: Clock> ExpiringSet<V, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: KeyedSet::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value` stamped with the current time. Re-adding an identity
    /// replaces its value and restarts its TTL window.
    pub fn add(&mut self, id: impl Into<String>, value: V) {
        let inserted_at = self.clock.now();
        self.entries.add(id, Entry { value, inserted_at });
    }

    /// Remove `id` whether or not it has expired.
    pub fn remove(&mut self, id: &str) -> Option<V> {
        self.entries.remove(id).map(|entry| entry.value)
    }

    /// The live value for `id`; `None` when absent or expired.
    pub fn get(&self, id: &str) -> Option<&V> {
        let now = self.clock.now();
        self.entries
            .get(id)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .map(|entry| &entry.value)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of live entries at the moment of the call.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.entries
            .values()
            .filter(move |entry| !entry.is_expired(now, ttl))
            .map(|entry| &entry.value)
    }

    /// Live `(id, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.entries
            .iter()
            .filter(move |(_, entry)| !entry.is_expired(now, ttl))
            .map(|(id, entry)| (id, &entry.value))
    }

    /// Physically drop expired entries. Returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));

        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Purged {} expired entries", removed);
        }
        removed
    }

    /// Entries held in memory, expired or not.
    pub fn stored_len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
