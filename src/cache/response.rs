//! Bounded, time-expiring response cache.
//!
//! [`ResponseCache`] maps a prompt to the [`ResponseSet`] its lookup resolved
//! to, so repeated prompts skip resolution. It stores the whole set, not a
//! picked response: the random choice is made again on every hit.
//!
//! # Expiry and eviction
//!
//! Entries live in a moka cache configured with the LRU eviction policy and a
//! physical TTL. Each entry also carries the instant it was inserted, read
//! from the cache's [`Clock`]. `get` compares that stamp against the clock and
//! drops the entry once `now - inserted_at >= ttl`, so an expired entry is
//! never served even if moka has not swept it yet, and tests can drive expiry
//! with a [`ManualClock`](super::ManualClock).
//!
//! Capacity eviction removes the least-recently-used entry; a hit counts as
//! a use.
//!
//! With [`CacheConfig::strict_eviction()`] on (the default) every `put` runs
//! moka's pending maintenance, so eviction order follows access order
//! exactly. That takes moka's maintenance lock on every miss. Under heavy
//! concurrent misses turn it off: eviction then happens on moka's own
//! batched schedule and may briefly exceed capacity or pick a slightly
//! different victim.
//!
//! # Disabled mode
//!
//! A zero TTL or zero capacity disables the cache: no moka cache is
//! allocated, `get` always misses and `put` does nothing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::ops::compute::Op;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use super::clock::{Clock, SystemClock};
use crate::rules::ResponseSet;
use crate::telemetry;

/// Configuration for the response cache.
///
/// ```rust
/// # use botcreator::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(10_000)
///     .ttl(Duration::from_secs(60));
/// assert!(config.is_enabled());
/// assert!(!CacheConfig::disabled().is_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached prompts. Default: 1,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 5 minutes. Zero disables caching.
    pub ttl: Duration,
    /// Run eviction on every insert. Default: true.
    pub strict_eviction: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(300),
            strict_eviction: true,
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that turns caching off.
    pub fn disabled() -> Self {
        Self {
            max_entries: 0,
            ttl: Duration::ZERO,
            strict_eviction: true,
        }
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Whether every insert applies pending evictions immediately.
    pub fn strict_eviction(mut self, strict: bool) -> Self {
        self.strict_eviction = strict;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.max_entries > 0 && !self.ttl.is_zero()
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    responses: ResponseSet,
    inserted_at: Instant,
}

/// In-memory prompt → response-set cache. Safe to share across threads.
pub struct ResponseCache {
    cache: Option<Cache<String, CacheEntry>>,
    ttl: Duration,
    strict_eviction: bool,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache on the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache whose expiry is measured on `clock`.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = config.is_enabled().then(|| {
            Cache::builder()
                .max_capacity(config.max_entries)
                .eviction_policy(EvictionPolicy::lru())
                .time_to_live(config.ttl)
                .build()
        });
        Self {
            cache,
            ttl: config.ttl,
            strict_eviction: config.strict_eviction,
            clock,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(&CacheConfig::disabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Look up the response set cached for `prompt`.
    ///
    /// Returns `None` on a miss, for an expired entry, and always when the
    /// cache is disabled. Emits cache hit/miss metrics.
    pub fn get(&self, prompt: &str) -> Option<ResponseSet> {
        let hit = self.cache.as_ref().and_then(|cache| {
            let entry = cache.get(prompt)?;
            let age = self
                .clock
                .now()
                .saturating_duration_since(entry.inserted_at);
            if age >= self.ttl {
                // Remove only the entry judged expired; a concurrent put may
                // already have replaced it.
                let stamp = entry.inserted_at;
                let _ = cache
                    .entry_by_ref(prompt)
                    .and_compute_with(|current| match current {
                        Some(current) if current.value().inserted_at == stamp => Op::Remove,
                        _ => Op::Nop,
                    });
                return None;
            }
            Some(entry.responses)
        });

        if hit.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        }
        hit
    }

    /// Insert or refresh the entry for `prompt`.
    ///
    /// Evicts the least-recently-used entry when the cache is full: right
    /// away with strict eviction, otherwise on moka's schedule.
    pub fn put(&self, prompt: &str, responses: ResponseSet) {
        let Some(cache) = &self.cache else {
            return;
        };
        let entry = CacheEntry {
            responses,
            inserted_at: self.clock.now(),
        };
        cache.insert(prompt.to_string(), entry);
        if self.strict_eviction {
            cache.run_pending_tasks();
        }
    }

    /// Drop the entry for `prompt`, if any.
    pub fn invalidate(&self, prompt: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(prompt);
        }
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            cache.run_pending_tasks();
        }
    }

    /// Number of entries currently held. Exact after [`run_pending_tasks`](Self::run_pending_tasks).
    pub fn entry_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| cache.entry_count())
    }

    /// Flush moka's internal maintenance (eviction, expiry, counters).
    pub fn run_pending_tasks(&self) {
        if let Some(cache) = &self.cache {
            cache.run_pending_tasks();
        }
    }
}
