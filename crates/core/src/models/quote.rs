use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A cached market quote: the price and when it was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedQuote {
    pub price: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Short-lived, per-process cache of live market quotes.
///
/// Owned by the caller and passed into every lookup, so freshness is
/// testable with an injected clock instead of hidden module state.
/// Entries older than the TTL are ignored by [`fresh`](Self::fresh) but
/// kept around as a best-effort fallback when every provider is down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteCache {
    entries: HashMap<String, CachedQuote>,
    ttl_secs: u64,
}

impl QuoteCache {
    /// Default quote time-to-live in seconds.
    pub const DEFAULT_TTL_SECS: u64 = 15;

    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_secs,
        }
    }

    /// Get a quote that is still within the TTL as of `now`.
    pub fn fresh(&self, symbol: &str, now: DateTime<Utc>) -> Option<f64> {
        let entry = self.entries.get(&symbol.to_uppercase())?;
        let age = now.signed_duration_since(entry.fetched_at);
        if age >= Duration::zero() && age <= Duration::seconds(self.ttl_secs as i64) {
            Some(entry.price)
        } else {
            None
        }
    }

    /// Get the last known quote regardless of age (stale fallback).
    pub fn stale(&self, symbol: &str) -> Option<f64> {
        self.entries.get(&symbol.to_uppercase()).map(|e| e.price)
    }

    /// Insert or replace the quote for a symbol.
    pub fn insert(&mut self, symbol: &str, price: f64, now: DateTime<Utc>) {
        self.entries.insert(
            symbol.to_uppercase(),
            CachedQuote {
                price,
                fetched_at: now,
            },
        );
    }

    /// Number of cached symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached quote.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL_SECS)
    }
}
