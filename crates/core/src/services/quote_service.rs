use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::investment::AssetKind;
use crate::models::quote::QuoteCache;
use crate::providers::registry::QuoteProviderRegistry;

/// The price oracle: resolves a symbol to a current market price.
///
/// Lookup order:
/// 1. A cache entry still inside the TTL is returned without any
///    network call.
/// 2. Otherwise providers are tried in registration order (NSE first,
///    then BSE, then Yahoo Finance); the first finite, non-negative
///    price wins and is cached.
/// 3. When every provider fails, a stale cache entry is served as a
///    best-effort fallback.
/// 4. With neither, the last provider error surfaces.
///
/// The cache is owned by the caller and injected per lookup, so the
/// whole policy is testable with a fixed clock.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// Check if at least one provider can price the given asset kind.
    pub fn has_provider_for(&self, kind: &AssetKind) -> bool {
        !self.registry.providers_for(kind).is_empty()
    }

    /// Names of the providers that can price the given asset kind.
    pub fn provider_names(&self, kind: &AssetKind) -> Vec<String> {
        self.registry
            .providers_for(kind)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Get the current price for a symbol.
    pub async fn latest_quote(
        &self,
        cache: &mut QuoteCache,
        symbol: &str,
        kind: &AssetKind,
        now: DateTime<Utc>,
    ) -> Result<f64, CoreError> {
        if let Some(price) = cache.fresh(symbol, now) {
            return Ok(price);
        }

        match self.fetch_price(symbol, kind).await {
            Ok(price) => {
                cache.insert(symbol, price, now);
                Ok(price)
            }
            Err(e) => {
                // Every provider failed. Serve the last known quote if
                // one exists, however old it is.
                if let Some(stale) = cache.stale(symbol) {
                    return Ok(stale);
                }
                Err(e)
            }
        }
    }

    /// Internal: try each provider in registration order until one
    /// returns a usable price.
    async fn fetch_price(&self, symbol: &str, kind: &AssetKind) -> Result<f64, CoreError> {
        let providers = self.registry.providers_for(kind);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(kind.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.latest_price(symbol).await {
                Ok(price) => {
                    if !price.is_finite() || price < 0.0 {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid price returned for {symbol}: {price} (must be finite and non-negative)"
                            ),
                        });
                        continue;
                    }
                    return Ok(price);
                }
                Err(e) => {
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::QuoteUnavailable {
            symbol: symbol.to_string(),
        }))
    }
}
