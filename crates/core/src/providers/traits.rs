use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::investment::AssetKind;

/// Trait abstraction for all market-quote providers.
///
/// Each exchange API (NSE, BSE, Yahoo Finance) implements this trait.
/// If an API stops working or changes, only that one implementation is
/// replaced — the quote service and everything above it is untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which asset kinds this provider can price.
    fn supported_kinds(&self) -> Vec<AssetKind>;

    /// Get the current (latest) market price of a symbol.
    async fn latest_price(&self, symbol: &str) -> Result<f64, CoreError>;
}
