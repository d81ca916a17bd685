use crate::models::investment::AssetKind;

use super::bse::BseProvider;
use super::nse::NseProvider;
use super::traits::QuoteProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of all available quote providers.
///
/// Registration order IS the fallback order: the quote service walks the
/// matching providers front to back until one returns a price.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default exchange wiring:
    /// NSE (primary) → BSE (fallback) → Yahoo Finance (last resort).
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();

        // NSE — primary exchange, no API key needed
        registry.register(Box::new(NseProvider::new()));

        // BSE — fallback exchange, no API key needed
        registry.register(Box::new(BseProvider::new()));

        // Yahoo Finance — last resort, quotes NSE listings via the .NS
        // suffix. Not available on WASM (native connector).
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(yahoo) = YahooFinanceProvider::new() {
                registry.register(Box::new(yahoo));
            }
        }

        registry
    }

    /// Register a provider at the end of the fallback chain.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// All providers that can price the given asset kind, in fallback order.
    pub fn providers_for(&self, kind: &AssetKind) -> Vec<&dyn QuoteProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_kinds().contains(kind))
            .map(|p| p.as_ref())
            .collect()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
