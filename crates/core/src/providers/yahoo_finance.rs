use async_trait::async_trait;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::investment::AssetKind;

/// Yahoo Finance provider, the last-resort quote source.
///
/// - **Free**: No API key required (unofficial public API).
/// - **Coverage**: NSE listings via the `.NS` suffix, plus mutual funds
///   and crypto the exchange APIs cannot price.
///
/// Uses the `yahoo_finance_api` crate. Bare symbols are assumed to be
/// NSE listings and get the `.NS` suffix appended; symbols that already
/// carry an exchange suffix (or a crypto pair like `BTC-INR`) pass
/// through untouched.
///
/// **Note**: Not WASM-compatible (native reqwest/tokio connector).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Map a tracker symbol to the Yahoo ticker.
    fn yahoo_symbol(symbol: &str) -> String {
        let upper = symbol.to_uppercase();
        if upper.contains('.') || upper.contains('-') {
            upper
        } else {
            format!("{upper}.NS")
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn supported_kinds(&self) -> Vec<AssetKind> {
        vec![
            AssetKind::Stock,
            AssetKind::Etf,
            AssetKind::MutualFund,
            AssetKind::Crypto,
        ]
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let ticker = Self::yahoo_symbol(symbol);

        let resp = self
            .connector
            .get_latest_quotes(&ticker, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {ticker}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {ticker}: {e}"),
        })?;

        Ok(quote.close)
    }
}
