use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::investment::AssetKind;

const BASE_URL: &str = "https://www.nseindia.com/api";

/// NSE (National Stock Exchange of India) quote provider.
///
/// - **Free**: No API key required.
/// - **Coverage**: All NSE-listed equities and ETFs.
/// - **Endpoint**: `/quote-equity?symbol={SYMBOL}`
///
/// NSE rejects requests without a browser-like User-Agent, so the
/// client is built with one. The API occasionally answers with an empty
/// body during market maintenance; that surfaces as an Api error and
/// the quote service falls through to BSE.
pub struct NseProvider {
    client: Client,
}

impl NseProvider {
    pub fn new() -> Self {
        let builder = Client::builder().user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/124.0 Safari/537.36",
        );
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for NseProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── NSE API response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct QuoteEquityResponse {
    #[serde(rename = "priceInfo")]
    price_info: Option<PriceInfo>,
}

#[derive(Deserialize)]
struct PriceInfo {
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for NseProvider {
    fn name(&self) -> &str {
        "NSE"
    }

    fn supported_kinds(&self) -> Vec<AssetKind> {
        vec![AssetKind::Stock, AssetKind::Etf]
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let upper = symbol.to_uppercase();
        let url = format!("{BASE_URL}/quote-equity?symbol={upper}");

        let resp: QuoteEquityResponse = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "NSE".into(),
                message: format!("Failed to parse quote for {upper}: {e}"),
            })?;

        resp.price_info
            .and_then(|p| p.last_price)
            .ok_or_else(|| CoreError::Api {
                provider: "NSE".into(),
                message: format!("No price data for {upper}"),
            })
    }
}
