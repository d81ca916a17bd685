use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::investment::AssetKind;

const BASE_URL: &str = "https://api.bseindia.com/BseIndiaAPI/api";

/// BSE (Bombay Stock Exchange) quote provider, the fallback exchange.
///
/// - **Free**: No API key required.
/// - **Endpoint**: `/getScripHeaderData/w?scripcode={CODE}`
///
/// BSE addresses instruments by numeric scrip code, not ticker symbol.
/// The provider keeps a symbol → scrip-code map seeded with widely held
/// names and extended at runtime via the scrip search endpoint; a symbol
/// that cannot be resolved fails here and lets the next provider try.
pub struct BseProvider {
    client: Client,
    /// Map from uppercase ticker (RELIANCE) to BSE scrip code (500325).
    scrip_map: Mutex<HashMap<String, String>>,
}

impl BseProvider {
    pub fn new() -> Self {
        let mut scrip_map = HashMap::new();
        // Pre-populate frequently tracked listings
        let common = vec![
            ("RELIANCE", "500325"),
            ("TCS", "532540"),
            ("HDFCBANK", "500180"),
            ("ICICIBANK", "532174"),
            ("INFY", "500209"),
            ("SBIN", "500112"),
            ("BHARTIARTL", "532454"),
            ("ITC", "500875"),
            ("LT", "500510"),
            ("HINDUNILVR", "500696"),
            ("KOTAKBANK", "500247"),
            ("AXISBANK", "532215"),
            ("WIPRO", "507685"),
            ("MARUTI", "532500"),
            ("ASIANPAINT", "500820"),
            ("TITAN", "500114"),
            ("SUNPHARMA", "524715"),
            ("BAJFINANCE", "500034"),
            ("TATAMOTORS", "500570"),
            ("TATASTEEL", "500470"),
            ("NTPC", "532555"),
            ("POWERGRID", "532898"),
            ("ONGC", "500312"),
            ("ADANIENT", "512599"),
            ("HCLTECH", "532281"),
        ];
        for (symbol, code) in common {
            scrip_map.insert(symbol.to_string(), code.to_string());
        }

        let builder = Client::builder().user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/124.0 Safari/537.36",
        );
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            scrip_map: Mutex::new(scrip_map),
        }
    }

    /// Resolve a ticker to a scrip code from the seeded map.
    pub fn resolve_code(&self, symbol: &str) -> Option<String> {
        let upper = symbol.to_uppercase();
        let map = self.scrip_map.lock().unwrap_or_else(|e| e.into_inner());
        map.get(&upper).cloned()
    }

    /// Resolve a ticker to a scrip code, hitting the search endpoint for
    /// symbols the seeded map does not know. Results are cached.
    async fn resolve_code_dynamic(&self, symbol: &str) -> Result<String, CoreError> {
        let upper = symbol.to_uppercase();

        if let Some(code) = self.resolve_code(&upper) {
            return Ok(code);
        }

        // Scrip lookup: /PeerSmartSearch/w?Type=SS&text={symbol}
        let url = format!("{BASE_URL}/PeerSmartSearch/w?Type=SS&text={upper}");
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .text()
            .await
            .map_err(|e| CoreError::Api {
                provider: "BSE".into(),
                message: format!("Failed to search scrip code for {upper}: {e}"),
            })?;

        // The search endpoint returns HTML-ish rows; the scrip code is
        // the first 6-digit run in the matching row.
        let code = body
            .split(|c: char| !c.is_ascii_digit())
            .find(|run| run.len() == 6)
            .map(|run| run.to_string())
            .ok_or_else(|| CoreError::Api {
                provider: "BSE".into(),
                message: format!("No BSE scrip code found for symbol {upper}"),
            })?;

        let mut map = self.scrip_map.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(upper, code.clone());
        Ok(code)
    }
}

impl Default for BseProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── BSE API response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct ScripHeaderResponse {
    #[serde(rename = "CurrRate")]
    curr_rate: Option<CurrRate>,
}

#[derive(Deserialize)]
struct CurrRate {
    #[serde(rename = "LTP")]
    ltp: Option<String>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for BseProvider {
    fn name(&self) -> &str {
        "BSE"
    }

    fn supported_kinds(&self) -> Vec<AssetKind> {
        vec![AssetKind::Stock, AssetKind::Etf]
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let code = self.resolve_code_dynamic(symbol).await?;
        let url = format!("{BASE_URL}/getScripHeaderData/w?Debtflag=&scripcode={code}&seriesid=");

        let resp: ScripHeaderResponse = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "BSE".into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        resp.curr_rate
            .and_then(|r| r.ltp)
            .ok_or_else(|| CoreError::Api {
                provider: "BSE".into(),
                message: format!("No price data for {symbol}"),
            })?
            // BSE formats the last traded price with thousands separators
            .replace(',', "")
            .parse()
            .map_err(|e| CoreError::Api {
                provider: "BSE".into(),
                message: format!("Invalid price format for {symbol}: {e}"),
            })
    }
}
