use serde::{Deserialize, Serialize};

/// User-configurable settings, stored inside the encrypted ledger file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Symbol prefixed to monetary amounts in generated text (e.g., "₹").
    pub currency_symbol: String,

    /// How long a fetched market quote stays fresh, in seconds.
    pub quote_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            quote_ttl_secs: 15,
        }
    }
}
