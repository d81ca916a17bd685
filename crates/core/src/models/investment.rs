use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a tracked instrument. Determines which quote providers
/// can price it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Listed equity (e.g., RELIANCE, TCS)
    Stock,
    /// Mutual fund
    MutualFund,
    /// Exchange-traded fund
    Etf,
    /// Cryptocurrency
    Crypto,
    /// Anything else (bonds, gold schemes, ...)
    Other,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Stock => write!(f, "Stock"),
            AssetKind::MutualFund => write!(f, "Mutual Fund"),
            AssetKind::Etf => write!(f, "ETF"),
            AssetKind::Crypto => write!(f, "Crypto"),
            AssetKind::Other => write!(f, "Other"),
        }
    }
}

/// An open position. At most one exists per (user, symbol); a repeat
/// purchase of the same symbol merges into the existing row via a
/// quantity-weighted average price instead of creating a second one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Owning user
    pub user_id: Uuid,

    /// Ticker symbol, uppercased (e.g., "RELIANCE", "TCS")
    pub symbol: String,

    /// Human-readable instrument name
    pub name: String,

    /// Units held (whole units only)
    pub quantity: u32,

    /// Quantity-weighted average purchase price per unit
    pub avg_buy_price: f64,

    /// Date of the first purchase
    pub buy_date: NaiveDate,

    /// Instrument kind, routes quote lookups
    pub kind: AssetKind,
}

/// Input for recording a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseOrder {
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub date: NaiveDate,
    pub kind: AssetKind,
}

/// An append-only record of a closed position.
///
/// Created exactly once when a holding is sold; never updated or
/// deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub user_id: Uuid,
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    pub buy_price: f64,
    pub sell_price: f64,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,

    /// Realized profit/loss: (sell_price - buy_price) * quantity
    pub pnl: f64,

    /// Realized return: pnl / (buy_price * quantity) * 100
    pub pnl_pct: f64,

    pub kind: AssetKind,
}
