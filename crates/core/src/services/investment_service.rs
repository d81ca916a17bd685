use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::dashboard::{HoldingView, PortfolioSnapshot};
use crate::models::investment::{ClosedPosition, Holding, PurchaseOrder};
use crate::models::ledger::Ledger;
use crate::models::quote::QuoteCache;
use crate::services::ledger_service::LedgerService;
use crate::services::quote_service::QuoteService;
use crate::services::windows;

/// Manages open positions and the realized history.
///
/// The invariant: at most one open position per (user, symbol). A repeat
/// purchase merges into the existing row; a sell always closes the whole
/// position and appends exactly one immutable history record.
pub struct InvestmentService {
    ledger_service: LedgerService,
}

impl InvestmentService {
    pub fn new() -> Self {
        Self {
            ledger_service: LedgerService::new(),
        }
    }

    /// Record a purchase. The first buy of a symbol creates the holding;
    /// a later buy of the same symbol merges via quantity-weighted
    /// average price instead of creating a second row.
    pub fn record_purchase(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        order: PurchaseOrder,
    ) -> Result<(), CoreError> {
        self.ledger_service.find_user(ledger, user_id)?;
        Self::validate_order(&order)?;

        let symbol = order.symbol.trim().to_uppercase();
        if let Some(existing) = ledger
            .holdings
            .iter_mut()
            .find(|h| h.user_id == user_id && h.symbol == symbol)
        {
            let old_qty = existing.quantity as f64;
            let new_qty = order.quantity as f64;
            let merged_qty = old_qty + new_qty;
            existing.avg_buy_price =
                (old_qty * existing.avg_buy_price + new_qty * order.price) / merged_qty;
            existing.quantity += order.quantity;
        } else {
            ledger.holdings.push(Holding {
                user_id,
                symbol,
                name: order.name,
                quantity: order.quantity,
                avg_buy_price: order.price,
                buy_date: order.date,
                kind: order.kind,
            });
        }
        Ok(())
    }

    /// Explicitly edit an open position's quantity and average price.
    pub fn update_holding(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        symbol: &str,
        quantity: u32,
        avg_buy_price: f64,
    ) -> Result<(), CoreError> {
        if quantity == 0 {
            return Err(CoreError::ValidationError(
                "Holding quantity must be at least 1".into(),
            ));
        }
        if !avg_buy_price.is_finite() || avg_buy_price <= 0.0 {
            return Err(CoreError::ValidationError(
                "Average buy price must be positive".into(),
            ));
        }

        let upper = symbol.trim().to_uppercase();
        let holding = ledger
            .holdings
            .iter_mut()
            .find(|h| h.user_id == user_id && h.symbol == upper)
            .ok_or_else(|| CoreError::HoldingNotFound(upper.clone()))?;
        holding.quantity = quantity;
        holding.avg_buy_price = avg_buy_price;
        Ok(())
    }

    /// Sell a whole position: removes the holding and appends exactly
    /// one realized-history record. Partial sells are not supported.
    pub fn sell(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        symbol: &str,
        sell_price: f64,
        sell_date: NaiveDate,
    ) -> Result<ClosedPosition, CoreError> {
        if !sell_price.is_finite() || sell_price < 0.0 {
            return Err(CoreError::ValidationError(
                "Sell price must be non-negative".into(),
            ));
        }

        let upper = symbol.trim().to_uppercase();
        let idx = ledger
            .holdings
            .iter()
            .position(|h| h.user_id == user_id && h.symbol == upper)
            .ok_or_else(|| CoreError::HoldingNotFound(upper.clone()))?;
        let holding = ledger.holdings.remove(idx);

        let quantity = holding.quantity as f64;
        let cost = holding.avg_buy_price * quantity;
        let pnl = (sell_price - holding.avg_buy_price) * quantity;
        let pnl_pct = if cost > 0.0 { pnl / cost * 100.0 } else { 0.0 };

        let closed = ClosedPosition {
            user_id,
            symbol: holding.symbol,
            name: holding.name,
            quantity: holding.quantity,
            buy_price: holding.avg_buy_price,
            sell_price,
            buy_date: holding.buy_date,
            sell_date,
            pnl,
            pnl_pct,
            kind: holding.kind,
        };
        ledger.closed_positions.push(closed.clone());
        Ok(closed)
    }

    /// All open positions of a user.
    pub fn holdings<'a>(&self, ledger: &'a Ledger, user_id: Uuid) -> Vec<&'a Holding> {
        ledger
            .holdings
            .iter()
            .filter(|h| h.user_id == user_id)
            .collect()
    }

    /// The realized history of a user, in close order.
    pub fn closed_positions<'a>(
        &self,
        ledger: &'a Ledger,
        user_id: Uuid,
    ) -> Vec<&'a ClosedPosition> {
        ledger
            .closed_positions
            .iter()
            .filter(|c| c.user_id == user_id)
            .collect()
    }

    /// Price every open position at the current market quote and compute
    /// unrealized P&L. Fails wholesale when a symbol has neither a live
    /// nor a stale quote; there is no partial-snapshot mode.
    pub async fn snapshot(
        &self,
        ledger: &Ledger,
        user_id: Uuid,
        quote_service: &QuoteService,
        cache: &mut QuoteCache,
        now: DateTime<Utc>,
    ) -> Result<PortfolioSnapshot, CoreError> {
        self.ledger_service.find_user(ledger, user_id)?;

        let mut views = Vec::new();
        let mut total_invested = 0.0;
        let mut total_value = 0.0;

        for holding in ledger.holdings.iter().filter(|h| h.user_id == user_id) {
            let current_price = quote_service
                .latest_quote(cache, &holding.symbol, &holding.kind, now)
                .await?;

            let quantity = holding.quantity as f64;
            let invested = holding.avg_buy_price * quantity;
            let market_value = current_price * quantity;
            let unrealized_pnl = market_value - invested;
            let unrealized_pnl_pct = if invested > 0.0 {
                windows::round2(unrealized_pnl / invested * 100.0)
            } else {
                0.0
            };

            total_invested += invested;
            total_value += market_value;

            views.push(HoldingView {
                symbol: holding.symbol.clone(),
                name: holding.name.clone(),
                quantity: holding.quantity,
                avg_buy_price: holding.avg_buy_price,
                kind: holding.kind,
                current_price,
                market_value,
                invested,
                unrealized_pnl,
                unrealized_pnl_pct,
            });
        }

        // Largest position first, matching the dashboard ordering
        views.sort_by(|a, b| {
            b.market_value
                .partial_cmp(&a.market_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_unrealized_pnl = total_value - total_invested;
        let total_unrealized_pnl_pct = if total_invested > 0.0 {
            windows::round2(total_unrealized_pnl / total_invested * 100.0)
        } else {
            0.0
        };

        Ok(PortfolioSnapshot {
            as_of: now,
            holdings: views,
            total_invested,
            total_value,
            total_unrealized_pnl,
            total_unrealized_pnl_pct,
        })
    }

    // ── Internal ────────────────────────────────────────────────────

    fn validate_order(order: &PurchaseOrder) -> Result<(), CoreError> {
        if order.symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        if order.quantity == 0 {
            return Err(CoreError::ValidationError(
                "Purchase quantity must be at least 1".into(),
            ));
        }
        if !order.price.is_finite() || order.price <= 0.0 {
            return Err(CoreError::ValidationError(
                "Purchase price must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for InvestmentService {
    fn default() -> Self {
        Self::new()
    }
}
