use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expense::Category;
use super::investment::AssetKind;

/// Parameters for a dashboard summary request.
///
/// Defaults: window ends now and starts 6 calendar months earlier, no
/// category filter, 6 monthly buckets.
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    /// Analysis window start (inclusive)
    pub start: Option<DateTime<Utc>>,
    /// Analysis window end (inclusive)
    pub end: Option<DateTime<Utc>>,
    /// Restrict every aggregation to one category
    pub category: Option<Category>,
    /// Maximum number of monthly buckets returned
    pub month_limit: Option<usize>,
}

/// Identity block shown on the dashboard header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub joined: DateTime<Utc>,
}

/// Headline numbers for the analysis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Sum of amounts in the window
    pub total_spent: f64,

    /// Number of matching records
    pub transaction_count: usize,

    /// The single highest-amount record in the window (0 if none)
    pub largest_expense: f64,

    /// total / whole days spanned by the window, rounded to 2 decimals
    pub average_daily: f64,

    /// Category with the highest total; None when the window is empty
    pub favorite_category: Option<Category>,

    /// Total of the equally long window immediately before this one
    pub previous_period_total: f64,

    /// (current - previous) / previous * 100 when previous > 0, else 0
    pub period_change_pct: f64,
}

/// One (year, month) bucket of the monthly breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    /// Human label, e.g. "January 2026"
    pub label: String,
    pub total: f64,
    pub transaction_count: usize,
}

/// One row of the per-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: Category,
    pub total: f64,
    pub transaction_count: usize,
    /// Share of the window total, 0 when the window total is 0
    pub percentage: f64,
}

/// A recent transaction as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentExpense {
    pub id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Real-calendar-month comparison, independent of the analysis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthComparison {
    pub current_month_total: f64,
    pub previous_month_total: f64,

    /// previous > 0 => percent change; previous == 0 => literally 100,
    /// even when the current month is also 0.
    pub change_pct: f64,
}

/// The assembled dashboard response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub user: UserSummary,
    pub stats: SummaryStats,
    pub monthly_breakdown: Vec<MonthlyBucket>,
    pub category_breakdown: Vec<CategorySlice>,
    pub recent_transactions: Vec<RecentExpense>,
    pub current_month: MonthComparison,
}

/// One point of the spending trend series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Zero-padded period label, e.g. "2026-03"
    pub period: String,
    pub total: f64,
    pub transaction_count: usize,

    /// Category of the first record seen in this bucket, not the
    /// highest-spending one.
    pub top_category: Option<Category>,
}

/// Per-month statistics for a single category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMonth {
    pub period: String,
    pub total: f64,
    pub average: f64,
    pub transaction_count: usize,
    pub max: f64,
    pub min: f64,
}

/// Six-month drilldown into one category, plus all-time context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInsights {
    pub category: Category,
    pub months: Vec<CategoryMonth>,

    /// All-time total for this category (not just the 6-month window)
    pub all_time_total: f64,

    /// Mean of the per-month average values (0 when there are no months)
    pub average_monthly: f64,

    /// Highest per-month max (0 when there are no months)
    pub max_monthly: f64,

    /// Transaction count summed across the months
    pub transaction_count: usize,
}

/// Small numbers for the "quick stats" widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickStats {
    pub today: f64,
    /// Sunday-start week containing `now`
    pub this_week: f64,
    pub this_month: f64,
    pub yesterday: f64,

    /// (today - yesterday) / yesterday * 100 when yesterday > 0;
    /// else 100 when today > 0; else 0.
    pub daily_change_pct: f64,

    /// daily_change_pct > 0
    pub is_increasing: bool,
}

/// One open position priced at the current market quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingView {
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    pub avg_buy_price: f64,
    pub kind: AssetKind,

    /// Latest quote from the price oracle
    pub current_price: f64,

    /// current_price * quantity
    pub market_value: f64,

    /// avg_buy_price * quantity
    pub invested: f64,

    /// market_value - invested
    pub unrealized_pnl: f64,

    /// unrealized_pnl / invested * 100, 0 when invested is 0
    pub unrealized_pnl_pct: f64,
}

/// All open positions priced, with portfolio totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub as_of: DateTime<Utc>,
    pub holdings: Vec<HoldingView>,
    pub total_invested: f64,
    pub total_value: f64,
    pub total_unrealized_pnl: f64,
    /// total_unrealized_pnl / total_invested * 100, 0 when nothing invested
    pub total_unrealized_pnl_pct: f64,
}
