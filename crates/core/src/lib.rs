pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use models::{
    dashboard::{
        CategoryInsights, DashboardQuery, DashboardSummary, PortfolioSnapshot, QuickStats,
        TrendPoint,
    },
    expense::{Category, Expense, ExpenseFilter, ExpenseUpdate},
    goal::{GoalDraft, GoalProgress},
    investment::{AssetKind, ClosedPosition, Holding, PurchaseOrder},
    ledger::Ledger,
    quote::QuoteCache,
    settings::Settings,
    user::UserProfile,
};
use providers::registry::QuoteProviderRegistry;
use services::{
    analytics_service::AnalyticsService, goal_service::GoalService,
    investment_service::InvestmentService, ledger_service::LedgerService,
    quote_service::QuoteService,
};
use storage::manager::StorageManager;

use errors::CoreError;

/// Default number of trailing months for the spending trend series.
const DEFAULT_TREND_MONTHS: u32 = 12;

/// Main entry point for the Finance Tracker core library.
/// Holds the ledger state and all services needed to operate on it.
#[must_use]
pub struct FinanceTracker {
    ledger: Ledger,
    ledger_service: LedgerService,
    goal_service: GoalService,
    investment_service: InvestmentService,
    analytics_service: AnalyticsService,
    quote_service: QuoteService,
    quote_cache: QuoteCache,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("users", &self.ledger.users.len())
            .field("expenses", &self.ledger.expenses.len())
            .field("goals", &self.ledger.goals.len())
            .field("holdings", &self.ledger.holdings.len())
            .field("cached_quotes", &self.quote_cache.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl FinanceTracker {
    /// Create a brand new empty ledger with default settings.
    pub fn create_new() -> Self {
        Self::build(Ledger::default())
    }

    /// Load an existing ledger from encrypted bytes (password required).
    /// Use this for WASM / Tauri where the frontend handles file I/O.
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(ledger))
    }

    /// Save the current ledger to encrypted bytes.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.ledger, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(ledger))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.ledger, path, password)?;
        self.dirty = false;
        Ok(())
    }

    // ── Users ───────────────────────────────────────────────────────

    /// Register a new user and return their id.
    pub fn register_user(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        monthly_budget: f64,
        starting_balance: f64,
    ) -> Result<Uuid, CoreError> {
        let id = self.ledger_service.register_user(
            &mut self.ledger,
            name,
            email,
            monthly_budget,
            starting_balance,
            Utc::now(),
        )?;
        self.dirty = true;
        Ok(id)
    }

    /// Look up a user's profile.
    pub fn get_user(&self, user_id: Uuid) -> Result<&UserProfile, CoreError> {
        self.ledger_service.find_user(&self.ledger, user_id)
    }

    /// Update a user's monthly budget.
    pub fn set_monthly_budget(
        &mut self,
        user_id: Uuid,
        monthly_budget: f64,
    ) -> Result<(), CoreError> {
        self.ledger_service
            .set_monthly_budget(&mut self.ledger, user_id, monthly_budget)?;
        self.dirty = true;
        Ok(())
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Add an expense. Description defaults to "No description" and the
    /// date defaults to now; an optional goal id tags the expense as a
    /// contribution toward that goal.
    pub fn add_expense(
        &mut self,
        user_id: Uuid,
        amount: f64,
        category: Category,
        description: Option<String>,
        date: Option<DateTime<Utc>>,
        goal_id: Option<Uuid>,
    ) -> Result<Uuid, CoreError> {
        let expense = Expense::new(
            user_id,
            amount,
            category,
            description,
            date,
            goal_id,
            Utc::now(),
        );
        let id = expense.id;
        self.ledger_service.add_expense(&mut self.ledger, expense)?;
        self.dirty = true;
        Ok(id)
    }

    /// Apply a partial update (any subset of amount/category/
    /// description/date) to an expense owned by the user.
    pub fn update_expense(
        &mut self,
        user_id: Uuid,
        expense_id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<(), CoreError> {
        self.ledger_service
            .update_expense(&mut self.ledger, user_id, expense_id, update)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete an expense. Only the owner may delete it.
    pub fn remove_expense(&mut self, user_id: Uuid, expense_id: Uuid) -> Result<(), CoreError> {
        self.ledger_service
            .remove_expense(&mut self.ledger, user_id, expense_id)?;
        self.dirty = true;
        Ok(())
    }

    /// All expenses of a user, oldest first.
    #[must_use]
    pub fn get_expenses(&self, user_id: Uuid) -> Vec<&Expense> {
        self.ledger_service
            .slice(&self.ledger, user_id, &ExpenseFilter::default())
    }

    /// A user's expenses filtered by date range and/or category.
    #[must_use]
    pub fn get_expenses_filtered(&self, user_id: Uuid, filter: &ExpenseFilter) -> Vec<&Expense> {
        self.ledger_service.slice(&self.ledger, user_id, filter)
    }

    /// Total number of expense records across all users.
    #[must_use]
    pub fn expense_count(&self) -> usize {
        self.ledger.expenses.len()
    }

    // ── Dashboard Analytics ─────────────────────────────────────────

    /// Build the dashboard summary for a user (totals, breakdowns,
    /// recent transactions, period comparisons).
    pub fn dashboard_summary(
        &self,
        user_id: Uuid,
        query: &DashboardQuery,
    ) -> Result<DashboardSummary, CoreError> {
        self.analytics_service
            .dashboard_summary(&self.ledger, user_id, query, Utc::now())
    }

    /// Monthly spending trend over the trailing months (default 12).
    pub fn spending_trends(
        &self,
        user_id: Uuid,
        months_back: Option<u32>,
    ) -> Result<Vec<TrendPoint>, CoreError> {
        self.analytics_service.spending_trends(
            &self.ledger,
            user_id,
            months_back.unwrap_or(DEFAULT_TREND_MONTHS),
            Utc::now(),
        )
    }

    /// Six-month drilldown into one spending category.
    pub fn category_insights(
        &self,
        user_id: Uuid,
        category: Category,
    ) -> Result<CategoryInsights, CoreError> {
        self.analytics_service
            .category_insights(&self.ledger, user_id, category, Utc::now())
    }

    /// Today / this week / this month / yesterday widgets.
    pub fn quick_stats(&self, user_id: Uuid) -> Result<QuickStats, CoreError> {
        self.analytics_service
            .quick_stats(&self.ledger, user_id, Utc::now())
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Create a savings goal and return its id.
    pub fn create_goal(&mut self, user_id: Uuid, draft: GoalDraft) -> Result<Uuid, CoreError> {
        let id = self
            .goal_service
            .create_goal(&mut self.ledger, user_id, draft, Utc::now())?;
        self.dirty = true;
        Ok(id)
    }

    /// Every goal of the user with derived progress and pacing insight.
    pub fn goals_with_progress(&self, user_id: Uuid) -> Result<Vec<GoalProgress>, CoreError> {
        self.goal_service
            .goals_with_progress(&self.ledger, user_id, Utc::now())
    }

    /// Delete a goal, detaching (never deleting) its tagged expenses.
    pub fn delete_goal(&mut self, user_id: Uuid, goal_id: Uuid) -> Result<(), CoreError> {
        self.goal_service
            .delete_goal(&mut self.ledger, user_id, goal_id)?;
        self.dirty = true;
        Ok(())
    }

    // ── Investments ─────────────────────────────────────────────────

    /// Record a purchase. A repeat buy of the same symbol merges into
    /// the existing position via quantity-weighted average price.
    pub fn record_purchase(
        &mut self,
        user_id: Uuid,
        order: PurchaseOrder,
    ) -> Result<(), CoreError> {
        self.investment_service
            .record_purchase(&mut self.ledger, user_id, order)?;
        self.dirty = true;
        Ok(())
    }

    /// Explicitly edit an open position's quantity and average price.
    pub fn update_holding(
        &mut self,
        user_id: Uuid,
        symbol: &str,
        quantity: u32,
        avg_buy_price: f64,
    ) -> Result<(), CoreError> {
        self.investment_service.update_holding(
            &mut self.ledger,
            user_id,
            symbol,
            quantity,
            avg_buy_price,
        )?;
        self.dirty = true;
        Ok(())
    }

    /// Sell a whole position, converting it into a realized-history
    /// record. Returns the closed position.
    pub fn sell_holding(
        &mut self,
        user_id: Uuid,
        symbol: &str,
        sell_price: f64,
        sell_date: NaiveDate,
    ) -> Result<ClosedPosition, CoreError> {
        let closed =
            self.investment_service
                .sell(&mut self.ledger, user_id, symbol, sell_price, sell_date)?;
        self.dirty = true;
        Ok(closed)
    }

    /// All open positions of a user.
    #[must_use]
    pub fn holdings(&self, user_id: Uuid) -> Vec<&Holding> {
        self.investment_service.holdings(&self.ledger, user_id)
    }

    /// A user's realized history, in close order.
    #[must_use]
    pub fn investment_history(&self, user_id: Uuid) -> Vec<&ClosedPosition> {
        self.investment_service
            .closed_positions(&self.ledger, user_id)
    }

    /// Price every open position at the current market quote.
    /// Requires quote data (live or cached).
    pub async fn portfolio_snapshot(
        &mut self,
        user_id: Uuid,
    ) -> Result<PortfolioSnapshot, CoreError> {
        self.investment_service
            .snapshot(
                &self.ledger,
                user_id,
                &self.quote_service,
                &mut self.quote_cache,
                Utc::now(),
            )
            .await
    }

    // ── Quotes ──────────────────────────────────────────────────────

    /// Current market price for a symbol, using the TTL cache and the
    /// NSE → BSE → Yahoo fallback chain.
    pub async fn latest_quote(&mut self, symbol: &str, kind: AssetKind) -> Result<f64, CoreError> {
        self.quote_service
            .latest_quote(&mut self.quote_cache, symbol, &kind, Utc::now())
            .await
    }

    /// Check if at least one quote provider can price the asset kind.
    #[must_use]
    pub fn is_provider_available(&self, kind: &AssetKind) -> bool {
        self.quote_service.has_provider_for(kind)
    }

    /// Names of the providers available for an asset kind.
    #[must_use]
    pub fn get_provider_names(&self, kind: &AssetKind) -> Vec<String> {
        self.quote_service.provider_names(kind)
    }

    /// Number of symbols currently in the quote cache.
    #[must_use]
    pub fn quote_cache_len(&self) -> usize {
        self.quote_cache.len()
    }

    /// Drop every cached quote.
    pub fn clear_quote_cache(&mut self) {
        self.quote_cache.clear();
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    /// Set the currency symbol used in generated text (e.g., "₹", "$").
    pub fn set_currency_symbol(&mut self, symbol: impl Into<String>) -> Result<(), CoreError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Currency symbol must not be empty".into(),
            ));
        }
        self.ledger.settings.currency_symbol = symbol;
        self.dirty = true;
        Ok(())
    }

    /// Set how long fetched quotes stay fresh. Rebuilds the quote cache
    /// so the new TTL takes effect immediately.
    pub fn set_quote_ttl_secs(&mut self, ttl_secs: u64) -> Result<(), CoreError> {
        if ttl_secs == 0 {
            return Err(CoreError::ValidationError(
                "Quote TTL must be at least 1 second".into(),
            ));
        }
        self.ledger.settings.quote_ttl_secs = ttl_secs;
        self.quote_cache = QuoteCache::new(ttl_secs);
        self.dirty = true;
        Ok(())
    }

    // ── Password & Dirty State ──────────────────────────────────────

    /// Re-encrypt the ledger with a new password.
    /// Returns the encrypted bytes. The caller should write them to storage.
    ///
    /// `last_saved_bytes` must be the most recently saved encrypted bytes
    /// for this ledger. The current password is verified by decrypting
    /// them. If verification fails, returns `CoreError::Decryption`.
    pub fn change_password(
        &mut self,
        last_saved_bytes: &[u8],
        current_password: &str,
        new_password: &str,
    ) -> Result<Vec<u8>, CoreError> {
        // Verify the current password against the actual saved data.
        StorageManager::load_from_bytes(last_saved_bytes, current_password)?;

        // Re-encrypt with the new password
        let new_bytes = StorageManager::save_to_bytes(&self.ledger, new_password)?;
        self.dirty = false;
        Ok(new_bytes)
    }

    /// Returns `true` if the ledger has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export a user's expenses as a JSON string.
    pub fn export_expenses_to_json(&self, user_id: Uuid) -> Result<String, CoreError> {
        let expenses = self.get_expenses(user_id);
        serde_json::to_string_pretty(&expenses)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize expenses: {e}")))
    }

    /// Export a user's expenses as a CSV string.
    /// Columns: id, amount, category, description, date, goal_id
    pub fn export_expenses_to_csv(&self, user_id: Uuid) -> Result<String, CoreError> {
        self.ledger_service.find_user(&self.ledger, user_id)?;

        let mut csv = String::from("id,amount,category,description,date,goal_id\n");
        for expense in self.get_expenses(user_id) {
            let description = &expense.description;
            // Escape CSV: quote fields containing commas, quotes, or newlines
            let escaped = if description.contains(',')
                || description.contains('"')
                || description.contains('\n')
            {
                format!("\"{}\"", description.replace('"', "\"\""))
            } else {
                description.clone()
            };
            let goal = expense
                .goal_id
                .map(|g| g.to_string())
                .unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                expense.id,
                expense.amount,
                expense.category,
                escaped,
                expense.date.to_rfc3339(),
                goal,
            ));
        }
        Ok(csv)
    }

    /// Export the full ledger as JSON (unencrypted snapshot for
    /// debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(ledger: Ledger) -> Self {
        let registry = QuoteProviderRegistry::new_with_defaults();
        let quote_service = QuoteService::new(registry);
        let quote_cache = QuoteCache::new(ledger.settings.quote_ttl_secs);

        Self {
            ledger,
            ledger_service: LedgerService::new(),
            goal_service: GoalService::new(),
            investment_service: InvestmentService::new(),
            analytics_service: AnalyticsService::new(),
            quote_service,
            quote_cache,
            dirty: false,
        }
    }
}
