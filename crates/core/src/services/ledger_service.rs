use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::expense::{Expense, ExpenseFilter, ExpenseUpdate};
use crate::models::ledger::Ledger;
use crate::models::user::UserProfile;

/// Manages users and the expense ledger.
///
/// Pure business logic — no I/O, no API calls. Every read used by the
/// analytics engine goes through [`slice`](Self::slice).
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    // ── Users ───────────────────────────────────────────────────────

    /// Register a new user.
    pub fn register_user(
        &self,
        ledger: &mut Ledger,
        name: impl Into<String>,
        email: impl Into<String>,
        monthly_budget: f64,
        starting_balance: f64,
        now: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(CoreError::ValidationError("User name must not be empty".into()));
        }
        if !email.contains('@') || email.trim().len() < 3 {
            return Err(CoreError::ValidationError(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if monthly_budget < 0.0 {
            return Err(CoreError::ValidationError(
                "Monthly budget must not be negative".into(),
            ));
        }

        let user = UserProfile::new(name, email, monthly_budget, starting_balance, now);
        let id = user.id;
        ledger.users.push(user);
        Ok(id)
    }

    /// Look up a user by id.
    pub fn find_user<'a>(
        &self,
        ledger: &'a Ledger,
        user_id: Uuid,
    ) -> Result<&'a UserProfile, CoreError> {
        ledger
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))
    }

    /// Update a user's monthly budget.
    pub fn set_monthly_budget(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        monthly_budget: f64,
    ) -> Result<(), CoreError> {
        if monthly_budget < 0.0 {
            return Err(CoreError::ValidationError(
                "Monthly budget must not be negative".into(),
            ));
        }
        let user = ledger
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))?;
        user.monthly_budget = monthly_budget;
        Ok(())
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Add an expense to the ledger, keeping the date-sorted order.
    pub fn add_expense(&self, ledger: &mut Ledger, expense: Expense) -> Result<(), CoreError> {
        self.validate_expense(ledger, &expense)?;
        Self::sorted_insert(&mut ledger.expenses, expense);
        Ok(())
    }

    /// Apply a partial update to an expense. Ownership is checked; a
    /// date change re-inserts the record at its new sorted position.
    pub fn update_expense(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        expense_id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<(), CoreError> {
        let idx = ledger
            .expenses
            .iter()
            .position(|e| e.id == expense_id && e.user_id == user_id)
            .ok_or_else(|| CoreError::ExpenseNotFound(expense_id.to_string()))?;

        let mut updated = ledger.expenses.remove(idx);
        let old = updated.clone();

        if let Some(amount) = update.amount {
            updated.amount = amount;
        }
        if let Some(category) = update.category {
            updated.category = category;
        }
        if let Some(description) = update.description {
            updated.description = description;
        }
        if let Some(date) = update.date {
            updated.date = date;
        }

        if let Err(e) = self.validate_expense(ledger, &updated) {
            // Rollback: put the old record back
            Self::sorted_insert(&mut ledger.expenses, old);
            return Err(e);
        }

        Self::sorted_insert(&mut ledger.expenses, updated);
        Ok(())
    }

    /// Remove an expense. Only the owner may delete it.
    pub fn remove_expense(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        expense_id: Uuid,
    ) -> Result<(), CoreError> {
        let idx = ledger
            .expenses
            .iter()
            .position(|e| e.id == expense_id && e.user_id == user_id)
            .ok_or_else(|| CoreError::ExpenseNotFound(expense_id.to_string()))?;
        ledger.expenses.remove(idx);
        Ok(())
    }

    /// The filtered chronological read every aggregation builds on:
    /// one user's expenses, optionally bounded by date and category.
    pub fn slice<'a>(
        &self,
        ledger: &'a Ledger,
        user_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Vec<&'a Expense> {
        ledger
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| filter.from.is_none_or(|from| e.date >= from))
            .filter(|e| filter.to.is_none_or(|to| e.date <= to))
            .filter(|e| filter.category.is_none_or(|c| e.category == c))
            .collect()
    }

    /// Null out the goal reference on every expense tagged with `goal_id`.
    /// Used when a goal is deleted; the expenses themselves survive.
    pub fn detach_goal(&self, ledger: &mut Ledger, goal_id: Uuid) -> usize {
        let mut detached = 0;
        for expense in ledger
            .expenses
            .iter_mut()
            .filter(|e| e.goal_id == Some(goal_id))
        {
            expense.goal_id = None;
            detached += 1;
        }
        detached
    }

    // ── Internal ────────────────────────────────────────────────────

    fn validate_expense(&self, ledger: &Ledger, expense: &Expense) -> Result<(), CoreError> {
        if !expense.amount.is_finite() || expense.amount < 0.0 {
            return Err(CoreError::ValidationError(
                "Expense amount must be non-negative".into(),
            ));
        }
        self.find_user(ledger, expense.user_id)?;

        // A goal tag must reference an existing goal of the same user
        if let Some(goal_id) = expense.goal_id {
            let owned = ledger
                .goals
                .iter()
                .any(|g| g.id == goal_id && g.user_id == expense.user_id);
            if !owned {
                return Err(CoreError::GoalNotFound(goal_id.to_string()));
            }
        }
        Ok(())
    }

    /// Insert keeping the date-sorted order; among equal dates the new
    /// record goes last, preserving insertion order.
    fn sorted_insert(expenses: &mut Vec<Expense>, expense: Expense) {
        let pos = expenses.partition_point(|e| e.date <= expense.date);
        expenses.insert(pos, expense);
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
