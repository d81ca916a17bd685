use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::CoreError;

/// Fallback description when none is supplied.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// The fixed set of spending categories.
///
/// Modeled as a closed sum type rather than a free-form string so that
/// filters and aggregations can never see an unknown category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Shopping,
    Bills,
    Entertainment,
    Healthcare,
    Education,
    Travel,
    Investments,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Transportation,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Healthcare,
        Category::Education,
        Category::Travel,
        Category::Investments,
        Category::Other,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::Investments => "Investments",
            Category::Other => "Other",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Case-insensitive parse. Unknown strings are a validation error,
    /// surfaced before any aggregation runs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "transportation" => Ok(Category::Transportation),
            "shopping" => Ok(Category::Shopping),
            "bills" => Ok(Category::Bills),
            "entertainment" => Ok(Category::Entertainment),
            "healthcare" => Ok(Category::Healthcare),
            "education" => Ok(Category::Education),
            "travel" => Ok(Category::Travel),
            "investments" => Ok(Category::Investments),
            "other" => Ok(Category::Other),
            other => Err(CoreError::ValidationError(format!(
                "Unknown category '{other}'"
            ))),
        }
    }
}

/// One user transaction in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: Uuid,

    /// Owning user; every expense belongs to exactly one user
    pub user_id: Uuid,

    /// Amount spent (always >= 0)
    pub amount: f64,

    /// Spending category
    pub category: Category,

    /// Free-text description, defaults to "No description"
    pub description: String,

    /// When the money was spent (defaults to creation time)
    pub date: DateTime<Utc>,

    /// When the record was created, the tie-breaker for same-date ordering
    pub created_at: DateTime<Utc>,

    /// Optional savings goal this expense contributes to
    #[serde(default)]
    pub goal_id: Option<Uuid>,
}

impl Expense {
    /// Create an expense. A missing description falls back to
    /// [`DEFAULT_DESCRIPTION`]; a missing date falls back to `now`.
    pub fn new(
        user_id: Uuid,
        amount: f64,
        category: Category,
        description: Option<String>,
        date: Option<DateTime<Utc>>,
        goal_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            category,
            description: description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            date: date.unwrap_or(now),
            created_at: now,
            goal_id,
        }
    }
}

/// Partial update for an expense: any subset of the mutable fields.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Filter applied when reading a slice of the ledger.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Inclusive lower bound on the expense date
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the expense date
    pub to: Option<DateTime<Utc>>,
    /// Restrict to a single category
    pub category: Option<Category>,
}
