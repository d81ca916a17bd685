use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings target the user is working toward.
///
/// The current amount is never stored; it is always derived as the sum
/// of ledger entries tagged with this goal's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Short title (e.g., "Emergency fund")
    pub title: String,

    /// Target amount to save (>= 1)
    pub target_amount: f64,

    /// Date the goal should be reached by
    pub deadline: NaiveDate,

    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,

    /// When the goal was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a goal.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub title: String,
    pub target_amount: f64,
    pub deadline: NaiveDate,
    pub description: Option<String>,
}

/// A goal together with its derived progress and pacing insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: Uuid,
    pub title: String,
    pub target_amount: f64,
    pub deadline: NaiveDate,

    /// Sum of contributions tagged to this goal
    pub current_amount: f64,

    /// max(target - current, 0)
    pub remaining: f64,

    /// current / target * 100, clamped to [0, 100]
    pub progress_pct: f64,

    /// Natural-language pacing insight
    pub insight: String,
}
