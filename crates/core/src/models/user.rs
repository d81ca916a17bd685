use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user of the tracker.
///
/// The analytics engine reads `monthly_budget` and `starting_balance`
/// but never mutates them; profile changes go through explicit operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Contact email (also shown on the dashboard header)
    pub email: String,

    /// When the account was created
    pub joined: DateTime<Utc>,

    /// Monthly spending budget in the display currency
    pub monthly_budget: f64,

    /// Balance the account started with
    pub starting_balance: f64,
}

impl UserProfile {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        monthly_budget: f64,
        starting_balance: f64,
        joined: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            joined,
            monthly_budget,
            starting_balance,
        }
    }
}
