use serde::{Deserialize, Serialize};

use super::expense::Expense;
use super::goal::Goal;
use super::investment::{ClosedPosition, Holding};
use super::settings::Settings;
use super::user::UserProfile;

/// The main data container. Everything in here gets serialized,
/// encrypted, and saved to the portable .ftrk file.
///
/// Expenses are kept sorted by date; among equal dates, insertion order
/// is preserved so "most recent" ties break on creation order.
///
/// The live quote cache is NOT part of this container; quotes go stale
/// in seconds and are re-fetched per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Registered users
    pub users: Vec<UserProfile>,

    /// All expense records, date-sorted
    pub expenses: Vec<Expense>,

    /// Savings goals
    pub goals: Vec<Goal>,

    /// Open investment positions (one per user/symbol)
    pub holdings: Vec<Holding>,

    /// Realized history of closed positions, append-only
    #[serde(default)]
    pub closed_positions: Vec<ClosedPosition>,

    /// Display/behavior settings
    pub settings: Settings,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            expenses: Vec::new(),
            goals: Vec::new(),
            holdings: Vec::new(),
            closed_positions: Vec::new(),
            settings: Settings::default(),
        }
    }
}
