use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::expense::Expense;
use crate::models::goal::{Goal, GoalDraft, GoalProgress};
use crate::models::ledger::Ledger;
use crate::services::ledger_service::LedgerService;

/// Manages savings goals and generates their pacing insights.
///
/// A goal never stores its saved amount; progress is always derived
/// from the ledger entries tagged with the goal's id.
pub struct GoalService {
    ledger_service: LedgerService,
}

impl GoalService {
    pub fn new() -> Self {
        Self {
            ledger_service: LedgerService::new(),
        }
    }

    /// Create a goal for a user. Title, target amount, and deadline are
    /// required; the target must be at least 1.
    pub fn create_goal(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        draft: GoalDraft,
        now: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        self.ledger_service.find_user(ledger, user_id)?;

        if draft.title.trim().is_empty() {
            return Err(CoreError::ValidationError("Goal title must not be empty".into()));
        }
        if !draft.target_amount.is_finite() || draft.target_amount < 1.0 {
            return Err(CoreError::ValidationError(
                "Goal target amount must be at least 1".into(),
            ));
        }

        let goal = Goal {
            id: Uuid::new_v4(),
            user_id,
            title: draft.title,
            target_amount: draft.target_amount,
            deadline: draft.deadline,
            description: draft.description,
            created_at: now,
        };
        let id = goal.id;
        ledger.goals.push(goal);
        Ok(id)
    }

    /// Every goal of the user, each with its derived progress.
    pub fn goals_with_progress(
        &self,
        ledger: &Ledger,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<GoalProgress>, CoreError> {
        self.ledger_service.find_user(ledger, user_id)?;

        let symbol = ledger.settings.currency_symbol.clone();
        Ok(ledger
            .goals
            .iter()
            .filter(|g| g.user_id == user_id)
            .map(|goal| {
                let contributions: Vec<&Expense> = ledger
                    .expenses
                    .iter()
                    .filter(|e| e.goal_id == Some(goal.id))
                    .collect();
                self.progress(goal, &contributions, &symbol, now)
            })
            .collect())
    }

    /// Derive the progress and pacing insight for one goal.
    ///
    /// The insight rules are evaluated in priority order: nothing saved,
    /// already achieved, deadline passed, ahead of pace, behind pace
    /// (with the weekly top-up needed), on track.
    pub fn progress(
        &self,
        goal: &Goal,
        contributions: &[&Expense],
        currency_symbol: &str,
        now: DateTime<Utc>,
    ) -> GoalProgress {
        let current: f64 = contributions.iter().map(|e| e.amount).sum();
        let remaining = (goal.target_amount - current).max(0.0);
        let progress_pct = (current / goal.target_amount * 100.0).clamp(0.0, 100.0);

        let today = now.date_naive();
        let days_until_deadline = (goal.deadline - today).num_days();

        // With no contributions the first-contribution date falls back to
        // now, making elapsed = 1 day and the average rate 0; the first
        // rule already catches that case, so no division can misfire.
        let first_contribution = contributions
            .iter()
            .map(|e| e.date.date_naive())
            .min()
            .unwrap_or(today);
        let elapsed_days = (today - first_contribution).num_days().max(1);
        let avg_daily_rate = current / elapsed_days as f64;

        let insight = if current == 0.0 {
            format!(
                "No savings yet. Add your first contribution to start working toward '{}'.",
                goal.title
            )
        } else if remaining == 0.0 {
            format!(
                "Goal achieved! You saved {currency_symbol}{:.0} for '{}'.",
                goal.target_amount, goal.title
            )
        } else if days_until_deadline <= 0 {
            format!(
                "The deadline has passed. You fell short by {currency_symbol}{remaining:.0}."
            )
        } else {
            let projected_days = if avg_daily_rate > 0.0 {
                remaining / avg_daily_rate
            } else {
                f64::INFINITY
            };

            if projected_days < days_until_deadline as f64 {
                let days_early = (days_until_deadline as f64 - projected_days).round() as i64;
                format!(
                    "You are ahead of pace and on course to finish about {days_early} days early."
                )
            } else {
                let required_daily_rate = remaining / days_until_deadline as f64;
                if required_daily_rate > avg_daily_rate {
                    let weekly_top_up =
                        ((required_daily_rate - avg_daily_rate) * 7.0).ceil();
                    format!(
                        "Save an extra {currency_symbol}{weekly_top_up:.0} per week to reach '{}' on time.",
                        goal.title
                    )
                } else {
                    format!(
                        "You are on track to reach '{}' by {}.",
                        goal.title, goal.deadline
                    )
                }
            }
        };

        GoalProgress {
            goal_id: goal.id,
            title: goal.title.clone(),
            target_amount: goal.target_amount,
            deadline: goal.deadline,
            current_amount: current,
            remaining,
            progress_pct,
            insight,
        }
    }

    /// Delete a goal. Its tagged expenses are detached (goal reference
    /// nulled), never deleted. Only the owner may delete the goal.
    pub fn delete_goal(
        &self,
        ledger: &mut Ledger,
        user_id: Uuid,
        goal_id: Uuid,
    ) -> Result<(), CoreError> {
        let idx = ledger
            .goals
            .iter()
            .position(|g| g.id == goal_id && g.user_id == user_id)
            .ok_or_else(|| CoreError::GoalNotFound(goal_id.to_string()))?;

        self.ledger_service.detach_goal(ledger, goal_id);
        ledger.goals.remove(idx);
        Ok(())
    }
}

impl Default for GoalService {
    fn default() -> Self {
        Self::new()
    }
}
