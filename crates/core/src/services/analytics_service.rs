use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::dashboard::{
    CategoryInsights, CategoryMonth, CategorySlice, DashboardQuery, DashboardSummary,
    MonthComparison, MonthlyBucket, QuickStats, RecentExpense, SummaryStats, TrendPoint,
    UserSummary,
};
use crate::models::expense::{Category, Expense, ExpenseFilter};
use crate::models::ledger::Ledger;
use crate::services::ledger_service::LedgerService;
use crate::services::windows;

/// Default analysis window length for the dashboard, in calendar months.
const DEFAULT_WINDOW_MONTHS: u32 = 6;

/// Default number of monthly buckets returned by the dashboard.
const DEFAULT_MONTH_LIMIT: usize = 6;

/// How many transactions the "recent" list carries.
const RECENT_LIMIT: usize = 5;

/// Months of history used by the category drilldown.
const INSIGHT_WINDOW_MONTHS: u32 = 6;

/// Turns the raw expense log into dashboard metrics: totals, monthly and
/// category breakdowns, period comparisons, trend series, and quick stats.
///
/// All operations are pure reads over the ledger. Every time boundary is
/// derived from the single `now` instant the caller captured, so the same
/// request always sees one consistent clock.
pub struct AnalyticsService {
    ledger_service: LedgerService,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self {
            ledger_service: LedgerService::new(),
        }
    }

    /// Build the full dashboard summary for one user.
    ///
    /// The analysis window defaults to the 6 calendar months ending at
    /// `now`; an optional category filter narrows every aggregation's
    /// base set. The current-month comparison is independent of the
    /// window and always uses the real calendar months around `now`.
    pub fn dashboard_summary(
        &self,
        ledger: &Ledger,
        user_id: Uuid,
        query: &DashboardQuery,
        now: DateTime<Utc>,
    ) -> Result<DashboardSummary, CoreError> {
        let user = self.ledger_service.find_user(ledger, user_id)?;

        let end = query.end.unwrap_or(now);
        let start = query
            .start
            .unwrap_or_else(|| windows::sub_months(end, DEFAULT_WINDOW_MONTHS));
        if start > end {
            return Err(CoreError::ValidationError(format!(
                "Window start ({start}) must not be after window end ({end})"
            )));
        }
        let month_limit = query.month_limit.unwrap_or(DEFAULT_MONTH_LIMIT);

        let filter = ExpenseFilter {
            from: Some(start),
            to: Some(end),
            category: query.category,
        };
        let slice = self.ledger_service.slice(ledger, user_id, &filter);

        let total_spent: f64 = slice.iter().map(|e| e.amount).sum();
        let transaction_count = slice.len();

        // Monthly breakdown: (year, month) buckets, most recent first
        let mut by_month: std::collections::BTreeMap<(i32, u32), (f64, usize)> =
            std::collections::BTreeMap::new();
        for expense in &slice {
            let key = (expense.date.year(), expense.date.month());
            let bucket = by_month.entry(key).or_insert((0.0, 0));
            bucket.0 += expense.amount;
            bucket.1 += 1;
        }
        let monthly_breakdown: Vec<MonthlyBucket> = by_month
            .iter()
            .rev()
            .take(month_limit)
            .map(|(&(year, month), &(total, count))| MonthlyBucket {
                year,
                month,
                label: windows::month_label(year, month),
                total,
                transaction_count: count,
            })
            .collect();

        // Category breakdown over the same slice, largest total first
        let mut by_category: HashMap<Category, (f64, usize)> = HashMap::new();
        for expense in &slice {
            let bucket = by_category.entry(expense.category).or_insert((0.0, 0));
            bucket.0 += expense.amount;
            bucket.1 += 1;
        }
        let mut category_breakdown: Vec<CategorySlice> = by_category
            .iter()
            .map(|(&category, &(total, count))| CategorySlice {
                category,
                total,
                transaction_count: count,
                percentage: if total_spent > 0.0 {
                    windows::round2(total / total_spent * 100.0)
                } else {
                    0.0
                },
            })
            .collect();
        category_breakdown.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Recent transactions: newest date first, creation order breaks ties
        let mut recent: Vec<&&Expense> = slice.iter().collect();
        recent.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        let recent_transactions: Vec<RecentExpense> = recent
            .iter()
            .take(RECENT_LIMIT)
            .map(|e| RecentExpense {
                id: e.id,
                amount: e.amount,
                category: e.category,
                description: e.description.clone(),
                date: e.date,
            })
            .collect();

        let largest_expense = slice.iter().map(|e| e.amount).fold(0.0, f64::max);

        let days = windows::whole_days(start, end);
        let average_daily = if days > 0 {
            windows::round2(total_spent / days as f64)
        } else {
            0.0
        };

        // Previous period: same length, ending where this window starts
        let length = end.signed_duration_since(start);
        let previous_filter = ExpenseFilter {
            from: Some(start - length),
            to: Some(start),
            category: query.category,
        };
        let previous_period_total: f64 = self
            .ledger_service
            .slice(ledger, user_id, &previous_filter)
            .iter()
            .map(|e| e.amount)
            .sum();
        let period_change_pct = if previous_period_total > 0.0 {
            windows::round2(
                (total_spent - previous_period_total) / previous_period_total * 100.0,
            )
        } else {
            0.0
        };

        let favorite_category = category_breakdown.first().map(|c| c.category);

        let stats = SummaryStats {
            total_spent,
            transaction_count,
            largest_expense,
            average_daily,
            favorite_category,
            previous_period_total,
            period_change_pct,
        };

        Ok(DashboardSummary {
            user: UserSummary {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                joined: user.joined,
            },
            stats,
            monthly_breakdown,
            category_breakdown,
            recent_transactions,
            current_month: self.month_comparison(ledger, user_id, now),
        })
    }

    /// Spending over the trailing `months_back` months, oldest bucket
    /// first. A bucket's top category is the category of the first
    /// record seen in it, not of the highest-spending one.
    pub fn spending_trends(
        &self,
        ledger: &Ledger,
        user_id: Uuid,
        months_back: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendPoint>, CoreError> {
        self.ledger_service.find_user(ledger, user_id)?;

        let filter = ExpenseFilter {
            from: Some(windows::sub_months(now, months_back)),
            to: Some(now),
            category: None,
        };
        let slice = self.ledger_service.slice(ledger, user_id, &filter);

        struct TrendAcc {
            total: f64,
            count: usize,
            first_category: Category,
        }

        let mut by_month: std::collections::BTreeMap<(i32, u32), TrendAcc> =
            std::collections::BTreeMap::new();
        // The slice is chronological, so the first record seen per bucket
        // is the earliest one in that month.
        for expense in &slice {
            let key = (expense.date.year(), expense.date.month());
            by_month
                .entry(key)
                .and_modify(|acc| {
                    acc.total += expense.amount;
                    acc.count += 1;
                })
                .or_insert(TrendAcc {
                    total: expense.amount,
                    count: 1,
                    first_category: expense.category,
                });
        }

        Ok(by_month
            .iter()
            .map(|(&(year, month), acc)| TrendPoint {
                period: windows::period_key(year, month),
                total: acc.total,
                transaction_count: acc.count,
                top_category: Some(acc.first_category),
            })
            .collect())
    }

    /// Six-month drilldown into a single category, with all-time context.
    pub fn category_insights(
        &self,
        ledger: &Ledger,
        user_id: Uuid,
        category: Category,
        now: DateTime<Utc>,
    ) -> Result<CategoryInsights, CoreError> {
        self.ledger_service.find_user(ledger, user_id)?;

        let filter = ExpenseFilter {
            from: Some(windows::sub_months(now, INSIGHT_WINDOW_MONTHS)),
            to: Some(now),
            category: Some(category),
        };
        let slice = self.ledger_service.slice(ledger, user_id, &filter);

        struct MonthAcc {
            total: f64,
            count: usize,
            max: f64,
            min: f64,
        }

        let mut by_month: std::collections::BTreeMap<(i32, u32), MonthAcc> =
            std::collections::BTreeMap::new();
        for expense in &slice {
            let key = (expense.date.year(), expense.date.month());
            by_month
                .entry(key)
                .and_modify(|acc| {
                    acc.total += expense.amount;
                    acc.count += 1;
                    acc.max = acc.max.max(expense.amount);
                    acc.min = acc.min.min(expense.amount);
                })
                .or_insert(MonthAcc {
                    total: expense.amount,
                    count: 1,
                    max: expense.amount,
                    min: expense.amount,
                });
        }

        let months: Vec<CategoryMonth> = by_month
            .iter()
            .map(|(&(year, month), acc)| CategoryMonth {
                period: windows::period_key(year, month),
                total: acc.total,
                average: windows::round2(acc.total / acc.count as f64),
                transaction_count: acc.count,
                max: acc.max,
                min: acc.min,
            })
            .collect();

        // All-time total for the category, not bounded by the window
        let all_time_filter = ExpenseFilter {
            category: Some(category),
            ..ExpenseFilter::default()
        };
        let all_time_total: f64 = self
            .ledger_service
            .slice(ledger, user_id, &all_time_filter)
            .iter()
            .map(|e| e.amount)
            .sum();

        // Mean of the per-month averages; the divisor floor keeps an
        // empty window at 0 instead of NaN.
        let average_monthly = windows::round2(
            months.iter().map(|m| m.average).sum::<f64>() / months.len().max(1) as f64,
        );
        let max_monthly = months.iter().map(|m| m.max).fold(0.0, f64::max);
        let transaction_count = months.iter().map(|m| m.transaction_count).sum();

        Ok(CategoryInsights {
            category,
            months,
            all_time_total,
            average_monthly,
            max_monthly,
            transaction_count,
        })
    }

    /// Today / this week / this month / yesterday totals, each window
    /// derived independently from the same captured `now`.
    pub fn quick_stats(
        &self,
        ledger: &Ledger,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<QuickStats, CoreError> {
        self.ledger_service.find_user(ledger, user_id)?;

        let today_start = windows::start_of_day(now);
        let week_start = windows::start_of_week(now);
        let month_start = windows::start_of_month(now);
        let yesterday_start = today_start - Duration::days(1);

        let user_expenses: Vec<&Expense> = self
            .ledger_service
            .slice(ledger, user_id, &ExpenseFilter::default());

        let sum_from = |from: DateTime<Utc>| -> f64 {
            user_expenses
                .iter()
                .filter(|e| e.date >= from)
                .map(|e| e.amount)
                .sum()
        };

        let today = sum_from(today_start);
        let this_week = sum_from(week_start);
        let this_month = sum_from(month_start);
        let yesterday: f64 = user_expenses
            .iter()
            .filter(|e| e.date >= yesterday_start && e.date < today_start)
            .map(|e| e.amount)
            .sum();

        let daily_change_pct = if yesterday > 0.0 {
            windows::round2((today - yesterday) / yesterday * 100.0)
        } else if today > 0.0 {
            100.0
        } else {
            0.0
        };

        Ok(QuickStats {
            today,
            this_week,
            this_month,
            yesterday,
            daily_change_pct,
            is_increasing: daily_change_pct > 0.0,
        })
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Real-calendar-month totals around `now`, with the asymmetric
    /// zero rule: a previous month of exactly 0 yields a literal 100,
    /// even when the current month is also 0.
    fn month_comparison(
        &self,
        ledger: &Ledger,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> MonthComparison {
        let all = self
            .ledger_service
            .slice(ledger, user_id, &ExpenseFilter::default());

        let (cur_year, cur_month) = (now.year(), now.month());
        let (prev_year, prev_month) = windows::shift_month(cur_year, cur_month, -1);

        let month_total = |year: i32, month: u32| -> f64 {
            all.iter()
                .filter(|e| e.date.year() == year && e.date.month() == month)
                .map(|e| e.amount)
                .sum()
        };

        let current_month_total = month_total(cur_year, cur_month);
        let previous_month_total = month_total(prev_year, prev_month);

        let change_pct = if previous_month_total > 0.0 {
            windows::round2(
                (current_month_total - previous_month_total) / previous_month_total * 100.0,
            )
        } else {
            100.0
        };

        MonthComparison {
            current_month_total,
            previous_month_total,
            change_pct,
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
