// ═══════════════════════════════════════════════════════════════════
// Analytics Tests — dashboard summary, spending trends, category
// insights, quick stats, date-window helpers
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::dashboard::DashboardQuery;
use finance_tracker_core::models::expense::{Category, Expense};
use finance_tracker_core::models::ledger::Ledger;
use finance_tracker_core::models::user::UserProfile;
use finance_tracker_core::services::analytics_service::AnalyticsService;
use finance_tracker_core::services::ledger_service::LedgerService;
use finance_tracker_core::services::windows;

fn dt(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// Fixed "now" for window-relative tests: Sunday 2026-03-15, midday.
fn now() -> DateTime<Utc> {
    dt(2026, 3, 15, 12)
}

fn setup() -> (Ledger, Uuid) {
    let mut ledger = Ledger::default();
    let user = UserProfile::new("Asha", "asha@example.com", 20_000.0, 0.0, dt(2025, 1, 1, 0));
    let user_id = user.id;
    ledger.users.push(user);
    (ledger, user_id)
}

/// Add an expense dated (and created) at `date`.
fn spend(ledger: &mut Ledger, user_id: Uuid, amount: f64, category: Category, date: DateTime<Utc>) {
    let svc = LedgerService::new();
    let expense = Expense::new(user_id, amount, category, None, Some(date), None, date);
    svc.add_expense(ledger, expense).unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Dashboard summary
// ═══════════════════════════════════════════════════════════════════

mod dashboard_summary {
    use super::*;

    #[test]
    fn total_equals_sum_of_monthly_buckets_for_whole_months() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 1, 5, 10));
        spend(&mut ledger, user_id, 200.0, Category::Bills, dt(2026, 1, 20, 10));
        spend(&mut ledger, user_id, 300.0, Category::Travel, dt(2026, 2, 10, 10));
        spend(&mut ledger, user_id, 400.0, Category::Food, dt(2026, 3, 1, 10));

        let query = DashboardQuery {
            start: Some(dt(2026, 1, 1, 0)),
            end: Some(dt(2026, 3, 31, 23)),
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        assert_eq!(summary.stats.total_spent, 1000.0);
        assert_eq!(summary.stats.transaction_count, 4);

        let bucket_sum: f64 = summary.monthly_breakdown.iter().map(|b| b.total).sum();
        assert_eq!(bucket_sum, summary.stats.total_spent);
    }

    #[test]
    fn monthly_buckets_are_most_recent_first_with_labels() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 1, 5, 10));
        spend(&mut ledger, user_id, 300.0, Category::Food, dt(2026, 2, 10, 10));
        spend(&mut ledger, user_id, 400.0, Category::Food, dt(2026, 3, 1, 10));

        let query = DashboardQuery {
            start: Some(dt(2026, 1, 1, 0)),
            end: Some(dt(2026, 3, 31, 23)),
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        let labels: Vec<&str> = summary
            .monthly_breakdown
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["March 2026", "February 2026", "January 2026"]);
        assert_eq!(summary.monthly_breakdown[0].total, 400.0);
        assert_eq!(summary.monthly_breakdown[2].transaction_count, 1);
    }

    #[test]
    fn month_limit_truncates_buckets() {
        let (mut ledger, user_id) = setup();
        for month in 1..=8 {
            spend(&mut ledger, user_id, 10.0, Category::Food, dt(2025, month, 5, 10));
        }

        let base = DashboardQuery {
            start: Some(dt(2025, 1, 1, 0)),
            end: Some(dt(2025, 12, 31, 0)),
            ..DashboardQuery::default()
        };
        let svc = AnalyticsService::new();

        let default_limit = svc.dashboard_summary(&ledger, user_id, &base, now()).unwrap();
        assert_eq!(default_limit.monthly_breakdown.len(), 6);

        let query = DashboardQuery {
            month_limit: Some(3),
            ..base
        };
        let narrow = svc.dashboard_summary(&ledger, user_id, &query, now()).unwrap();
        assert_eq!(narrow.monthly_breakdown.len(), 3);
        // Truncation keeps the most recent buckets
        assert_eq!(narrow.monthly_breakdown[0].month, 8);
    }

    #[test]
    fn category_percentages_sum_to_100() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 50.0, Category::Food, dt(2026, 3, 1, 10));
        spend(&mut ledger, user_id, 30.0, Category::Travel, dt(2026, 3, 2, 10));
        spend(&mut ledger, user_id, 20.0, Category::Bills, dt(2026, 3, 3, 10));

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        let pct_sum: f64 = summary.category_breakdown.iter().map(|c| c.percentage).sum();
        assert!((pct_sum - 100.0).abs() < 0.01);

        // Largest total first
        assert_eq!(summary.category_breakdown[0].category, Category::Food);
        assert_eq!(summary.category_breakdown[0].percentage, 50.0);
        assert_eq!(summary.stats.favorite_category, Some(Category::Food));
    }

    #[test]
    fn empty_window_is_all_zeros() {
        let (ledger, user_id) = setup();

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.stats.total_spent, 0.0);
        assert_eq!(summary.stats.transaction_count, 0);
        assert_eq!(summary.stats.largest_expense, 0.0);
        assert_eq!(summary.stats.average_daily, 0.0);
        assert_eq!(summary.stats.favorite_category, None);
        assert_eq!(summary.stats.period_change_pct, 0.0);
        assert!(summary.monthly_breakdown.is_empty());
        assert!(summary.category_breakdown.is_empty());
        assert!(summary.recent_transactions.is_empty());
    }

    #[test]
    fn previous_period_zero_yields_zero_change() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 500.0, Category::Food, dt(2026, 3, 10, 10));

        let query = DashboardQuery {
            start: Some(dt(2026, 3, 1, 0)),
            end: Some(dt(2026, 3, 15, 0)),
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        assert_eq!(summary.stats.previous_period_total, 0.0);
        assert_eq!(summary.stats.period_change_pct, 0.0);
    }

    #[test]
    fn previous_period_change_is_computed() {
        let (mut ledger, user_id) = setup();
        // Previous window 2026-02-01..2026-03-01 (28 days), current
        // window 2026-03-01..2026-03-29 (28 days)
        spend(&mut ledger, user_id, 200.0, Category::Food, dt(2026, 2, 10, 10));
        spend(&mut ledger, user_id, 300.0, Category::Food, dt(2026, 3, 10, 10));

        let query = DashboardQuery {
            start: Some(dt(2026, 3, 1, 0)),
            end: Some(dt(2026, 3, 29, 0)),
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        assert_eq!(summary.stats.previous_period_total, 200.0);
        assert_eq!(summary.stats.period_change_pct, 50.0);
    }

    #[test]
    fn average_daily_is_total_over_whole_days() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 3, 2, 10));
        spend(&mut ledger, user_id, 150.5, Category::Bills, dt(2026, 3, 5, 10));

        let query = DashboardQuery {
            start: Some(dt(2026, 3, 1, 0)),
            end: Some(dt(2026, 3, 11, 0)), // 10 whole days
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        assert_eq!(summary.stats.average_daily, 25.05);
    }

    #[test]
    fn zero_day_window_has_zero_average() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 3, 1, 0));

        let query = DashboardQuery {
            start: Some(dt(2026, 3, 1, 0)),
            end: Some(dt(2026, 3, 1, 0)),
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        assert_eq!(summary.stats.average_daily, 0.0);
    }

    #[test]
    fn largest_expense_is_the_window_max() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 120.0, Category::Food, dt(2026, 3, 1, 10));
        spend(&mut ledger, user_id, 900.0, Category::Travel, dt(2026, 3, 2, 10));
        spend(&mut ledger, user_id, 45.0, Category::Bills, dt(2026, 3, 3, 10));

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.stats.largest_expense, 900.0);
    }

    #[test]
    fn recent_transactions_newest_first_capped_at_five() {
        let (mut ledger, user_id) = setup();
        for day in 1..=7 {
            spend(&mut ledger, user_id, day as f64, Category::Food, dt(2026, 3, day, 10));
        }

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.recent_transactions.len(), 5);
        assert_eq!(summary.recent_transactions[0].amount, 7.0);
        assert_eq!(summary.recent_transactions[4].amount, 3.0);
    }

    #[test]
    fn recent_ties_break_on_creation_order() {
        let (mut ledger, user_id) = setup();
        let svc = LedgerService::new();
        let date = dt(2026, 3, 10, 10);

        let first = Expense::new(
            user_id,
            1.0,
            Category::Food,
            Some("first".into()),
            Some(date),
            None,
            dt(2026, 3, 10, 11),
        );
        let second = Expense::new(
            user_id,
            2.0,
            Category::Food,
            Some("second".into()),
            Some(date),
            None,
            dt(2026, 3, 10, 12),
        );
        svc.add_expense(&mut ledger, first).unwrap();
        svc.add_expense(&mut ledger, second).unwrap();

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.recent_transactions[0].description, "second");
        assert_eq!(summary.recent_transactions[1].description, "first");
    }

    #[test]
    fn category_filter_narrows_every_aggregation() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 3, 1, 10));
        spend(&mut ledger, user_id, 50.0, Category::Travel, dt(2026, 3, 2, 10));

        let query = DashboardQuery {
            category: Some(Category::Food),
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        assert_eq!(summary.stats.total_spent, 100.0);
        assert_eq!(summary.category_breakdown.len(), 1);
        assert_eq!(summary.category_breakdown[0].percentage, 100.0);
        assert_eq!(summary.recent_transactions.len(), 1);
    }

    #[test]
    fn default_window_is_six_months_ending_now() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2025, 8, 14, 10)); // 7 months back
        spend(&mut ledger, user_id, 200.0, Category::Food, dt(2026, 1, 10, 10));

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.stats.total_spent, 200.0);
    }

    #[test]
    fn user_identity_block_is_populated() {
        let (ledger, user_id) = setup();

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.user.id, user_id);
        assert_eq!(summary.user.name, "Asha");
        assert_eq!(summary.user.email, "asha@example.com");
    }

    #[test]
    fn unknown_user_is_not_found() {
        let (ledger, _) = setup();

        let result = AnalyticsService::new().dashboard_summary(
            &ledger,
            Uuid::new_v4(),
            &DashboardQuery::default(),
            now(),
        );
        assert!(matches!(result.unwrap_err(), CoreError::UserNotFound(_)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (ledger, user_id) = setup();

        let query = DashboardQuery {
            start: Some(dt(2026, 3, 10, 0)),
            end: Some(dt(2026, 3, 1, 0)),
            ..DashboardQuery::default()
        };
        let result = AnalyticsService::new().dashboard_summary(&ledger, user_id, &query, now());
        assert!(matches!(result.unwrap_err(), CoreError::ValidationError(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Month-over-month comparison (real calendar months)
// ═══════════════════════════════════════════════════════════════════

mod month_over_month {
    use super::*;

    #[test]
    fn previous_month_zero_yields_literal_100() {
        let (mut ledger, user_id) = setup();
        // Nothing in February, something in March
        spend(&mut ledger, user_id, 500.0, Category::Food, dt(2026, 3, 10, 10));

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.current_month.current_month_total, 500.0);
        assert_eq!(summary.current_month.previous_month_total, 0.0);
        assert_eq!(summary.current_month.change_pct, 100.0);
    }

    #[test]
    fn both_months_zero_still_yields_100() {
        // The asymmetric rule: previous == 0 always reports 100, even
        // when the current month is also 0.
        let (ledger, user_id) = setup();

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.current_month.current_month_total, 0.0);
        assert_eq!(summary.current_month.change_pct, 100.0);
    }

    #[test]
    fn percent_change_when_previous_positive() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 200.0, Category::Food, dt(2026, 2, 10, 10));
        spend(&mut ledger, user_id, 300.0, Category::Food, dt(2026, 3, 10, 10));

        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &DashboardQuery::default(), now())
            .unwrap();

        assert_eq!(summary.current_month.change_pct, 50.0);
    }

    #[test]
    fn independent_of_the_supplied_window() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 200.0, Category::Food, dt(2026, 2, 10, 10));
        spend(&mut ledger, user_id, 300.0, Category::Food, dt(2026, 3, 10, 10));

        // Analysis window pinned to 2025; the month comparison must
        // still look at the real calendar months around `now`.
        let query = DashboardQuery {
            start: Some(dt(2025, 1, 1, 0)),
            end: Some(dt(2025, 6, 30, 0)),
            ..DashboardQuery::default()
        };
        let summary = AnalyticsService::new()
            .dashboard_summary(&ledger, user_id, &query, now())
            .unwrap();

        assert_eq!(summary.stats.total_spent, 0.0);
        assert_eq!(summary.current_month.current_month_total, 300.0);
        assert_eq!(summary.current_month.previous_month_total, 200.0);
        assert_eq!(summary.current_month.change_pct, 50.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Spending trends
// ═══════════════════════════════════════════════════════════════════

mod spending_trends {
    use super::*;

    #[test]
    fn buckets_oldest_first_with_zero_padded_periods() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2025, 11, 5, 10));
        spend(&mut ledger, user_id, 200.0, Category::Bills, dt(2026, 1, 5, 10));
        spend(&mut ledger, user_id, 300.0, Category::Food, dt(2026, 3, 5, 10));

        let trends = AnalyticsService::new()
            .spending_trends(&ledger, user_id, 12, now())
            .unwrap();

        let periods: Vec<&str> = trends.iter().map(|t| t.period.as_str()).collect();
        assert_eq!(periods, vec!["2025-11", "2026-01", "2026-03"]);
        assert_eq!(trends[0].total, 100.0);
        assert_eq!(trends[2].transaction_count, 1);
    }

    #[test]
    fn top_category_is_first_seen_not_highest_spend() {
        let (mut ledger, user_id) = setup();
        // The earliest record of the month is Food; Travel spends far
        // more later in the month but must not win.
        spend(&mut ledger, user_id, 10.0, Category::Food, dt(2026, 2, 3, 10));
        spend(&mut ledger, user_id, 500.0, Category::Travel, dt(2026, 2, 20, 10));

        let trends = AnalyticsService::new()
            .spending_trends(&ledger, user_id, 12, now())
            .unwrap();

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].top_category, Some(Category::Food));
        assert_eq!(trends[0].total, 510.0);
    }

    #[test]
    fn months_back_bounds_the_series() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2025, 2, 1, 10)); // 13 months back
        spend(&mut ledger, user_id, 200.0, Category::Food, dt(2026, 2, 1, 10));

        let trends = AnalyticsService::new()
            .spending_trends(&ledger, user_id, 12, now())
            .unwrap();

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].period, "2026-02");
    }

    #[test]
    fn unknown_user_is_not_found() {
        let (ledger, _) = setup();
        let result = AnalyticsService::new().spending_trends(&ledger, Uuid::new_v4(), 12, now());
        assert!(matches!(result.unwrap_err(), CoreError::UserNotFound(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Category insights
// ═══════════════════════════════════════════════════════════════════

mod category_insights {
    use super::*;

    #[test]
    fn per_month_stats_are_computed() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 1, 5, 10));
        spend(&mut ledger, user_id, 300.0, Category::Food, dt(2026, 1, 20, 10));
        spend(&mut ledger, user_id, 50.0, Category::Food, dt(2026, 2, 5, 10));

        let insights = AnalyticsService::new()
            .category_insights(&ledger, user_id, Category::Food, now())
            .unwrap();

        assert_eq!(insights.months.len(), 2);
        let january = &insights.months[0];
        assert_eq!(january.period, "2026-01");
        assert_eq!(january.total, 400.0);
        assert_eq!(january.average, 200.0);
        assert_eq!(january.max, 300.0);
        assert_eq!(january.min, 100.0);
        assert_eq!(january.transaction_count, 2);
    }

    #[test]
    fn overall_block_mixes_window_and_all_time() {
        let (mut ledger, user_id) = setup();
        // Old record: outside the 6-month window, inside all-time
        spend(&mut ledger, user_id, 1000.0, Category::Food, dt(2024, 6, 1, 10));
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 1, 5, 10));
        spend(&mut ledger, user_id, 300.0, Category::Food, dt(2026, 1, 20, 10));
        spend(&mut ledger, user_id, 50.0, Category::Food, dt(2026, 2, 5, 10));

        let insights = AnalyticsService::new()
            .category_insights(&ledger, user_id, Category::Food, now())
            .unwrap();

        assert_eq!(insights.all_time_total, 1450.0);
        // Mean of the monthly averages: (200 + 50) / 2
        assert_eq!(insights.average_monthly, 125.0);
        assert_eq!(insights.max_monthly, 300.0);
        assert_eq!(insights.transaction_count, 3);
    }

    #[test]
    fn zero_months_returns_zeros_not_nan() {
        let (ledger, user_id) = setup();

        let insights = AnalyticsService::new()
            .category_insights(&ledger, user_id, Category::Healthcare, now())
            .unwrap();

        assert!(insights.months.is_empty());
        assert_eq!(insights.average_monthly, 0.0);
        assert_eq!(insights.max_monthly, 0.0);
        assert_eq!(insights.transaction_count, 0);
        assert_eq!(insights.all_time_total, 0.0);
    }

    #[test]
    fn other_categories_are_excluded() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 2, 5, 10));
        spend(&mut ledger, user_id, 999.0, Category::Travel, dt(2026, 2, 6, 10));

        let insights = AnalyticsService::new()
            .category_insights(&ledger, user_id, Category::Food, now())
            .unwrap();

        assert_eq!(insights.all_time_total, 100.0);
        assert_eq!(insights.transaction_count, 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Quick stats
// ═══════════════════════════════════════════════════════════════════

mod quick_stats {
    use super::*;

    /// Wednesday 2026-03-18, mid-afternoon.
    fn wednesday() -> DateTime<Utc> {
        dt(2026, 3, 18, 15)
    }

    #[test]
    fn today_positive_yesterday_zero_is_plus_100() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 3, 18, 9));

        let stats = AnalyticsService::new()
            .quick_stats(&ledger, user_id, wednesday())
            .unwrap();

        assert_eq!(stats.today, 100.0);
        assert_eq!(stats.yesterday, 0.0);
        assert_eq!(stats.daily_change_pct, 100.0);
        assert!(stats.is_increasing);
    }

    #[test]
    fn both_zero_is_flat() {
        let (ledger, user_id) = setup();

        let stats = AnalyticsService::new()
            .quick_stats(&ledger, user_id, wednesday())
            .unwrap();

        assert_eq!(stats.daily_change_pct, 0.0);
        assert!(!stats.is_increasing);
    }

    #[test]
    fn spending_less_than_yesterday_is_negative() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 100.0, Category::Food, dt(2026, 3, 17, 9));
        spend(&mut ledger, user_id, 80.0, Category::Food, dt(2026, 3, 18, 9));

        let stats = AnalyticsService::new()
            .quick_stats(&ledger, user_id, wednesday())
            .unwrap();

        assert_eq!(stats.daily_change_pct, -20.0);
        assert!(!stats.is_increasing);
    }

    #[test]
    fn week_starts_on_sunday() {
        let (mut ledger, user_id) = setup();
        // Sunday 2026-03-15 is inside the week of Wednesday 2026-03-18;
        // Saturday 2026-03-14 is not.
        spend(&mut ledger, user_id, 40.0, Category::Food, dt(2026, 3, 15, 9));
        spend(&mut ledger, user_id, 60.0, Category::Food, dt(2026, 3, 14, 9));

        let stats = AnalyticsService::new()
            .quick_stats(&ledger, user_id, wednesday())
            .unwrap();

        assert_eq!(stats.this_week, 40.0);
    }

    #[test]
    fn month_window_starts_on_the_first() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 25.0, Category::Food, dt(2026, 3, 1, 0));
        spend(&mut ledger, user_id, 75.0, Category::Food, dt(2026, 2, 28, 23));

        let stats = AnalyticsService::new()
            .quick_stats(&ledger, user_id, wednesday())
            .unwrap();

        assert_eq!(stats.this_month, 25.0);
    }

    #[test]
    fn yesterday_excludes_today() {
        let (mut ledger, user_id) = setup();
        spend(&mut ledger, user_id, 10.0, Category::Food, dt(2026, 3, 18, 1));
        spend(&mut ledger, user_id, 20.0, Category::Food, dt(2026, 3, 17, 23));

        let stats = AnalyticsService::new()
            .quick_stats(&ledger, user_id, wednesday())
            .unwrap();

        assert_eq!(stats.today, 10.0);
        assert_eq!(stats.yesterday, 20.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Window helpers
// ═══════════════════════════════════════════════════════════════════

mod window_helpers {
    use super::*;

    #[test]
    fn start_of_week_on_a_sunday_is_that_day() {
        let sunday = dt(2026, 3, 15, 18);
        assert_eq!(windows::start_of_week(sunday), dt(2026, 3, 15, 0));
    }

    #[test]
    fn start_of_week_mid_week_goes_back_to_sunday() {
        let wednesday = dt(2026, 3, 18, 3);
        assert_eq!(windows::start_of_week(wednesday), dt(2026, 3, 15, 0));
    }

    #[test]
    fn start_of_month_and_day() {
        let t = dt(2026, 3, 18, 15);
        assert_eq!(windows::start_of_month(t), dt(2026, 3, 1, 0));
        assert_eq!(windows::start_of_day(t), dt(2026, 3, 18, 0));
    }

    #[test]
    fn shift_month_wraps_across_years() {
        assert_eq!(windows::shift_month(2026, 1, -1), (2025, 12));
        assert_eq!(windows::shift_month(2025, 12, 1), (2026, 1));
        assert_eq!(windows::shift_month(2026, 3, -15), (2024, 12));
    }

    #[test]
    fn sub_months_clamps_the_day() {
        // March 31 minus one month lands on February 28
        assert_eq!(windows::sub_months(dt(2026, 3, 31, 10), 1), dt(2026, 2, 28, 10));
    }

    #[test]
    fn labels_and_keys() {
        assert_eq!(windows::month_label(2026, 1), "January 2026");
        assert_eq!(windows::period_key(2026, 3), "2026-03");
        assert_eq!(windows::period_key(2026, 11), "2026-11");
    }

    #[test]
    fn whole_days_and_rounding() {
        assert_eq!(windows::whole_days(dt(2026, 3, 1, 0), dt(2026, 3, 11, 0)), 10);
        assert_eq!(windows::round2(25.054), 25.05);
        assert_eq!(windows::round2(25.055), 25.06);
    }
}
