//! Pure date-window helpers for the analytics engine.
//!
//! Every boundary is computed from a single captured `now` instant.
//! Nothing in here mutates a shared clock or reuses a boundary to derive
//! the next one, so the four quick-stat windows (and the month math the
//! dashboard depends on) can never corrupt each other.

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};

/// Midnight (UTC) of the day containing `t`.
pub fn start_of_day(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Midnight of the Sunday starting the week that contains `t`.
pub fn start_of_week(t: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_sunday = t.weekday().num_days_from_sunday() as i64;
    start_of_day(t) - Duration::days(days_from_sunday)
}

/// Midnight of the first day of the calendar month containing `t`.
pub fn start_of_month(t: DateTime<Utc>) -> DateTime<Utc> {
    let first = t
        .date_naive()
        .with_day(1)
        .unwrap_or_else(|| t.date_naive());
    first.and_time(NaiveTime::MIN).and_utc()
}

/// `t` shifted back by `months` calendar months (day-of-month clamped).
pub fn sub_months(t: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    t.checked_sub_months(Months::new(months)).unwrap_or(t)
}

/// Shift a (year, month) pair by `delta` months. `month` is 1-based.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 + delta;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// Number of whole days spanned by `[start, end]`.
pub fn whole_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Human month label, e.g. "January 2026".
pub fn month_label(year: i32, month: u32) -> String {
    let name = match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    };
    format!("{name} {year}")
}

/// Zero-padded period key, e.g. "2026-03".
pub fn period_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
