use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::session::SleepSession;

pub const DEFAULT_SLEEP_GOAL: i64 = 480;
pub const DEBT_LOOKBACK_DAYS: u64 = 30;
pub const TRAILING_WEEK_DAYS: u64 = 7;
pub const RECOVERY_PLAN_DAYS: u64 = 7;
pub const WEEKDAY_RECOVERY_CAP: i64 = 30;
pub const WEEKEND_RECOVERY_CAP: i64 = 60;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtHistoryEntry {
    pub date: NaiveDate,
    pub expected: i64,
    pub actual: i64,
    /// Positive is a deficit, negative a surplus.
    pub debt: i64,
    pub cumulative_debt: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub recommended_sleep: i64,
    pub extra_sleep: i64,
    pub is_weekend: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepDebtData {
    pub current_debt: i64,
    pub weekly_debt: i64,
    pub monthly_debt: i64,
    pub daily_goal: i64,
    pub recovery_plan: Vec<RecoveryDay>,
    pub debt_history: Vec<DebtHistoryEntry>,
    pub last_updated: DateTime<Utc>,
}

impl SleepDebtData {
    pub fn empty(daily_goal: i64, now: DateTime<Utc>) -> Self {
        Self {
            current_debt: 0,
            weekly_debt: 0,
            monthly_debt: 0,
            daily_goal,
            recovery_plan: Vec::new(),
            debt_history: Vec::new(),
            last_updated: now,
        }
    }
}

pub fn compute_sleep_debt(
    sessions: &[SleepSession],
    daily_goal: i64,
    now: DateTime<Utc>,
    calendar: &impl Calendar,
) -> SleepDebtData {
    let today = calendar.day_of(now);
    let by_day = actual_sleep_by_day(sessions, now, calendar);

    let mut debt_history = Vec::new();
    let mut cumulative_debt = 0i64;

    for days_ago in (0..DEBT_LOOKBACK_DAYS).rev() {
        let Some(date) = today.checked_sub_days(Days::new(days_ago)) else {
            continue;
        };
        let actual = by_day.get(&date).copied().unwrap_or(0);
        let debt = daily_goal - actual;
        cumulative_debt += debt;

        if actual > 0 || days_ago < TRAILING_WEEK_DAYS {
            debt_history.push(DebtHistoryEntry {
                date,
                expected: daily_goal,
                actual,
                debt,
                cumulative_debt,
            });
        }
    }

    // Last seven emitted entries, which equal the last seven calendar days
    // only while the trailing week is never filtered out.
    let trailing_start = debt_history
        .len()
        .saturating_sub(TRAILING_WEEK_DAYS as usize);
    let weekly_debt = debt_history[trailing_start..]
        .iter()
        .map(|entry| entry.debt)
        .sum();
    let monthly_debt = debt_history.iter().map(|entry| entry.debt).sum();

    tracing::debug!(
        sessions = sessions.len(),
        days_with_sleep = by_day.len(),
        current_debt = cumulative_debt,
        "computed sleep debt"
    );

    SleepDebtData {
        current_debt: cumulative_debt,
        weekly_debt,
        monthly_debt,
        daily_goal,
        recovery_plan: generate_recovery_plan(cumulative_debt, daily_goal, today),
        debt_history,
        last_updated: now,
    }
}

pub fn generate_recovery_plan(debt: i64, daily_goal: i64, today: NaiveDate) -> Vec<RecoveryDay> {
    let mut remaining = debt.max(0);

    (0..RECOVERY_PLAN_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| {
            let is_weekend = is_weekend(date.weekday());
            let cap = if is_weekend {
                WEEKEND_RECOVERY_CAP
            } else {
                WEEKDAY_RECOVERY_CAP
            };
            let extra_sleep = cap.min(remaining);
            remaining -= extra_sleep;

            RecoveryDay {
                date,
                day_name: date.format("%a").to_string(),
                recommended_sleep: daily_goal + extra_sleep,
                extra_sleep,
                is_weekend,
            }
        })
        .collect()
}

fn actual_sleep_by_day(
    sessions: &[SleepSession],
    now: DateTime<Utc>,
    calendar: &impl Calendar,
) -> BTreeMap<NaiveDate, i64> {
    let cutoff = now - Duration::days(DEBT_LOOKBACK_DAYS as i64);
    let mut by_day = BTreeMap::new();
    for session in sessions.iter().filter(|s| s.created_at >= cutoff) {
        let entry = by_day.entry(calendar.day_of(session.created_at)).or_insert(0i64);
        *entry += i64::from(session.duration);
    }
    by_day
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}
