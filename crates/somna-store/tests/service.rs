use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use somna_core::calendar::UtcCalendar;
use somna_core::config::{SmartAlarmSettings, WakeTime};
use somna_core::debt::SleepDebtData;
use somna_core::session::NewSleepSession;
use somna_store::{
    KeyValueStore, MemoryStore, SLEEP_DEBT_KEY, SLEEP_RECORDS_KEY, SLEEP_SCORE_KEY,
    SMART_ALARM_KEY, SleepDebtService, StoreError,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap()
}

/// Every call fails, as a broken storage backend would.
struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk gone")))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk gone")))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk gone")))
    }
}

#[tokio::test]
async fn debt_is_computed_from_logged_sessions_and_cached() {
    let store = Arc::new(MemoryStore::new());
    let service = SleepDebtService::new(Arc::clone(&store), UtcCalendar);

    let logged = now() - Duration::days(1);
    service
        .sleep_log()
        .add(NewSleepSession::new(logged - Duration::hours(7), logged), logged)
        .await
        .expect("add");

    let data = service.calculate_sleep_debt(480, now()).await;
    assert_eq!(data.current_debt, 13_980);
    assert_eq!(data.recovery_plan.len(), 7);

    let raw = store.get(SLEEP_DEBT_KEY).await.expect("get").expect("cached");
    let cached: SleepDebtData = serde_json::from_str(&raw).expect("cached json");
    assert_eq!(cached, data);
    assert_eq!(service.load_cached_debt(now()).await, data);
}

#[tokio::test]
async fn repeated_calculation_only_differs_in_timestamp() {
    let service = SleepDebtService::new(Arc::new(MemoryStore::new()), UtcCalendar);
    let first = service.calculate_sleep_debt(450, now()).await;
    let later = now() + Duration::seconds(5);
    let second = service.calculate_sleep_debt(450, later).await;

    assert_eq!(second.last_updated, later);
    assert_eq!(
        SleepDebtData {
            last_updated: first.last_updated,
            ..second
        },
        first
    );
}

#[tokio::test]
async fn missing_or_malformed_cache_yields_empty_aggregate() {
    let store = Arc::new(MemoryStore::new());
    let service = SleepDebtService::new(Arc::clone(&store), UtcCalendar);

    let empty = service.load_cached_debt(now()).await;
    assert_eq!(empty, SleepDebtData::empty(480, now()));

    store
        .set(SLEEP_DEBT_KEY, "{not json".into())
        .await
        .expect("set");
    assert_eq!(service.load_cached_debt(now()).await, empty);

    store
        .set(SLEEP_DEBT_KEY, r#"{"currentDebt":90,"dailyGoal":450}"#.into())
        .await
        .expect("set");
    let partial = service.load_cached_debt(now()).await;
    assert_eq!(partial.current_debt, 90);
    assert_eq!(partial.daily_goal, 450);
    assert!(partial.recovery_plan.is_empty());
}

#[tokio::test]
async fn malformed_session_blob_counts_as_no_data() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(SLEEP_RECORDS_KEY, "[{\"id\": 1}]".into())
        .await
        .expect("set");
    let service = SleepDebtService::new(Arc::clone(&store), UtcCalendar);

    let data = service.calculate_sleep_debt(480, now()).await;
    assert_eq!(data.current_debt, 30 * 480);
}

#[tokio::test]
async fn broken_storage_never_surfaces_from_reads() {
    let service = SleepDebtService::new(Arc::new(BrokenStore), UtcCalendar);

    let data = service.calculate_sleep_debt(480, now()).await;
    assert_eq!(data.current_debt, 30 * 480);
    assert_eq!(service.load_cached_debt(now()).await.current_debt, 0);
    assert_eq!(service.load_alarm_settings().await, SmartAlarmSettings::default());

    let err = service
        .save_alarm_settings(&SmartAlarmSettings::default())
        .await
        .expect_err("writes still report failure");
    assert!(matches!(err, StoreError::Io(_)));
}

#[tokio::test]
async fn alarm_settings_round_trip_and_fall_back() {
    let store = Arc::new(MemoryStore::new());
    let service = SleepDebtService::new(Arc::clone(&store), UtcCalendar);
    assert_eq!(service.load_alarm_settings().await, SmartAlarmSettings::default());

    let settings = SmartAlarmSettings {
        enabled: true,
        target_wake_time: WakeTime::new(6, 15).expect("valid"),
        window_minutes: 45,
        days_enabled: [true; 7],
        ..SmartAlarmSettings::default()
    };
    service.save_alarm_settings(&settings).await.expect("save");
    assert_eq!(service.load_alarm_settings().await, settings);

    store
        .set(SMART_ALARM_KEY, r#"{"targetWakeTime":"25:99"}"#.into())
        .await
        .expect("set");
    assert_eq!(service.load_alarm_settings().await, SmartAlarmSettings::default());

    store
        .set(SMART_ALARM_KEY, r#"{"snoozeMinutes":15}"#.into())
        .await
        .expect("set");
    let merged = service.load_alarm_settings().await;
    assert_eq!(merged.snooze_minutes, 15);
    assert_eq!(merged.window_minutes, 30);
}

#[tokio::test]
async fn quality_score_is_cached() {
    let store = Arc::new(MemoryStore::new());
    let service = SleepDebtService::new(Arc::clone(&store), UtcCalendar);
    let end = now() - Duration::hours(12);
    let mut night = NewSleepSession::new(end - Duration::hours(8), end);
    night.quality = Some(5);
    service.sleep_log().add(night, end).await.expect("add");

    let score = service.calculate_quality_score(now()).await;
    assert_eq!(score.breakdown.duration, 25);
    assert_eq!(score.breakdown.quality, 25);
    assert_eq!(score.streak_days, 1);
    assert!(store.get(SLEEP_SCORE_KEY).await.expect("get").is_some());

    let days = service.daily_analysis(7, now()).await;
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].score, 100);
}
