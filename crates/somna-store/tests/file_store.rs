use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use somna_core::session::NewSleepSession;
use somna_store::{FileStore, KeyValueStore, SleepDebtService, StoreConfig};

#[tokio::test]
async fn values_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested/state.json");

    let store = FileStore::open(&path).await.expect("open");
    store.set("greeting", "hello".into()).await.expect("set");
    store.set("doomed", "bye".into()).await.expect("set");
    store.remove("doomed").await.expect("remove");
    drop(store);

    let reopened = FileStore::open(&path).await.expect("reopen");
    assert_eq!(
        reopened.get("greeting").await.expect("get").as_deref(),
        Some("hello")
    );
    assert_eq!(reopened.get("doomed").await.expect("get"), None);
}

#[tokio::test]
async fn truncated_state_file_is_moved_aside() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");
    let truncated = r#"{"sleep_records":"[{\"id\":\"a\",\"duration\":480}]","@somna_smart_alarm":"{\"enab"#;
    tokio::fs::write(&path, truncated).await.expect("write");

    let store = FileStore::open(&path).await.expect("open");
    assert_eq!(store.get("sleep_records").await.expect("get"), None);

    let backup = dir.path().join("state.json.corrupt");
    let kept = tokio::fs::read_to_string(&backup).await.expect("backup kept");
    assert_eq!(kept, truncated);

    let rewritten = tokio::fs::read_to_string(&path).await.expect("read");
    assert_eq!(rewritten.trim(), "{}");
}

#[tokio::test]
async fn writes_leave_no_staging_file_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");

    let store = FileStore::open(&path).await.expect("open");
    store.set("k", "v".into()).await.expect("set");

    assert!(!dir.path().join("state.json.tmp").exists());
    let raw = tokio::fs::read_to_string(&path).await.expect("read");
    assert!(raw.contains("\"k\": \"v\""));
}

#[tokio::test]
async fn service_runs_against_configured_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_string_lossy().to_string();
    let config = StoreConfig::from_env_with(|k| match k {
        "SOMNA_DATA_DIR" => Some(data_dir.clone()),
        "SOMNA_DAILY_GOAL_MINUTES" => Some("420".into()),
        _ => None,
    })
    .expect("config");

    let store = Arc::new(FileStore::open(config.state_file()).await.expect("open"));
    let service = SleepDebtService::from_config(Arc::clone(&store), &config);

    let now = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
    for days_ago in 0..7 {
        let end = now - Duration::days(days_ago);
        service
            .sleep_log()
            .add(NewSleepSession::new(end - Duration::hours(7), end), end)
            .await
            .expect("add");
    }

    let data = service
        .calculate_sleep_debt(config.daily_goal_minutes, now)
        .await;
    assert_eq!(data.weekly_debt, 0);
    assert_eq!(data.current_debt, 23 * 420);

    let reopened = Arc::new(FileStore::open(config.state_file()).await.expect("reopen"));
    let service = SleepDebtService::from_config(reopened, &config);
    assert_eq!(service.sleep_log().list().await.len(), 7);
    assert_eq!(service.load_cached_debt(now).await, data);
}
