use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use somna_core::calendar::{Calendar, OffsetCalendar};
use somna_core::config::SmartAlarmSettings;
use somna_core::debt::{DEFAULT_SLEEP_GOAL, SleepDebtData, compute_sleep_debt};
use somna_core::quality::{
    DailySleepAnalysis, SleepQualityScore, compute_quality_score, daily_analysis,
};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::sleep_log::SleepLog;
use crate::{SLEEP_DEBT_KEY, SLEEP_SCORE_KEY, SMART_ALARM_KEY};

/// Fetches sessions, runs the pure engines and caches their results.
///
/// Reads never fail: missing or malformed blobs are replaced with fresh
/// defaults and the problem is logged. Cached aggregates are advisory only.
#[derive(Debug)]
pub struct SleepDebtService<S, C = OffsetCalendar> {
    store: Arc<S>,
    log: SleepLog<S>,
    calendar: C,
}

impl<S: KeyValueStore> SleepDebtService<S, OffsetCalendar> {
    pub fn from_config(store: Arc<S>, config: &StoreConfig) -> Self {
        Self::new(store, config.calendar)
    }
}

impl<S: KeyValueStore, C: Calendar> SleepDebtService<S, C> {
    pub fn new(store: Arc<S>, calendar: C) -> Self {
        Self {
            log: SleepLog::new(Arc::clone(&store)),
            store,
            calendar,
        }
    }

    pub fn sleep_log(&self) -> &SleepLog<S> {
        &self.log
    }

    pub async fn calculate_sleep_debt(&self, daily_goal: i64, now: DateTime<Utc>) -> SleepDebtData {
        let sessions = self.log.list().await;
        let data = compute_sleep_debt(&sessions, daily_goal, now, &self.calendar);
        self.cache(SLEEP_DEBT_KEY, &data).await;
        data
    }

    pub async fn load_cached_debt(&self, now: DateTime<Utc>) -> SleepDebtData {
        self.read_or(SLEEP_DEBT_KEY, SleepDebtData::empty(DEFAULT_SLEEP_GOAL, now))
            .await
    }

    pub async fn load_alarm_settings(&self) -> SmartAlarmSettings {
        self.read_or(SMART_ALARM_KEY, SmartAlarmSettings::default())
            .await
    }

    pub async fn save_alarm_settings(&self, settings: &SmartAlarmSettings) -> Result<(), StoreError> {
        let payload = serde_json::to_string(settings)?;
        self.store.set(SMART_ALARM_KEY, payload).await
    }

    pub async fn calculate_quality_score(&self, now: DateTime<Utc>) -> SleepQualityScore {
        let sessions = self.log.list().await;
        let score = compute_quality_score(&sessions, now, &self.calendar);
        self.cache(SLEEP_SCORE_KEY, &score).await;
        score
    }

    pub async fn daily_analysis(&self, days: i64, now: DateTime<Utc>) -> Vec<DailySleepAnalysis> {
        let sessions = self.log.list().await;
        daily_analysis(&sessions, days, now, &self.calendar)
    }

    async fn cache<T: Serialize>(&self, key: &str, value: &T) {
        let result = match serde_json::to_string(value) {
            Ok(payload) => self.store.set(key, payload).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "failed to cache computed result");
        }
    }

    /// Stored fields are laid over `default`, so older blobs missing newer
    /// fields still load.
    async fn read_or<T>(&self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        match self.read_merged(key, &default).await {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to load stored blob, using defaults");
                default
            }
        }
    }

    async fn read_merged<T>(&self, key: &str, default: &T) -> Result<Option<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        let stored: serde_json::Value = serde_json::from_str(&raw)?;
        let merged = match (serde_json::to_value(default)?, stored) {
            (serde_json::Value::Object(mut base), serde_json::Value::Object(fields)) => {
                base.extend(fields);
                serde_json::Value::Object(base)
            }
            (_, other) => other,
        };
        Ok(Some(serde_json::from_value(merged)?))
    }
}
