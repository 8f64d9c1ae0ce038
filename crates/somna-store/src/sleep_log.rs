use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use somna_core::session::{NewSleepSession, SleepSession, validate_notes};

use crate::SLEEP_RECORDS_KEY;
use crate::error::StoreError;
use crate::kv::KeyValueStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySleepStats {
    pub average: f64,
    pub total: u32,
    pub nights: usize,
}

/// Append-mostly list of sleep sessions kept under a single key.
#[derive(Debug)]
pub struct SleepLog<S> {
    store: Arc<S>,
}

impl<S> Clone for SleepLog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> SleepLog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All sessions; unreadable storage is logged and treated as empty.
    pub async fn list(&self) -> Vec<SleepSession> {
        match self.load().await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read sleep records, using empty list");
                Vec::new()
            }
        }
    }

    pub async fn add(
        &self,
        input: NewSleepSession,
        now: DateTime<Utc>,
    ) -> Result<SleepSession, StoreError> {
        let session = input.into_session(uuid::Uuid::new_v4().to_string(), now)?;
        let mut sessions = self.load().await?;
        sessions.push(session.clone());
        self.persist(&sessions).await?;
        tracing::debug!(id = %session.id, duration = session.duration, "sleep session added");
        Ok(session)
    }

    pub async fn rate(&self, id: &str, quality: u8) -> Result<SleepSession, StoreError> {
        self.modify(id, |session| session.rate(quality).map_err(StoreError::from))
            .await
    }

    pub async fn update_notes(
        &self,
        id: &str,
        notes: Option<String>,
    ) -> Result<SleepSession, StoreError> {
        validate_notes(notes.as_deref())?;
        self.modify(id, move |session| {
            session.notes = notes;
            Ok(())
        })
        .await
    }

    /// Returns whether a session with `id` existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut sessions = self.load().await?;
        let before = sessions.len();
        sessions.retain(|session| session.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.persist(&sessions).await?;
        Ok(true)
    }

    pub async fn weekly_stats(&self, now: DateTime<Utc>) -> WeeklySleepStats {
        let week_ago = now - Duration::days(7);
        let durations: Vec<u32> = self
            .list()
            .await
            .into_iter()
            .filter(|session| session.created_at >= week_ago)
            .map(|session| session.duration)
            .collect();

        let total = durations.iter().fold(0u32, |acc, d| acc.saturating_add(*d));
        let nights = durations.len();
        WeeklySleepStats {
            average: if nights == 0 {
                0.0
            } else {
                f64::from(total) / nights as f64
            },
            total,
            nights,
        }
    }

    async fn modify<F>(&self, id: &str, change: F) -> Result<SleepSession, StoreError>
    where
        F: FnOnce(&mut SleepSession) -> Result<(), StoreError>,
    {
        let mut sessions = self.load().await?;
        let session = sessions
            .iter_mut()
            .find(|session| session.id == id)
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;
        change(session)?;
        let updated = session.clone();
        self.persist(&sessions).await?;
        Ok(updated)
    }

    async fn load(&self) -> Result<Vec<SleepSession>, StoreError> {
        match self.store.get(SLEEP_RECORDS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, sessions: &[SleepSession]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(sessions)?;
        self.store.set(SLEEP_RECORDS_KEY, payload).await
    }
}
