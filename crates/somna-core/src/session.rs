use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MAX_NOTES_CHARS: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SleepSession {
    pub fn new(
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            duration: minutes_between(start_time, end_time),
            quality: None,
            notes: None,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.end_time <= self.start_time {
            return Err(CoreError::InvalidSessionRange(self.id.clone()));
        }
        if let Some(quality) = self.quality {
            validate_quality(quality)?;
        }
        validate_notes(self.notes.as_deref())
    }

    pub fn rate(&mut self, quality: u8) -> Result<(), CoreError> {
        validate_quality(quality)?;
        self.quality = Some(quality);
        Ok(())
    }
}

/// Writer-side input; the store assigns `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSleepSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSleepSession {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            quality: None,
            notes: None,
        }
    }

    pub fn into_session(
        self,
        id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<SleepSession, CoreError> {
        let mut session = SleepSession::new(id, self.start_time, self.end_time, created_at);
        session.quality = self.quality;
        session.notes = self.notes;
        session.validate()?;
        Ok(session)
    }
}

pub fn validate_quality(quality: u8) -> Result<(), CoreError> {
    if (1..=5).contains(&quality) {
        Ok(())
    } else {
        Err(CoreError::InvalidQuality(quality))
    }
}

pub fn validate_notes(notes: Option<&str>) -> Result<(), CoreError> {
    match notes {
        Some(text) if text.chars().count() > MAX_NOTES_CHARS => Err(CoreError::NotesTooLong),
        _ => Ok(()),
    }
}

fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let seconds = (end - start).num_seconds().max(0);
    u32::try_from(seconds.saturating_add(30) / 60).unwrap_or(u32::MAX)
}
