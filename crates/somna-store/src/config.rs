use std::path::{Path, PathBuf};

use somna_core::calendar::OffsetCalendar;
use somna_core::debt::DEFAULT_SLEEP_GOAL;

use crate::error::StoreError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub daily_goal_minutes: i64,
    pub calendar: OffsetCalendar,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, StoreError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let data_dir = match get("SOMNA_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(get("XDG_DATA_HOME"), get("HOME")),
        };

        let daily_goal_minutes = match get("SOMNA_DAILY_GOAL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| {
                    StoreError::Config(format!("SOMNA_DAILY_GOAL_MINUTES invalid: {raw}"))
                })?,
            None => DEFAULT_SLEEP_GOAL,
        };

        let offset_minutes = match get("SOMNA_CALENDAR_OFFSET_MINUTES") {
            Some(raw) => raw.trim().parse::<i32>().map_err(|_| {
                StoreError::Config(format!("SOMNA_CALENDAR_OFFSET_MINUTES invalid: {raw}"))
            })?,
            None => 0,
        };
        let calendar = OffsetCalendar::from_minutes(offset_minutes).ok_or_else(|| {
            StoreError::Config(format!(
                "SOMNA_CALENDAR_OFFSET_MINUTES out of range: {offset_minutes}"
            ))
        })?;

        Ok(Self {
            data_dir,
            daily_goal_minutes,
            calendar,
        })
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }
}

fn default_data_dir(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(xdg) = xdg_data_home {
        return PathBuf::from(xdg).join("somna");
    }

    let home = home.unwrap_or_else(|| ".".to_string());
    Path::new(&home).join(".local/share/somna")
}
