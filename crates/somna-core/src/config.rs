use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Wall-clock time of day in 24-hour form, stored as `"HH:MM"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WakeTime {
    hour: u8,
    minute: u8,
}

impl WakeTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, CoreError> {
        if hour > 23 || minute > 59 {
            return Err(CoreError::InvalidWakeTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for WakeTime {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidWakeTime(value.to_string());
        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for WakeTime {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WakeTime> for String {
    fn from(value: WakeTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WakeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmartAlarmSettings {
    pub enabled: bool,
    pub target_wake_time: WakeTime,
    pub window_minutes: u32,
    /// Indexed Sunday through Saturday.
    pub days_enabled: [bool; 7],
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub gradual_volume: bool,
    pub snooze_minutes: u32,
    pub smart_wake_enabled: bool,
}

impl SmartAlarmSettings {
    pub fn is_enabled_on(&self, weekday: Weekday) -> bool {
        self.days_enabled[weekday.num_days_from_sunday() as usize]
    }

    pub fn next_alarm(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.enabled {
            return None;
        }
        let time = self.target_wake_time.as_naive_time();
        (0..=7u64)
            .filter_map(|offset| now.date().checked_add_days(Days::new(offset)))
            .map(|date| date.and_time(time))
            .find(|candidate| *candidate > now && self.is_enabled_on(candidate.weekday()))
    }
}

impl Default for SmartAlarmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            target_wake_time: WakeTime { hour: 7, minute: 0 },
            window_minutes: 30,
            days_enabled: [false, true, true, true, true, true, false],
            sound_enabled: true,
            vibration_enabled: true,
            gradual_volume: true,
            snooze_minutes: 9,
            smart_wake_enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlarmSound {
    pub id: &'static str,
    pub name: &'static str,
    pub name_my: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinuteOption {
    pub value: u32,
    pub label: &'static str,
    pub label_my: &'static str,
}

pub const ALARM_SOUNDS: [AlarmSound; 5] = [
    AlarmSound { id: "gentle", name: "Gentle Wake", name_my: "ဖြည်းဖြည်းနိုး" },
    AlarmSound { id: "birds", name: "Bird Song", name_my: "ငှက်သံ" },
    AlarmSound { id: "chimes", name: "Wind Chimes", name_my: "လေခေါင်းလောင်း" },
    AlarmSound { id: "ocean", name: "Ocean Waves", name_my: "ပင်လယ်လှိုင်း" },
    AlarmSound { id: "classic", name: "Classic Alarm", name_my: "ရိုးရာနိုးစက်" },
];

pub const SNOOZE_OPTIONS: [MinuteOption; 4] = [
    MinuteOption { value: 5, label: "5 min", label_my: "၅ မိနစ်" },
    MinuteOption { value: 9, label: "9 min", label_my: "၉ မိနစ်" },
    MinuteOption { value: 10, label: "10 min", label_my: "၁၀ မိနစ်" },
    MinuteOption { value: 15, label: "15 min", label_my: "၁၅ မိနစ်" },
];

pub const WINDOW_OPTIONS: [MinuteOption; 3] = [
    MinuteOption { value: 15, label: "15 min", label_my: "၁၅ မိနစ်" },
    MinuteOption { value: 30, label: "30 min", label_my: "၃၀ မိနစ်" },
    MinuteOption { value: 45, label: "45 min", label_my: "၄၅ မိနစ်" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn wake_time_parses_and_prints_hh_mm() {
        let time: WakeTime = "6:05".parse().expect("valid time");
        assert_eq!((time.hour(), time.minute()), (6, 5));
        assert_eq!(time.to_string(), "06:05");

        for bad in ["24:00", "07:60", "0700", "7:5", "ab:cd", ""] {
            assert!(bad.parse::<WakeTime>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn partial_blob_merges_over_defaults() {
        let settings: SmartAlarmSettings =
            serde_json::from_str(r#"{"enabled":true,"targetWakeTime":"06:30"}"#)
                .expect("partial settings");
        assert!(settings.enabled);
        assert_eq!(settings.target_wake_time, WakeTime::new(6, 30).unwrap());
        assert_eq!(settings.window_minutes, 30);
        assert_eq!(settings.snooze_minutes, 9);
    }

    #[test]
    fn days_enabled_must_have_seven_entries() {
        let result = serde_json::from_str::<SmartAlarmSettings>(
            r#"{"daysEnabled":[true,true,true]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn next_alarm_skips_disabled_weekdays() {
        let settings = SmartAlarmSettings {
            enabled: true,
            ..SmartAlarmSettings::default()
        };
        // Friday 2026-10-16 at 08:00, after the 07:00 alarm.
        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let next = settings.next_alarm(now).expect("monday alarm");
        assert_eq!(next.date(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(next.weekday(), Weekday::Mon);
    }

    #[test]
    fn disabled_alarm_never_rings() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        assert_eq!(SmartAlarmSettings::default().next_alarm(now), None);

        let settings = SmartAlarmSettings {
            enabled: true,
            days_enabled: [false; 7],
            ..SmartAlarmSettings::default()
        };
        assert_eq!(settings.next_alarm(now), None);
    }
}
