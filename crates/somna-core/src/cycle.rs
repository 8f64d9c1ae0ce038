use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::WakeTime;

pub const SLEEP_CYCLE_MINUTES: i64 = 90;
pub const SLEEP_ONSET_MINUTES: i64 = 15;
pub const MAX_SLEEP_CYCLES: u32 = 6;
pub const BEDTIME_CYCLE_OPTIONS: [u32; 3] = [4, 5, 6];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepPhase {
    Light,
    Deep,
    Rem,
}

impl SleepPhase {
    /// Order in which phases repeat inside one cycle.
    pub const SEQUENCE: [SleepPhase; 3] = [SleepPhase::Light, SleepPhase::Deep, SleepPhase::Rem];

    pub fn minutes(self) -> i64 {
        match self {
            SleepPhase::Light => 25,
            SleepPhase::Deep => 25,
            SleepPhase::Rem => 40,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepCycle {
    pub cycle_number: u32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub phase: SleepPhase,
    pub duration: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WakeQuality {
    Optimal,
    Good,
    Fair,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartWakeTime {
    pub time: NaiveDateTime,
    pub phase: SleepPhase,
    pub quality: WakeQuality,
    pub minutes_before_target: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedtimeRecommendation {
    pub bedtime: NaiveDateTime,
    pub cycles: u32,
    pub sleep_minutes: i64,
    pub meets_goal: bool,
}

pub fn calculate_sleep_cycles(bedtime: NaiveDateTime, target: NaiveDateTime) -> Vec<SleepCycle> {
    let mut cycles = Vec::new();
    if bedtime >= target {
        return cycles;
    }

    let mut cursor = bedtime + Duration::minutes(SLEEP_ONSET_MINUTES);
    let mut cycle_number = 1;
    while cursor < target && cycle_number <= MAX_SLEEP_CYCLES {
        for phase in SleepPhase::SEQUENCE {
            let end = cursor + Duration::minutes(phase.minutes());
            cycles.push(SleepCycle {
                cycle_number,
                start_time: cursor,
                end_time: end,
                phase,
                duration: phase.minutes(),
            });
            cursor = end;
        }
        cycle_number += 1;
    }

    cycles
}

/// Light-phase ends in `[target - window_minutes, target]`, else REM ends,
/// else the bare target.
pub fn find_smart_wake_times(
    bedtime: NaiveDateTime,
    target: NaiveDateTime,
    window_minutes: i64,
) -> Vec<SmartWakeTime> {
    if bedtime >= target || window_minutes <= 0 {
        return Vec::new();
    }

    let cycles = calculate_sleep_cycles(bedtime, target);
    let window_start = target - Duration::minutes(window_minutes);

    let boundaries = |phase: SleepPhase, quality: WakeQuality| -> Vec<SmartWakeTime> {
        cycles
            .iter()
            .filter(|cycle| cycle.phase == phase)
            .filter(|cycle| cycle.end_time >= window_start && cycle.end_time <= target)
            .map(|cycle| SmartWakeTime {
                time: cycle.end_time,
                phase,
                quality,
                minutes_before_target: (target - cycle.end_time).num_minutes(),
            })
            .collect()
    };

    let mut wake_times = boundaries(SleepPhase::Light, WakeQuality::Optimal);
    if wake_times.is_empty() {
        wake_times = boundaries(SleepPhase::Rem, WakeQuality::Good);
    }
    if wake_times.is_empty() {
        wake_times.push(SmartWakeTime {
            time: target,
            phase: SleepPhase::Light,
            quality: WakeQuality::Fair,
            minutes_before_target: 0,
        });
    }

    wake_times.sort_by_key(|wake| wake.time);
    tracing::debug!(
        candidates = wake_times.len(),
        quality = ?wake_times[0].quality,
        "smart wake search finished"
    );
    wake_times
}

pub fn calculate_recommended_bedtime(
    target: WakeTime,
    sleep_goal: i64,
    now: NaiveDateTime,
) -> Vec<BedtimeRecommendation> {
    let mut wake = now.date().and_time(target.as_naive_time());
    if wake <= now {
        wake += Duration::days(1);
    }

    BEDTIME_CYCLE_OPTIONS
        .iter()
        .map(|&cycles| {
            let sleep_minutes = i64::from(cycles) * SLEEP_CYCLE_MINUTES;
            BedtimeRecommendation {
                bedtime: wake - Duration::minutes(sleep_minutes + SLEEP_ONSET_MINUTES),
                cycles,
                sleep_minutes,
                meets_goal: sleep_minutes >= sleep_goal,
            }
        })
        .collect()
}
