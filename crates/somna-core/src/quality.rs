use chrono::{DateTime, Days, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::advice::Language;
use crate::calendar::Calendar;
use crate::session::SleepSession;

pub const SCORE_WINDOW_DAYS: i64 = 14;
pub const MIN_GOOD_SLEEP: f64 = 420.0;
pub const MAX_GOOD_SLEEP: f64 = 540.0;
pub const OPTIMAL_BEDTIME_HOUR: f64 = 22.0;
pub const STREAK_GOAL_MINUTES: u32 = 420;
const NEUTRAL_COMPONENT: u32 = 15;
const MAX_RECOMMENDATIONS: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub duration: u32,
    pub consistency: u32,
    pub timing: u32,
    pub quality: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.duration + self.consistency + self.timing + self.quality
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Grade::A
        } else if score >= 80 {
            Grade::B
        } else if score >= 70 {
            Grade::C
        } else if score >= 60 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Grade::A => "#4CAF50",
            Grade::B => "#8BC34A",
            Grade::C => "#FFC107",
            Grade::D => "#FF9800",
            Grade::F => "#F44336",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Grade::A => "🌟",
            Grade::B => "😊",
            Grade::C => "😐",
            Grade::D => "😕",
            Grade::F => "😴",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    Duration,
    Consistency,
    Timing,
    Quality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    PerfectDuration,
    ShortDuration,
    ExcellentConsistency,
    IrregularPattern,
    GreatBedtime,
    LateBedtime,
    HighQuality,
    LowQuality,
}

impl Insight {
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            Insight::PerfectDuration
                | Insight::ExcellentConsistency
                | Insight::GreatBedtime
                | Insight::HighQuality
        )
    }

    pub fn category(self) -> ScoreCategory {
        match self {
            Insight::PerfectDuration | Insight::ShortDuration => ScoreCategory::Duration,
            Insight::ExcellentConsistency | Insight::IrregularPattern => ScoreCategory::Consistency,
            Insight::GreatBedtime | Insight::LateBedtime => ScoreCategory::Timing,
            Insight::HighQuality | Insight::LowQuality => ScoreCategory::Quality,
        }
    }

    pub fn title(self, language: Language) -> &'static str {
        match self {
            Insight::PerfectDuration => {
                language.pick("Perfect Sleep Duration!", "ပြည့်စုံသော အိပ်စက်ချိန်!")
            }
            Insight::ShortDuration => language.pick(
                "Sleep Duration Needs Work",
                "အိပ်စက်ချိန် တိုးတက်ရန်လိုသည်",
            ),
            Insight::ExcellentConsistency => language.pick(
                "Excellent Consistency!",
                "အလွန်ကောင်းသော တသမတ်တည်းမှု!",
            ),
            Insight::IrregularPattern => {
                language.pick("Irregular Sleep Pattern", "မပုံမှန်သော အိပ်စက်မှုပုံစံ")
            }
            Insight::GreatBedtime => language.pick(
                "Great Bedtime Habits!",
                "ကောင်းမွန်သော အိပ်ရာဝင်အလေ့အထ!",
            ),
            Insight::LateBedtime => language.pick(
                "Late Bedtime Detected",
                "နောက်ကျသော အိပ်ရာဝင်ချိန် တွေ့ရှိ",
            ),
            Insight::HighQuality => {
                language.pick("High Quality Sleep!", "အရည်အသွေးမြင့် အိပ်စက်မှု!")
            }
            Insight::LowQuality => language.pick(
                "Sleep Quality Could Improve",
                "အိပ်စက်မှုအရည်အသွေး တိုးတက်နိုင်သည်",
            ),
        }
    }

    pub fn message(self, language: Language) -> &'static str {
        match self {
            Insight::PerfectDuration => language.pick(
                "You're getting the ideal 7-9 hours of sleep.",
                "သင် အကောင်းဆုံး ၇-၉ နာရီ အိပ်စက်နေပါသည်။",
            ),
            Insight::ShortDuration => language.pick(
                "Try to get closer to 7-8 hours each night.",
                "ညတိုင်း ၇-၈ နာရီ အိပ်စက်ရန် ကြိုးစားပါ။",
            ),
            Insight::ExcellentConsistency => language.pick(
                "Your sleep schedule is very regular.",
                "သင့် အိပ်စက်မှုအချိန်ဇယား အလွန်ပုံမှန်ပါသည်။",
            ),
            Insight::IrregularPattern => language.pick(
                "Try to sleep and wake at similar times daily.",
                "နေ့တိုင်း အချိန်တူတူ အိပ်ပြီး နိုးရန် ကြိုးစားပါ။",
            ),
            Insight::GreatBedtime => language.pick(
                "You're going to bed at optimal times.",
                "သင် အကောင်းဆုံးအချိန်တွင် အိပ်ရာဝင်နေပါသည်။",
            ),
            Insight::LateBedtime => language.pick(
                "Consider going to bed earlier, around 10-11 PM.",
                "ည ၁၀-၁၁ နာရီဝန်းကျင် စောစောအိပ်ရန် စဉ်းစားပါ။",
            ),
            Insight::HighQuality => language.pick(
                "You're reporting excellent sleep quality.",
                "သင် အလွန်ကောင်းသော အိပ်စက်မှုအရည်အသွေး မှတ်တမ်းတင်နေပါသည်။",
            ),
            Insight::LowQuality => language.pick(
                "Consider factors like room temperature, noise, and screen time.",
                "အခန်းအပူချိန်၊ ဆူညံသံ၊ ဖန်သားပြင်ကြည့်ချိန် စသည်တို့ကို စဉ်းစားပါ။",
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseSleepTime,
    AvoidOversleeping,
    SetSleepSchedule,
    EarlierBedtime,
    ImproveEnvironment,
    StayHydrated,
}

impl Recommendation {
    pub fn priority(self) -> Priority {
        match self {
            Recommendation::IncreaseSleepTime | Recommendation::SetSleepSchedule => Priority::High,
            Recommendation::AvoidOversleeping
            | Recommendation::EarlierBedtime
            | Recommendation::ImproveEnvironment => Priority::Medium,
            Recommendation::StayHydrated => Priority::Low,
        }
    }

    pub fn title(self, language: Language) -> &'static str {
        match self {
            Recommendation::IncreaseSleepTime => {
                language.pick("Increase Sleep Time", "အိပ်စက်ချိန် တိုးပါ")
            }
            Recommendation::AvoidOversleeping => {
                language.pick("Avoid Oversleeping", "အိပ်လွန်ခြင်း ရှောင်ပါ")
            }
            Recommendation::SetSleepSchedule => {
                language.pick("Set a Sleep Schedule", "အိပ်စက်မှုအချိန်ဇယား သတ်မှတ်ပါ")
            }
            Recommendation::EarlierBedtime => language.pick("Earlier Bedtime", "စောစောအိပ်ရာဝင်ပါ"),
            Recommendation::ImproveEnvironment => language.pick(
                "Improve Sleep Environment",
                "အိပ်စက်မှုပတ်ဝန်းကျင် တိုးတက်စေပါ",
            ),
            Recommendation::StayHydrated => language.pick("Stay Hydrated", "ရေဓာတ်ထိန်းပါ"),
        }
    }

    pub fn description(self, language: Language) -> &'static str {
        match self {
            Recommendation::IncreaseSleepTime => language.pick(
                "Try going to bed 30 minutes earlier each night.",
                "ညတိုင်း ၃၀ မိနစ် စောစောအိပ်ရန် ကြိုးစားပါ။",
            ),
            Recommendation::AvoidOversleeping => language.pick(
                "More than 9 hours can leave you feeling groggy.",
                "၉ နာရီထက်ပိုအိပ်ခြင်းသည် ပင်ပန်းနွမ်းနယ်စေနိုင်သည်။",
            ),
            Recommendation::SetSleepSchedule => language.pick(
                "Go to bed and wake up at the same time every day, even weekends.",
                "စနေ/တနင်္ဂနွေပါ အပါအဝင် နေ့တိုင်း အချိန်တူတူ အိပ်ပြီး နိုးပါ။",
            ),
            Recommendation::EarlierBedtime => language.pick(
                "Aim for 10-11 PM bedtime for optimal circadian rhythm.",
                "အကောင်းဆုံး circadian rhythm အတွက် ည ၁၀-၁၁ နာရီ အိပ်ရာဝင်ပါ။",
            ),
            Recommendation::ImproveEnvironment => language.pick(
                "Keep your room cool, dark, and quiet. Avoid screens 1 hour before bed.",
                "အခန်းကို အေး၊ မှောင်၊ တိတ်ဆိတ်အောင် ထားပါ။ အိပ်ရာမဝင်မီ ၁ နာရီ ဖန်သားပြင် ရှောင်ပါ။",
            ),
            Recommendation::StayHydrated => language.pick(
                "Drink water throughout the day, but reduce intake 2 hours before bed.",
                "တစ်နေ့တာလုံး ရေသောက်ပါ၊ သို့သော် အိပ်ရာမဝင်မီ ၂ နာရီ လျှော့ပါ။",
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepQualityScore {
    pub total_score: u32,
    pub grade: Grade,
    pub breakdown: ScoreBreakdown,
    pub trend: Trend,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub streak_days: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySleepAnalysis {
    pub date: NaiveDate,
    pub score: u32,
    pub duration: u32,
    pub bedtime: String,
    pub wake_time: String,
    pub quality: Option<u8>,
}

// Trend and streak look at the full session list, not the 14-day window.
pub fn compute_quality_score(
    sessions: &[SleepSession],
    now: DateTime<Utc>,
    calendar: &impl Calendar,
) -> SleepQualityScore {
    let cutoff = now - Duration::days(SCORE_WINDOW_DAYS);
    let recent: Vec<&SleepSession> = sessions.iter().filter(|s| s.created_at >= cutoff).collect();

    let average = mean(recent.iter().map(|s| f64::from(s.duration)));
    let breakdown = ScoreBreakdown {
        duration: duration_points(average).round() as u32,
        consistency: consistency_points(&recent),
        timing: timing_points(&recent, calendar),
        quality: quality_points(&recent),
    };
    let total_score = breakdown.total();

    SleepQualityScore {
        total_score,
        grade: Grade::from_score(total_score),
        breakdown,
        trend: trend(sessions),
        insights: insights(&breakdown),
        recommendations: recommendations(&breakdown, average),
        streak_days: streak(sessions, now, calendar),
        last_updated: now,
    }
}

pub fn daily_analysis(
    sessions: &[SleepSession],
    days: i64,
    now: DateTime<Utc>,
    calendar: &impl Calendar,
) -> Vec<DailySleepAnalysis> {
    let cutoff = now - Duration::days(days);
    let mut analysis: Vec<DailySleepAnalysis> = sessions
        .iter()
        .filter(|s| s.created_at >= cutoff)
        .map(|s| {
            let quality_part = s
                .quality
                .map_or(f64::from(NEUTRAL_COMPONENT), |q| f64::from(q) / 5.0 * 25.0);
            DailySleepAnalysis {
                date: calendar.day_of(s.created_at),
                score: ((duration_points(f64::from(s.duration)) + quality_part) * 2.0).round()
                    as u32,
                duration: s.duration,
                bedtime: calendar.localize(s.start_time).format("%H:%M").to_string(),
                wake_time: calendar.localize(s.end_time).format("%H:%M").to_string(),
                quality: s.quality,
            }
        })
        .collect();
    analysis.sort_by_key(|day| day.date);
    analysis
}

fn duration_points(average_minutes: f64) -> f64 {
    if (MIN_GOOD_SLEEP..=MAX_GOOD_SLEEP).contains(&average_minutes) {
        return 25.0;
    }
    let deviation = if average_minutes < MIN_GOOD_SLEEP {
        MIN_GOOD_SLEEP - average_minutes
    } else {
        average_minutes - MAX_GOOD_SLEEP
    };
    let penalty = (deviation / 60.0).min(1.0) * 15.0;
    (25.0 - penalty).max(0.0)
}

fn consistency_points(sessions: &[&SleepSession]) -> u32 {
    if sessions.len() < 3 {
        return NEUTRAL_COMPONENT;
    }
    let durations: Vec<f64> = sessions.iter().map(|s| f64::from(s.duration)).collect();
    let average = mean(durations.iter().copied());
    let variance = mean(durations.iter().map(|d| (d - average).powi(2)));
    (25.0 - variance.sqrt() / 120.0 * 25.0).max(0.0).round() as u32
}

fn timing_points(sessions: &[&SleepSession], calendar: &impl Calendar) -> u32 {
    if sessions.len() < 2 {
        return NEUTRAL_COMPONENT;
    }
    let deviation = mean(sessions.iter().map(|s| {
        let start = calendar.localize(s.start_time);
        let hour = f64::from(start.hour()) + f64::from(start.minute()) / 60.0;
        // Early-morning bedtimes belong to the previous evening.
        let hour = if hour < 12.0 { hour + 24.0 } else { hour };
        (hour - OPTIMAL_BEDTIME_HOUR).abs()
    }));
    (25.0 - deviation / 4.0 * 25.0).max(0.0).round() as u32
}

fn quality_points(sessions: &[&SleepSession]) -> u32 {
    let ratings: Vec<f64> = sessions
        .iter()
        .filter_map(|s| s.quality)
        .map(f64::from)
        .collect();
    if ratings.is_empty() {
        return NEUTRAL_COMPONENT;
    }
    (mean(ratings.into_iter()) / 5.0 * 25.0).round() as u32
}

fn newest_first(sessions: &[SleepSession]) -> Vec<&SleepSession> {
    let mut sorted: Vec<&SleepSession> = sessions.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

fn trend(sessions: &[SleepSession]) -> Trend {
    if sessions.len() < 10 {
        return Trend::Stable;
    }
    let sorted = newest_first(sessions);
    let recent = &sorted[..7];
    let previous = &sorted[7..sorted.len().min(14)];
    if previous.len() < 3 {
        return Trend::Stable;
    }

    let recent_avg = mean(recent.iter().map(|s| f64::from(s.duration)));
    let previous_avg = mean(previous.iter().map(|s| f64::from(s.duration)));
    let diff = recent_avg - previous_avg;
    if diff > 15.0 {
        Trend::Improving
    } else if diff < -15.0 {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn streak(sessions: &[SleepSession], now: DateTime<Utc>, calendar: &impl Calendar) -> u32 {
    let today = calendar.day_of(now);
    let mut streak = 0;
    for (offset, session) in newest_first(sessions).into_iter().enumerate() {
        let expected = today.checked_sub_days(Days::new(offset as u64));
        if Some(calendar.day_of(session.created_at)) != expected
            || session.duration < STREAK_GOAL_MINUTES
        {
            break;
        }
        streak += 1;
    }
    streak
}

fn insights(breakdown: &ScoreBreakdown) -> Vec<Insight> {
    let mut insights = Vec::new();
    if breakdown.duration >= 23 {
        insights.push(Insight::PerfectDuration);
    } else if breakdown.duration < 15 {
        insights.push(Insight::ShortDuration);
    }
    if breakdown.consistency >= 22 {
        insights.push(Insight::ExcellentConsistency);
    } else if breakdown.consistency < 12 {
        insights.push(Insight::IrregularPattern);
    }
    if breakdown.timing >= 20 {
        insights.push(Insight::GreatBedtime);
    } else if breakdown.timing < 10 {
        insights.push(Insight::LateBedtime);
    }
    if breakdown.quality >= 22 {
        insights.push(Insight::HighQuality);
    } else if breakdown.quality < 12 {
        insights.push(Insight::LowQuality);
    }
    insights
}

fn recommendations(breakdown: &ScoreBreakdown, average_minutes: f64) -> Vec<Recommendation> {
    let mut picks = Vec::new();
    if breakdown.duration < 20 {
        picks.push(if average_minutes < MIN_GOOD_SLEEP {
            Recommendation::IncreaseSleepTime
        } else {
            Recommendation::AvoidOversleeping
        });
    }
    if breakdown.consistency < 18 {
        picks.push(Recommendation::SetSleepSchedule);
    }
    if breakdown.timing < 15 {
        picks.push(Recommendation::EarlierBedtime);
    }
    if breakdown.quality < 18 {
        picks.push(Recommendation::ImproveEnvironment);
    }
    if picks.len() < 2 {
        picks.push(Recommendation::StayHydrated);
    }
    picks.truncate(MAX_RECOMMENDATIONS);
    picks
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
