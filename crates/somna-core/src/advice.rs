use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Burmese,
}

impl Language {
    pub fn pick(self, english: &'static str, burmese: &'static str) -> &'static str {
        match self {
            Language::English => english,
            Language::Burmese => burmese,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warning,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtStatus {
    pub message: String,
    pub severity: Severity,
}

const SLIGHT_DEBT_LIMIT: i64 = 120;
const MODERATE_DEBT_LIMIT: i64 = 300;

pub fn debt_status(current_debt: i64, language: Language) -> DebtStatus {
    let (message, severity) = if current_debt <= 0 {
        (
            language.pick(
                "Sleep surplus! You're well-rested! 🎉",
                "အိပ်စက်မှုပြည့်ဝပါသည်! 🎉",
            ),
            Severity::Good,
        )
    } else if current_debt <= SLIGHT_DEBT_LIMIT {
        (
            language.pick(
                "Slight sleep debt - easily recoverable",
                "အနည်းငယ်အိပ်ရေးပျက်နေသည်",
            ),
            Severity::Good,
        )
    } else if current_debt <= MODERATE_DEBT_LIMIT {
        (
            language.pick(
                "Moderate sleep debt - needs recovery",
                "အိပ်ရေးပျက်နေသည် - ပြန်လည်ကောင်းမွန်ရန်လိုသည်",
            ),
            Severity::Warning,
        )
    } else {
        (
            language.pick(
                "Significant sleep debt - prioritize recovery",
                "အိပ်ရေးအလွန်ပျက်နေသည် - ဦးစားပေးပြန်လည်ကောင်းမွန်ပါ",
            ),
            Severity::Danger,
        )
    };

    DebtStatus {
        message: message.to_string(),
        severity,
    }
}

// Sign is dropped; callers show surplus separately.
pub fn format_duration(minutes: i64, language: Language) -> String {
    let total = minutes.unsigned_abs();
    let hours = total / 60;
    let mins = total % 60;

    if hours == 0 {
        format!("{mins} {}", language.pick("min", "မိနစ်"))
    } else if mins == 0 {
        format!("{hours} {}", language.pick("hr", "နာရီ"))
    } else {
        format!(
            "{hours}{} {mins}{}",
            language.pick("h", "နာရီ"),
            language.pick("m", "မိနစ်")
        )
    }
}

pub fn localized_day_name(short_name: &str, language: Language) -> String {
    if language == Language::English {
        return short_name.to_string();
    }
    let localized = match short_name {
        "Sun" => "တနင်္ဂနွေ",
        "Mon" => "တနင်္လာ",
        "Tue" => "အင်္ဂါ",
        "Wed" => "ဗုဒ္ဓဟူး",
        "Thu" => "ကြာသပတေး",
        "Fri" => "သောကြာ",
        "Sat" => "စနေ",
        other => other,
    };
    localized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_bands_map_to_severity() {
        let cases = [
            (-30, Severity::Good),
            (0, Severity::Good),
            (120, Severity::Good),
            (121, Severity::Warning),
            (300, Severity::Warning),
            (301, Severity::Danger),
        ];
        for (debt, expected) in cases {
            assert_eq!(debt_status(debt, Language::English).severity, expected, "debt {debt}");
        }
        assert!(debt_status(0, Language::English).message.starts_with("Sleep surplus"));
        assert!(debt_status(500, Language::Burmese).message.contains("ဦးစားပေး"));
    }

    #[test]
    fn durations_drop_zero_components() {
        assert_eq!(format_duration(45, Language::English), "45 min");
        assert_eq!(format_duration(0, Language::English), "0 min");
        assert_eq!(format_duration(120, Language::English), "2 hr");
        assert_eq!(format_duration(135, Language::English), "2h 15m");
        assert_eq!(format_duration(-135, Language::English), "2h 15m");
        assert_eq!(format_duration(90, Language::Burmese), "1နာရီ 30မိနစ်");
    }

    #[test]
    fn day_names_translate_and_pass_through() {
        assert_eq!(localized_day_name("Sat", Language::Burmese), "စနေ");
        assert_eq!(localized_day_name("Sat", Language::English), "Sat");
        assert_eq!(localized_day_name("Someday", Language::Burmese), "Someday");
    }
}
