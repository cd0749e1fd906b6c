use serde::{Deserialize, Serialize};

/// Tsunami forecast grade, declared in precedence order (highest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TsunamiGrade {
    MajorWarning,
    Warning,
    Watch,
    Unknown,
}

impl TsunamiGrade {
    pub const PRECEDENCE: [TsunamiGrade; 4] = [
        TsunamiGrade::MajorWarning,
        TsunamiGrade::Warning,
        TsunamiGrade::Watch,
        TsunamiGrade::Unknown,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "MajorWarning" => Some(TsunamiGrade::MajorWarning),
            "Warning" => Some(TsunamiGrade::Warning),
            "Watch" => Some(TsunamiGrade::Watch),
            "Unknown" => Some(TsunamiGrade::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TsunamiGrade::MajorWarning => "MajorWarning",
            TsunamiGrade::Warning => "Warning",
            TsunamiGrade::Watch => "Watch",
            TsunamiGrade::Unknown => "Unknown",
        }
    }
}

/// Label used when a tsunami condition is missing or unrecognized
pub const UNKNOWN_CONDITION_LABEL: &str = "津波有無は不明";

/// Domestic/foreign tsunami condition attached to an earthquake bulletin
pub fn condition_label(condition: &str) -> &'static str {
    match condition {
        "None" => "津波の心配なし",
        "Unknown" => UNKNOWN_CONDITION_LABEL,
        "Checking" => "津波有無は調査中",
        "NonEffective" => "津波被害の心配なし（若干の海面変動あり）",
        "Watch" => "津波注意報 発表中",
        "Warning" => "津波予報 発表中",
        "NonEffectiveNearby" => "津波被害の心配なし（震源近傍で小さな津波の可能性あり）",
        "WarningNearby" => "震源近傍で津波の可能性あり",
        "WarningPacific" => "太平洋で津波の可能性あり",
        "WarningPacificWide" => "太平洋広域で津波の可能性あり",
        "WarningIndian" => "インド洋で津波の可能性あり",
        "WarningIndianWide" => "インド洋広域で津波の可能性あり",
        "Potential" => "この規模は一般的に津波の可能性あり",
        _ => UNKNOWN_CONDITION_LABEL,
    }
}

/// Short label for the first-wave condition phrases; other text is not ours to shorten.
pub fn arrival_condition_label(condition: &str) -> Option<&'static str> {
    match condition {
        "ただちに津波来襲と推測" => Some("ただちに来襲"),
        "津波到達中と推測" => Some("到達中と推測"),
        "第１波の到達を確認" => Some("すでに到達"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_precedence_matches_ordering() {
        let mut grades = vec![
            TsunamiGrade::Watch,
            TsunamiGrade::Unknown,
            TsunamiGrade::MajorWarning,
            TsunamiGrade::Warning,
        ];
        grades.sort();
        assert_eq!(grades, TsunamiGrade::PRECEDENCE.to_vec());
    }

    #[test]
    fn test_grade_parse() {
        for grade in TsunamiGrade::PRECEDENCE {
            assert_eq!(TsunamiGrade::parse(grade.as_str()), Some(grade));
        }
        assert_eq!(TsunamiGrade::parse("Advisory"), None);
    }

    #[test]
    fn test_condition_labels() {
        assert_eq!(condition_label("None"), "津波の心配なし");
        assert_eq!(condition_label("WarningPacificWide"), "太平洋広域で津波の可能性あり");
        assert_eq!(condition_label(""), UNKNOWN_CONDITION_LABEL);
        assert_eq!(condition_label("Something"), UNKNOWN_CONDITION_LABEL);
    }

    #[test]
    fn test_arrival_condition_labels() {
        assert_eq!(arrival_condition_label("第１波の到達を確認"), Some("すでに到達"));
        assert_eq!(arrival_condition_label("ただちに津波来襲と推測"), Some("ただちに来襲"));
        assert_eq!(arrival_condition_label("津波到達中と推測"), Some("到達中と推測"));
        assert_eq!(arrival_condition_label("不明"), None);
    }
}
