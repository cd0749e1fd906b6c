use std::collections::HashSet;

use serde::Deserialize;

use super::base::{decode, IssueInfo};
use crate::common::time_format;
use crate::domain::{CanonicalEvent, EarlyWarning};
use crate::error::Result;
use crate::pipeline::processing::normalize::EventNormalizer;
use crate::pipeline::processing::parser::ParsedRecord;
use crate::types::EventKind;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EarlyWarningRecord {
    earthquake: WarningEarthquake,
    issue: IssueInfo,
    cancelled: bool,
    areas: Vec<WarningArea>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WarningEarthquake {
    hypocenter: WarningHypocenter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WarningHypocenter {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WarningArea {
    pref: String,
}

/// Normalizer for early-warning broadcasts
pub struct EarlyWarningNormalizer;

impl EarlyWarningNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EarlyWarningNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventNormalizer for EarlyWarningNormalizer {
    fn normalize(&self, record: &ParsedRecord<'_>) -> Result<CanonicalEvent> {
        let eew: EarlyWarningRecord = decode(EventKind::EarlyWarning, record.record)?;

        Ok(CanonicalEvent::EarlyWarning(EarlyWarning {
            code: EventKind::EarlyWarning.code(),
            object_id: record.object_id.clone(),
            serial: eew.issue.serial,
            issue_time: time_format::format_with_seconds(&eew.issue.time),
            short_time: time_format::format_short(&eew.issue.time),
            cancelled: eew.cancelled,
            hypocenter: eew.earthquake.hypocenter.name,
            areas: distinct_prefs(eew.areas),
        }))
    }

    fn kind_label(&self) -> &'static str {
        EventKind::EarlyWarning.as_str()
    }

    fn name(&self) -> &str {
        "Early Warning Normalizer"
    }
}

/// Parent regions of the affected areas, first-seen order
fn distinct_prefs(areas: Vec<WarningArea>) -> Vec<String> {
    let mut seen = HashSet::new();
    areas
        .into_iter()
        .map(|area| area.pref)
        .filter(|pref| seen.insert(pref.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: serde_json::Value) -> EarlyWarning {
        let parsed = crate::pipeline::processing::parser::classify(&value).unwrap();
        match EarlyWarningNormalizer::new().normalize(&parsed).unwrap() {
            CanonicalEvent::EarlyWarning(w) => w,
            other => panic!("expected early warning, got {:?}", other),
        }
    }

    #[test]
    fn test_areas_reduced_to_distinct_prefs() {
        let w = normalize(json!({
            "code": 556,
            "_id": "65929c3e",
            "issue": {"time": "2024/01/01 16:10:23", "serial": "3"},
            "cancelled": false,
            "earthquake": {"hypocenter": {"name": "石川県能登地方"}},
            "areas": [
                {"pref": "石川", "name": "石川県能登"},
                {"pref": "新潟", "name": "新潟県上越"},
                {"pref": "石川", "name": "石川県加賀"},
                {"pref": "富山", "name": "富山県東部"},
                {"pref": "新潟", "name": "新潟県中越"}
            ]
        }));

        assert_eq!(w.areas, vec!["石川".to_string(), "新潟".to_string(), "富山".to_string()]);
        assert_eq!(w.serial, "3");
        assert_eq!(w.hypocenter, "石川県能登地方");
        assert_eq!(w.issue_time, "01月01日16時10分23秒");
        assert_eq!(w.short_time, "01/01 16:10頃");
        assert_eq!(w.object_id.as_deref(), Some("65929c3e"));
        assert!(!w.cancelled);
    }

    #[test]
    fn test_cancelled_warning_carries_flag() {
        let w = normalize(json!({"code": 556, "cancelled": true}));
        assert!(w.cancelled);
        assert!(w.areas.is_empty());
        assert_eq!(w.hypocenter, "");
    }
}
