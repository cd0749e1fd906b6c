use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use super::base::{decode, IssueInfo};
use crate::codes::{arrival_condition_label, TsunamiGrade};
use crate::common::time_format;
use crate::domain::{AreaByGrade, CanonicalEvent, ForecastArea, Tsunami};
use crate::error::Result;
use crate::pipeline::processing::normalize::EventNormalizer;
use crate::pipeline::processing::parser::ParsedRecord;
use crate::types::EventKind;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TsunamiRecord {
    time: String,
    cancelled: bool,
    issue: IssueInfo,
    areas: Vec<Area>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Area {
    name: String,
    grade: String,
    immediate: bool,
    first_height: FirstHeight,
    max_height: MaxHeight,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirstHeight {
    arrival_time: String,
    condition: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MaxHeight {
    description: String,
}

/// Normalizer for tsunami forecasts
pub struct TsunamiNormalizer;

impl TsunamiNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TsunamiNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventNormalizer for TsunamiNormalizer {
    fn normalize(&self, record: &ParsedRecord<'_>) -> Result<CanonicalEvent> {
        let t: TsunamiRecord = decode(EventKind::Tsunami, record.record)?;

        let area_by_grade = group_by_grade(t.areas);
        let max_grade = area_by_grade.first().map(|g| g.grade);

        Ok(CanonicalEvent::Tsunami(Tsunami {
            code: EventKind::Tsunami.code(),
            object_id: record.object_id.clone(),
            time: time_format::format_with_seconds(&t.time),
            issue_time: time_format::format_with_seconds(&t.issue.time),
            short_time: time_format::format_short(&t.issue.time),
            cancelled: t.cancelled,
            max_grade,
            area_by_grade,
        }))
    }

    fn kind_label(&self) -> &'static str {
        EventKind::Tsunami.as_str()
    }

    fn name(&self) -> &str {
        "Tsunami Normalizer"
    }
}

/// Bucket areas by grade; buckets come out in precedence order, empty ones omitted.
fn group_by_grade(areas: Vec<Area>) -> Vec<AreaByGrade> {
    let mut buckets: BTreeMap<TsunamiGrade, Vec<ForecastArea>> = BTreeMap::new();

    for area in areas {
        let Some(grade) = TsunamiGrade::parse(&area.grade) else {
            debug!(grade = %area.grade, area = %area.name, "dropping area with unrecognized grade");
            continue;
        };

        buckets.entry(grade).or_default().push(ForecastArea {
            arrival_time: arrival_time(&area.first_height),
            max_height: area.max_height.description,
            name: area.name,
            immediate: area.immediate,
        });
    }

    buckets
        .into_iter()
        .map(|(grade, areas)| AreaByGrade { grade, areas })
        .collect()
}

/// Explicit time first, then the known condition phrases, then the raw condition.
fn arrival_time(first_height: &FirstHeight) -> String {
    if !first_height.arrival_time.is_empty() {
        return time_format::format_arrival(&first_height.arrival_time);
    }

    arrival_condition_label(&first_height.condition)
        .map(|label| label.to_string())
        .unwrap_or_else(|| first_height.condition.clone())
}
