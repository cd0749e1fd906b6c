use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;

use super::base::{decode, group_in_first_seen_order, IssueInfo};
use crate::address::canonical_locality;
use crate::codes::{condition_label, intensity_label, remap_intensity};
use crate::common::time_format;
use crate::constants::{ERUPTION_MARKER, UNKNOWN_LABEL};
use crate::domain::{CanonicalEvent, Earthquake, PointsByPref, PointsByScale};
use crate::error::Result;
use crate::pipeline::processing::normalize::EventNormalizer;
use crate::pipeline::processing::parser::ParsedRecord;
use crate::types::EventKind;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EarthquakeRecord {
    earthquake: EarthquakeBody,
    issue: IssueInfo,
    points: Vec<ObservationPoint>,
    comments: Comments,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EarthquakeBody {
    #[serde(deserialize_with = "crate::types::deserialize_integral")]
    max_scale: i64,
    time: String,
    domestic_tsunami: String,
    foreign_tsunami: String,
    hypocenter: Hypocenter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Hypocenter {
    name: String,
    #[serde(deserialize_with = "crate::types::deserialize_integral")]
    depth: i64,
    magnitude: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Comments {
    free_form_comment: String,
}

/// One intensity observation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObservationPoint {
    pub pref: String,
    pub addr: String,
    pub is_area: bool,
    #[serde(deserialize_with = "crate::types::deserialize_integral")]
    pub scale: i64,
}

/// Normalizer for earthquake bulletins
pub struct EarthquakeNormalizer;

impl EarthquakeNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EarthquakeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventNormalizer for EarthquakeNormalizer {
    fn normalize(&self, record: &ParsedRecord<'_>) -> Result<CanonicalEvent> {
        let eq: EarthquakeRecord = decode(EventKind::Earthquake, record.record)?;

        let points = dedup_by_locality(eq.points);
        debug!(
            object_id = ?record.object_id,
            localities = points.len(),
            "deduplicated observation points"
        );

        let is_eruption = eq.comments.free_form_comment.contains(ERUPTION_MARKER);
        let free_form_comments = if eq.comments.free_form_comment.is_empty() {
            Vec::new()
        } else {
            eq.comments
                .free_form_comment
                .split('\n')
                .map(|s| s.to_string())
                .collect()
        };

        Ok(CanonicalEvent::Earthquake(Earthquake {
            code: EventKind::Earthquake.code(),
            object_id: record.object_id.clone(),
            max_scale: intensity_label(eq.earthquake.max_scale).to_string(),
            issue_type: eq.issue.issue_type,
            issue_time: time_format::format_long(&eq.issue.time),
            occurred_time: time_format::format_long(&eq.earthquake.time),
            short_time: time_format::format_short(&eq.earthquake.time),
            tsunami: condition_label(&eq.earthquake.domestic_tsunami).to_string(),
            foreign_tsunami: condition_label(&eq.earthquake.foreign_tsunami).to_string(),
            hypocenter: hypocenter_summary(&eq.earthquake.hypocenter, is_eruption),
            is_eruption,
            free_form_comments,
            points: group_by_pref(&points),
            points_by_scale: group_by_scale(&points),
        }))
    }

    fn kind_label(&self) -> &'static str {
        EventKind::Earthquake.as_str()
    }

    fn name(&self) -> &str {
        "Earthquake Normalizer"
    }
}

/// Remap, sort, canonicalize and deduplicate observation points.
///
/// The sort is stable and precedes dedup, so the surviving entry for each
/// locality is its highest-intensity observation.
pub fn dedup_by_locality(mut points: Vec<ObservationPoint>) -> Vec<ObservationPoint> {
    for point in points.iter_mut() {
        point.scale = remap_intensity(point.scale);
    }

    points.sort_by(|a, b| b.scale.cmp(&a.scale));

    // Misses keep the raw address for the summary text
    for point in points.iter_mut() {
        if let Some(locality) = canonical_locality(&point.addr).map(str::to_string) {
            point.addr = locality;
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    points.retain(|point| seen.insert(point.addr.clone()));
    points
}

fn scale_groups<'a>(points: impl IntoIterator<Item = &'a ObservationPoint>) -> Vec<PointsByScale> {
    group_in_first_seen_order(points, |p| p.scale)
        .into_iter()
        .map(|(scale, members)| PointsByScale {
            scale_code: scale,
            scale: intensity_label(scale).to_string(),
            points: members.into_iter().map(|p| p.addr.clone()).collect(),
        })
        .collect()
}

fn group_by_pref(points: &[ObservationPoint]) -> Vec<PointsByPref> {
    group_in_first_seen_order(points, |p| p.pref.clone())
        .into_iter()
        .map(|(pref, members)| PointsByPref {
            pref,
            points: scale_groups(members),
        })
        .collect()
}

fn group_by_scale(points: &[ObservationPoint]) -> Vec<PointsByScale> {
    scale_groups(points)
}

fn hypocenter_summary(hypocenter: &Hypocenter, is_eruption: bool) -> String {
    if hypocenter.name.is_empty() {
        return UNKNOWN_LABEL.to_string();
    }

    if is_eruption {
        return hypocenter.name.clone();
    }

    format!(
        "{} ({}) M{:.1}",
        hypocenter.name,
        depth_label(hypocenter.depth),
        hypocenter.magnitude
    )
}

fn depth_label(depth: i64) -> String {
    match depth {
        d if d < 0 => "深さ不明".to_string(),
        0 => "ごく浅い深さ".to_string(),
        d => format!("深さ{}km", d),
    }
}
