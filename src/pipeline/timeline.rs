//! Playback timeline for one felt-report session.
//!
//! Every update of a session is stored as its own record sharing the
//! session's `started_at`. The timeline orders those updates and measures
//! them against the moment the session first became confident.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::common::time_format::{format_with_seconds, parse_source_time, time_of_day};
use crate::constants::{CONFIDENCE_FIELD, FELT_REPORT_CODE, STARTED_AT_FIELD, UPDATED_AT_FIELD};
use crate::domain::{AreaByConfidence, ConfidenceTier};
use crate::pipeline::processing::normalize::normalizers::felt_report::{
    group_by_tier, normalize_confidences,
};
use crate::types::{read_discriminant, RawEventRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    /// `HH時MM分SS秒`
    pub updated_at: String,
    pub confidence: f64,
    pub area_count: usize,
    /// Area count whose normalized confidence reaches tier A
    pub top_tier_area_count: usize,
    /// This update's areas grouped into tiers, as the felt-report summary shows them
    pub area_by_confidence: Vec<AreaByConfidence>,
    /// Seconds from the timeline start; negative before the session became confident
    pub offset_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionTimeline {
    pub started_at: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration_seconds: i64,
    pub frames: Vec<TimelineFrame>,
}

struct Update<'a> {
    at: NaiveDateTime,
    confidence: f64,
    record: &'a RawEventRecord,
}

/// Build the timeline of the session started at `started_at`.
///
/// Records of other kinds or other sessions are ignored.
pub fn build_session_timeline(
    records: &[RawEventRecord],
    started_at: &str,
    min_confidence: f64,
) -> SessionTimeline {
    let mut updates: Vec<Update<'_>> = records
        .iter()
        .filter(|record| read_discriminant(record).ok() == Some(FELT_REPORT_CODE))
        .filter(|record| record.get(STARTED_AT_FIELD).and_then(Value::as_str) == Some(started_at))
        .filter_map(|record| {
            let raw = record.get(UPDATED_AT_FIELD).and_then(Value::as_str).unwrap_or_default();
            match parse_source_time(raw) {
                Some(at) => Some(Update {
                    at,
                    confidence: record.get(CONFIDENCE_FIELD).and_then(Value::as_f64).unwrap_or(0.0),
                    record,
                }),
                None => {
                    warn!(updated_at = raw, "skipping session update with unparseable updated_at");
                    None
                }
            }
        })
        .collect();

    updates.sort_by_key(|u| u.at);

    let Some(last) = updates.last() else {
        debug!(started_at, "no updates for session");
        return SessionTimeline {
            started_at: format_with_seconds(started_at),
            start: None,
            end: None,
            duration_seconds: 0,
            frames: Vec::new(),
        };
    };

    let start = updates
        .iter()
        .find(|u| u.confidence > min_confidence)
        .map(|u| u.at)
        .or_else(|| parse_source_time(started_at))
        .unwrap_or(updates[0].at);
    let end = last.at;

    let frames = updates
        .iter()
        .map(|u| {
            let (area_count, area_by_confidence) = frame_areas(u.record);
            let top_tier_area_count = area_by_confidence
                .iter()
                .find(|g| g.confidence == ConfidenceTier::A)
                .map_or(0, |g| g.areas.len());
            TimelineFrame {
                updated_at: time_of_day(&u.at),
                confidence: u.confidence,
                area_count,
                top_tier_area_count,
                area_by_confidence,
                offset_seconds: ceil_seconds(u.at - start),
            }
        })
        .collect();

    SessionTimeline {
        started_at: format_with_seconds(started_at),
        start: Some(time_of_day(&start)),
        end: Some(time_of_day(&end)),
        duration_seconds: ceil_seconds(end - start),
        frames,
    }
}

fn ceil_seconds(span: chrono::Duration) -> i64 {
    let millis = span.num_milliseconds();
    millis.div_euclid(1000) + i64::from(millis.rem_euclid(1000) != 0)
}

fn frame_areas(record: &RawEventRecord) -> (usize, Vec<AreaByConfidence>) {
    let Some(areas) = record.get("area_confidences").and_then(Value::as_object) else {
        return (0, Vec::new());
    };

    let confidences: Vec<(String, f64)> = areas
        .iter()
        .map(|(code, v)| {
            let c = v.get(CONFIDENCE_FIELD).and_then(Value::as_f64).unwrap_or(0.0);
            (code.clone(), c)
        })
        .collect();

    (areas.len(), group_by_tier(normalize_confidences(confidences)))
}
