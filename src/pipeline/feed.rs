//! Index feed assembly.
//!
//! Merges recent bulletins with felt-report sessions, newest first, and
//! normalizes the lot. A record that fails to normalize is reported and
//! skipped; it never takes the rest of the feed down with it.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use serde_json::Value;
use tracing::{info, warn};

use super::processing::normalize::NormalizationRegistry;
use crate::common::time_format::SORTABLE_FORMAT;
use crate::config::FeedConfig;
use crate::constants::{
    BULLETIN_CODES, CONFIDENCE_FIELD, FELT_REPORT_CODE, STARTED_AT_FIELD, TIME_FIELD,
};
use crate::domain::CanonicalEvent;
use crate::error::NormalizeError;
use crate::observability::metrics;
use crate::types::{read_discriminant, read_object_id, RawEventRecord};

/// A record that could not be normalized, with its position in the feed
#[derive(Debug)]
pub struct FeedFailure {
    pub index: usize,
    pub object_id: Option<String>,
    pub error: NormalizeError,
}

#[derive(Debug, Default)]
pub struct FeedOutcome {
    pub events: Vec<CanonicalEvent>,
    pub failures: Vec<FeedFailure>,
}

pub struct FeedAssembler {
    config: FeedConfig,
}

impl FeedAssembler {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Oldest `time` value still inside the window, in the source layout.
    ///
    /// A window reaching past the earliest representable time keeps everything.
    pub fn cutoff(&self, now: NaiveDateTime) -> String {
        Duration::try_hours(self.config.window_hours)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(NaiveDateTime::MIN)
            .format(SORTABLE_FORMAT)
            .to_string()
    }

    /// Build the raw feed: windowed bulletins plus one record per felt-report session.
    ///
    /// Both inputs are expected newest-first, as the store returns them.
    pub fn assemble(
        &self,
        bulletins: Vec<RawEventRecord>,
        felt_reports: Vec<RawEventRecord>,
        now: NaiveDateTime,
    ) -> Vec<RawEventRecord> {
        let cutoff = self.cutoff(now);

        let bulletins = filter_window(bulletins, &cutoff)
            .into_iter()
            .filter(|record| has_code_in(record, &BULLETIN_CODES))
            .collect::<Vec<_>>();

        let felt_reports = filter_window(felt_reports, &cutoff)
            .into_iter()
            .filter(|record| has_code_in(record, &[FELT_REPORT_CODE]))
            .filter(|record| self.is_confident(record))
            .collect::<Vec<_>>();
        let sessions = dedup_felt_sessions(felt_reports);

        let mut items = bulletins;
        items.extend(sessions);
        sort_newest_first(&mut items);

        info!(count = items.len(), cutoff = %cutoff, "assembled feed");
        metrics::feed::records_assembled(items.len());
        items
    }

    fn is_confident(&self, record: &RawEventRecord) -> bool {
        let confident = record
            .get(CONFIDENCE_FIELD)
            .and_then(Value::as_f64)
            .map(|c| c > self.config.min_felt_confidence)
            .unwrap_or(false);
        if !confident {
            metrics::feed::record_dropped("low_confidence");
        }
        confident
    }
}

fn time_of(record: &RawEventRecord) -> Option<&str> {
    record.get(TIME_FIELD).and_then(Value::as_str)
}

fn has_code_in(record: &RawEventRecord, codes: &[i64]) -> bool {
    let matched = read_discriminant(record)
        .map(|code| codes.contains(&code))
        .unwrap_or(false);
    if !matched {
        metrics::feed::record_dropped("code");
    }
    matched
}

/// Keep records whose `time` sorts at or after the cutoff.
pub fn filter_window(records: Vec<RawEventRecord>, cutoff: &str) -> Vec<RawEventRecord> {
    records
        .into_iter()
        .filter(|record| {
            let inside = time_of(record).map(|t| t >= cutoff).unwrap_or(false);
            if !inside {
                metrics::feed::record_dropped("window");
            }
            inside
        })
        .collect()
}

/// One record per felt-report session; the first copy wins and its `time`
/// becomes the session start.
pub fn dedup_felt_sessions(records: Vec<RawEventRecord>) -> Vec<RawEventRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut sessions = Vec::new();

    for mut record in records {
        let Some(started_at) = record
            .get(STARTED_AT_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            warn!(
                object_id = ?read_object_id(&record),
                "felt report without started_at, skipping"
            );
            metrics::feed::record_dropped("no_started_at");
            continue;
        };

        if !seen.insert(started_at.clone()) {
            metrics::feed::record_dropped("duplicate_session");
            continue;
        }

        if let Some(fields) = record.as_object_mut() {
            fields.insert(TIME_FIELD.to_string(), Value::String(started_at));
        }
        sessions.push(record);
    }

    sessions
}

/// Stable sort by `time`, newest first; records without a time go last.
pub fn sort_newest_first(records: &mut [RawEventRecord]) {
    records.sort_by(|a, b| time_of(b).cmp(&time_of(a)));
}

/// Normalize every record, collecting failures instead of aborting.
pub fn normalize_feed(records: &[RawEventRecord], registry: &NormalizationRegistry) -> FeedOutcome {
    let mut outcome = FeedOutcome::default();

    for (index, record) in records.iter().enumerate() {
        match registry.normalize(record) {
            Ok(event) => outcome.events.push(event),
            Err(error) => {
                let object_id = read_object_id(record);
                warn!(index, object_id = ?object_id, error = %error, "skipping record in feed");
                outcome.failures.push(FeedFailure {
                    index,
                    object_id,
                    error,
                });
            }
        }
    }

    info!(
        normalized = outcome.events.len(),
        failed = outcome.failures.len(),
        "normalized feed"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_cutoff_uses_window() {
        let assembler = FeedAssembler::new(FeedConfig::default());
        assert_eq!(assembler.cutoff(now()), "2024/01/01 12:00:00");
    }

    #[test]
    fn test_oversized_window_keeps_everything() {
        let assembler = FeedAssembler::new(FeedConfig {
            window_hours: i64::MAX,
            min_felt_confidence: 0.9,
        });
        let cutoff = assembler.cutoff(now());

        let records = vec![json!({"code": 551, "time": "0001/01/01 00:00:00"})];
        let kept = filter_window(records, &cutoff);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_filter_window() {
        let records = vec![
            json!({"code": 551, "time": "2024/01/01 11:59:59"}),
            json!({"code": 551, "time": "2024/01/01 12:00:00"}),
            json!({"code": 551}),
        ];
        let kept = filter_window(records, "2024/01/01 12:00:00");
        assert_eq!(kept.len(), 1);
        assert_eq!(time_of(&kept[0]), Some("2024/01/01 12:00:00"));
    }

    #[test]
    fn test_dedup_felt_sessions_keeps_first_copy() {
        let records = vec![
            json!({"_id": "new", "code": 9611, "started_at": "2024/01/02 10:00:00", "time": "2024/01/02 10:01:30"}),
            json!({"_id": "old", "code": 9611, "started_at": "2024/01/02 10:00:00", "time": "2024/01/02 10:00:40"}),
            json!({"_id": "other", "code": 9611, "started_at": "2024/01/03 09:00:00", "time": "2024/01/03 09:00:20"}),
            json!({"_id": "broken", "code": 9611}),
        ];

        let sessions = dedup_felt_sessions(records);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0]["_id"], "new");
        assert_eq!(sessions[0]["time"], "2024/01/02 10:00:00");
        assert_eq!(sessions[1]["_id"], "other");
    }

    #[test]
    fn test_sort_is_stable_and_newest_first() {
        let mut records = vec![
            json!({"_id": "a", "time": "2024/01/02 00:00:00"}),
            json!({"_id": "b"}),
            json!({"_id": "c", "time": "2024/01/03 00:00:00"}),
            json!({"_id": "d", "time": "2024/01/02 00:00:00"}),
        ];
        sort_newest_first(&mut records);

        let ids: Vec<&str> = records.iter().map(|r| r["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_assemble_filters_and_merges() {
        let assembler = FeedAssembler::new(FeedConfig::default());
        let bulletins = vec![
            json!({"_id": "eq", "code": 551, "time": "2024/01/03 08:00:00"}),
            json!({"_id": "old", "code": 551, "time": "2023/12/30 08:00:00"}),
            json!({"_id": "other", "code": 561, "time": "2024/01/03 09:00:00"}),
        ];
        let felt = vec![
            json!({"_id": "uq2", "code": 9611, "confidence": 0.97, "started_at": "2024/01/03 10:00:00", "time": "2024/01/03 10:00:50"}),
            json!({"_id": "uq1", "code": 9611, "confidence": 0.95, "started_at": "2024/01/03 10:00:00", "time": "2024/01/03 10:00:20"}),
            json!({"_id": "weak", "code": 9611, "confidence": 0.5, "started_at": "2024/01/03 11:00:00", "time": "2024/01/03 11:00:20"}),
        ];

        let items = assembler.assemble(bulletins, felt, now());
        let ids: Vec<&str> = items.iter().map(|r| r["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["uq2", "eq"]);
        assert_eq!(items[0]["time"], "2024/01/03 10:00:00");
    }

    #[test]
    fn test_normalize_feed_skips_bad_records() {
        let registry = NormalizationRegistry::new();
        let records = vec![
            json!({"_id": "ok", "code": 556}),
            json!({"_id": "bad", "code": 551, "points": 3}),
            json!({"_id": "nocode"}),
            json!({"code": 561}),
        ];

        let outcome = normalize_feed(&records, &registry);
        assert_eq!(outcome.events.len(), 2);
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].index, 1);
        assert_eq!(outcome.failures[0].object_id.as_deref(), Some("bad"));
        assert!(outcome.failures.iter().all(|f| f.error.is_decode_error()));
    }
}
