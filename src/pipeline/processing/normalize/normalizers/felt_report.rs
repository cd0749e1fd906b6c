use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::base::decode;
use crate::codes::region_label;
use crate::common::time_format;
use crate::constants::{
    CONFIDENCE_FLOOR, TIER_A_MIN, TIER_B_MIN, TIER_C_MIN, TIER_D_MIN, TIER_E_MIN,
};
use crate::domain::{AreaByConfidence, CanonicalEvent, ConfidenceTier, FeltReport};
use crate::error::Result;
use crate::pipeline::processing::normalize::EventNormalizer;
use crate::pipeline::processing::parser::ParsedRecord;
use crate::types::EventKind;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeltReportRecord {
    started_at: String,
    updated_at: String,
    area_confidences: HashMap<String, AreaConfidence>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AreaConfidence {
    confidence: f64,
}

/// Normalizer for crowd-sourced felt reports (one session per record)
pub struct FeltReportNormalizer;

impl FeltReportNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FeltReportNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventNormalizer for FeltReportNormalizer {
    fn normalize(&self, record: &ParsedRecord<'_>) -> Result<CanonicalEvent> {
        let uq: FeltReportRecord = decode(EventKind::FeltReport, record.record)?;

        let confidences = uq
            .area_confidences
            .into_iter()
            .map(|(area, c)| (area, c.confidence))
            .collect::<Vec<_>>();

        Ok(CanonicalEvent::FeltReport(FeltReport {
            code: EventKind::FeltReport.code(),
            object_id: record.object_id.clone(),
            start_time: time_format::format_with_seconds(&uq.started_at),
            short_time: time_format::format_short(&uq.started_at),
            end_time: time_format::format_time_of_day(&uq.updated_at),
            area_by_confidence: group_by_tier(normalize_confidences(confidences)),
        }))
    }

    fn kind_label(&self) -> &'static str {
        EventKind::FeltReport.as_str()
    }

    fn name(&self) -> &str {
        "Felt Report Normalizer"
    }
}

/// Scale confidences so the session maximum (floored) becomes 1.0.
pub fn normalize_confidences(confidences: Vec<(String, f64)>) -> Vec<(String, f64)> {
    let max = confidences
        .iter()
        .map(|(_, c)| *c)
        .fold(CONFIDENCE_FLOOR, f64::max);

    confidences
        .into_iter()
        .map(|(area, c)| (area, c / max))
        .collect()
}

/// Tier for a normalized confidence; negative (or NaN) values have none.
pub fn confidence_tier(normalized: f64) -> Option<ConfidenceTier> {
    if normalized >= TIER_A_MIN {
        Some(ConfidenceTier::A)
    } else if normalized >= TIER_B_MIN {
        Some(ConfidenceTier::B)
    } else if normalized >= TIER_C_MIN {
        Some(ConfidenceTier::C)
    } else if normalized >= TIER_D_MIN {
        Some(ConfidenceTier::D)
    } else if normalized >= TIER_E_MIN {
        Some(ConfidenceTier::E)
    } else {
        None
    }
}

/// Tiers A→E, empty tiers omitted; areas sorted by raw code, then labelled.
pub fn group_by_tier(normalized: Vec<(String, f64)>) -> Vec<AreaByConfidence> {
    let mut tiers: BTreeMap<ConfidenceTier, Vec<String>> = BTreeMap::new();

    for (area, confidence) in normalized {
        if let Some(tier) = confidence_tier(confidence) {
            tiers.entry(tier).or_default().push(area);
        }
    }

    tiers
        .into_iter()
        .map(|(confidence, mut codes)| {
            codes.sort();
            AreaByConfidence {
                confidence,
                areas: codes.iter().map(|code| region_label(code)).collect(),
            }
        })
        .collect()
}
