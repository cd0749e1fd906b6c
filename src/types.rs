use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants;
use crate::error::{NormalizeError, Result};

/// Raw record as handed over by the storage layer
pub type RawEventRecord = serde_json::Value;

/// The closed set of record shapes this crate knows how to normalize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Earthquake,
    Tsunami,
    EarlyWarning,
    FeltReport,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Earthquake,
        EventKind::Tsunami,
        EventKind::EarlyWarning,
        EventKind::FeltReport,
    ];

    /// Exact match against the known discriminants; anything else is not ours.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            constants::EARTHQUAKE_CODE => Some(EventKind::Earthquake),
            constants::TSUNAMI_CODE => Some(EventKind::Tsunami),
            constants::EARLY_WARNING_CODE => Some(EventKind::EarlyWarning),
            constants::FELT_REPORT_CODE => Some(EventKind::FeltReport),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            EventKind::Earthquake => constants::EARTHQUAKE_CODE,
            EventKind::Tsunami => constants::TSUNAMI_CODE,
            EventKind::EarlyWarning => constants::EARLY_WARNING_CODE,
            EventKind::FeltReport => constants::FELT_REPORT_CODE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Earthquake => "earthquake",
            EventKind::Tsunami => "tsunami",
            EventKind::EarlyWarning => "early_warning",
            EventKind::FeltReport => "felt_report",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the `code` discriminant, folding every numeric encoding into one `i64`.
///
/// Integral floats (`551.0`) are accepted because some drivers widen integers
/// on the way out; fractional values and non-numbers are rejected.
pub fn read_discriminant(record: &RawEventRecord) -> Result<i64> {
    let value = record
        .get(constants::DISCRIMINANT_FIELD)
        .ok_or(NormalizeError::MissingDiscriminant)?;

    if value.is_null() {
        return Err(NormalizeError::MissingDiscriminant);
    }

    integral_value(value).ok_or_else(|| NormalizeError::InvalidDiscriminant(value.to_string()))
}

/// Any JSON number with no fractional part that fits in an `i64`.
fn integral_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(n) = value.as_u64() {
        return i64::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64)
        .map(|n| n as i64)
}

/// `deserialize_with` helper for integer fields that may arrive widened to a float.
pub fn deserialize_integral<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    integral_value(&value)
        .ok_or_else(|| de::Error::custom(format!("expected an integral number, got {}", value)))
}

/// Extracts the storage identifier, either a plain string or `{"$oid": "..."}`.
pub fn read_object_id(record: &RawEventRecord) -> Option<String> {
    let id = record.get(constants::OBJECT_ID_FIELD)?;
    id.as_str()
        .or_else(|| id.get("$oid").and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}
