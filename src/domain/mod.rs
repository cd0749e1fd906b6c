//! Canonical, display-ready event shapes handed to the rendering layer.
//!
//! Every string is already formatted for display; consumers should not
//! transform them further.

use serde::Serialize;

use crate::codes::TsunamiGrade;
use crate::constants::LOCALITY_SEPARATOR;
use crate::types::RawEventRecord;

/// The normalized form of one raw record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum CanonicalEvent {
    Earthquake(Earthquake),
    Tsunami(Tsunami),
    EarlyWarning(EarlyWarning),
    FeltReport(FeltReport),
    /// Records with a discriminant we do not normalize, untouched
    Unknown(RawEventRecord),
}

impl CanonicalEvent {
    pub fn object_id(&self) -> Option<&str> {
        match self {
            CanonicalEvent::Earthquake(e) => e.object_id.as_deref(),
            CanonicalEvent::Tsunami(t) => t.object_id.as_deref(),
            CanonicalEvent::EarlyWarning(w) => w.object_id.as_deref(),
            CanonicalEvent::FeltReport(f) => f.object_id.as_deref(),
            CanonicalEvent::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Earthquake {
    pub code: i64,
    pub object_id: Option<String>,
    pub max_scale: String,
    pub issue_type: String,
    pub issue_time: String,
    pub occurred_time: String,
    pub short_time: String,
    pub tsunami: String,
    pub foreign_tsunami: String,
    pub hypocenter: String,
    pub is_eruption: bool,
    pub free_form_comments: Vec<String>,
    /// Localities by prefecture, then by intensity
    pub points: Vec<PointsByPref>,
    /// Localities by intensity only, for bulletins without a prefecture breakdown
    pub points_by_scale: Vec<PointsByScale>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsByPref {
    pub pref: String,
    pub points: Vec<PointsByScale>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsByScale {
    /// Intensity code after the estimated-level remap
    pub scale_code: i64,
    pub scale: String,
    pub points: Vec<String>,
}

impl PointsByScale {
    /// Localities as a single display line
    pub fn joined(&self) -> String {
        self.points.join(LOCALITY_SEPARATOR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tsunami {
    pub code: i64,
    pub object_id: Option<String>,
    pub time: String,
    pub issue_time: String,
    pub short_time: String,
    pub cancelled: bool,
    /// Highest-precedence grade with at least one area
    pub max_grade: Option<TsunamiGrade>,
    pub area_by_grade: Vec<AreaByGrade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaByGrade {
    pub grade: TsunamiGrade,
    pub areas: Vec<ForecastArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastArea {
    pub name: String,
    pub immediate: bool,
    pub arrival_time: String,
    pub max_height: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarlyWarning {
    pub code: i64,
    pub object_id: Option<String>,
    pub serial: String,
    pub issue_time: String,
    pub short_time: String,
    pub cancelled: bool,
    pub hypocenter: String,
    /// Distinct parent regions in first-seen order
    pub areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeltReport {
    pub code: i64,
    pub object_id: Option<String>,
    pub start_time: String,
    pub short_time: String,
    pub end_time: String,
    pub area_by_confidence: Vec<AreaByConfidence>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaByConfidence {
    pub confidence: ConfidenceTier,
    /// Region labels, ordered by their raw region code
    pub areas: Vec<String>,
}

/// Ordinal felt-report confidence bucket, A highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConfidenceTier {
    A,
    B,
    C,
    D,
    E,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::A => "A",
            ConfidenceTier::B => "B",
            ConfidenceTier::C => "C",
            ConfidenceTier::D => "D",
            ConfidenceTier::E => "E",
        }
    }
}
