/// Discriminant values and fixed normalization constants shared across the crate

// Record discriminants (the `code` field)
pub const EARTHQUAKE_CODE: i64 = 551;
pub const TSUNAMI_CODE: i64 = 552;
pub const EARLY_WARNING_CODE: i64 = 556;
pub const FELT_REPORT_CODE: i64 = 9611;

/// Discriminants that make up the bulletin half of the feed
pub const BULLETIN_CODES: [i64; 3] = [EARTHQUAKE_CODE, TSUNAMI_CODE, EARLY_WARNING_CODE];

// Field names on raw records
pub const DISCRIMINANT_FIELD: &str = "code";
pub const OBJECT_ID_FIELD: &str = "_id";
pub const TIME_FIELD: &str = "time";
pub const STARTED_AT_FIELD: &str = "started_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";
pub const CONFIDENCE_FIELD: &str = "confidence";

/// Label substituted whenever a timestamp or code cannot be resolved
pub const UNKNOWN_LABEL: &str = "不明";

/// Free-text marker identifying a volcanic eruption rather than an earthquake
pub const ERUPTION_MARKER: &str = "大規模な噴火";

// "5弱以上と推定" arrives as 46 in archival data; it ranks below a measured 5弱.
pub const ESTIMATED_INTENSITY_CODE: i64 = 46;
pub const ESTIMATED_INTENSITY_REMAP: i64 = 44;

/// Lower bound on a felt-report session maximum before normalizing
pub const CONFIDENCE_FLOOR: f64 = 0.125;

// Inclusive lower bounds of the confidence tiers
pub const TIER_A_MIN: f64 = 0.8;
pub const TIER_B_MIN: f64 = 0.6;
pub const TIER_C_MIN: f64 = 0.4;
pub const TIER_D_MIN: f64 = 0.2;
pub const TIER_E_MIN: f64 = 0.0;

/// Separator used when a group of localities is shown as one line
pub const LOCALITY_SEPARATOR: &str = "、";
