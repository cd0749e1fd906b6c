//! Display formatting for the fixed-format timestamps carried by raw records.
//!
//! Sources write `YYYY/MM/DD HH:MM:SS`, sometimes with a fractional part.
//! Anything that does not parse renders as the unknown label.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::constants::UNKNOWN_LABEL;
use crate::observability::metrics;

/// Source timestamp layout; `%.f` also accepts a missing fraction
pub const SOURCE_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.f";
/// Layout used when a timestamp is written back for comparisons
pub const SORTABLE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const LONG_FORMAT: &str = "%m月%d日%H時%M分頃";
const SHORT_FORMAT: &str = "%m/%d %H:%M頃";
const SECONDS_FORMAT: &str = "%m月%d日%H時%M分%S秒";
const TIME_OF_DAY_FORMAT: &str = "%H時%M分%S秒";
const ARRIVAL_FORMAT: &str = "%H時%M分";

pub fn parse_source_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), SOURCE_FORMAT).ok()
}

fn render(raw: &str, layout: &str) -> String {
    match parse_source_time(raw) {
        Some(t) => t.format(layout).to_string(),
        None => {
            debug!(raw, "unparseable timestamp, using unknown label");
            metrics::normalize::format_fallback("timestamp");
            UNKNOWN_LABEL.to_string()
        }
    }
}

/// `01月02日15時04分頃`
pub fn format_long(raw: &str) -> String {
    render(raw, LONG_FORMAT)
}

/// `01/02 15:04頃`
pub fn format_short(raw: &str) -> String {
    render(raw, SHORT_FORMAT)
}

/// `01月02日15時04分05秒`
pub fn format_with_seconds(raw: &str) -> String {
    render(raw, SECONDS_FORMAT)
}

/// `15時04分05秒`
pub fn format_time_of_day(raw: &str) -> String {
    render(raw, TIME_OF_DAY_FORMAT)
}

/// Time-of-day form of an already parsed timestamp
pub fn time_of_day(t: &NaiveDateTime) -> String {
    t.format(TIME_OF_DAY_FORMAT).to_string()
}

/// `15時04分`
pub fn format_arrival(raw: &str) -> String {
    render(raw, ARRIVAL_FORMAT)
}
