//! Locality canonicalization for intensity observation points.
//!
//! Observation addresses carry a municipality followed by a station name
//! ("東村山市本町"). The municipality is the longest-lazy prefix ending in one
//! of 市/区/町/村, except for names where that rule cuts too early (a 村
//! inside 東村山市) or must extend past a ward (堺市's wards).

use once_cell::sync::Lazy;
use regex::Regex;

/// Checked in order before the generic suffix rule; first hit wins.
const LOCALITY_OVERRIDES: &[&str] = &[
    "余市町",
    "田村市",
    "玉村町",
    "東村山市",
    "武蔵村山市",
    "羽村市",
    "十日町市",
    "上市町",
    "大町市",
    "名古屋中村区",
    "大阪堺市.+?区",
    "下市町",
    "大村市",
    "野々市市",
    "四日市市",
    "廿日市市",
    "大町町",
];

/// Shortest prefix ending in a municipality-type suffix
const GENERIC_LOCALITY: &str = ".+?[市区町村]";

static LOCALITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut alternatives: Vec<&str> = LOCALITY_OVERRIDES.to_vec();
    alternatives.push(GENERIC_LOCALITY);
    // Leftmost-first alternation keeps the override order significant
    Regex::new(&format!("^(?:{})", alternatives.join("|"))).expect("locality pattern is valid")
});

/// The canonical municipality for `addr`, if any pattern matches.
pub fn canonical_locality(addr: &str) -> Option<&str> {
    LOCALITY_PATTERN
        .find(addr)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

/// Total form of [`canonical_locality`]: unmatched input comes back unchanged.
pub fn canonicalize(addr: &str) -> String {
    canonical_locality(addr).unwrap_or(addr).to_string()
}
