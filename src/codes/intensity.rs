use crate::constants::{ESTIMATED_INTENSITY_CODE, ESTIMATED_INTENSITY_REMAP, UNKNOWN_LABEL};

/// Fold the archival "5弱以上と推定" code into the level it ranks as.
pub fn remap_intensity(code: i64) -> i64 {
    if code == ESTIMATED_INTENSITY_CODE {
        ESTIMATED_INTENSITY_REMAP
    } else {
        code
    }
}

/// Seismic intensity code to its display label
pub fn intensity_label(code: i64) -> &'static str {
    match remap_intensity(code) {
        10 => "1",
        20 => "2",
        30 => "3",
        40 => "4",
        44 => "5弱以上と推定",
        45 => "5弱",
        50 => "5強",
        55 => "6弱",
        60 => "6強",
        70 => "7",
        _ => UNKNOWN_LABEL,
    }
}
