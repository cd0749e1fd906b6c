//! Static lookups from source codes to display labels.
//!
//! All tables are immutable; the region table is built once on first use.

pub mod intensity;
pub mod region;
pub mod tsunami;

pub use intensity::{intensity_label, remap_intensity};
pub use region::region_label;
pub use tsunami::{arrival_condition_label, condition_label, TsunamiGrade};
