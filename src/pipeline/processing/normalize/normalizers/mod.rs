// Base trait wrapper and utilities shared by the per-kind normalizers
pub mod base;

// Individual normalizer implementations
pub mod early_warning;
pub mod earthquake;
pub mod felt_report;
pub mod tsunami;

// Re-export the main components
pub use base::MetricsNormalizer;
pub use early_warning::EarlyWarningNormalizer;
pub use earthquake::EarthquakeNormalizer;
pub use felt_report::FeltReportNormalizer;
pub use tsunami::TsunamiNormalizer;
