// Normalization pipeline: classification, per-kind normalizers, and feed assembly

pub mod feed;
pub mod processing;
pub mod timeline;

// Re-export key types and functions from each stage
pub use processing::normalize::{normalize_record, NormalizationRegistry};
pub use processing::parser;
