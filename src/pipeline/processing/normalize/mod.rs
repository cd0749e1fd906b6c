use once_cell::sync::Lazy;

use crate::domain::CanonicalEvent;
use crate::error::Result;
use crate::pipeline::processing::parser::ParsedRecord;
use crate::types::RawEventRecord;

pub mod normalizers;
pub mod registry;

pub use registry::NormalizationRegistry;

/// Trait for turning one classified raw record into its canonical form
pub trait EventNormalizer: Send + Sync {
    /// Normalize a classified record; fails only when the record cannot be decoded
    fn normalize(&self, record: &ParsedRecord<'_>) -> Result<CanonicalEvent>;

    /// Metric/log label of the kind this normalizer handles
    fn kind_label(&self) -> &'static str;

    /// Human-readable name for this normalizer
    fn name(&self) -> &str;
}

static DEFAULT_REGISTRY: Lazy<NormalizationRegistry> = Lazy::new(NormalizationRegistry::new);

/// Normalize one raw record with the built-in normalizers.
pub fn normalize_record(record: &RawEventRecord) -> Result<CanonicalEvent> {
    DEFAULT_REGISTRY.normalize(record)
}
