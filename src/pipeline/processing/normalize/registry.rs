use std::collections::HashMap;

use tracing::debug;

use super::normalizers::{
    EarlyWarningNormalizer, EarthquakeNormalizer, FeltReportNormalizer, MetricsNormalizer,
    TsunamiNormalizer,
};
use super::EventNormalizer;
use crate::domain::CanonicalEvent;
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::parser::classify;
use crate::types::{EventKind, RawEventRecord};

/// Registry mapping each event kind to its normalizer
pub struct NormalizationRegistry {
    normalizers: HashMap<EventKind, Box<dyn EventNormalizer>>,
}

impl NormalizationRegistry {
    /// Create a new normalization registry with the built-in normalizers
    pub fn new() -> Self {
        let mut normalizers: HashMap<EventKind, Box<dyn EventNormalizer>> = HashMap::new();

        normalizers.insert(
            EventKind::Earthquake,
            Box::new(MetricsNormalizer::new(EarthquakeNormalizer::new())),
        );
        normalizers.insert(
            EventKind::Tsunami,
            Box::new(MetricsNormalizer::new(TsunamiNormalizer::new())),
        );
        normalizers.insert(
            EventKind::EarlyWarning,
            Box::new(MetricsNormalizer::new(EarlyWarningNormalizer::new())),
        );
        normalizers.insert(
            EventKind::FeltReport,
            Box::new(MetricsNormalizer::new(FeltReportNormalizer::new())),
        );

        Self { normalizers }
    }

    /// Replace the normalizer for a kind
    pub fn register(&mut self, kind: EventKind, normalizer: Box<dyn EventNormalizer>) {
        self.normalizers.insert(kind, normalizer);
    }

    pub fn get_normalizer(&self, kind: EventKind) -> Option<&dyn EventNormalizer> {
        self.normalizers.get(&kind).map(|n| n.as_ref())
    }

    /// Classify a raw record and run exactly one normalizer over it.
    ///
    /// Unrecognized discriminants pass through unmodified.
    pub fn normalize(&self, record: &RawEventRecord) -> Result<CanonicalEvent> {
        let parsed = classify(record)?;

        match parsed.kind.and_then(|kind| self.get_normalizer(kind)) {
            Some(normalizer) => normalizer.normalize(&parsed),
            None => {
                debug!(code = parsed.code, "no normalizer for discriminant, passing through");
                metrics::normalize::pass_through(parsed.code);
                Ok(CanonicalEvent::Unknown(record.clone()))
            }
        }
    }

    /// List the kinds that have a registered normalizer
    pub fn list_kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self.normalizers.keys().copied().collect();
        kinds.sort_by_key(|k| k.code());
        kinds
    }
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use serde_json::json;

    #[test]
    fn test_registry_has_built_in_normalizers() {
        let registry = NormalizationRegistry::new();
        assert_eq!(registry.list_kinds(), EventKind::ALL.to_vec());
    }

    #[test]
    fn test_unknown_discriminant_passes_through() {
        let registry = NormalizationRegistry::new();
        let record = json!({"code": 561, "areas": [1, 2, 3]});

        let result = registry.normalize(&record).unwrap();
        assert_eq!(result, CanonicalEvent::Unknown(record));
    }

    #[test]
    fn test_missing_discriminant_is_a_decode_error() {
        let registry = NormalizationRegistry::new();
        let err = registry.normalize(&json!({"areas": []})).unwrap_err();
        assert!(err.is_decode_error());
        assert!(matches!(err, NormalizeError::MissingDiscriminant));
    }

    #[test]
    fn test_shape_mismatch_is_a_decode_error() {
        let registry = NormalizationRegistry::new();
        let record = json!({"code": 551, "points": "not a list"});

        let err = registry.normalize(&record).unwrap_err();
        assert!(matches!(err, NormalizeError::Decode { kind: EventKind::Earthquake, .. }));
    }

    #[test]
    fn test_dispatches_each_kind() {
        let registry = NormalizationRegistry::new();
        assert!(matches!(
            registry.normalize(&json!({"code": 551})).unwrap(),
            CanonicalEvent::Earthquake(_)
        ));
        assert!(matches!(
            registry.normalize(&json!({"code": 552})).unwrap(),
            CanonicalEvent::Tsunami(_)
        ));
        assert!(matches!(
            registry.normalize(&json!({"code": 556})).unwrap(),
            CanonicalEvent::EarlyWarning(_)
        ));
        assert!(matches!(
            registry.normalize(&json!({"code": 9611})).unwrap(),
            CanonicalEvent::FeltReport(_)
        ));
    }
}
