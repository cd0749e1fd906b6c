//! Metrics recorded by the normalization engine
//!
//! Recording is a no-op until a recorder is installed, so library callers pay
//! nothing unless they opt in (the CLI does with `--metrics`).

use std::fmt;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Enum representing all metric names used in the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Normalize metrics
    NormalizeRecordsProcessed,
    NormalizeDecodeErrors,
    NormalizePassThrough,
    NormalizeFormatFallbacks,

    // Feed metrics
    FeedRecordsAssembled,
    FeedRecordsDropped,
    FeedBatchSize,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NormalizeRecordsProcessed => "quake_normalize_records_processed_total",
            MetricName::NormalizeDecodeErrors => "quake_normalize_decode_errors_total",
            MetricName::NormalizePassThrough => "quake_normalize_pass_through_total",
            MetricName::NormalizeFormatFallbacks => "quake_normalize_format_fallbacks_total",
            MetricName::FeedRecordsAssembled => "quake_feed_records_assembled_total",
            MetricName::FeedRecordsDropped => "quake_feed_records_dropped_total",
            MetricName::FeedBatchSize => "quake_feed_batch_size",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install a process-wide Prometheus recorder and return a handle for rendering.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

pub mod normalize {
    use super::MetricName;

    /// Record that a record of the given kind was normalized
    pub fn record_normalized(kind: &'static str) {
        ::metrics::counter!(MetricName::NormalizeRecordsProcessed.as_str(), "kind" => kind)
            .increment(1);
    }

    /// Record a record that could not be decoded
    pub fn decode_error(kind: &'static str) {
        ::metrics::counter!(MetricName::NormalizeDecodeErrors.as_str(), "kind" => kind)
            .increment(1);
    }

    /// Record a record whose discriminant is not one we normalize
    pub fn pass_through(code: i64) {
        ::metrics::counter!(MetricName::NormalizePassThrough.as_str(), "code" => code.to_string())
            .increment(1);
    }

    /// Record a field that fell back to the unknown label
    pub fn format_fallback(field: &'static str) {
        ::metrics::counter!(MetricName::NormalizeFormatFallbacks.as_str(), "field" => field)
            .increment(1);
    }
}

pub mod feed {
    use super::MetricName;

    pub fn records_assembled(count: usize) {
        ::metrics::counter!(MetricName::FeedRecordsAssembled.as_str()).increment(count as u64);
        ::metrics::histogram!(MetricName::FeedBatchSize.as_str()).record(count as f64);
    }

    /// Record a record dropped from the feed, labelled by reason
    pub fn record_dropped(reason: &'static str) {
        ::metrics::counter!(MetricName::FeedRecordsDropped.as_str(), "reason" => reason)
            .increment(1);
    }
}
