// Observability: metrics recorded while normalizing

pub mod metrics;

pub use metrics::{install_prometheus_recorder, MetricName};
