pub mod address;
pub mod codes;
pub mod common;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod types;

// Domain data shapes produced by the normalizers
pub mod domain;

pub use domain::CanonicalEvent;
pub use error::{NormalizeError, Result};
pub use pipeline::{normalize_record, NormalizationRegistry};
