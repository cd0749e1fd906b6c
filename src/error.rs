use thiserror::Error;

use crate::types::EventKind;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Record has no `code` discriminant")]
    MissingDiscriminant,

    #[error("Record discriminant is not an integer: {0}")]
    InvalidDiscriminant(String),

    #[error("Failed to decode {kind} record: {source}")]
    Decode {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NormalizeError {
    /// True for the errors that mean a single record could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            NormalizeError::MissingDiscriminant
                | NormalizeError::InvalidDiscriminant(_)
                | NormalizeError::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
