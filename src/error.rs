use std::path::PathBuf;

use thiserror::Error;

/// Errors raised around the matching core: catalog loading and request decoding.
///
/// The matcher and the distance calculator themselves never fail.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("opening catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A catalog row parsed but carries unusable values.
    #[error("catalog row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("duplicate pharmacy id {0} in catalog")]
    DuplicateId(u32),

    /// Origin coordinates missing, non-finite or out of range.
    #[error("malformed origin: lat={lat}, lng={lng}")]
    MalformedOrigin { lat: f64, lng: f64 },

    #[error("Please enter a valid medicine name.")]
    BlankMedicine,

    #[error("invalid JSON request: {0}")]
    Json(#[from] serde_json::Error),
}
