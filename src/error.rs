use std::path::PathBuf;
use thiserror::Error;

use crate::flatten::FlattenError;

#[derive(Debug, Error)]
pub enum OptfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON document {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML document {origin}: {source}")]
    Toml {
        origin: String,
        source: toml::de::Error,
    },

    #[error("Failed to flatten document: {0}")]
    Flatten(#[from] FlattenError),

    #[error("Invalid document {origin}: {reason}")]
    InvalidDocument { origin: String, reason: String },

    #[error("Source '{source_name}' failed: {reason}")]
    SourceInit { source_name: String, reason: String },

    #[error("Failed to initialize source '{source_name}': {source}")]
    Init {
        source_name: String,
        source: Box<OptfigError>,
    },
}
