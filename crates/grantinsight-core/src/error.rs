use thiserror::Error;

/// Everything that can go wrong while loading or presenting opportunities
///
/// Filtering itself never fails. Errors only come from the data boundary
/// (sources, config files) and from writing exports.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid deadline '{value}' for opportunity {id}")]
    InvalidDeadline { id: String, value: String },

    #[error("Duplicate opportunity id: {0}")]
    DuplicateId(String),

    #[error("Opportunity not found: {0}")]
    NotFound(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
