//! Error types for the `form_analytics` crate.

/// Runtime faults raised while extracting, assembling or pushing events.
///
/// None of these ever reach the host page: the public tracking entry points
/// log them and report `false`.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// An event sink failed to append a record.
    #[error("Event sink failed: {0}")]
    Sink(Box<dyn std::error::Error + Send + Sync>),

    /// A CSS selector supplied at runtime could not be parsed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// The builder configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// An event record could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A type alias for `Result<T, TrackerError>`.
pub type Result<T> = std::result::Result<T, TrackerError>;
