//! Domain-level error taxonomy for plan triage.

/// Plan triage errors.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    /// A bottleneck lacks a key the engine needs to compose the verdict.
    /// This is a contract breach by the upstream analyzer and is never retried.
    #[error("bottleneck #{index} missing required field: {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid run id '{0}': must be a single path segment")]
    InvalidRunId(String),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for plan triage operations.
pub type Result<T> = std::result::Result<T, TriageError>;
