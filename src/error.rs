//! Error types for the fuzzy search engine.
//!
//! Mirrors the error kinds from the design: configuration mistakes and
//! missing language processors are always fatal at build time; record/field
//! mismatches and invalid-index calls are fatal for the offending operation;
//! queries that come back empty after validation or stopword stripping are
//! not errors at all (callers get an empty result list instead).

use thiserror::Error;

/// Errors raised by the engine's public API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An out-of-range or contradictory configuration option.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// No registered language processor resolves for a declared language tag.
    #[error("no language processor registered for language '{0}'")]
    MissingProcessor(String),

    /// A record was supplied without a `fields` declaration, or `add` was
    /// called on a record-mode index with a non-record item (or vice versa).
    #[error("record/field mismatch: {0}")]
    FieldMismatch(String),

    /// A mutating operation was called on a null or partially constructed index.
    #[error("invalid index state: {0}")]
    InvalidIndex(String),

    /// The snapshot being restored has an unrecognized version tag or is malformed.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Serialization/deserialization failure underlying a snapshot operation.
    #[error("snapshot serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
