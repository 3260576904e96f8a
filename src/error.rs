//! Error types for the reporting engine.
//!
//! All errors are strongly typed using thiserror.
//! Validation failures are raised before any store is touched; store
//! failures carry the entity kind whose fetch failed so callers can tell
//! which collection invalidated the report.

use thiserror::Error;

use crate::kind::EntityKind;
use crate::storage::StorageError;

/// Validation errors raised while parsing an inbound report request.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Malformed year filter '{value}': expected 'all' or a 4-digit Buddhist Era year")]
    MalformedYear {
        value: String,
    },

    #[error("Unknown data type '{value}': expected one of all, tradition, publicPolicy, ethnicGroup, creativeActivity")]
    UnknownDataType {
        value: String,
    },

    #[error("Buddhist Era year {year} cannot be represented as a Gregorian date")]
    YearOutOfRange {
        year: i32,
    },
}

/// Errors raised by the report worker pool.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Report queue is full (capacity: {capacity})")]
    QueueFull {
        capacity: usize,
    },

    #[error("Report worker pool is disconnected")]
    Disconnected,

    #[error("Report timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },
}

/// Top-level error type for report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Record store for {kind} failed: {source}")]
    Store {
        kind: EntityKind,
        #[source]
        source: StorageError,
    },

    #[error("User count provider failed: {0}")]
    UserCount(#[source] StorageError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl ReportError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wraps a storage failure for the given kind.
    #[must_use]
    pub const fn store(kind: EntityKind, source: StorageError) -> Self {
        Self::Store { kind, source }
    }

    /// Returns true if the request was rejected as malformed.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if a record store failed.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store { .. })
    }

    /// Returns the kind whose store failed, if any.
    #[must_use]
    pub const fn failed_kind(&self) -> Option<EntityKind> {
        match self {
            Self::Store { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false, // the same input fails the same way
            Self::Store { source, .. } | Self::UserCount(source) => matches!(
                source,
                StorageError::Unavailable(_) | StorageError::Timeout { .. }
            ),
            Self::Runtime(e) => matches!(e, RuntimeError::QueueFull { .. } | RuntimeError::Timeout { .. }),
            Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
