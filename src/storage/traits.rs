//! Abstract storage traits for the reporting engine.
//!
//! The engine never owns record persistence. It consumes one query-capable
//! store per kind plus a user-count provider. By using traits, we enable:
//! - In-memory backends for tests, benchmarks and the CLI
//! - Database-backed stores supplied by the host application

use std::sync::Arc;

use thiserror::Error;

use crate::kind::EntityKind;
use crate::predicate::Predicate;
use crate::record::{Record, Relations};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time.
    #[error("Store timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// A record of the wrong kind was offered to a store.
    #[error("Kind mismatch: store holds {expected}, record is {actual}")]
    KindMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },

    /// Key already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Query capability over one kind's records.
///
/// Result ordering is unspecified. Callers establish their own ordering.
pub trait RecordStore: Send + Sync {
    /// The kind of records this store holds.
    fn kind(&self) -> EntityKind;

    /// Returns every record matching `predicate`, carrying the nested
    /// lookups selected by `include`.
    fn find(&self, predicate: &Predicate, include: Relations) -> Result<Vec<Record>, StorageError>;

    /// Counts records matching `predicate`.
    fn count(&self, predicate: &Predicate) -> Result<usize, StorageError>;
}

/// Source of the global registered-user count shown on the dashboard.
pub trait UserCountProvider: Send + Sync {
    /// Returns the number of registered users.
    fn count_users(&self) -> Result<u64, StorageError>;
}

/// One store per kind.
#[derive(Clone)]
pub struct RecordStores {
    pub traditions: Arc<dyn RecordStore>,
    pub public_policies: Arc<dyn RecordStore>,
    pub ethnic_groups: Arc<dyn RecordStore>,
    pub creative_activities: Arc<dyn RecordStore>,
}

impl RecordStores {
    /// Returns the store for `kind`.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> &Arc<dyn RecordStore> {
        match kind {
            EntityKind::Tradition => &self.traditions,
            EntityKind::PublicPolicy => &self.public_policies,
            EntityKind::EthnicGroup => &self.ethnic_groups,
            EntityKind::CreativeActivity => &self.creative_activities,
        }
    }
}

impl std::fmt::Debug for RecordStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStores")
            .field("traditions", &self.traditions.kind())
            .field("public_policies", &self.public_policies.kind())
            .field("ethnic_groups", &self.ethnic_groups.kind())
            .field("creative_activities", &self.creative_activities.kind())
            .finish()
    }
}
