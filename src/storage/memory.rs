//! In-memory storage backend.
//!
//! This module provides thread-safe in-memory implementations of the storage traits.
//! It is intended for embedded usage, tests, and as a reference implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::kind::EntityKind;
use crate::predicate::Predicate;
use crate::record::{Record, RecordId, Relations};
use crate::storage::dataset::Dataset;
use crate::storage::traits::{RecordStore, RecordStores, StorageError, UserCountProvider};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct RecordState {
    // Insertion order is kept so scans are reproducible.
    records: Vec<Record>,
    by_id: HashMap<RecordId, usize>,
}

/// Thread-safe in-memory store for one kind.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    kind: EntityKind,
    state: RwLock<RecordState>,
}

impl InMemoryRecordStore {
    /// Create a new empty store for `kind`.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            state: RwLock::new(RecordState::default()),
        }
    }

    /// Insert a record. Returns error if the kind differs or the ID exists.
    pub fn insert(&self, record: Record) -> Result<(), StorageError> {
        if record.kind() != self.kind {
            return Err(StorageError::KindMismatch {
                expected: self.kind,
                actual: record.kind(),
            });
        }

        let mut state = self.state.write().map_err(|_| lock_err("record.insert"))?;
        let id = record.id();
        if state.by_id.contains_key(&id) {
            return Err(StorageError::DuplicateKey(id.to_string()));
        }
        let idx = state.records.len();
        state.records.push(record);
        state.by_id.insert(id, idx);
        Ok(())
    }

    /// Get a record by ID.
    pub fn get(&self, id: RecordId) -> Result<Option<Record>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("record.get"))?;
        Ok(state.by_id.get(&id).map(|&idx| state.records[idx].clone()))
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("record.len"))?;
        Ok(state.records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn find(&self, predicate: &Predicate, include: Relations) -> Result<Vec<Record>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("record.find"))?;
        Ok(state
            .records
            .iter()
            .filter(|record| predicate.matches(record))
            .map(|record| record.clone().without_relations(include))
            .collect())
    }

    fn count(&self, predicate: &Predicate) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("record.count"))?;
        Ok(state
            .records
            .iter()
            .filter(|record| predicate.matches(record))
            .count())
    }
}

/// A user-count provider returning a fixed number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticUserCount(pub u64);

impl UserCountProvider for StaticUserCount {
    fn count_users(&self) -> Result<u64, StorageError> {
        Ok(self.0)
    }
}

/// Convenience bundle of in-memory stores for every kind.
#[derive(Debug, Clone)]
pub struct InMemoryStores {
    pub traditions: Arc<InMemoryRecordStore>,
    pub public_policies: Arc<InMemoryRecordStore>,
    pub ethnic_groups: Arc<InMemoryRecordStore>,
    pub creative_activities: Arc<InMemoryRecordStore>,
    pub users: Arc<StaticUserCount>,
}

impl Default for InMemoryStores {
    fn default() -> Self {
        Self {
            traditions: Arc::new(InMemoryRecordStore::new(EntityKind::Tradition)),
            public_policies: Arc::new(InMemoryRecordStore::new(EntityKind::PublicPolicy)),
            ethnic_groups: Arc::new(InMemoryRecordStore::new(EntityKind::EthnicGroup)),
            creative_activities: Arc::new(InMemoryRecordStore::new(EntityKind::CreativeActivity)),
            users: Arc::new(StaticUserCount(0)),
        }
    }
}

impl InMemoryStores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed registered-user count.
    #[must_use]
    pub fn with_user_count(mut self, users: u64) -> Self {
        self.users = Arc::new(StaticUserCount(users));
        self
    }

    /// Returns the store holding `kind`.
    #[must_use]
    pub fn store(&self, kind: EntityKind) -> &Arc<InMemoryRecordStore> {
        match kind {
            EntityKind::Tradition => &self.traditions,
            EntityKind::PublicPolicy => &self.public_policies,
            EntityKind::EthnicGroup => &self.ethnic_groups,
            EntityKind::CreativeActivity => &self.creative_activities,
        }
    }

    /// Inserts a record into the store matching its kind.
    pub fn insert(&self, record: Record) -> Result<(), StorageError> {
        self.store(record.kind()).insert(record)
    }

    /// Builds stores from a dataset document.
    ///
    /// # Errors
    ///
    /// Fails on the first record listed under the wrong kind or with a
    /// duplicate ID.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, StorageError> {
        let stores = Self::new().with_user_count(dataset.user_count);
        let lists = [
            (EntityKind::Tradition, dataset.traditions),
            (EntityKind::PublicPolicy, dataset.public_policies),
            (EntityKind::EthnicGroup, dataset.ethnic_groups),
            (EntityKind::CreativeActivity, dataset.creative_activities),
        ];
        for (kind, records) in lists {
            let store = stores.store(kind);
            for record in records {
                store.insert(record)?;
            }
        }
        Ok(stores)
    }

    /// Trait-object view used by the engine.
    #[must_use]
    pub fn record_stores(&self) -> RecordStores {
        RecordStores {
            traditions: self.traditions.clone(),
            public_policies: self.public_policies.clone(),
            ethnic_groups: self.ethnic_groups.clone(),
            creative_activities: self.creative_activities.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::filter::{ReportFilter, ReportRequest};
    use crate::predicate::build_predicate;
    use crate::record::{Category, Owner, PolicyLevel};

    #[test]
    fn test_insert_get_and_duplicate() {
        let store = InMemoryRecordStore::new(EntityKind::Tradition);
        assert!(store.is_empty().unwrap());

        let record = Record::tradition("Songkran").with_start_year(2566);
        let id = record.id();
        store.insert(record.clone()).unwrap();
        assert!(matches!(store.insert(record.clone()), Err(StorageError::DuplicateKey(_))));

        assert_eq!(store.get(id).unwrap(), Some(record));
        assert!(store.get(RecordId::new()).unwrap().is_none());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_insert_rejects_wrong_kind() {
        let store = InMemoryRecordStore::new(EntityKind::Tradition);
        let err = store
            .insert(Record::public_policy("Act", PolicyLevel::National))
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::KindMismatch {
                expected: EntityKind::Tradition,
                actual: EntityKind::PublicPolicy
            }
        ));
    }

    #[test]
    fn test_find_and_count_apply_predicate() {
        let store = InMemoryRecordStore::new(EntityKind::EthnicGroup);
        store
            .insert(Record::ethnic_group("Hmong New Year").with_start_year(2566).with_region("North"))
            .unwrap();
        store
            .insert(Record::ethnic_group("Karen Weaving").with_start_year(2565).with_region("North"))
            .unwrap();
        store
            .insert(Record::ethnic_group("Mon Songkran").with_start_year(2566).with_region("Central"))
            .unwrap();

        let filter = ReportFilter::parse(&ReportRequest::all().year("2566").region("North")).unwrap();
        let predicate = build_predicate(EntityKind::EthnicGroup, &filter).unwrap();
        let found = store.find(&predicate, Relations::ALL).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Hmong New Year");
        assert_eq!(store.count(&predicate).unwrap(), 1);
        assert_eq!(store.count(&Predicate::match_all()).unwrap(), 3);
    }

    #[test]
    fn test_find_strips_unrequested_relations() {
        let store = InMemoryRecordStore::new(EntityKind::CreativeActivity);
        store
            .insert(
                Record::creative_activity("Mural")
                    .with_category(Category::new(1, "Painting"))
                    .with_owner(Owner {
                        id: 1,
                        display_name: "Admin".to_string(),
                    }),
            )
            .unwrap();

        let bare = store.find(&Predicate::match_all(), Relations::NONE).unwrap();
        assert_eq!(bare[0].category_name(), None);
        assert!(bare[0].meta().owner.is_none());

        // The stored copy is untouched.
        let full = store.find(&Predicate::match_all(), Relations::ALL).unwrap();
        assert_eq!(full[0].category_name(), Some("Painting"));
    }

    #[test]
    fn test_stores_route_by_kind() {
        let stores = InMemoryStores::new().with_user_count(12);
        stores.insert(Record::tradition("a")).unwrap();
        stores
            .insert(Record::public_policy("b", PolicyLevel::Local))
            .unwrap();
        assert_eq!(stores.traditions.len().unwrap(), 1);
        assert_eq!(stores.public_policies.len().unwrap(), 1);
        assert!(stores.ethnic_groups.is_empty().unwrap());
        assert_eq!(stores.users.count_users().unwrap(), 12);

        let dyn_stores = stores.record_stores();
        for kind in EntityKind::ALL {
            assert_eq!(dyn_stores.get(kind).kind(), kind);
        }
    }
}
