//! JSON dataset documents used to seed in-memory stores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::storage::traits::StorageError;

/// A snapshot of all four collections plus the registered-user count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub traditions: Vec<Record>,
    pub public_policies: Vec<Record>,
    pub ethnic_groups: Vec<Record>,
    pub creative_activities: Vec<Record>,
    pub user_count: u64,
}

impl Dataset {
    /// Parses a dataset from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        serde_json::from_str(json).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Reads and parses a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            StorageError::BackendError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Total number of records across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.traditions.len()
            + self.public_policies.len()
            + self.ethnic_groups.len()
            + self.creative_activities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use crate::kind::EntityKind;
    use crate::storage::memory::InMemoryStores;

    const SAMPLE: &str = r#"{
        "userCount": 4,
        "traditions": [
            {
                "kind": "tradition",
                "id": "0b3c3a7e-7a52-4a53-9f0c-5b0a51b1d001",
                "name": "Yi Peng",
                "type": "North",
                "startYear": 2566,
                "category": { "id": 1, "name": "Festival" }
            }
        ],
        "publicPolicies": [
            {
                "kind": "publicPolicy",
                "id": "0b3c3a7e-7a52-4a53-9f0c-5b0a51b1d002",
                "name": "Heritage Conservation Act",
                "signingDate": "2023-06-01",
                "level": "NATIONAL"
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.user_count, 4);
        assert_eq!(dataset.len(), 2);
        assert!(dataset.ethnic_groups.is_empty());
        assert_eq!(dataset.traditions[0].kind(), EntityKind::Tradition);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        let stores = InMemoryStores::from_dataset(dataset).unwrap();
        assert_eq!(stores.traditions.len().unwrap(), 1);
        assert_eq!(stores.public_policies.len().unwrap(), 1);
    }

    #[test]
    fn test_wrong_list_is_rejected() {
        let json = r#"{
            "traditions": [
                { "kind": "creativeActivity", "id": "0b3c3a7e-7a52-4a53-9f0c-5b0a51b1d003", "name": "Misfiled" }
            ]
        }"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        assert!(matches!(
            InMemoryStores::from_dataset(dataset),
            Err(StorageError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Dataset::from_json_str("{ not json"),
            Err(StorageError::SerializationError(_))
        ));
        assert!(matches!(
            Dataset::load("/nonexistent/dataset.json"),
            Err(StorageError::BackendError(_))
        ));
    }
}
