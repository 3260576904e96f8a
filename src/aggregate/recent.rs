//! Recent activity feed.
//!
//! The feed tracks authoring recency: items are dated by the record's
//! creation timestamp, not by its domain year.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fetch::FetchedRecords;
use crate::kind::EntityKind;
use crate::record::{Record, RecordId};

/// Per-kind caps shared by every kind without its own override.
pub const DEFAULT_PER_KIND_CAP: usize = 2;

/// Maximum length of the merged feed.
pub const DEFAULT_OVERALL_CAP: usize = 5;

/// Caps applied when composing the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentActivityConfig {
    /// Cap for kinds without an override.
    pub default_per_kind: usize,
    pub tradition: Option<usize>,
    pub public_policy: Option<usize>,
    pub ethnic_group: Option<usize>,
    pub creative_activity: Option<usize>,
    /// Cap on the merged feed.
    pub overall_cap: usize,
}

impl Default for RecentActivityConfig {
    fn default() -> Self {
        Self {
            default_per_kind: DEFAULT_PER_KIND_CAP,
            tradition: Some(3),
            public_policy: None,
            ethnic_group: Some(1),
            creative_activity: Some(2),
            overall_cap: DEFAULT_OVERALL_CAP,
        }
    }
}

impl RecentActivityConfig {
    /// Cap for `kind`, falling back to the shared default.
    #[must_use]
    pub fn cap_for(&self, kind: EntityKind) -> usize {
        let specific = match kind {
            EntityKind::Tradition => self.tradition,
            EntityKind::PublicPolicy => self.public_policy,
            EntityKind::EthnicGroup => self.ethnic_group,
            EntityKind::CreativeActivity => self.creative_activity,
        };
        specific.unwrap_or(self.default_per_kind)
    }
}

/// One line of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub kind: EntityKind,
    pub record_id: RecordId,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl RecentActivity {
    /// Projects a record into a feed item. Undated records have none.
    #[must_use]
    pub fn from_record(record: &Record) -> Option<Self> {
        let date = record.created_at()?;
        let kind = record.kind();
        Some(Self {
            kind,
            record_id: record.id(),
            description: format!("Added {}: {}", kind.schema().label, record.name()),
            date,
        })
    }
}

/// Builds the merged feed from fetched records.
///
/// Each kind contributes its newest records up to its cap. The merged list
/// is stable-sorted by date descending, so equal timestamps keep canonical
/// kind order, and truncated to the overall cap.
#[must_use]
pub fn compose_recent(fetched: &FetchedRecords, config: &RecentActivityConfig) -> Vec<RecentActivity> {
    let mut items: Vec<RecentActivity> = Vec::new();
    for kind in fetched.kinds() {
        let Some(records) = fetched.get(kind) else {
            continue;
        };
        items.extend(
            records
                .iter()
                .filter_map(RecentActivity::from_record)
                .take(config.cap_for(kind)),
        );
    }

    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(config.overall_cap);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use crate::record::PolicyLevel;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn fetched(records: Vec<Record>) -> FetchedRecords {
        let mut lists: Vec<(EntityKind, Vec<Record>)> =
            EntityKind::ALL.iter().map(|kind| (*kind, Vec::new())).collect();
        for record in records {
            let kind = record.kind();
            if let Some((_, list)) = lists.iter_mut().find(|(k, _)| *k == kind) {
                list.push(record);
            }
        }
        FetchedRecords::from_lists(lists)
    }

    #[test]
    fn test_default_caps() {
        let config = RecentActivityConfig::default();
        assert_eq!(config.cap_for(EntityKind::Tradition), 3);
        assert_eq!(config.cap_for(EntityKind::PublicPolicy), DEFAULT_PER_KIND_CAP);
        assert_eq!(config.cap_for(EntityKind::EthnicGroup), 1);
        assert_eq!(config.cap_for(EntityKind::CreativeActivity), 2);
    }

    #[test]
    fn test_per_kind_and_overall_caps() {
        let records = vec![
            Record::tradition("t1").with_created_at(at(1)),
            Record::tradition("t2").with_created_at(at(2)),
            Record::tradition("t3").with_created_at(at(3)),
            Record::tradition("t4").with_created_at(at(4)),
            Record::ethnic_group("e1").with_created_at(at(10)),
            Record::ethnic_group("e2").with_created_at(at(11)),
            Record::creative_activity("c1").with_created_at(at(5)),
        ];
        let feed = compose_recent(&fetched(records), &RecentActivityConfig::default());

        let descriptions: Vec<_> = feed.iter().map(|item| item.description.as_str()).collect();
        assert_eq!(
            descriptions,
            [
                "Added ethnic group activity: e2",
                "Added creative activity: c1",
                "Added tradition: t4",
                "Added tradition: t3",
                "Added tradition: t2",
            ]
        );
        assert!(feed.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_undated_records_are_skipped() {
        let records = vec![
            Record::tradition("undated"),
            Record::public_policy("p", PolicyLevel::Local).with_created_at(at(1)),
        ];
        let feed = compose_recent(&fetched(records), &RecentActivityConfig::default());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, EntityKind::PublicPolicy);
    }

    #[test]
    fn test_equal_timestamps_keep_kind_order() {
        let records = vec![
            Record::creative_activity("c").with_created_at(at(7)),
            Record::tradition("t").with_created_at(at(7)),
        ];
        let config = RecentActivityConfig::default();
        let first = compose_recent(&fetched(records.clone()), &config);
        let second = compose_recent(&fetched(records), &config);
        assert_eq!(first, second);
        assert_eq!(first[0].kind, EntityKind::Tradition);
        assert_eq!(first[1].kind, EntityKind::CreativeActivity);
    }

    #[test]
    fn test_zero_overall_cap() {
        let config = RecentActivityConfig {
            overall_cap: 0,
            ..RecentActivityConfig::default()
        };
        let records = vec![Record::tradition("t").with_created_at(at(1))];
        assert!(compose_recent(&fetched(records), &config).is_empty());
    }
}
