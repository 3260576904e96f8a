//! Report value objects returned to the presentation layer.
//!
//! A report is rebuilt on every request and never persisted. All maps are
//! ordered, so serializing the same report twice yields the same bytes.

use serde::{Deserialize, Serialize};

use crate::aggregate::{Analytics, CategoryBucket, Chart, LevelBucket, RecentActivity};
use crate::filter::ReportRequest;
use crate::kind::EntityKind;
use crate::record::Record;

/// Headline counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub tradition_count: usize,
    pub public_policy_count: usize,
    pub ethnic_group_count: usize,
    pub creative_activity_count: usize,
    /// Sum of the per-kind counts computed for this report.
    pub total_count: usize,
    /// Registered users. Not subject to the filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
}

impl Overview {
    /// Builds an overview from per-kind counts; kinds not listed count zero.
    #[must_use]
    pub fn from_counts(counts: impl IntoIterator<Item = (EntityKind, usize)>) -> Self {
        let mut overview = Self::default();
        for (kind, count) in counts {
            *overview.count_mut(kind) = count;
        }
        let total = EntityKind::ALL.iter().map(|kind| overview.count(*kind)).sum();
        overview.total_count = total;
        overview
    }

    /// Count reported for `kind`.
    #[must_use]
    pub const fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Tradition => self.tradition_count,
            EntityKind::PublicPolicy => self.public_policy_count,
            EntityKind::EthnicGroup => self.ethnic_group_count,
            EntityKind::CreativeActivity => self.creative_activity_count,
        }
    }

    fn count_mut(&mut self, kind: EntityKind) -> &mut usize {
        match kind {
            EntityKind::Tradition => &mut self.tradition_count,
            EntityKind::PublicPolicy => &mut self.public_policy_count,
            EntityKind::EthnicGroup => &mut self.ethnic_group_count,
            EntityKind::CreativeActivity => &mut self.creative_activity_count,
        }
    }
}

/// Filtered records per processed kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traditions: Option<Vec<Record>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_policies: Option<Vec<Record>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnic_groups: Option<Vec<Record>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative_activities: Option<Vec<Record>>,
}

impl RecordsSection {
    /// Records of `kind`, if that kind was processed.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&[Record]> {
        match kind {
            EntityKind::Tradition => self.traditions.as_deref(),
            EntityKind::PublicPolicy => self.public_policies.as_deref(),
            EntityKind::EthnicGroup => self.ethnic_groups.as_deref(),
            EntityKind::CreativeActivity => self.creative_activities.as_deref(),
        }
    }

    pub(crate) fn set(&mut self, kind: EntityKind, records: Vec<Record>) {
        let slot = match kind {
            EntityKind::Tradition => &mut self.traditions,
            EntityKind::PublicPolicy => &mut self.public_policies,
            EntityKind::EthnicGroup => &mut self.ethnic_groups,
            EntityKind::CreativeActivity => &mut self.creative_activities,
        };
        *slot = Some(records);
    }
}

/// Chart data per processed kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tradition_chart: Option<Vec<CategoryBucket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_policy_chart: Option<Vec<LevelBucket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnic_group_chart: Option<Vec<CategoryBucket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative_activity_chart: Option<Vec<CategoryBucket>>,
}

impl Charts {
    /// Stores a chart under its kind's slot.
    ///
    /// A chart whose shape does not match the kind's dimension is ignored.
    pub(crate) fn set(&mut self, kind: EntityKind, chart: Chart) {
        match (kind, chart) {
            (EntityKind::PublicPolicy, Chart::Levels(buckets)) => self.public_policy_chart = Some(buckets),
            (EntityKind::Tradition, Chart::Categories(buckets)) => self.tradition_chart = Some(buckets),
            (EntityKind::EthnicGroup, Chart::Categories(buckets)) => self.ethnic_group_chart = Some(buckets),
            (EntityKind::CreativeActivity, Chart::Categories(buckets)) => {
                self.creative_activity_chart = Some(buckets);
            }
            _ => {}
        }
    }

    /// Chart of `kind`, if that kind was processed.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<Chart> {
        match kind {
            EntityKind::Tradition => self.tradition_chart.clone().map(Chart::Categories),
            EntityKind::PublicPolicy => self.public_policy_chart.clone().map(Chart::Levels),
            EntityKind::EthnicGroup => self.ethnic_group_chart.clone().map(Chart::Categories),
            EntityKind::CreativeActivity => self.creative_activity_chart.clone().map(Chart::Categories),
        }
    }
}

/// The assembled dashboard report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub overview: Overview,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<RecordsSection>,
    pub charts: Charts,
    pub analytics: Analytics,
    pub recent_activities: Vec<RecentActivity>,
    /// Normalized echo of the request filter.
    pub filters: ReportRequest,
}

impl Report {
    /// Serializes the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// BLAKE3 digest (hex) of the serialized report.
    ///
    /// Identical filters over an unchanged store give identical digests, so
    /// callers can use it for change detection.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
