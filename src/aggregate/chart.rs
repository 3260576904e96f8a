//! Per-kind chart buckets.
//!
//! Buckets are derived from the filtered records themselves, so a category
//! with no matching record never appears and the bucket counts always sum
//! to the number of records charted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::UNSPECIFIED;
use crate::kind::{CategoryDimension, EntityKind};
use crate::record::{PolicyLevel, Record};

/// Count of records in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub category: String,
    pub count: usize,
}

/// Count of policies at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBucket {
    pub level: PolicyLevel,
    pub count: usize,
}

/// Chart data for one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Chart {
    Categories(Vec<CategoryBucket>),
    Levels(Vec<LevelBucket>),
}

impl Chart {
    /// Sum of all bucket counts.
    #[must_use]
    pub fn total(&self) -> usize {
        match self {
            Self::Categories(buckets) => buckets.iter().map(|b| b.count).sum(),
            Self::Levels(buckets) => buckets.iter().map(|b| b.count).sum(),
        }
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Categories(buckets) => buckets.len(),
            Self::Levels(buckets) => buckets.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bucket counts in output order.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        match self {
            Self::Categories(buckets) => buckets.iter().map(|b| b.count).collect(),
            Self::Levels(buckets) => buckets.iter().map(|b| b.count).collect(),
        }
    }
}

/// Groups records by category name. Records without a category are counted
/// under [`UNSPECIFIED`], sharing the bucket with any category whose name is
/// literally that sentinel.
///
/// Ordered by count descending, then category name.
pub fn group_by_category_name<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<CategoryBucket> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.category_name().unwrap_or(UNSPECIFIED)).or_default() += 1;
    }

    let mut buckets: Vec<CategoryBucket> = counts
        .into_iter()
        .map(|(category, count)| CategoryBucket {
            category: category.to_string(),
            count,
        })
        .collect();
    // Stable: equal counts keep name order.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Groups public policies by level. Only levels that occur are emitted.
///
/// Ordered by count descending, then level.
pub fn group_by_level<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<LevelBucket> {
    let mut counts: BTreeMap<PolicyLevel, usize> = BTreeMap::new();
    for level in records.into_iter().filter_map(Record::policy_level) {
        *counts.entry(level).or_default() += 1;
    }

    let mut buckets: Vec<LevelBucket> = counts
        .into_iter()
        .map(|(level, count)| LevelBucket { level, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Builds the chart for `kind` according to its category dimension.
pub fn chart_for(kind: EntityKind, records: &[Record]) -> Chart {
    match kind.schema().category {
        CategoryDimension::CategoryName => Chart::Categories(group_by_category_name(records)),
        CategoryDimension::PolicyLevel => Chart::Levels(group_by_level(records)),
    }
}
