//! Cross-entity analytics over the union of all processed kinds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::UNSPECIFIED;
use crate::calendar::{to_buddhist_year, BuddhistYear};
use crate::record::{FieldValue, Record};

/// Region and year aggregates across every processed kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Region label to record count. Missing labels fall under [`UNSPECIFIED`].
    pub by_region: BTreeMap<String, usize>,
    /// B.E. year to record count.
    pub by_year: BTreeMap<i32, usize>,
}

impl Analytics {
    /// Aggregates a concatenation of records of any kinds.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        I::IntoIter: Clone,
    {
        let records = records.into_iter();
        Self {
            by_region: group_by_region(records.clone()),
            by_year: group_by_year(records),
        }
    }
}

/// Counts records per region label.
///
/// Labels are kept verbatim so each bucket matches what an exact region filter
/// selects. A missing or empty label counts under [`UNSPECIFIED`], which also
/// holds records whose label is literally that sentinel.
pub fn group_by_region<'a>(records: impl IntoIterator<Item = &'a Record>) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let label = record.region().filter(|label| !label.is_empty()).unwrap_or(UNSPECIFIED);
        *counts.entry(label.to_string()).or_default() += 1;
    }
    counts
}

/// The B.E. year a record is attributed to in the year aggregate.
///
/// Precedence: the kind's own date field (a B.E. year is used verbatim, a
/// Gregorian date is converted), then the creation timestamp. Returns `None`
/// when the record has neither.
///
/// The timestamp fallback mixes "when it happened" with "when it was
/// recorded" in the same bucket.
#[must_use]
pub fn effective_year(record: &Record) -> Option<BuddhistYear> {
    match record.field(record.kind().schema().date_field.name) {
        Some(FieldValue::Year(year)) => Some(BuddhistYear::new(year)),
        Some(FieldValue::Date(date)) => Some(to_buddhist_year(date)),
        _ => record.created_at().map(to_buddhist_year),
    }
}

/// Counts records per effective B.E. year. Undated records are skipped.
pub fn group_by_year<'a>(records: impl IntoIterator<Item = &'a Record>) -> BTreeMap<i32, usize> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in records.into_iter().filter_map(effective_year) {
        *counts.entry(year.get()).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::record::PolicyLevel;

    #[test]
    fn test_region_groups_with_unspecified_bucket() {
        let records = vec![
            Record::tradition("a").with_region("North"),
            Record::public_policy("b", PolicyLevel::Local).with_region("North"),
            Record::ethnic_group("c"),
            Record::creative_activity("d").with_region(""),
            Record::tradition("e").with_region("North "),
        ];
        let by_region = group_by_region(&records);
        assert_eq!(by_region.get("North"), Some(&2));
        assert_eq!(by_region.get("North "), Some(&1));
        assert_eq!(by_region.get(UNSPECIFIED), Some(&2));
        assert_eq!(by_region.values().sum::<usize>(), records.len());
    }

    #[test]
    fn test_effective_year_precedence() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        // B.E. start year wins over the timestamp.
        let tradition = Record::tradition("t").with_start_year(2560).with_created_at(created);
        assert_eq!(effective_year(&tradition), Some(BuddhistYear::new(2560)));

        // Signing date is converted.
        let policy = Record::public_policy("p", PolicyLevel::National)
            .with_signing_date(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap())
            .with_created_at(created);
        assert_eq!(effective_year(&policy), Some(BuddhistYear::new(2566)));

        // Falls back to the creation timestamp.
        let undated = Record::creative_activity("c").with_created_at(created);
        assert_eq!(effective_year(&undated), Some(BuddhistYear::new(2567)));
        let unsigned = Record::public_policy("u", PolicyLevel::Local).with_created_at(created);
        assert_eq!(effective_year(&unsigned), Some(BuddhistYear::new(2567)));

        // Nothing usable.
        assert_eq!(effective_year(&Record::ethnic_group("e")), None);
    }

    #[test]
    fn test_group_by_year_skips_undated() {
        let records = vec![
            Record::tradition("a").with_start_year(2566),
            Record::public_policy("b", PolicyLevel::Local)
                .with_signing_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            Record::ethnic_group("c").with_start_year(2565),
            Record::creative_activity("d"),
        ];
        let by_year = group_by_year(&records);
        assert_eq!(by_year.get(&2566), Some(&2));
        assert_eq!(by_year.get(&2565), Some(&1));
        assert_eq!(by_year.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_analytics_serializes_year_keys_as_strings() {
        let records = vec![Record::tradition("a").with_start_year(2566).with_region("North")];
        let analytics = Analytics::from_records(&records);
        let json = serde_json::to_string(&analytics).unwrap();
        assert_eq!(json, r#"{"byRegion":{"North":1},"byYear":{"2566":1}}"#);
    }
}
