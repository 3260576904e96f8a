use std::sync::Arc;

use chrono::NaiveDate;

use heritage_report::aggregate::{Chart, UNSPECIFIED};
use heritage_report::storage::InMemoryStores;
use heritage_report::{
    Category, EntityKind, PolicyLevel, Predicate, Record, RecordStore, Relations, ReportEngine, ReportError,
    ReportRequest, StorageError,
};

struct UnreachableStore(EntityKind);

impl RecordStore for UnreachableStore {
    fn kind(&self) -> EntityKind {
        self.0
    }

    fn find(&self, _: &Predicate, _: Relations) -> Result<Vec<Record>, StorageError> {
        Err(StorageError::Timeout { duration_ms: 5_000 })
    }

    fn count(&self, _: &Predicate) -> Result<usize, StorageError> {
        Err(StorageError::Timeout { duration_ms: 5_000 })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn year_filter_matches_tradition_start_year() {
    let stores = InMemoryStores::new();
    stores
        .insert(
            Record::tradition("Loy Krathong")
                .with_start_year(2566)
                .with_category(Category::new(10, "Water festival")),
        )
        .unwrap();
    stores
        .insert(
            Record::tradition("Bun Bang Fai")
                .with_start_year(2565)
                .with_category(Category::new(11, "Rocket festival")),
        )
        .unwrap();

    let engine = ReportEngine::new(stores.record_stores());
    let report = engine
        .generate(&ReportRequest::all().year("2566").region("all"))
        .unwrap();

    assert_eq!(report.overview.tradition_count, 1);
    let Some(Chart::Categories(buckets)) = report.charts.get(EntityKind::Tradition) else {
        panic!("expected category chart");
    };
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].category, "Water festival");
    assert_eq!(buckets[0].count, 1);
}

#[test]
fn year_filter_converts_policy_signing_date() {
    let stores = InMemoryStores::new();
    let in_year = Record::public_policy("Cultural Promotion Act", PolicyLevel::National)
        .with_signing_date(date(2023, 6, 1));
    let in_year_id = in_year.id();
    stores.insert(in_year).unwrap();
    stores
        .insert(
            Record::public_policy("Provincial Craft Plan", PolicyLevel::Provincial)
                .with_signing_date(date(2022, 6, 1)),
        )
        .unwrap();

    let engine = ReportEngine::new(stores.record_stores());
    let report = engine
        .generate(&ReportRequest::all().year("2566").region("all"))
        .unwrap();

    assert_eq!(report.overview.public_policy_count, 1);
    let policies = report.records.as_ref().unwrap().get(EntityKind::PublicPolicy).unwrap();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].id(), in_year_id);

    // Year boundaries are half-open over Gregorian dates.
    stores
        .insert(Record::public_policy("New Year Decree", PolicyLevel::Local).with_signing_date(date(2023, 1, 1)))
        .unwrap();
    stores
        .insert(Record::public_policy("Year End Decree", PolicyLevel::Local).with_signing_date(date(2023, 12, 31)))
        .unwrap();
    stores
        .insert(Record::public_policy("Next Year Decree", PolicyLevel::Local).with_signing_date(date(2024, 1, 1)))
        .unwrap();
    let overview = engine.overview(&ReportRequest::all().year("2566")).unwrap();
    assert_eq!(overview.public_policy_count, 3);
}

#[test]
fn data_type_restricts_processed_kinds() {
    let stores = InMemoryStores::new();
    stores.insert(Record::tradition("Songkran")).unwrap();
    stores.insert(Record::tradition("Yi Peng")).unwrap();
    stores
        .insert(Record::public_policy("Heritage Act", PolicyLevel::National))
        .unwrap();
    stores.insert(Record::creative_activity("Mural Workshop")).unwrap();

    let engine = ReportEngine::new(stores.record_stores());
    let report = engine
        .generate(&ReportRequest::all().data_type("tradition").year("all").region("all"))
        .unwrap();

    assert_eq!(report.overview.tradition_count, 2);
    assert_eq!(report.overview.public_policy_count, 0);
    assert_eq!(report.overview.total_count, report.overview.tradition_count);

    let records = report.records.as_ref().unwrap();
    assert!(records.get(EntityKind::PublicPolicy).is_none());
    assert!(records.get(EntityKind::CreativeActivity).is_none());
    assert_eq!(records.get(EntityKind::Tradition).map(<[Record]>::len), Some(2));
    assert!(report.charts.get(EntityKind::PublicPolicy).is_none());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["records"].get("publicPolicies").is_none());
    assert_eq!(json["filters"]["dataType"], "tradition");
}

#[test]
fn missing_region_lands_in_unspecified_bucket() {
    let stores = InMemoryStores::new();
    stores.insert(Record::tradition("Yi Peng").with_region("North")).unwrap();
    stores
        .insert(Record::ethnic_group("Akha Swing Festival").with_region("North"))
        .unwrap();
    stores.insert(Record::creative_activity("Street Theatre")).unwrap();

    let engine = ReportEngine::new(stores.record_stores());
    let report = engine.generate(&ReportRequest::all()).unwrap();

    let by_region = &report.analytics.by_region;
    assert_eq!(by_region.len(), 2);
    assert_eq!(by_region.get("North"), Some(&2));
    assert_eq!(by_region.get(UNSPECIFIED), Some(&1));
}

#[test]
fn region_buckets_agree_with_region_filter() {
    let stores = InMemoryStores::new();
    stores.insert(Record::tradition("Yi Peng").with_region("North")).unwrap();
    stores.insert(Record::tradition("Tan Kuay Salak").with_region("North ")).unwrap();
    stores.insert(Record::tradition("Phi Ta Khon").with_region(UNSPECIFIED)).unwrap();
    stores.insert(Record::tradition("Street Theatre")).unwrap();

    let engine = ReportEngine::new(stores.record_stores());
    let by_region = engine.generate(&ReportRequest::all()).unwrap().analytics.by_region;
    assert_eq!(by_region.get("North"), Some(&1));
    assert_eq!(by_region.get("North "), Some(&1));
    assert_eq!(by_region.get(UNSPECIFIED), Some(&2));

    let filtered = engine.generate(&ReportRequest::all().region("North")).unwrap();
    assert_eq!(filtered.overview.total_count, by_region["North"]);
    assert_eq!(filtered.analytics.by_region.get("North"), Some(&1));
    assert_eq!(filtered.analytics.by_region.len(), 1);
}

#[test]
fn one_failing_kind_fails_the_whole_report() {
    let seeded = InMemoryStores::new();
    seeded.insert(Record::tradition("Songkran")).unwrap();
    seeded
        .insert(Record::public_policy("Heritage Act", PolicyLevel::National))
        .unwrap();
    seeded.insert(Record::creative_activity("Mural Workshop")).unwrap();

    let mut stores = seeded.record_stores();
    stores.ethnic_groups = Arc::new(UnreachableStore(EntityKind::EthnicGroup));
    let engine = ReportEngine::new(stores);

    let err = engine.generate(&ReportRequest::all()).unwrap_err();
    assert!(err.is_store());
    assert_eq!(err.failed_kind(), Some(EntityKind::EthnicGroup));
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        ReportError::Store {
            kind: EntityKind::EthnicGroup,
            source: StorageError::Timeout { .. }
        }
    ));
    assert!(err.to_string().contains("ethnicGroup"));

    let err = engine.overview(&ReportRequest::all()).unwrap_err();
    assert_eq!(err.failed_kind(), Some(EntityKind::EthnicGroup));
}

#[test]
fn malformed_filters_are_rejected() {
    let engine = ReportEngine::new(InMemoryStores::new().record_stores());
    for request in [
        ReportRequest::all().year("66"),
        ReportRequest::all().year("２５６６"),
        ReportRequest::all().year("2566a"),
        ReportRequest::all().data_type("temple"),
    ] {
        let err = engine.generate(&request).unwrap_err();
        assert!(err.is_validation(), "request {request:?}");
        assert!(!err.is_retryable());
    }
}

#[test]
fn empty_store_yields_empty_report() {
    let engine = ReportEngine::new(InMemoryStores::new().record_stores());
    let report = engine.generate(&ReportRequest::all().year("2566")).unwrap();
    assert_eq!(report.overview.total_count, 0);
    assert!(report.analytics.by_region.is_empty());
    assert!(report.analytics.by_year.is_empty());
    assert!(report.recent_activities.is_empty());
    for kind in EntityKind::ALL {
        assert!(report.charts.get(kind).unwrap().is_empty());
    }
}
