//! Report assembler.
//!
//! `ReportEngine` turns a report request into a [`Report`]: it validates the
//! filter, builds one predicate per processed kind, fetches all kinds
//! concurrently, then computes charts, cross-entity analytics and the recent
//! activity feed from that single snapshot.
//!
//! The engine is stateless between requests and only needs `&self`, so one
//! instance can serve many threads.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span};

use crate::aggregate::{chart_for, compose_recent, Analytics};
use crate::config::EngineConfig;
use crate::error::{ReportError, ReportResult, ValidationError};
use crate::fetch::{count_all, fetch_all};
use crate::filter::{ReportFilter, ReportRequest};
use crate::kind::EntityKind;
use crate::predicate::{build_predicate, Predicate};
use crate::record::Relations;
use crate::report::{Charts, Overview, RecordsSection, Report};
use crate::storage::{RecordStores, UserCountProvider};

/// The report-generation entry point.
pub struct ReportEngine {
    stores: RecordStores,
    users: Option<Arc<dyn UserCountProvider>>,
    config: EngineConfig,
}

impl std::fmt::Debug for ReportEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportEngine")
            .field("stores", &self.stores)
            .field("users", &self.users.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl ReportEngine {
    /// Creates an engine over the given stores with default configuration
    /// and no user-count provider.
    #[must_use]
    pub fn new(stores: RecordStores) -> Self {
        Self {
            stores,
            users: None,
            config: EngineConfig::default(),
        }
    }

    /// Sets the provider for `overview.userCount`.
    #[must_use]
    pub fn with_user_count(mut self, provider: Arc<dyn UserCountProvider>) -> Self {
        self.users = Some(provider);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generates the full report for an inbound request.
    ///
    /// # Errors
    ///
    /// - `ReportError::Validation` for a malformed filter, before any store is queried.
    /// - `ReportError::Store` naming the first kind whose store failed. No partial
    ///   report is ever returned.
    /// - `ReportError::UserCount` if the user-count provider failed.
    pub fn generate(&self, request: &ReportRequest) -> ReportResult<Report> {
        let filter = ReportFilter::parse(request)?;
        self.generate_filtered(&filter)
    }

    /// Generates the full report for an already validated filter.
    pub fn generate_filtered(&self, filter: &ReportFilter) -> ReportResult<Report> {
        let started = Instant::now();
        let plan = plan(filter)?;
        let span = info_span!("report", kinds = plan.len());
        let _guard = span.enter();
        for (kind, predicate) in &plan {
            debug!(kind = %kind, predicate = %predicate, "planned record query");
        }

        let mut fetched = fetch_all(&self.stores, &plan, self.fetch_relations())?;
        let user_count = self.user_count()?;

        let overview = Overview {
            user_count,
            ..Overview::from_counts(fetched.kinds().map(|kind| (kind, fetched.count(kind))))
        };

        let mut charts = Charts::default();
        for kind in fetched.kinds() {
            charts.set(kind, chart_for(kind, fetched.get(kind).unwrap_or_default()));
        }

        let analytics = Analytics::from_records(fetched.all());

        let recent_activities = compose_recent(&fetched, &self.config.recent);

        let records = if self.config.include_records {
            let mut section = RecordsSection::default();
            for kind in filter.data_type.kinds() {
                if let Some(list) = fetched.take(kind) {
                    let list = list
                        .into_iter()
                        .map(|record| record.without_relations(self.config.include_relations))
                        .collect();
                    section.set(kind, list);
                }
            }
            Some(section)
        } else {
            None
        };

        info!(
            total = overview.total_count,
            regions = analytics.by_region.len(),
            years = analytics.by_year.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "report generated"
        );

        Ok(Report {
            overview,
            records,
            charts,
            analytics,
            recent_activities,
            filters: filter.to_request(),
        })
    }

    /// Computes only the headline counts, using the stores' count queries.
    ///
    /// # Errors
    ///
    /// Same policy as [`generate`](Self::generate).
    pub fn overview(&self, request: &ReportRequest) -> ReportResult<Overview> {
        let filter = ReportFilter::parse(request)?;
        let plan = plan(&filter)?;
        let counts = count_all(&self.stores, &plan)?;
        let user_count = self.user_count()?;
        Ok(Overview {
            user_count,
            ..Overview::from_counts(counts)
        })
    }

    /// Relations to fetch: charts always need the category.
    fn fetch_relations(&self) -> Relations {
        let chart_needs = Relations {
            category: true,
            ..Relations::NONE
        };
        if self.config.include_records {
            chart_needs.union(self.config.include_relations)
        } else {
            chart_needs
        }
    }

    fn user_count(&self) -> ReportResult<Option<u64>> {
        if !self.config.include_user_count {
            return Ok(None);
        }
        match &self.users {
            Some(provider) => provider.count_users().map(Some).map_err(ReportError::UserCount),
            None => Ok(None),
        }
    }
}

/// One predicate per processed kind, in canonical order.
fn plan(filter: &ReportFilter) -> Result<Vec<(EntityKind, Predicate)>, ValidationError> {
    filter
        .data_type
        .kinds()
        .into_iter()
        .map(|kind| Ok((kind, build_predicate(kind, filter)?)))
        .collect()
}
