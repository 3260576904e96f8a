//! # heritage-report
//!
//! Filter-and-aggregate reporting over Thai civic and cultural records.
//!
//! Four record kinds (traditions, public policies, ethnic group activities and
//! creative activities) are filtered by one shared request, fetched
//! concurrently, and condensed into a dashboard report: headline counts,
//! per-kind charts, cross-entity analytics and a recent activity feed.
//!
//! ## Core Concepts
//!
//! - **Buddhist Era**: user-facing years are B.E. (Gregorian + 543); see [`calendar`]
//! - **Kind schema**: each kind declares its date, region and category fields; see [`kind`]
//! - **Predicate**: a conjunction of clauses built per kind from the filter
//! - **Report**: the value object returned to the presentation layer
//!
//! ## Usage
//!
//! ```rust,ignore
//! use heritage_report::{Record, ReportEngine, ReportRequest};
//! use heritage_report::storage::InMemoryStores;
//!
//! let stores = InMemoryStores::new();
//! stores.insert(Record::tradition("Songkran").with_start_year(2566))?;
//!
//! let engine = ReportEngine::new(stores.record_stores());
//! let report = engine.generate(&ReportRequest::all().year("2566"))?;
//! assert_eq!(report.overview.tradition_count, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Domain model
pub mod calendar;
pub mod error;
pub mod kind;
pub mod record;

// Filtering and retrieval
pub mod fetch;
pub mod filter;
pub mod predicate;
pub mod storage;

// Report assembly
pub mod aggregate;
pub mod config;
pub mod engine;
pub mod report;
pub mod runtime;

// Re-export primary types at crate root for convenience
pub use calendar::{to_buddhist_year, to_gregorian_year_range, BuddhistYear, YearRange, BUDDHIST_ERA_OFFSET};
pub use config::{Config, ConfigError, EngineConfig};
pub use engine::ReportEngine;
pub use error::{ReportError, ReportResult, RuntimeError, ValidationError};
pub use filter::{DataType, ReportFilter, ReportRequest, Scope, YearFilter};
pub use kind::{EntityKind, KindSchema};
pub use predicate::{build_predicate, Clause, Predicate};
pub use record::{Category, PolicyLevel, Record, RecordId, Relations};
pub use report::{Charts, Overview, RecordsSection, Report};
pub use runtime::{ReportHandle, ReportRuntime, ReportRuntimeConfig};
pub use storage::{RecordStore, RecordStores, StorageError, UserCountProvider};
