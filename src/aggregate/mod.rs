//! Aggregations computed from fetched records.
//!
//! - [`chart`]: per-kind category or level buckets
//! - [`analytics`]: region and year counts across all kinds
//! - [`recent`]: the merged recent activity feed

pub mod analytics;
pub mod chart;
pub mod recent;

/// Locale-neutral label for a missing region or category.
///
/// The presentation layer localizes it. A real label spelled the same way is
/// indistinguishable from it once aggregated.
pub const UNSPECIFIED: &str = "unspecified";

pub use analytics::{effective_year, group_by_region, group_by_year, Analytics};
pub use chart::{chart_for, group_by_category_name, group_by_level, CategoryBucket, Chart, LevelBucket};
pub use recent::{compose_recent, RecentActivity, RecentActivityConfig};
