//! Record fetchers: per-kind fan-out over the stores, fan-in before aggregation.
//!
//! The per-kind queries have no data dependency on each other, so each runs
//! on its own scoped thread. All of them are joined before anything is
//! aggregated. A single failing kind fails the whole fetch.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::{ReportError, ReportResult};
use crate::kind::EntityKind;
use crate::predicate::Predicate;
use crate::record::{Record, Relations};
use crate::storage::{RecordStore, RecordStores, StorageError};

/// A predicate to run against one kind's store.
pub type FetchPlan = [(EntityKind, Predicate)];

/// Records fetched for each processed kind, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedRecords {
    by_kind: BTreeMap<EntityKind, Vec<Record>>,
}

impl FetchedRecords {
    /// Builds a snapshot from per-kind lists, sorting each list canonically.
    #[must_use]
    pub fn from_lists(lists: impl IntoIterator<Item = (EntityKind, Vec<Record>)>) -> Self {
        let by_kind = lists
            .into_iter()
            .map(|(kind, mut records)| {
                records.sort_by(canonical_order);
                (kind, records)
            })
            .collect();
        Self { by_kind }
    }

    /// Records of `kind`, or `None` if the kind was not processed.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&[Record]> {
        self.by_kind.get(&kind).map(Vec::as_slice)
    }

    /// Processed kinds in canonical order.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.by_kind.keys().copied()
    }

    /// Number of records of `kind`; zero when not processed.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Number of records across all processed kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    /// Concatenation of every processed kind's records.
    pub fn all(&self) -> impl Iterator<Item = &Record> + Clone + '_ {
        self.by_kind.values().flatten()
    }

    /// Takes ownership of one kind's records.
    pub fn take(&mut self, kind: EntityKind) -> Option<Vec<Record>> {
        self.by_kind.remove(&kind)
    }
}

/// Most recently created first, undated records last, then by ID.
pub(crate) fn canonical_order(a: &Record, b: &Record) -> Ordering {
    let by_time = match (a.created_at(), b.created_at()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_time.then_with(|| a.id().cmp(&b.id()))
}

/// Fetches every planned kind concurrently.
///
/// # Errors
///
/// Returns `ReportError::Store` naming the failing kind. When several kinds
/// fail, the first in canonical order is reported.
pub fn fetch_all(
    stores: &RecordStores,
    plan: &FetchPlan,
    include: Relations,
) -> ReportResult<FetchedRecords> {
    let lists = fan_out(stores, plan, |store, predicate| store.find(predicate, include))?;
    Ok(FetchedRecords::from_lists(lists))
}

/// Counts every planned kind concurrently.
///
/// # Errors
///
/// Same policy as [`fetch_all`].
pub fn count_all(stores: &RecordStores, plan: &FetchPlan) -> ReportResult<BTreeMap<EntityKind, usize>> {
    let counts = fan_out(stores, plan, |store, predicate| store.count(predicate))?;
    Ok(counts.into_iter().collect())
}

fn fan_out<T, F>(stores: &RecordStores, plan: &FetchPlan, op: F) -> ReportResult<Vec<(EntityKind, T)>>
where
    T: Send,
    F: Fn(&dyn RecordStore, &Predicate) -> Result<T, StorageError> + Sync,
{
    // A single kind gains nothing from a thread, but a panicking store must
    // still surface as an error rather than unwind into the caller.
    if let [(kind, predicate)] = plan {
        let kind = *kind;
        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| op(&**stores.get(kind), predicate)));
        debug!(
            kind = %kind,
            ok = matches!(result, Ok(Ok(_))),
            elapsed_us = elapsed_micros(started),
            "record store query finished"
        );
        let value = match result {
            Ok(Ok(value)) => value,
            Ok(Err(source)) => {
                warn!(kind = %kind, error = %source, "record store query failed");
                return Err(ReportError::store(kind, source));
            }
            Err(_) => {
                warn!(kind = %kind, "record store query panicked");
                return Err(ReportError::internal(format!("fetch for {kind} panicked")));
            }
        };
        return Ok(vec![(kind, value)]);
    }

    thread::scope(|scope| {
        let op = &op;
        let mut handles = Vec::with_capacity(plan.len());
        for (kind, predicate) in plan {
            let kind = *kind;
            let store: &dyn RecordStore = &**stores.get(kind);
            let handle = thread::Builder::new()
                .name(format!("heritage-fetch-{kind}"))
                .spawn_scoped(scope, move || {
                    let started = Instant::now();
                    let result = op(store, predicate);
                    debug!(
                        kind = %kind,
                        ok = result.is_ok(),
                        elapsed_us = elapsed_micros(started),
                        "record store query finished"
                    );
                    result
                })
                .map_err(|e| ReportError::internal(format!("failed to spawn fetch for {kind}: {e}")))?;
            handles.push((kind, handle));
        }

        // Join everything before deciding, so no query outlives the report.
        let mut values = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for (kind, handle) in handles {
            match handle.join() {
                Ok(Ok(value)) => values.push((kind, value)),
                Ok(Err(source)) => {
                    warn!(kind = %kind, error = %source, "record store query failed");
                    if first_error.is_none() {
                        first_error = Some(ReportError::store(kind, source));
                    }
                }
                Err(_) => {
                    warn!(kind = %kind, "record store query panicked");
                    if first_error.is_none() {
                        first_error = Some(ReportError::internal(format!("fetch for {kind} panicked")));
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(values),
        }
    })
}

fn elapsed_micros(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}
