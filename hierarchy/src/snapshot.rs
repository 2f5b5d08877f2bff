//! Latest fetched collections and the views computed from them.

use crate::error::HierarchyError;
use crate::filter::{HierarchyFilter, Narrowed, narrow};
use crate::index::{UnresolvedAncestry, build_index};
use crate::model::Collections;
use crate::stats::{Statistics, statistics};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// One consistent set of tenant collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generation: u64,
    pub collections: Collections,
    pub fetched_at: DateTime<Utc>,
}

/// Holds the most recent [`Snapshot`]. Readers get an `Arc` and keep working
/// on it while a refresh swaps in the next one.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot {
                generation: 0,
                collections: Collections::default(),
                fetched_at: Utc::now(),
            })),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn generation(&self) -> u64 {
        self.current().generation
    }

    pub fn replace(&self, collections: Collections) -> Arc<Snapshot> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(Snapshot {
            generation: slot.generation + 1,
            collections,
            fetched_at: Utc::now(),
        });
        *slot = Arc::clone(&next);
        debug!(generation = next.generation, "snapshot replaced");
        next
    }

    /// Runs `fetch` and installs its result. On error the previous snapshot
    /// stays in place and the error is returned.
    pub async fn refresh<F, E>(&self, fetch: F) -> Result<Arc<Snapshot>, E>
    where
        F: Future<Output = Result<Collections, E>>,
        E: std::fmt::Display,
    {
        match fetch.await {
            Ok(collections) => Ok(self.replace(collections)),
            Err(e) => {
                warn!(error = %e, generation = self.generation(), "refresh failed, keeping previous snapshot");
                Err(e)
            }
        }
    }
}

/// Everything the dashboard renders for one filter on one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub generation: u64,
    pub filter: HierarchyFilter,
    pub visible: Collections,
    pub statistics: Statistics,
    pub unresolved: Vec<UnresolvedAncestry>,
}

impl DashboardView {
    pub fn compute(snapshot: &Snapshot, filter: &HierarchyFilter) -> Result<Self, HierarchyError> {
        let mut view = Self::from_collections(&snapshot.collections, filter)?;
        view.generation = snapshot.generation;
        Ok(view)
    }

    pub fn from_collections(collections: &Collections, filter: &HierarchyFilter) -> Result<Self, HierarchyError> {
        let index = build_index(
            &collections.states,
            &collections.districts,
            &collections.blocks,
            &collections.schools,
        )?;
        let narrowed = narrow(collections, &index, filter);
        let statistics = statistics(&narrowed, &index);

        Ok(Self {
            generation: 0,
            filter: filter.clone(),
            visible: owned(&narrowed, collections),
            statistics,
            unresolved: index.warnings().to_vec(),
        })
    }
}

fn owned(narrowed: &Narrowed<'_>, all: &Collections) -> Collections {
    let schools: HashSet<_> = narrowed.schools.iter().map(|s| &s.id).collect();
    Collections {
        states: narrowed.states.iter().map(|s| (*s).clone()).collect(),
        districts: narrowed.districts.iter().map(|d| (*d).clone()).collect(),
        blocks: narrowed.blocks.iter().map(|b| (*b).clone()).collect(),
        schools: narrowed.schools.iter().map(|s| (*s).clone()).collect(),
        trades: narrowed.trades.iter().map(|t| (*t).clone()).collect(),
        trainers: narrowed.trainers.iter().map(|t| (*t).clone()).collect(),
        school_trades: all
            .school_trades
            .iter()
            .filter(|st| schools.contains(&st.school_id))
            .cloned()
            .collect(),
    }
}

/// Proof that a request was issued; compare against the gate when it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Discards responses for requests that have been superseded.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: AtomicU64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// `Some(value)` if no newer request was started after `ticket`.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(ticket = ticket.0, "dropping stale response");
            None
        }
    }
}
