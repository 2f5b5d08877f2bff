//! Geographic hierarchy engine for the skills portal.
//!
//! Every tenant (company) registers a tree of `State → District → Block → School`
//! records plus a trade catalog and the trainers teaching those trades at schools.
//! This crate holds the pure logic that sits on top of those flat collections:
//!
//! - [`index`] builds O(1) lookup maps and resolves ancestry chains.
//! - [`filter`] narrows the collections for a `(state, district, block)` selection.
//! - [`stats`] computes totals and per-state rollups for display.
//! - [`attendance`] resolves trainer attendance events into one slot per day.
//! - [`normalize`] maps wire records (`_id`, embedded parents) into internal records.
//! - [`snapshot`] keeps the latest fetched collections and suppresses stale responses.
//! - [`export`] flattens visible schools into spreadsheet rows.
//!
//! Nothing here performs I/O. The API server fills [`Collections`] from the database,
//! the portal client fills them from the REST API.

pub mod attendance;
pub mod error;
pub mod export;
pub mod filter;
pub mod id;
pub mod index;
pub mod model;
pub mod normalize;
pub mod snapshot;
pub mod stats;

pub use error::{FilterError, HierarchyError};
pub use filter::{HierarchyFilter, Narrowed, narrow};
pub use id::EntityId;
pub use index::{Ancestry, HierarchyIndex, UnresolvedAncestry, build_index};
pub use model::{Block, Collections, District, Location, School, SchoolTrade, State, Trade, Trainer};
pub use stats::{StateRollup, Statistics, statistics};
