//! Id lookups and ancestry resolution over one tenant's collections.

use crate::error::HierarchyError;
use crate::id::EntityId;
use crate::model::{Block, District, Keyed, School, State};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    State,
    District,
    Block,
    School,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    Missing,
    ForeignTenant,
}

/// A child whose parent reference does not resolve inside the same tenant.
/// The child still counts toward aggregate totals; its ancestry is `None`
/// from the broken link upward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedAncestry {
    pub kind: EntityKind,
    pub id: EntityId,
    pub parent_kind: EntityKind,
    pub parent_id: EntityId,
    pub reason: UnresolvedReason,
}

/// Resolved parents of a school. Any link may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ancestry<'a> {
    pub block: Option<&'a Block>,
    pub district: Option<&'a District>,
    pub state: Option<&'a State>,
}

#[derive(Debug, Clone)]
pub struct HierarchyIndex<'a> {
    states: HashMap<&'a EntityId, &'a State>,
    districts: HashMap<&'a EntityId, &'a District>,
    blocks: HashMap<&'a EntityId, &'a Block>,
    schools: HashMap<&'a EntityId, &'a School>,
    warnings: Vec<UnresolvedAncestry>,
}

fn index_by_id<'a, T: Keyed>(items: &'a [T]) -> Result<HashMap<&'a EntityId, &'a T>, HierarchyError> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        match map.entry(item.id()) {
            Entry::Occupied(_) => {
                return Err(HierarchyError::DuplicateId {
                    collection: T::COLLECTION,
                    id: item.id().clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
        }
    }
    Ok(map)
}

/// Looks up `id` and keeps the hit only if it belongs to `company_id`.
fn same_tenant<'a, T: Keyed>(
    map: &HashMap<&'a EntityId, &'a T>,
    id: &EntityId,
    company_id: &EntityId,
) -> Result<&'a T, UnresolvedReason> {
    match map.get(id) {
        Some(parent) if parent.company_id() == company_id => Ok(*parent),
        Some(_) => Err(UnresolvedReason::ForeignTenant),
        None => Err(UnresolvedReason::Missing),
    }
}

/// Builds the lookup maps in one pass over each collection.
///
/// Dangling or cross-tenant parent references are recorded as warnings, not
/// errors. The only failure is a repeated id inside one collection.
pub fn build_index<'a>(
    states: &'a [State],
    districts: &'a [District],
    blocks: &'a [Block],
    schools: &'a [School],
) -> Result<HierarchyIndex<'a>, HierarchyError> {
    let mut index = HierarchyIndex {
        states: index_by_id(states)?,
        districts: index_by_id(districts)?,
        blocks: index_by_id(blocks)?,
        schools: index_by_id(schools)?,
        warnings: Vec::new(),
    };

    let mut warnings = Vec::new();
    for d in districts {
        if let Err(reason) = same_tenant(&index.states, &d.state_id, &d.company_id) {
            warnings.push(UnresolvedAncestry {
                kind: EntityKind::District,
                id: d.id.clone(),
                parent_kind: EntityKind::State,
                parent_id: d.state_id.clone(),
                reason,
            });
        }
    }
    for b in blocks {
        if let Err(reason) = same_tenant(&index.districts, &b.district_id, &b.company_id) {
            warnings.push(UnresolvedAncestry {
                kind: EntityKind::Block,
                id: b.id.clone(),
                parent_kind: EntityKind::District,
                parent_id: b.district_id.clone(),
                reason,
            });
        }
    }
    for s in schools {
        if let Err(reason) = same_tenant(&index.blocks, &s.block_id, &s.company_id) {
            warnings.push(UnresolvedAncestry {
                kind: EntityKind::School,
                id: s.id.clone(),
                parent_kind: EntityKind::Block,
                parent_id: s.block_id.clone(),
                reason,
            });
        }
    }

    if !warnings.is_empty() {
        warn!(
            unresolved = warnings.len(),
            "hierarchy snapshot contains unresolved parent references"
        );
        for w in &warnings {
            debug!(kind = ?w.kind, id = %w.id, parent = %w.parent_id, reason = ?w.reason, "unresolved ancestry");
        }
    }
    index.warnings = warnings;

    Ok(index)
}

impl<'a> HierarchyIndex<'a> {
    pub fn state(&self, id: &EntityId) -> Option<&'a State> {
        self.states.get(id).copied()
    }

    pub fn district(&self, id: &EntityId) -> Option<&'a District> {
        self.districts.get(id).copied()
    }

    pub fn block(&self, id: &EntityId) -> Option<&'a Block> {
        self.blocks.get(id).copied()
    }

    pub fn school(&self, id: &EntityId) -> Option<&'a School> {
        self.schools.get(id).copied()
    }

    pub fn warnings(&self) -> &[UnresolvedAncestry] {
        &self.warnings
    }

    pub fn state_of_district(&self, district: &District) -> Option<&'a State> {
        same_tenant(&self.states, &district.state_id, &district.company_id).ok()
    }

    pub fn district_of_block(&self, block: &Block) -> Option<&'a District> {
        same_tenant(&self.districts, &block.district_id, &block.company_id).ok()
    }

    pub fn ancestry_of_block(&self, block: &Block) -> (Option<&'a District>, Option<&'a State>) {
        let district = self.district_of_block(block);
        let state = district.and_then(|d| self.state_of_district(d));
        (district, state)
    }

    /// Resolves `School → Block → District → State`.
    ///
    /// When the school's block is indexed the chain is authoritative and the
    /// school's stored `district_id`/`state_id` are ignored. When it is not,
    /// the stored ids are used if they point at indexed records of the same
    /// tenant. A stored district and a stored state that disagree both resolve
    /// to `None`.
    pub fn ancestry_of_school(&self, school: &School) -> Ancestry<'a> {
        if let Ok(block) = same_tenant(&self.blocks, &school.block_id, &school.company_id) {
            let (district, state) = self.ancestry_of_block(block);
            return Ancestry {
                block: Some(block),
                district,
                state,
            };
        }

        let district = school
            .district_id
            .as_ref()
            .and_then(|id| same_tenant(&self.districts, id, &school.company_id).ok());
        let (district, state) = match (district, school.state_id.as_ref()) {
            (Some(d), Some(stored)) if &d.state_id != stored => (None, None),
            (Some(d), _) => (Some(d), self.state_of_district(d)),
            (None, stored) => (
                None,
                stored.and_then(|id| same_tenant(&self.states, id, &school.company_id).ok()),
            ),
        };

        Ancestry {
            block: None,
            district,
            state,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::id::EntityId;
    use crate::model::{Block, District, School, State};

    pub fn id(raw: &str) -> EntityId {
        EntityId::parse(raw).unwrap()
    }

    pub fn state(i: &str, company: &str) -> State {
        State {
            id: id(i),
            name: format!("State {i}"),
            company_id: id(company),
            created_at: None,
        }
    }

    pub fn district(i: &str, state: &str, company: &str) -> District {
        District {
            id: id(i),
            name: format!("District {i}"),
            state_id: id(state),
            company_id: id(company),
            created_at: None,
        }
    }

    pub fn block(i: &str, district: &str, company: &str) -> Block {
        Block {
            id: id(i),
            name: format!("Block {i}"),
            district_id: id(district),
            pincode: "226001".into(),
            company_id: id(company),
            created_at: None,
        }
    }

    pub fn school(i: &str, block: &str, company: &str) -> School {
        School {
            id: id(i),
            uid: format!("UID-{i}"),
            name: format!("School {i}"),
            block_id: id(block),
            address: "Main road".into(),
            location: None,
            company_id: id(company),
            created_at: None,
            district_id: None,
            state_id: None,
        }
    }
}
