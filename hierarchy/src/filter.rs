//! Narrowing of tenant collections for a `(state, district, block)` selection.

use crate::error::FilterError;
use crate::id::EntityId;
use crate::index::HierarchyIndex;
use crate::model::{Block, Collections, District, School, State, Trade, Trainer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Optional selection at each level. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyFilter {
    pub state_id: Option<EntityId>,
    pub district_id: Option<EntityId>,
    pub block_id: Option<EntityId>,
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<Option<EntityId>, FilterError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => EntityId::parse(v)
            .map(Some)
            .map_err(|source| FilterError::MalformedId {
                field,
                value: v.to_owned(),
                source,
            }),
    }
}

impl HierarchyFilter {
    /// Parses raw selector values as they arrive from query strings or UI
    /// dropdowns. Empty strings and `"all"` clear the level.
    pub fn parse(
        state_id: Option<&str>,
        district_id: Option<&str>,
        block_id: Option<&str>,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            state_id: parse_field("stateId", state_id)?,
            district_id: parse_field("districtId", district_id)?,
            block_id: parse_field("blockId", block_id)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.state_id.is_none() && self.district_id.is_none() && self.block_id.is_none()
    }

    /// Selecting a state clears the lower levels, like the dashboard dropdowns do.
    pub fn with_state(mut self, state_id: Option<EntityId>) -> Self {
        self.state_id = state_id;
        self.district_id = None;
        self.block_id = None;
        self
    }

    pub fn with_district(mut self, district_id: Option<EntityId>) -> Self {
        self.district_id = district_id;
        self.block_id = None;
        self
    }

    pub fn with_block(mut self, block_id: Option<EntityId>) -> Self {
        self.block_id = block_id;
        self
    }
}

/// The visible subset of each collection after narrowing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrowed<'a> {
    pub states: Vec<&'a State>,
    pub districts: Vec<&'a District>,
    pub blocks: Vec<&'a Block>,
    pub schools: Vec<&'a School>,
    pub trades: Vec<&'a Trade>,
    pub trainers: Vec<&'a Trainer>,
}

impl Narrowed<'_> {
    pub fn is_empty(&self) -> bool {
        self.schools.is_empty() && self.blocks.is_empty() && self.districts.is_empty()
    }
}

/// Applies the filter stage by stage. Each stage only keeps members of the
/// previous stage's output, so adding a selector can never widen the result.
/// A district or block that is not part of the current result empties the
/// branch below it.
pub fn narrow<'a>(
    collections: &'a Collections,
    index: &HierarchyIndex<'a>,
    filter: &HierarchyFilter,
) -> Narrowed<'a> {
    let mut states: Vec<&State> = collections.states.iter().collect();
    let mut districts: Vec<&District> = collections.districts.iter().collect();
    let mut blocks: Vec<&Block> = collections.blocks.iter().collect();
    let mut schools: Vec<&School> = collections.schools.iter().collect();

    if let Some(state_id) = &filter.state_id {
        states.retain(|s| &s.id == state_id);
        districts.retain(|d| &d.state_id == state_id);
        let kept: HashSet<&EntityId> = districts.iter().map(|d| &d.id).collect();
        blocks.retain(|b| kept.contains(&b.district_id));
        schools.retain(|s| {
            index
                .ancestry_of_school(s)
                .state
                .is_some_and(|st| &st.id == state_id)
        });
    }

    if let Some(district_id) = &filter.district_id {
        if districts.iter().any(|d| &d.id == district_id) {
            districts.retain(|d| &d.id == district_id);
            blocks.retain(|b| &b.district_id == district_id);
            schools.retain(|s| {
                index
                    .ancestry_of_school(s)
                    .district
                    .is_some_and(|d| &d.id == district_id)
            });
        } else {
            districts.clear();
            blocks.clear();
            schools.clear();
        }
    }

    if let Some(block_id) = &filter.block_id {
        if blocks.iter().any(|b| &b.id == block_id) {
            blocks.retain(|b| &b.id == block_id);
            schools.retain(|s| &s.block_id == block_id);
        } else {
            blocks.clear();
            schools.clear();
        }
    }

    let trainers = if filter.is_empty() {
        collections.trainers.iter().collect()
    } else {
        let visible: HashSet<&EntityId> = schools.iter().map(|s| &s.id).collect();
        collections
            .trainers
            .iter()
            .filter(|t| visible.contains(&t.school_id))
            .collect()
    };

    Narrowed {
        states,
        districts,
        blocks,
        schools,
        trades: collections.trades.iter().collect(),
        trainers,
    }
}

/// Choices offered by the cascading selectors for the current filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions<'a> {
    pub states: Vec<&'a State>,
    pub districts: Vec<&'a District>,
    pub blocks: Vec<&'a Block>,
}

pub fn filter_options<'a>(collections: &'a Collections, filter: &HierarchyFilter) -> FilterOptions<'a> {
    let districts = collections
        .districts
        .iter()
        .filter(|d| filter.state_id.as_ref().is_none_or(|s| &d.state_id == s))
        .collect();
    let blocks = collections
        .blocks
        .iter()
        .filter(|b| filter.district_id.as_ref().is_none_or(|d| &b.district_id == d))
        .collect();

    FilterOptions {
        states: collections.states.iter().collect(),
        districts,
        blocks,
    }
}
