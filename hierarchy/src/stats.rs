use crate::filter::Narrowed;
use crate::id::EntityId;
use crate::index::HierarchyIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRollup {
    pub state_id: EntityId,
    pub name: String,
    pub districts: usize,
    pub blocks: usize,
    pub schools: usize,
}

/// Totals are plain cardinalities of the narrowed collections. The per-state
/// rollup only counts records whose ancestry resolves, so
/// `sum(state_wise.schools) <= total_schools`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_states: usize,
    pub total_districts: usize,
    pub total_blocks: usize,
    pub total_schools: usize,
    pub total_trades: usize,
    pub total_trainers: usize,
    #[serde(rename = "stateWiseStats")]
    pub state_wise: Vec<StateRollup>,
}

impl Statistics {
    /// Schools that count toward `total_schools` but toward no state.
    pub fn unattributed_schools(&self) -> usize {
        let attributed: usize = self.state_wise.iter().map(|r| r.schools).sum();
        self.total_schools.saturating_sub(attributed)
    }
}

pub fn statistics(narrowed: &Narrowed<'_>, index: &HierarchyIndex<'_>) -> Statistics {
    let mut rollups: Vec<StateRollup> = narrowed
        .states
        .iter()
        .map(|s| StateRollup {
            state_id: s.id.clone(),
            name: s.name.clone(),
            districts: 0,
            blocks: 0,
            schools: 0,
        })
        .collect();
    let slot: HashMap<&EntityId, usize> = narrowed
        .states
        .iter()
        .enumerate()
        .map(|(i, s)| (&s.id, i))
        .collect();

    for d in &narrowed.districts {
        if let Some(&i) = index.state_of_district(d).and_then(|s| slot.get(&s.id)) {
            rollups[i].districts += 1;
        }
    }
    for b in &narrowed.blocks {
        let (_, state) = index.ancestry_of_block(b);
        if let Some(&i) = state.and_then(|s| slot.get(&s.id)) {
            rollups[i].blocks += 1;
        }
    }
    for sc in &narrowed.schools {
        if let Some(&i) = index.ancestry_of_school(sc).state.and_then(|s| slot.get(&s.id)) {
            rollups[i].schools += 1;
        }
    }

    Statistics {
        total_states: narrowed.states.len(),
        total_districts: narrowed.districts.len(),
        total_blocks: narrowed.blocks.len(),
        total_schools: narrowed.schools.len(),
        total_trades: narrowed.trades.len(),
        total_trainers: narrowed.trainers.len(),
        state_wise: rollups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{HierarchyFilter, narrow, scenario};
    use crate::index::build_index;
    use crate::index::fixtures::*;

    #[test]
    fn rollup_for_single_state() {
        let c = scenario::collections();
        let index = build_index(&c.states, &c.districts, &c.blocks, &c.schools).unwrap();
        let n = narrow(&c, &index, &HierarchyFilter::default().with_state(Some(id("s1"))));
        let stats = statistics(&n, &index);

        assert_eq!(stats.total_schools, 1);
        assert_eq!(
            stats.state_wise,
            vec![StateRollup {
                state_id: id("s1"),
                name: "Uttar Pradesh".into(),
                districts: 2,
                blocks: 1,
                schools: 1,
            }]
        );
        assert_eq!(stats.unattributed_schools(), 0);
    }

    #[test]
    fn unresolved_school_counts_in_total_only() {
        let mut c = scenario::collections();
        c.districts.push(district("d9", "gone", "c1"));
        c.blocks.push(block("b9", "d9", "c1"));
        c.schools.push(school("sc9", "b9", "c1"));
        let index = build_index(&c.states, &c.districts, &c.blocks, &c.schools).unwrap();
        let n = narrow(&c, &index, &HierarchyFilter::default());
        let stats = statistics(&n, &index);

        assert_eq!(stats.total_schools, 2);
        assert_eq!(stats.total_districts, 3);
        let s1 = &stats.state_wise[0];
        assert_eq!((s1.districts, s1.blocks, s1.schools), (2, 1, 1));
        assert_eq!(stats.unattributed_schools(), 1);
    }

    #[test]
    fn rollup_never_exceeds_total() {
        let mut c = scenario::collections();
        c.states.push(state("s2", "c1"));
        c.districts.push(district("d3", "s2", "c1"));
        c.blocks.push(block("b3", "d3", "c1"));
        c.schools.push(school("sc3", "b3", "c1"));
        c.schools.push(school("sc4", "nowhere", "c1"));
        let index = build_index(&c.states, &c.districts, &c.blocks, &c.schools).unwrap();

        for f in [
            HierarchyFilter::default(),
            HierarchyFilter::default().with_state(Some(id("s2"))),
            HierarchyFilter::default().with_district(Some(id("d1"))),
        ] {
            let stats = statistics(&narrow(&c, &index, &f), &index);
            let sum: usize = stats.state_wise.iter().map(|r| r.schools).sum();
            assert!(sum <= stats.total_schools);
        }
    }

    #[test]
    fn serializes_with_dashboard_field_names() {
        let stats = Statistics::default();
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("stateWiseStats").is_some());
        assert!(json.get("totalTrainers").is_some());
    }
}
