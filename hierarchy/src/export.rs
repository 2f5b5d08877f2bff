//! Flat per-school rows for spreadsheet export.

use crate::filter::Narrowed;
use crate::id::EntityId;
use crate::index::HierarchyIndex;
use crate::model::{SchoolTrade, Trade, Trainer};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub const EXPORT_FILE_NAME: &str = "schools-trainers-data.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolExportRow {
    #[serde(rename = "School_ID")]
    pub school_id: String,
    #[serde(rename = "School_Name")]
    pub school_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Block")]
    pub block: String,
    #[serde(rename = "Trades")]
    pub trades: String,
    #[serde(rename = "Trainers")]
    pub trainers: String,
    #[serde(rename = "Total_Trainers")]
    pub total_trainers: usize,
    #[serde(rename = "Total_Trades")]
    pub total_trades: usize,
}

/// One row per visible school. A school's trades are its registered offerings,
/// or the trades its trainers teach when none are registered.
pub fn school_rows(
    narrowed: &Narrowed<'_>,
    index: &HierarchyIndex<'_>,
    trades: &[Trade],
    trainers: &[Trainer],
    school_trades: &[SchoolTrade],
) -> Vec<SchoolExportRow> {
    let trade_names: HashMap<&EntityId, &str> = trades.iter().map(|t| (&t.id, t.name.as_str())).collect();

    let mut offered: HashMap<&EntityId, BTreeSet<&EntityId>> = HashMap::new();
    for st in school_trades {
        offered.entry(&st.school_id).or_default().insert(&st.trade_id);
    }
    let mut staff: HashMap<&EntityId, Vec<&Trainer>> = HashMap::new();
    for t in trainers {
        staff.entry(&t.school_id).or_default().push(t);
    }

    narrowed
        .schools
        .iter()
        .map(|school| {
            let ancestry = index.ancestry_of_school(school);
            let school_staff = staff.get(&school.id).map(Vec::as_slice).unwrap_or_default();

            let trade_ids: BTreeSet<&EntityId> = match offered.get(&school.id) {
                Some(ids) if !ids.is_empty() => ids.clone(),
                _ => school_staff.iter().map(|t| &t.trade_id).collect(),
            };
            let names: Vec<&str> = trade_ids
                .iter()
                .filter_map(|id| trade_names.get(id).copied())
                .collect();
            let trainer_names: Vec<&str> = school_staff.iter().map(|t| t.full_name.as_str()).collect();

            SchoolExportRow {
                school_id: school.id.to_string(),
                school_name: school.name.clone(),
                address: school.address.clone(),
                state: ancestry.state.map(|s| s.name.clone()).unwrap_or_default(),
                district: ancestry.district.map(|d| d.name.clone()).unwrap_or_default(),
                block: ancestry.block.map(|b| b.name.clone()).unwrap_or_default(),
                trades: names.join(", "),
                trainers: trainer_names.join(", "),
                total_trainers: trainer_names.len(),
                total_trades: names.len(),
            }
        })
        .collect()
}

fn esc(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn to_csv(rows: &[SchoolExportRow]) -> String {
    let mut csv = String::from(
        "School_ID,School_Name,Address,State,District,Block,Trades,Trainers,Total_Trainers,Total_Trades\n",
    );
    for r in rows {
        let row = format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            esc(&r.school_id),
            esc(&r.school_name),
            esc(&r.address),
            esc(&r.state),
            esc(&r.district),
            esc(&r.block),
            esc(&r.trades),
            esc(&r.trainers),
            r.total_trainers,
            r.total_trades
        );
        csv.push_str(&row);
    }
    csv
}
