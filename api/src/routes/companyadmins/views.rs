//! Wire shapes of hierarchy records: `_id` keys and parents embedded as
//! `{ "_id", "name" }`, the way the dashboards consume them.

use chrono::{DateTime, Utc};
use hierarchy::model::{GeoPoint, TrainerStatus};
use hierarchy::{Block, District, HierarchyIndex, School, State, Trade, Trainer};
use serde::Serialize;
use std::collections::HashMap;

use crate::routes::common::RefView;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub company_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&State> for StateView {
    fn from(s: &State) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            company_id: s.company_id.to_string(),
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub state_id: RefView,
    pub company_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl DistrictView {
    pub fn new(d: &District, index: &HierarchyIndex<'_>) -> Self {
        let state_name = index.state_of_district(d).map(|s| s.name.clone()).unwrap_or_default();
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            state_id: RefView::new(&d.state_id, state_name),
            company_id: d.company_id.to_string(),
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub district_id: RefView,
    pub pincode: String,
    pub company_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl BlockView {
    pub fn new(b: &Block, index: &HierarchyIndex<'_>) -> Self {
        let district_name = index.district_of_block(b).map(|d| d.name.clone()).unwrap_or_default();
        Self {
            id: b.id.to_string(),
            name: b.name.clone(),
            district_id: RefView::new(&b.district_id, district_name),
            pincode: b.pincode.clone(),
            company_id: b.company_id.to_string(),
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub company_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Trade> for TradeView {
    fn from(t: &Trade) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            category: t.category.clone(),
            company_id: t.company_id.to_string(),
            created_at: t.created_at,
        }
    }
}

/// A school with its block embedded and the derived district and state
/// attached as denormalized references.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolView {
    #[serde(rename = "_id")]
    pub id: String,
    pub uid: String,
    pub name: String,
    pub block_id: RefView,
    pub district_id: Option<RefView>,
    pub state_id: Option<RefView>,
    pub address: String,
    pub location: Option<GeoPoint>,
    pub trades: Vec<RefView>,
    pub company_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl SchoolView {
    pub fn new(s: &School, index: &HierarchyIndex<'_>, trades: Vec<RefView>) -> Self {
        let ancestry = index.ancestry_of_school(s);
        Self {
            id: s.id.to_string(),
            uid: s.uid.clone(),
            name: s.name.clone(),
            block_id: RefView::new(&s.block_id, ancestry.block.map(|b| b.name.clone()).unwrap_or_default()),
            district_id: ancestry.district.map(|d| RefView::new(&d.id, d.name.clone())),
            state_id: ancestry.state.map(|st| RefView::new(&st.id, st.name.clone())),
            address: s.address.clone(),
            location: s.location.map(GeoPoint::from),
            trades,
            company_id: s.company_id.to_string(),
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerView {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub school_id: RefView,
    pub trade_id: RefView,
    pub status: TrainerStatus,
    pub location: Option<GeoPoint>,
    pub company_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl TrainerView {
    pub fn new(t: &Trainer, school_names: &HashMap<String, String>, trade_names: &HashMap<String, String>) -> Self {
        let name_of = |names: &HashMap<String, String>, id: &str| names.get(id).cloned().unwrap_or_default();
        Self {
            id: t.id.to_string(),
            full_name: t.full_name.clone(),
            email: t.email.clone(),
            phone: t.phone.clone(),
            school_id: RefView::new(&t.school_id, name_of(school_names, t.school_id.as_str())),
            trade_id: RefView::new(&t.trade_id, name_of(trade_names, t.trade_id.as_str())),
            status: t.status,
            location: t.location.map(GeoPoint::from),
            company_id: t.company_id.to_string(),
            created_at: t.created_at,
        }
    }
}
