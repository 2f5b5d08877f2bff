//! Company-admin dashboard over the latest fetched collections.

use hierarchy::export::{school_rows, to_csv};
use hierarchy::normalize::{
    BlockWire, DistrictWire, NormalizeError, SchoolWire, StateWire, TradeWire, TrainerWire, normalize_all,
};
use hierarchy::snapshot::{DashboardView, RequestGate, Snapshot, SnapshotStore};
use hierarchy::{Collections, EntityId, HierarchyFilter, SchoolTrade, build_index, narrow};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use crate::client::PortalClient;
use crate::error::ClientError;

/// Normalized collections plus the records that failed normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fetched {
    pub collections: Collections,
    pub rejected: Vec<NormalizeError>,
}

fn scalar_id(v: &Value) -> Option<EntityId> {
    match v {
        Value::String(s) => EntityId::parse(s).ok(),
        Value::Number(n) => EntityId::parse(&n.to_string()).ok(),
        Value::Object(o) => o.get("_id").or_else(|| o.get("id")).and_then(scalar_id),
        _ => None,
    }
}

/// School offerings embedded in `getSchools` as `trades: [{_id, name}]` or bare ids.
fn school_trades(raw: &[Value]) -> Vec<SchoolTrade> {
    raw.iter()
        .filter_map(|school| {
            let school_id = school.get("_id").or_else(|| school.get("id")).and_then(scalar_id)?;
            let trades = school.get("trades")?.as_array()?;
            Some(trades.iter().filter_map(scalar_id).map(move |trade_id| SchoolTrade {
                school_id: school_id.clone(),
                trade_id,
            }))
        })
        .flatten()
        .collect()
}

/// Fetches the six tenant collections concurrently and normalizes them.
pub async fn fetch_collections(client: &PortalClient) -> Result<Fetched, ClientError> {
    let tenant = client.company_id()?;
    let none: &[(&str, String)] = &[];
    let (states, districts, blocks, schools, trades, trainers) = tokio::try_join!(
        client.get::<Vec<Value>>("/companyadmins/getStates", none),
        client.get::<Vec<Value>>("/companyadmins/getDistricts", none),
        client.get::<Vec<Value>>("/companyadmins/getBlocks", none),
        client.get::<Vec<Value>>("/companyadmins/getSchools", none),
        client.get::<Vec<Value>>("/companyadmins/getTrades", none),
        client.get::<Vec<Value>>("/companyadmins/getTrainers", none),
    )?;

    let offerings = school_trades(&schools);
    let states = normalize_all::<StateWire>(&tenant, states);
    let districts = normalize_all::<DistrictWire>(&tenant, districts);
    let blocks = normalize_all::<BlockWire>(&tenant, blocks);
    let schools = normalize_all::<SchoolWire>(&tenant, schools);
    let trades = normalize_all::<TradeWire>(&tenant, trades);
    let trainers = normalize_all::<TrainerWire>(&tenant, trainers);

    let rejected: Vec<NormalizeError> = [
        states.rejected,
        districts.rejected,
        blocks.rejected,
        schools.rejected,
        trades.rejected,
        trainers.rejected,
    ]
    .concat();
    if !rejected.is_empty() {
        warn!(count = rejected.len(), "records rejected at the normalization boundary");
    }

    Ok(Fetched {
        collections: Collections {
            states: states.accepted,
            districts: districts.accepted,
            blocks: blocks.accepted,
            schools: schools.accepted,
            trades: trades.accepted,
            trainers: trainers.accepted,
            school_trades: offerings,
        },
        rejected,
    })
}

fn query_of(filter: &HierarchyFilter) -> Vec<(&'static str, String)> {
    [
        ("stateId", &filter.state_id),
        ("districtId", &filter.district_id),
        ("blockId", &filter.block_id),
    ]
    .into_iter()
    .filter_map(|(key, id)| id.as_ref().map(|id| (key, id.to_string())))
    .collect()
}

/// The dashboard state of one company-admin screen: the latest snapshot, the
/// current selection and the gate that drops superseded server responses.
#[derive(Debug)]
pub struct DashboardSession {
    client: Arc<PortalClient>,
    store: SnapshotStore,
    gate: RequestGate,
    filter: RwLock<HierarchyFilter>,
    rejected: RwLock<Vec<NormalizeError>>,
}

impl DashboardSession {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            client,
            store: SnapshotStore::new(),
            gate: RequestGate::new(),
            filter: RwLock::new(HierarchyFilter::default()),
            rejected: RwLock::new(Vec::new()),
        }
    }

    /// Refetches every collection. On failure the previous snapshot stays.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, ClientError> {
        let snapshot = self
            .store
            .refresh(async {
                let fetched = fetch_collections(&self.client).await?;
                *self.rejected.write().unwrap_or_else(PoisonError::into_inner) = fetched.rejected;
                Ok::<_, ClientError>(fetched.collections)
            })
            .await?;
        info!(generation = snapshot.generation, schools = snapshot.collections.schools.len(), "dashboard refreshed");
        Ok(snapshot)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// Records rejected by the last successful refresh.
    pub fn rejected(&self) -> Vec<NormalizeError> {
        self.rejected.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn filter(&self) -> HierarchyFilter {
        self.filter.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replaces the selection. Server responses requested before the change
    /// are dropped on arrival.
    pub fn set_filter(&self, filter: HierarchyFilter) {
        let mut current = self.filter.write().unwrap_or_else(PoisonError::into_inner);
        *current = filter;
        self.gate.begin();
    }

    /// Sets the selection from raw dropdown values (`""` and `"all"` clear a level).
    pub fn select(&self, state: Option<&str>, district: Option<&str>, block: Option<&str>) -> Result<(), ClientError> {
        self.set_filter(HierarchyFilter::parse(state, district, block)?);
        Ok(())
    }

    /// Narrowed collections and statistics for the current filter on the
    /// current snapshot.
    pub fn view(&self) -> Result<DashboardView, ClientError> {
        let filter = self.filter.read().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.store.current();
        Ok(DashboardView::compute(&snapshot, &filter)?)
    }

    /// The server-computed dashboard for the current selection. `None` when
    /// the selection changed or another call started before this one returned.
    pub async fn server_view(&self) -> Result<Option<Value>, ClientError> {
        let requested = self.filter();
        let ticket = self.gate.begin();
        let value: Value = self
            .client
            .get("/companyadmins/dashboard", &query_of(&requested))
            .await?;
        if self.filter() != requested {
            warn!(?requested, "dropping dashboard response for a superseded selection");
            return Ok(None);
        }
        Ok(self.gate.accept(ticket, value))
    }

    /// CSV of the visible schools, built from the local snapshot.
    pub fn export_csv(&self) -> Result<String, ClientError> {
        let filter = self.filter();
        let snapshot = self.store.current();
        let c = &snapshot.collections;
        let index = build_index(&c.states, &c.districts, &c.blocks, &c.schools)?;
        let narrowed = narrow(c, &index, &filter);
        Ok(to_csv(&school_rows(&narrowed, &index, &c.trades, &c.trainers, &c.school_trades)))
    }

    /// The same export produced by the server.
    pub async fn download_csv(&self) -> Result<String, ClientError> {
        self.client
            .get_text("/companyadmins/export", &query_of(&self.filter()))
            .await
    }
}
