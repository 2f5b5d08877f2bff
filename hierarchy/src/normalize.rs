//! Wire records → internal records.
//!
//! The REST API returns Mongo-style documents: ids under `_id` (sometimes
//! `id`), numeric or string keys, and foreign keys that are either a plain id
//! or an embedded parent object (`{"_id": "...", "name": "..."}`). Each entity
//! has one adapter here. A record that cannot be mapped is rejected with a
//! [`NormalizeError`] and never reaches the index.

use crate::id::{EntityId, IdError};
use crate::model::{
    Block, District, GeoPoint, Location, LocationError, School, State, Trade, Trainer, TrainerStatus,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("{entity} record is missing {field}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("{entity} record has invalid {field}: {source}")]
    InvalidId {
        entity: &'static str,
        field: &'static str,
        #[source]
        source: IdError,
    },
    #[error("{entity} {id} has invalid location: {source}")]
    InvalidLocation {
        entity: &'static str,
        id: EntityId,
        #[source]
        source: LocationError,
    },
    #[error("{entity} record could not be decoded: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(i64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

/// A foreign key as the API sends it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefWire {
    Id(Scalar),
    Embedded(Box<EmbeddedRef>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: Scalar,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state_id: Option<RefWire>,
    #[serde(default)]
    pub district_id: Option<RefWire>,
}

impl RefWire {
    fn raw_id(&self) -> String {
        match self {
            RefWire::Id(s) => s.clone().into_string(),
            RefWire::Embedded(e) => e.id.clone().into_string(),
        }
    }

    fn embedded(&self) -> Option<&EmbeddedRef> {
        match self {
            RefWire::Embedded(e) => Some(e),
            RefWire::Id(_) => None,
        }
    }
}

fn parse_id(entity: &'static str, field: &'static str, raw: String) -> Result<EntityId, NormalizeError> {
    EntityId::parse(&raw).map_err(|source| NormalizeError::InvalidId {
        entity,
        field,
        source,
    })
}

fn required(
    entity: &'static str,
    field: &'static str,
    value: Option<&RefWire>,
) -> Result<EntityId, NormalizeError> {
    let value = value.ok_or(NormalizeError::MissingField { entity, field })?;
    parse_id(entity, field, value.raw_id())
}

fn optional(
    entity: &'static str,
    field: &'static str,
    value: Option<&RefWire>,
) -> Result<Option<EntityId>, NormalizeError> {
    value.map(|v| parse_id(entity, field, v.raw_id())).transpose()
}

fn required_text(entity: &'static str, field: &'static str, value: Option<String>) -> Result<String, NormalizeError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(NormalizeError::MissingField { entity, field }),
    }
}

fn tenant_of(entity: &'static str, company: Option<&RefWire>, tenant: &EntityId) -> Result<EntityId, NormalizeError> {
    Ok(optional(entity, "companyId", company)?.unwrap_or_else(|| tenant.clone()))
}

fn location(entity: &'static str, id: &EntityId, point: Option<GeoPoint>) -> Result<Option<Location>, NormalizeError> {
    point
        .map(|p| {
            Location::try_from(p).map_err(|source| NormalizeError::InvalidLocation {
                entity,
                id: id.clone(),
                source,
            })
        })
        .transpose()
}

/// A wire record that maps onto one internal record for a given tenant.
/// `companyId` defaults to the tenant when the API omits it.
pub trait WireRecord: DeserializeOwned {
    const ENTITY: &'static str;
    type Output;

    fn normalize(self, tenant: &EntityId) -> Result<Self::Output, NormalizeError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<RefWire>,
    pub name: Option<String>,
    #[serde(default)]
    pub company_id: Option<RefWire>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WireRecord for StateWire {
    const ENTITY: &'static str = "state";
    type Output = State;

    fn normalize(self, tenant: &EntityId) -> Result<State, NormalizeError> {
        Ok(State {
            id: required(Self::ENTITY, "_id", self.id.as_ref())?,
            name: required_text(Self::ENTITY, "name", self.name)?,
            company_id: tenant_of(Self::ENTITY, self.company_id.as_ref(), tenant)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<RefWire>,
    pub name: Option<String>,
    pub state_id: Option<RefWire>,
    #[serde(default)]
    pub company_id: Option<RefWire>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WireRecord for DistrictWire {
    const ENTITY: &'static str = "district";
    type Output = District;

    fn normalize(self, tenant: &EntityId) -> Result<District, NormalizeError> {
        Ok(District {
            id: required(Self::ENTITY, "_id", self.id.as_ref())?,
            name: required_text(Self::ENTITY, "name", self.name)?,
            state_id: required(Self::ENTITY, "stateId", self.state_id.as_ref())?,
            company_id: tenant_of(Self::ENTITY, self.company_id.as_ref(), tenant)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<RefWire>,
    pub name: Option<String>,
    pub district_id: Option<RefWire>,
    #[serde(default)]
    pub pincode: Option<Scalar>,
    #[serde(default)]
    pub company_id: Option<RefWire>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WireRecord for BlockWire {
    const ENTITY: &'static str = "block";
    type Output = Block;

    fn normalize(self, tenant: &EntityId) -> Result<Block, NormalizeError> {
        Ok(Block {
            id: required(Self::ENTITY, "_id", self.id.as_ref())?,
            name: required_text(Self::ENTITY, "name", self.name)?,
            district_id: required(Self::ENTITY, "districtId", self.district_id.as_ref())?,
            pincode: self.pincode.map(Scalar::into_string).unwrap_or_default(),
            company_id: tenant_of(Self::ENTITY, self.company_id.as_ref(), tenant)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<RefWire>,
    #[serde(default)]
    pub uid: Option<Scalar>,
    pub name: Option<String>,
    pub block_id: Option<RefWire>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub district_id: Option<RefWire>,
    #[serde(default)]
    pub state_id: Option<RefWire>,
    #[serde(default)]
    pub company_id: Option<RefWire>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WireRecord for SchoolWire {
    const ENTITY: &'static str = "school";
    type Output = School;

    /// The denormalized district and state come from the school itself or,
    /// failing that, from the embedded block and district documents.
    fn normalize(self, tenant: &EntityId) -> Result<School, NormalizeError> {
        let e = Self::ENTITY;
        let id = required(e, "_id", self.id.as_ref())?;
        let block = self.block_id.as_ref();
        let embedded_block = block.and_then(RefWire::embedded);

        let district_ref = self
            .district_id
            .as_ref()
            .or_else(|| embedded_block.and_then(|b| b.district_id.as_ref()));
        let state_ref = self.state_id.as_ref().or_else(|| {
            district_ref
                .and_then(RefWire::embedded)
                .and_then(|d| d.state_id.as_ref())
                .or_else(|| embedded_block.and_then(|b| b.state_id.as_ref()))
        });

        Ok(School {
            location: location(e, &id, self.location)?,
            uid: self.uid.map(Scalar::into_string).unwrap_or_default(),
            name: required_text(e, "name", self.name)?,
            block_id: required(e, "blockId", block)?,
            address: self.address.unwrap_or_default(),
            company_id: tenant_of(e, self.company_id.as_ref(), tenant)?,
            created_at: self.created_at,
            district_id: optional(e, "districtId", district_ref)?,
            state_id: optional(e, "stateId", state_ref)?,
            id,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<RefWire>,
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub company_id: Option<RefWire>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WireRecord for TradeWire {
    const ENTITY: &'static str = "trade";
    type Output = Trade;

    fn normalize(self, tenant: &EntityId) -> Result<Trade, NormalizeError> {
        Ok(Trade {
            id: required(Self::ENTITY, "_id", self.id.as_ref())?,
            name: required_text(Self::ENTITY, "name", self.name)?,
            category: self.category.unwrap_or_default(),
            company_id: tenant_of(Self::ENTITY, self.company_id.as_ref(), tenant)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<RefWire>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<Scalar>,
    pub school_id: Option<RefWire>,
    pub trade_id: Option<RefWire>,
    #[serde(default)]
    pub status: Option<TrainerStatus>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub company_id: Option<RefWire>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WireRecord for TrainerWire {
    const ENTITY: &'static str = "trainer";
    type Output = Trainer;

    fn normalize(self, tenant: &EntityId) -> Result<Trainer, NormalizeError> {
        let e = Self::ENTITY;
        let id = required(e, "_id", self.id.as_ref())?;
        Ok(Trainer {
            location: location(e, &id, self.location)?,
            full_name: required_text(e, "fullName", self.full_name)?,
            email: self.email.unwrap_or_default(),
            phone: self.phone.map(Scalar::into_string).unwrap_or_default(),
            school_id: required(e, "schoolId", self.school_id.as_ref())?,
            trade_id: required(e, "tradeId", self.trade_id.as_ref())?,
            status: self.status.unwrap_or_default(),
            company_id: tenant_of(e, self.company_id.as_ref(), tenant)?,
            created_at: self.created_at,
            id,
        })
    }
}

/// Records that passed the boundary, and the reasons for the ones that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<NormalizeError>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Decodes and normalizes each raw document independently, so one bad record
/// does not discard the rest of the collection.
pub fn normalize_all<W: WireRecord>(tenant: &EntityId, raw: Vec<serde_json::Value>) -> Normalized<W::Output> {
    let mut out = Normalized::default();
    for value in raw {
        let result = serde_json::from_value::<W>(value)
            .map_err(|e| NormalizeError::Decode {
                entity: W::ENTITY,
                message: e.to_string(),
            })
            .and_then(|w| w.normalize(tenant));
        match result {
            Ok(record) => out.accepted.push(record),
            Err(err) => {
                warn!(entity = W::ENTITY, error = %err, "rejected wire record");
                out.rejected.push(err);
            }
        }
    }
    out
}
