//! Internal hierarchy records.
//!
//! These are the normalized shapes the engine works on. Wire shapes live in
//! [`crate::normalize`]; database rows convert into these in the `db` crate.

use crate::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Implemented by every keyed record so the index can treat collections uniformly.
pub trait Keyed {
    const COLLECTION: &'static str;

    fn id(&self) -> &EntityId;
    fn company_id(&self) -> &EntityId;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: EntityId,
    pub name: String,
    pub company_id: EntityId,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: EntityId,
    pub name: String,
    pub state_id: EntityId,
    pub company_id: EntityId,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: EntityId,
    pub name: String,
    pub district_id: EntityId,
    pub pincode: String,
    pub company_id: EntityId,
    pub created_at: Option<DateTime<Utc>>,
}

/// A school. `state_id` and `district_id` are denormalized copies that may be
/// stale; [`crate::index::HierarchyIndex::ancestry_of_school`] decides when they are trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: EntityId,
    pub uid: String,
    pub name: String,
    pub block_id: EntityId,
    pub address: String,
    pub location: Option<Location>,
    pub company_id: EntityId,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub district_id: Option<EntityId>,
    #[serde(default)]
    pub state_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: EntityId,
    pub name: String,
    pub category: String,
    pub company_id: EntityId,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: EntityId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub school_id: EntityId,
    pub trade_id: EntityId,
    pub status: TrainerStatus,
    pub location: Option<Location>,
    pub company_id: EntityId,
    pub created_at: Option<DateTime<Utc>>,
}

/// Explicit per-school trade offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolTrade {
    pub school_id: EntityId,
    pub trade_id: EntityId,
}

/// All collections of one tenant, as fetched at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    pub states: Vec<State>,
    pub districts: Vec<District>,
    pub blocks: Vec<Block>,
    pub schools: Vec<School>,
    pub trades: Vec<Trade>,
    pub trainers: Vec<Trainer>,
    #[serde(default)]
    pub school_trades: Vec<SchoolTrade>,
}

macro_rules! keyed {
    ($ty:ty, $name:literal) => {
        impl Keyed for $ty {
            const COLLECTION: &'static str = $name;

            fn id(&self) -> &EntityId {
                &self.id
            }

            fn company_id(&self) -> &EntityId {
                &self.company_id
            }
        }
    };
}

keyed!(State, "states");
keyed!(District, "districts");
keyed!(Block, "blocks");
keyed!(School, "schools");
keyed!(Trade, "trades");
keyed!(Trainer, "trainers");

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
    #[error("unsupported geometry type '{0}', expected 'Point'")]
    GeometryType(String),
}

/// A validated WGS84 position. Serialized as a GeoJSON point
/// (`{"type":"Point","coordinates":[lng,lat]}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoPoint", into = "GeoPoint")]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl From<Location> for GeoPoint {
    fn from(loc: Location) -> Self {
        Self {
            kind: "Point".into(),
            coordinates: [loc.longitude, loc.latitude],
        }
    }
}

impl TryFrom<GeoPoint> for Location {
    type Error = LocationError;

    fn try_from(point: GeoPoint) -> Result<Self, Self::Error> {
        if point.kind != "Point" {
            return Err(LocationError::GeometryType(point.kind));
        }
        let [longitude, latitude] = point.coordinates;
        Location::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_round_trips_as_geojson() {
        let loc = Location::new(26.85, 80.95).unwrap();
        let json = serde_json::to_value(loc).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], 80.95);
        assert_eq!(json["coordinates"][1], 26.85);
    }

    #[test]
    fn location_rejects_out_of_range() {
        assert_eq!(Location::new(91.0, 0.0), Err(LocationError::Latitude(91.0)));
        let bad = r#"{"type":"Polygon","coordinates":[0.0,0.0]}"#;
        assert!(serde_json::from_str::<Location>(bad).is_err());
    }
}
