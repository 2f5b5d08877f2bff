use chrono::{DateTime, Utc};
use hierarchy::{EntityId, Location};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub block_id: i64,
    /// Government school code, unique per tenant.
    pub uid: String,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::block::Entity",
        from = "Column::BlockId",
        to = "super::block::Column::Id"
    )]
    Block,
    #[sea_orm(has_many = "super::trainer::Entity")]
    Trainers,
}

impl Related<super::block::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Block.def()
    }
}

impl Related<super::trainer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trainers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields for a new school row.
#[derive(Debug, Clone)]
pub struct NewSchool<'a> {
    pub company_id: i64,
    pub block_id: i64,
    pub uid: &'a str,
    pub name: &'a str,
    pub address: &'a str,
    pub location: Option<Location>,
}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, new: NewSchool<'_>) -> Result<Model, DbErr> {
        ActiveModel {
            company_id: Set(new.company_id),
            block_id: Set(new.block_id),
            uid: Set(new.uid.trim().to_owned()),
            name: Set(new.name.trim().to_owned()),
            address: Set(new.address.trim().to_owned()),
            latitude: Set(new.location.map(|l| l.latitude())),
            longitude: Set(new.location.map(|l| l.longitude())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_in_company<C: ConnectionTrait>(db: &C, company_id: i64, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id)
            .filter(Column::CompanyId.eq(company_id))
            .one(db)
            .await
    }

    pub async fn find_by_uid<C: ConnectionTrait>(db: &C, company_id: i64, uid: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::CompanyId.eq(company_id))
            .filter(Column::Uid.eq(uid.trim()))
            .one(db)
            .await
    }

    pub async fn find_by_company<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CompanyId.eq(company_id))
            .order_by_asc(Column::Name)
            .all(db)
            .await
    }

    pub fn location(&self) -> Option<Location> {
        point(self.id, self.latitude, self.longitude)
    }
}

pub(crate) fn point(id: i64, latitude: Option<f64>, longitude: Option<f64>) -> Option<Location> {
    let (lat, lng) = (latitude?, longitude?);
    match Location::new(lat, lng) {
        Ok(loc) => Some(loc),
        Err(e) => {
            warn!(id, error = %e, "ignoring stored location");
            None
        }
    }
}

impl From<Model> for hierarchy::School {
    fn from(m: Model) -> Self {
        let location = m.location();
        Self {
            id: EntityId::from(m.id),
            uid: m.uid,
            name: m.name,
            block_id: EntityId::from(m.block_id),
            address: m.address,
            location,
            company_id: EntityId::from(m.company_id),
            created_at: Some(m.created_at),
            district_id: None,
            state_id: None,
        }
    }
}
