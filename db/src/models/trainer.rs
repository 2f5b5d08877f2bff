use chrono::{DateTime, Utc};
use hierarchy::model::TrainerStatus;
use hierarchy::{EntityId, Location};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::school::point;

/// A trainer teaching one trade at one school. Each trainer has a login in `users`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trainers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub school_id: i64,
    pub trade_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub status: Status,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trainer_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id"
    )]
    School,
    #[sea_orm(
        belongs_to = "super::trade::Entity",
        from = "Column::TradeId",
        to = "super::trade::Column::Id"
    )]
    Trade,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::trade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trade.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewTrainer<'a> {
    pub company_id: i64,
    pub school_id: i64,
    pub trade_id: i64,
    pub user_id: i64,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub location: Option<Location>,
}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, new: NewTrainer<'_>) -> Result<Model, DbErr> {
        ActiveModel {
            company_id: Set(new.company_id),
            school_id: Set(new.school_id),
            trade_id: Set(new.trade_id),
            user_id: Set(new.user_id),
            full_name: Set(new.full_name.trim().to_owned()),
            email: Set(new.email.trim().to_lowercase()),
            phone: Set(new.phone.trim().to_owned()),
            status: Set(Status::Active),
            latitude: Set(new.location.map(|l| l.latitude())),
            longitude: Set(new.location.map(|l| l.longitude())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn find_by_company<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CompanyId.eq(company_id))
            .order_by_asc(Column::FullName)
            .all(db)
            .await
    }

    pub async fn count_by_company<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::CompanyId.eq(company_id))
            .count(db)
            .await
    }

    pub fn location(&self) -> Option<Location> {
        point(self.id, self.latitude, self.longitude)
    }
}

impl From<Status> for TrainerStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::Active => TrainerStatus::Active,
            Status::Inactive => TrainerStatus::Inactive,
        }
    }
}

impl From<Model> for hierarchy::Trainer {
    fn from(m: Model) -> Self {
        let location = m.location();
        Self {
            id: EntityId::from(m.id),
            full_name: m.full_name,
            email: m.email,
            phone: m.phone,
            school_id: EntityId::from(m.school_id),
            trade_id: EntityId::from(m.trade_id),
            status: m.status.into(),
            location,
            company_id: EntityId::from(m.company_id),
            created_at: Some(m.created_at),
        }
    }
}
