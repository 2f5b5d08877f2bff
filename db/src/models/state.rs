use chrono::{DateTime, Utc};
use hierarchy::EntityId;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "states")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(has_many = "super::district::Entity")]
    Districts,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Districts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, company_id: i64, name: &str) -> Result<Model, DbErr> {
        ActiveModel {
            company_id: Set(company_id),
            name: Set(name.trim().to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// The state with `id`, only if it belongs to `company_id`.
    pub async fn find_in_company<C: ConnectionTrait>(db: &C, company_id: i64, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id)
            .filter(Column::CompanyId.eq(company_id))
            .one(db)
            .await
    }

    pub async fn find_by_name<C: ConnectionTrait>(db: &C, company_id: i64, name: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::CompanyId.eq(company_id))
            .filter(Column::Name.eq(name.trim()))
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
}

impl From<Model> for hierarchy::State {
    fn from(m: Model) -> Self {
        Self {
            id: EntityId::from(m.id),
            name: m.name,
            company_id: EntityId::from(m.company_id),
            created_at: Some(m.created_at),
        }
    }
}
