use chrono::{DateTime, Utc};
use hierarchy::EntityId;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "districts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub state_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::state::Entity",
        from = "Column::StateId",
        to = "super::state::Column::Id"
    )]
    State,
    #[sea_orm(has_many = "super::block::Entity")]
    Blocks,
}

impl Related<super::state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl Related<super::block::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blocks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, company_id: i64, state_id: i64, name: &str) -> Result<Model, DbErr> {
        ActiveModel {
            company_id: Set(company_id),
            state_id: Set(state_id),
            name: Set(name.trim().to_owned()),
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

    pub async fn find_by_company<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CompanyId.eq(company_id))
            .order_by_asc(Column::Name)
            .all(db)
            .await
    }
}

impl From<Model> for hierarchy::District {
    fn from(m: Model) -> Self {
        Self {
            id: EntityId::from(m.id),
            name: m.name,
            state_id: EntityId::from(m.state_id),
            company_id: EntityId::from(m.company_id),
            created_at: Some(m.created_at),
        }
    }
}
