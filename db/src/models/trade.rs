use chrono::{DateTime, Utc};
use hierarchy::EntityId;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

/// A vocational trade in a tenant's catalog.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub category: String,
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
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, company_id: i64, name: &str, category: &str) -> Result<Model, DbErr> {
        ActiveModel {
            company_id: Set(company_id),
            name: Set(name.trim().to_owned()),
            category: Set(category.trim().to_owned()),
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

impl From<Model> for hierarchy::Trade {
    fn from(m: Model) -> Self {
        Self {
            id: EntityId::from(m.id),
            name: m.name,
            category: m.category,
            company_id: EntityId::from(m.company_id),
            created_at: Some(m.created_at),
        }
    }
}
