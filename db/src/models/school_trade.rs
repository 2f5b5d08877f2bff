use hierarchy::EntityId;
use sea_orm::entity::prelude::*;
use sea_orm::{JoinType, QuerySelect, Set};

/// A trade offered at a school.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "school_trades")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub school_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub trade_id: i64,
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

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, school_id: i64, trade_id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            school_id: Set(school_id),
            trade_id: Set(trade_id),
        }
        .insert(db)
        .await
    }

    /// Offerings of every school owned by `company_id`.
    pub async fn find_by_company<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, Relation::School.def())
            .filter(super::school::Column::CompanyId.eq(company_id))
            .all(db)
            .await
    }
}

impl From<Model> for hierarchy::SchoolTrade {
    fn from(m: Model) -> Self {
        Self {
            school_id: EntityId::from(m.school_id),
            trade_id: EntityId::from(m.trade_id),
        }
    }
}
