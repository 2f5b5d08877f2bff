use chrono::{DateTime, Utc};
use hierarchy::EntityId;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "blocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub district_id: i64,
    pub name: String,
    /// Six-digit postal code.
    pub pincode: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        company_id: i64,
        district_id: i64,
        name: &str,
        pincode: &str,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            company_id: Set(company_id),
            district_id: Set(district_id),
            name: Set(name.trim().to_owned()),
            pincode: Set(pincode.trim().to_owned()),
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

impl From<Model> for hierarchy::Block {
    fn from(m: Model) -> Self {
        Self {
            id: EntityId::from(m.id),
            name: m.name,
            district_id: EntityId::from(m.district_id),
            pincode: m.pincode,
            company_id: EntityId::from(m.company_id),
            created_at: Some(m.created_at),
        }
    }
}
