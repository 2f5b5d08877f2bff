use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::models::user::UserRole;
use crate::models::{block, company, district, school, school_trade, state, trade, trainer, user};

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Ids of a minimal tenant created by [`seed_tenant`].
#[derive(Debug, Clone, Copy)]
pub struct SeededTenant {
    pub company_id: i64,
    pub admin_user_id: i64,
    pub state_id: i64,
    pub district_id: i64,
    pub block_id: i64,
    pub trade_id: i64,
    pub school_id: i64,
    pub trainer_id: i64,
    pub trainer_user_id: i64,
}

/// Creates a company with one row at every level of the hierarchy.
///
/// Logins are `admin@<slug>.test` and `trainer@<slug>.test`, both with the
/// password `password123`.
pub async fn seed_tenant(db: &DatabaseConnection, name: &str) -> SeededTenant {
    let slug = name.to_lowercase().replace(' ', "-");
    let company = company::Model::create(db, name).await.expect("company");
    let admin = user::Model::create(
        db,
        &format!("{name} Admin"),
        &format!("admin@{slug}.test"),
        "password123",
        UserRole::CompanyAdmin,
        Some(company.id),
    )
    .await
    .expect("admin");

    let st = state::Model::create(db, company.id, "Uttar Pradesh").await.expect("state");
    let di = district::Model::create(db, company.id, st.id, "Lucknow").await.expect("district");
    let bl = block::Model::create(db, company.id, di.id, "Aliganj", "226024").await.expect("block");
    let tr = trade::Model::create(db, company.id, "Electrician", "Vocational").await.expect("trade");
    let sc = school::Model::create(
        db,
        school::NewSchool {
            company_id: company.id,
            block_id: bl.id,
            uid: "UP-0001",
            name: "GIC Aliganj",
            address: "Sector 5",
            location: None,
        },
    )
    .await
    .expect("school");
    school_trade::Model::create(db, sc.id, tr.id).await.expect("school trade");

    let login = user::Model::create(
        db,
        "Asha Verma",
        &format!("trainer@{slug}.test"),
        "password123",
        UserRole::Trainer,
        Some(company.id),
    )
    .await
    .expect("trainer login");
    let staff = trainer::Model::create(
        db,
        trainer::NewTrainer {
            company_id: company.id,
            school_id: sc.id,
            trade_id: tr.id,
            user_id: login.id,
            full_name: "Asha Verma",
            email: &format!("trainer@{slug}.test"),
            phone: "9000000001",
            location: None,
        },
    )
    .await
    .expect("trainer");

    SeededTenant {
        company_id: company.id,
        admin_user_id: admin.id,
        state_id: st.id,
        district_id: di.id,
        block_id: bl.id,
        trade_id: tr.id,
        school_id: sc.id,
        trainer_id: staff.id,
        trainer_user_id: login.id,
    }
}
