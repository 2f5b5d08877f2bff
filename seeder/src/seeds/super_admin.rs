use crate::seed::Seeder;
use db::models::user::{self, UserRole};
use sea_orm::{DatabaseConnection, DbErr};
use util::config;

/// The platform login from `SUPER_ADMIN_EMAIL` / `SUPER_ADMIN_PASSWORD`.
pub struct SuperAdminSeeder;

#[async_trait::async_trait]
impl Seeder for SuperAdminSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let email = config::super_admin_email();
        if user::Model::find_by_email(db, &email).await?.is_some() {
            return Ok(());
        }
        let password = match config::super_admin_password() {
            p if p.is_empty() => "superadmin123".to_owned(),
            p => p,
        };
        user::Model::create(db, "superadmin", &email, &password, UserRole::SuperAdmin, None).await?;
        Ok(())
    }
}
