use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a login in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name.
    pub username: String,
    /// Unique login email, stored lowercase.
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// Owning tenant. `None` only for super admins.
    pub company_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which dashboard a login belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(ascii_case_insensitive)]
pub enum UserRole {
    #[sea_orm(string_value = "super_admin")]
    #[serde(rename = "superadmin")]
    #[strum(serialize = "superadmin")]
    SuperAdmin,

    #[sea_orm(string_value = "company_admin")]
    #[serde(rename = "companyadmin")]
    #[strum(serialize = "companyadmin")]
    CompanyAdmin,

    #[sea_orm(string_value = "trainer")]
    #[serde(rename = "trainer")]
    #[strum(serialize = "trainer")]
    Trainer,
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

fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
}

impl Model {
    /// Inserts a user with an Argon2-hashed password.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
        company_id: Option<i64>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            username: Set(username.trim().to_owned()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(hash_password(password)?),
            role: Set(role),
            company_id: Set(company_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Looks up `email` and checks `password` and `role`. Any mismatch is `None`,
    /// so callers cannot tell which part failed.
    pub async fn authenticate<C: ConnectionTrait>(
        db: &C,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Option<Model>, DbErr> {
        Ok(Self::find_by_email(db, email)
            .await?
            .filter(|user| user.role == role && user.verify_password(password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_hashes_and_authenticates_by_role() {
        let db = setup_test_db().await;
        let acme = company::Model::create(&db, "Acme").await.unwrap();
        let user = Model::create(&db, "Admin", " Admin@Acme.io ", "s3cret!", UserRole::CompanyAdmin, Some(acme.id))
            .await
            .unwrap();

        assert_eq!(user.email, "admin@acme.io");
        assert_ne!(user.password_hash, "s3cret!");
        assert!(user.verify_password("s3cret!"));
        assert!(!user.verify_password("wrong"));

        let ok = Model::authenticate(&db, "admin@acme.io", "s3cret!", UserRole::CompanyAdmin)
            .await
            .unwrap();
        assert_eq!(ok.map(|u| u.id), Some(user.id));

        let wrong_role = Model::authenticate(&db, "admin@acme.io", "s3cret!", UserRole::Trainer)
            .await
            .unwrap();
        assert!(wrong_role.is_none());
    }

    #[test]
    fn role_names_match_the_wire() {
        assert_eq!(UserRole::SuperAdmin.to_string(), "superadmin");
        assert_eq!("CompanyAdmin".parse::<UserRole>().unwrap(), UserRole::CompanyAdmin);
        assert_eq!(serde_json::to_value(UserRole::Trainer).unwrap(), "trainer");
    }
}
