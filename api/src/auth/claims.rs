use db::models::user::UserRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub role: UserRole,
    /// Tenant of the login; absent for super admins.
    #[serde(default, rename = "companyId")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
