//! Helpers shared by the route groups.

use axum::http::StatusCode;
use hierarchy::EntityId;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::response::{Failure, failure};

/// An embedded parent reference as it appears on the wire: `{ "_id": "4", "name": "Lucknow" }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RefView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl RefView {
    pub fn new(id: impl ToString, name: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
        }
    }
}

/// Parses a payload id. A malformed id is `400`; a well-formed id that cannot
/// name a row is reported as `404` `"<what> not found"`.
pub fn parse_ref(field: &str, raw: &str, what: &str) -> Result<i64, Failure> {
    let id = EntityId::parse(raw)
        .map_err(|e| failure(StatusCode::BAD_REQUEST, format!("Invalid {field} '{raw}': {e}")))?;
    id.as_i64()
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("{what} not found")))
}

/// The tenant of an authenticated non-super-admin login.
pub fn tenant_of(user: &AuthUser) -> Result<i64, Failure> {
    user.0
        .company_id
        .ok_or_else(|| failure(StatusCode::FORBIDDEN, "Login is not attached to a company"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ref_distinguishes_malformed_from_unknown() {
        assert_eq!(parse_ref("stateId", " 12 ", "State").unwrap(), 12);
        assert_eq!(parse_ref("stateId", "s!", "State").unwrap_err().0, StatusCode::BAD_REQUEST);
        assert_eq!(parse_ref("stateId", "abc", "State").unwrap_err().0, StatusCode::NOT_FOUND);
    }
}
