#[cfg(test)]
mod tests {
    use crate::helpers::app::{TEST_SECRET, make_test_app, request, send, token_for};
    use api::auth::Claims;
    use axum::http::StatusCode;
    use db::models::user::UserRole;
    use db::test_utils::seed_tenant;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn company_admin_login_returns_token_and_user() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;

        let body = json!({"email": "admin@acme.test", "password": "password123"});
        let (status, json) = send(&app, request("POST", "/api/companyadmins/login", None, Some(body))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(json["data"]["expiresAt"].is_string());
        assert_eq!(json["data"]["user"]["_id"], t.admin_user_id.to_string());
        assert_eq!(json["data"]["user"]["role"], "companyadmin");
        assert_eq!(json["data"]["user"]["companyId"], t.company_id.to_string());
        assert!(json["data"]["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn login_rejects_wrong_password_and_wrong_role() {
        let (app, db) = make_test_app().await;
        seed_tenant(&db, "Acme").await;

        let wrong = json!({"email": "admin@acme.test", "password": "nope"});
        let (status, _) = send(&app, request("POST", "/api/companyadmins/login", None, Some(wrong))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let right = json!({"email": "admin@acme.test", "password": "password123"});
        let (status, json) = send(&app, request("POST", "/api/superadmins/login", None, Some(right.clone()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);

        let (status, _) = send(&app, request("POST", "/api/management/trainers/login", None, Some(right))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn login_validates_email_format() {
        let (app, _db) = make_test_app().await;
        let body = json!({"email": "not-an-email", "password": "x"});
        let (status, json) = send(&app, request("POST", "/api/companyadmins/login", None, Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Invalid email format");
    }

    #[tokio::test]
    #[serial]
    async fn guards_answer_401_without_token_and_403_for_other_roles() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;

        let (status, json) = send(&app, request("GET", "/api/companyadmins/getStates", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);

        let (status, _) = send(&app, request("GET", "/api/companyadmins/getStates", Some("garbage"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let trainer = token_for(t.trainer_user_id, UserRole::Trainer, Some(t.company_id));
        let (status, _) = send(&app, request("GET", "/api/companyadmins/getStates", Some(&trainer), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = token_for(t.admin_user_id, UserRole::CompanyAdmin, Some(t.company_id));
        let (status, _) = send(&app, request("GET", "/api/trainers/calendar", Some(&admin), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, request("GET", "/api/superadmins/companies", Some(&admin), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn expired_token_is_rejected() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;

        let claims = Claims {
            sub: t.admin_user_id,
            exp: 1_000_000,
            role: UserRole::CompanyAdmin,
            company_id: Some(t.company_id),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap();

        let (status, _) = send(&app, request("GET", "/api/companyadmins/getStates", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
