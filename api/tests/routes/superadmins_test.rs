#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, send};
    use axum::http::StatusCode;
    use db::models::user::{self, UserRole};
    use db::test_utils::seed_tenant;
    use sea_orm::DatabaseConnection;
    use serde_json::json;
    use serial_test::serial;

    async fn login_as_root(app: &axum::Router, db: &DatabaseConnection) -> String {
        user::Model::create(db, "root", "root@portal.test", "rootpass123", UserRole::SuperAdmin, None)
            .await
            .unwrap();
        let body = json!({"email": "root@portal.test", "password": "rootpass123"});
        let (status, json) = send(app, request("POST", "/api/superadmins/login", None, Some(body))).await;
        assert_eq!(status, StatusCode::OK);
        json["data"]["token"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    #[serial]
    async fn creates_company_with_admin_login() {
        let (app, db) = make_test_app().await;
        let token = login_as_root(&app, &db).await;

        let body = json!({
            "name": "Initech",
            "username": "Bill",
            "email": "bill@initech.test",
            "password": "tpsreports"
        });
        let (status, json) = send(&app, request("POST", "/api/superadmins/companies", Some(&token), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["name"], "Initech");
        assert_eq!(json["data"]["adminEmail"], "bill@initech.test");

        let login = json!({"email": "bill@initech.test", "password": "tpsreports"});
        let (status, json) = send(&app, request("POST", "/api/companyadmins/login", None, Some(login))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["user"]["role"], "companyadmin");

        let (status, _) = send(&app, request("POST", "/api/superadmins/companies", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    #[serial]
    async fn taken_admin_email_is_409_and_creates_nothing() {
        let (app, db) = make_test_app().await;
        let token = login_as_root(&app, &db).await;
        seed_tenant(&db, "Acme").await;

        let body = json!({
            "name": "Copycat",
            "username": "Cat",
            "email": "admin@acme.test",
            "password": "meowmeow1"
        });
        let (status, _) = send(&app, request("POST", "/api/superadmins/companies", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, json) = send(&app, request("GET", "/api/superadmins/companies", Some(&token), None)).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn short_password_is_400() {
        let (app, db) = make_test_app().await;
        let token = login_as_root(&app, &db).await;

        let body = json!({"name": "Tiny", "username": "T", "email": "t@tiny.test", "password": "short"});
        let (status, json) = send(&app, request("POST", "/api/superadmins/companies", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Password must be at least 8 characters");
    }

    #[tokio::test]
    #[serial]
    async fn lists_every_company_with_statistics() {
        let (app, db) = make_test_app().await;
        let token = login_as_root(&app, &db).await;
        seed_tenant(&db, "Acme").await;
        seed_tenant(&db, "Globex").await;

        let (status, json) = send(&app, request("GET", "/api/superadmins/companies", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let companies = json["data"].as_array().unwrap();
        assert_eq!(companies.len(), 2);
        for c in companies {
            assert_eq!(c["statistics"]["totalSchools"], 1);
            assert_eq!(c["statistics"]["totalTrainers"], 1);
            assert_eq!(c["trainersPresentToday"], 0);
        }
    }
}
