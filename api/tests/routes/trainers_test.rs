#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, send, token_for};
    use axum::http::StatusCode;
    use chrono::{Datelike, Utc};
    use db::models::user::UserRole;
    use db::test_utils::{SeededTenant, seed_tenant};
    use serde_json::json;
    use serial_test::serial;

    fn trainer(t: &SeededTenant) -> String {
        token_for(t.trainer_user_id, UserRole::Trainer, Some(t.company_id))
    }

    fn here() -> serde_json::Value {
        json!({"latitude": 26.88, "longitude": 80.99})
    }

    #[tokio::test]
    #[serial]
    async fn me_returns_profile_with_references() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;

        let (status, json) = send(&app, request("GET", "/api/trainers/me", Some(&trainer(&t)), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["fullName"], "Asha Verma");
        assert_eq!(json["data"]["school"]["name"], "GIC Aliganj");
        assert_eq!(json["data"]["trade"]["name"], "Electrician");
        assert_eq!(json["data"]["company"]["name"], "Acme");
    }

    #[tokio::test]
    #[serial]
    async fn login_without_trainer_record_is_404() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;
        let token = token_for(t.admin_user_id, UserRole::Trainer, Some(t.company_id));

        let (status, _) = send(&app, request("GET", "/api/trainers/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn present_requires_location() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;

        let body = json!({"status": "present"});
        let (status, json) = send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&trainer(&t)), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Location is required to mark present");
    }

    #[tokio::test]
    #[serial]
    async fn present_then_checkout_closes_the_day() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;
        let token = trainer(&t);

        let mut body = here();
        body["status"] = json!("present");
        let (status, json) = send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&token), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["slot"]["status"], "present");
        let date = json["data"]["date"].as_str().unwrap().to_owned();

        // Marking present again is a no-op.
        let (status, _) = send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, request("POST", "/api/trainers/check-out", Some(&token), Some(here()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["slot"]["status"], "checkout");
        assert_eq!(json["data"]["calendar"][&date]["status"], "checkout");
        let hours = json["data"]["slot"]["totalHour"].clone();

        // A retried checkout answers with the stored slot.
        let (status, json) = send(&app, request("POST", "/api/trainers/check-out", Some(&token), Some(here()))).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["slot"]["status"], "checkout");
        assert_eq!(json["data"]["slot"]["totalHour"], hours);

        let absent = json!({"status": "absent"});
        let (status, _) = send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&token), Some(absent))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(&app, request("GET", "/api/trainers/calendar", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_object().unwrap().len(), 1);
        assert_eq!(json["data"][&date]["status"], "checkout");
    }

    #[tokio::test]
    #[serial]
    async fn checkout_without_checkin_is_rejected() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;

        let (status, json) = send(&app, request("POST", "/api/trainers/check-out", Some(&trainer(&t)), Some(here()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("not checked in"));
    }

    #[tokio::test]
    #[serial]
    async fn absent_day_cannot_become_present() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;
        let token = trainer(&t);

        let (status, json) = send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&token), Some(json!({"status": "absent"})))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["slot"]["status"], "absent");

        let mut body = here();
        body["status"] = json!("present");
        let (status, json) = send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("already closed"));
    }

    #[tokio::test]
    #[serial]
    async fn summary_counts_the_current_month() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;
        let token = trainer(&t);

        let mut body = here();
        body["status"] = json!("present");
        send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&token), Some(body))).await;

        let today = Utc::now().date_naive();
        let uri = format!("/api/trainers/summary?year={}&month={}", today.year(), today.month());
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["presentDays"], 1);
        assert_eq!(json["data"]["totalDays"], 1);
        assert_eq!(json["data"]["percentage"], 100);

        let (status, _) = send(&app, request("GET", "/api/trainers/summary?year=2025&month=13", Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn company_admin_sees_attendance_in_superadmin_overview() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;

        let mut body = here();
        body["status"] = json!("present");
        send(&app, request("POST", "/api/trainers/mark-daily-status", Some(&trainer(&t)), Some(body))).await;

        let root = token_for(0, UserRole::SuperAdmin, None);
        let (status, json) = send(&app, request("GET", "/api/superadmins/companies", Some(&root), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["trainersPresentToday"], 1);
    }
}
