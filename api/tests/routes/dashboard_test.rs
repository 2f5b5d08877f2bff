#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, send, send_raw, token_for};
    use axum::http::{StatusCode, header};
    use db::models::user::UserRole;
    use db::models::{district, state};
    use db::test_utils::seed_tenant;
    use serial_test::serial;

    /// Uttar Pradesh with Lucknow (one block, one school) and an empty Kanpur,
    /// plus an empty Bihar.
    async fn setup() -> (axum::Router, String, i64, i64, i64, i64) {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;
        let kanpur = district::Model::create(&db, t.company_id, t.state_id, "Kanpur").await.unwrap();
        let bihar = state::Model::create(&db, t.company_id, "Bihar").await.unwrap();
        let token = token_for(t.admin_user_id, UserRole::CompanyAdmin, Some(t.company_id));
        (app, token, t.state_id, t.district_id, kanpur.id, bihar.id)
    }

    #[tokio::test]
    #[serial]
    async fn state_filter_narrows_everything_below_it() {
        let (app, token, up, _lucknow, _kanpur, _bihar) = setup().await;

        let uri = format!("/api/companyadmins/dashboard?stateId={up}");
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let data = &json["data"];
        assert_eq!(data["visible"]["states"].as_array().unwrap().len(), 1);
        assert_eq!(data["visible"]["districts"].as_array().unwrap().len(), 2);
        assert_eq!(data["visible"]["blocks"].as_array().unwrap().len(), 1);
        assert_eq!(data["visible"]["schools"].as_array().unwrap().len(), 1);
        assert_eq!(data["statistics"]["totalSchools"], 1);
        assert_eq!(data["statistics"]["stateWiseStats"][0]["districts"], 2);
        assert_eq!(data["statistics"]["stateWiseStats"][0]["schools"], 1);
        assert_eq!(data["options"]["districts"].as_array().unwrap().len(), 2);
        assert_eq!(data["options"]["states"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn district_without_blocks_shows_no_schools() {
        let (app, token, up, _lucknow, kanpur, _bihar) = setup().await;

        let uri = format!("/api/companyadmins/dashboard?stateId={up}&districtId={kanpur}");
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let visible = &json["data"]["visible"];
        assert_eq!(visible["districts"].as_array().unwrap().len(), 1);
        assert!(visible["blocks"].as_array().unwrap().is_empty());
        assert!(visible["schools"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn inconsistent_selection_fails_closed() {
        let (app, token, _up, lucknow, _kanpur, bihar) = setup().await;

        let uri = format!("/api/companyadmins/dashboard?stateId={bihar}&districtId={lucknow}");
        let (status, json) = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let visible = &json["data"]["visible"];
        assert!(visible["districts"].as_array().unwrap().is_empty());
        assert!(visible["schools"].as_array().unwrap().is_empty());
        assert_eq!(json["data"]["statistics"]["totalSchools"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn all_and_empty_mean_unfiltered_but_malformed_is_400() {
        let (app, token, ..) = setup().await;

        let (status, json) = send(&app, request("GET", "/api/companyadmins/dashboard?stateId=all&districtId=", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["statistics"]["totalStates"], 2);
        assert_eq!(json["data"]["statistics"]["totalDistricts"], 2);

        let (status, json) = send(&app, request("GET", "/api/companyadmins/dashboard?blockId=b%3B1", Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn export_returns_csv_attachment() {
        let (app, token, ..) = setup().await;

        let response = send_raw(&app, request("GET", "/api/companyadmins/export", Some(&token), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"schools-trainers-data.csv\""
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "School_ID,School_Name,Address,State,District,Block,Trades,Trainers,Total_Trainers,Total_Trades"
        );
        let row = lines.next().unwrap();
        assert!(row.ends_with(",GIC Aliganj,Sector 5,Uttar Pradesh,Lucknow,Aliganj,Electrician,Asha Verma,1,1"), "{row}");
        assert!(lines.next().is_none());
    }
}
