#[cfg(test)]
mod tests {
    use crate::helpers::app::{make_test_app, request, send, token_for};
    use axum::http::StatusCode;
    use db::models::user::UserRole;
    use db::test_utils::{SeededTenant, seed_tenant};
    use serde_json::json;
    use serial_test::serial;

    fn admin(t: &SeededTenant) -> String {
        token_for(t.admin_user_id, UserRole::CompanyAdmin, Some(t.company_id))
    }

    #[tokio::test]
    #[serial]
    async fn registers_the_hierarchy_level_by_level() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;
        let token = admin(&t);

        let (status, json) = send(&app, request("POST", "/api/companyadmins/states", Some(&token), Some(json!({"name": "Bihar"})))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "State registered successfully");
        let state_id = json["data"]["_id"].as_str().unwrap().to_owned();

        let body = json!({"name": "Patna", "stateId": state_id});
        let (status, json) = send(&app, request("POST", "/api/companyadmins/districts", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::CREATED);
        let district_id = json["data"]["_id"].as_str().unwrap().to_owned();

        let body = json!({"name": "Danapur", "districtId": district_id, "pincode": "801503"});
        let (status, _) = send(&app, request("POST", "/api/companyadmins/blocks", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = send(&app, request("GET", "/api/companyadmins/getDistricts", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let patna = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["name"] == "Patna")
            .unwrap()
            .clone();
        assert_eq!(patna["stateId"]["_id"], state_id);
        assert_eq!(patna["stateId"]["name"], "Bihar");

        let (_, json) = send(&app, request("GET", "/api/companyadmins/getBlocks", Some(&token), None)).await;
        let danapur = json["data"].as_array().unwrap().iter().find(|b| b["name"] == "Danapur").unwrap().clone();
        assert_eq!(danapur["districtId"]["name"], "Patna");
        assert_eq!(danapur["pincode"], "801503");
    }

    #[tokio::test]
    #[serial]
    async fn rejects_duplicates_foreign_parents_and_bad_input() {
        let (app, db) = make_test_app().await;
        let acme = seed_tenant(&db, "Acme").await;
        let globex = seed_tenant(&db, "Globex").await;
        let token = admin(&acme);

        let (status, _) = send(&app, request("POST", "/api/companyadmins/states", Some(&token), Some(json!({"name": "Uttar Pradesh"})))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let body = json!({"name": "Elsewhere", "stateId": globex.state_id.to_string()});
        let (status, json) = send(&app, request("POST", "/api/companyadmins/districts", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "State not found");

        let body = json!({"name": "Elsewhere", "stateId": "s!"});
        let (status, _) = send(&app, request("POST", "/api/companyadmins/districts", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = json!({"name": "Tiny", "districtId": acme.district_id.to_string(), "pincode": "12"});
        let (status, json) = send(&app, request("POST", "/api/companyadmins/blocks", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Pincode must be 6 digits");

        let (status, _) = send(&app, request("POST", "/api/companyadmins/trades", Some(&token), Some(json!({"name": ""})))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn school_batch_creates_trainer_logins() {
        let (app, db) = make_test_app().await;
        let t = seed_tenant(&db, "Acme").await;
        let token = admin(&t);

        let body = json!({
            "uid": "UP-0420",
            "name": "GGIC Chinhat",
            "blockId": t.block_id.to_string(),
            "address": "Faizabad Road",
            "location": {"type": "Point", "coordinates": [81.01, 26.88]},
            "trades": [{
                "tradeId": t.trade_id.to_string(),
                "trainers": [{
                    "fullName": "Ravi Shankar",
                    "email": "ravi@acme.test",
                    "phone": "9811111111",
                    "password": "trainerpass",
                    "location": {"type": "Point", "coordinates": [81.01, 26.88]}
                }]
            }]
        });
        let (status, json) = send(&app, request("POST", "/api/companyadmins/schools", Some(&token), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        assert_eq!(json["data"]["trades"], json!([t.trade_id.to_string()]));
        assert_eq!(json["data"]["trainers"][0]["name"], "Ravi Shankar");

        let login = json!({"email": "ravi@acme.test", "password": "trainerpass"});
        let (status, _) = send(&app, request("POST", "/api/management/trainers/login", None, Some(login))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, request("POST", "/api/companyadmins/schools", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = send(&app, request("GET", "/api/companyadmins/getSchools", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let school = json["data"].as_array().unwrap().iter().find(|s| s["uid"] == "UP-0420").unwrap().clone();
        assert_eq!(school["blockId"]["name"], "Aliganj");
        assert_eq!(school["districtId"]["name"], "Lucknow");
        assert_eq!(school["stateId"]["name"], "Uttar Pradesh");
        assert_eq!(school["location"]["coordinates"], json!([81.01, 26.88]));
        assert_eq!(school["trades"][0]["name"], "Electrician");

        let (_, json) = send(&app, request("GET", "/api/companyadmins/getTrainers", Some(&token), None)).await;
        let ravi = json["data"].as_array().unwrap().iter().find(|t| t["fullName"] == "Ravi Shankar").unwrap().clone();
        assert_eq!(ravi["schoolId"]["name"], "GGIC Chinhat");
        assert_eq!(ravi["status"], "active");
    }

    #[tokio::test]
    #[serial]
    async fn school_batch_rejects_foreign_trades() {
        let (app, db) = make_test_app().await;
        let acme = seed_tenant(&db, "Acme").await;
        let globex = seed_tenant(&db, "Globex").await;

        let body = json!({
            "uid": "UP-0421",
            "name": "Borrowed Trade School",
            "blockId": acme.block_id.to_string(),
            "trades": [{"tradeId": globex.trade_id.to_string(), "trainers": []}]
        });
        let (status, _) = send(&app, request("POST", "/api/companyadmins/schools", Some(&admin(&acme)), Some(body))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn lists_are_scoped_to_the_callers_company() {
        let (app, db) = make_test_app().await;
        let acme = seed_tenant(&db, "Acme").await;
        seed_tenant(&db, "Globex").await;

        let (status, json) = send(&app, request("GET", "/api/companyadmins/getStates", Some(&admin(&acme)), None)).await;
        assert_eq!(status, StatusCode::OK);
        let states = json["data"].as_array().unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0]["companyId"], acme.company_id.to_string());
    }
}
