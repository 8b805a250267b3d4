use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use serde_json::{Value, json};

use leave_planner::config::Config;
use leave_planner::leave::calendar::HolidayCalendar;
use leave_planner::models::TokenPair;
use leave_planner::routes;
use leave_planner::store::Store;
use leave_planner::utils::import::import_roster;
use leave_planner::utils::roster::apply_import;
use leave_planner::utils::token_cache::RevokedTokens;

const ROSTER: &str = "\
Employee No,Employee Name,Company Email Address,Department,Annual Leave Entitlement,Offset Balance,Manager Email,Is Manager,DOB
BAYN00001,Hana Haddad,hana@company.ae,HR,22,0,,no,01011980
BAYN00002,Omar Nasser,omar@company.ae,Sales,22,0,,yes,02021982
BAYN00003,Imelda Marcelo,imelda@company.ae,Sales,5,2,omar@company.ae,no,10121988
";

const HR: (&str, &str) = ("BAYN00001", "01011980");
const MANAGER: (&str, &str) = ("BAYN00002", "02021982");
const STAFF: (&str, &str) = ("BAYN00003", "10121988");

fn state() -> (Data<Store>, Data<Config>) {
    state_with(&[])
}

fn state_with(overrides: &[(&str, &str)]) -> (Data<Store>, Data<Config>) {
    let config = Config::from_lookup(|key| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| *k == key) {
            return Some(value.to_string());
        }
        match key {
            "JWT_SECRET" => Some("integration-secret".to_string()),
            "HR_ADMIN_IDS" => Some("BAYN00001".to_string()),
            _ => None,
        }
    })
    .unwrap();

    let store = Store::default();
    apply_import(&store, import_roster("roster.csv", ROSTER, config.history_year).unwrap());
    (Data::new(store), Data::new(config))
}

macro_rules! app {
    ($store:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data($store.clone())
                .app_data($config.clone())
                .app_data(Data::new(RevokedTokens::new(3600)))
                .app_data(Data::new(HolidayCalendar::default()))
                .configure(|cfg| routes::configure(cfg, &$config)),
        )
        .await
    };
}

fn peer() -> std::net::SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

macro_rules! login {
    ($app:expr, $who:expr) => {{
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer())
            .set_json(json!({"employee_id": $who.0, "date_of_birth": $who.1}))
            .to_request();
        let pair: TokenPair = test::call_and_read_body_json(&$app, req).await;
        pair.access_token
    }};
}

/// Sends an authorized request and returns status plus JSON body.
macro_rules! call {
    ($app:expr, $req:expr, $token:expr) => {{
        let req = $req
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }};
}

fn leave(start: &str, end: &str, offset: u32) -> Value {
    json!({
        "start_date": start,
        "end_date": end,
        "leave_type": "annual",
        "offset_days": offset,
        "notes": "Family visit"
    })
}

#[actix_web::test]
async fn login_failures_look_the_same() {
    let (store, config) = state();
    let app = app!(store, config);

    let mut messages = Vec::new();
    for (id, dob) in [("BAYN00003", "01011999"), ("BAYN09999", "10121988")] {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer())
            .set_json(json!({"employee_id": id, "date_of_birth": dob}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        messages.push(body["message"].clone());
    }
    assert_eq!(messages[0], messages[1]);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({"employee_id": "BAYN00003", "date_of_birth": "1012"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_ignores_case_and_separators() {
    let (store, config) = state();
    let app = app!(store, config);

    let token = login!(app, ("bayn00003", "10-12-1988"));
    let (status, body) = call!(app, test::TestRequest::get().uri("/api/me"), token);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee"]["employee_id"], "BAYN00003");
    assert_eq!(body["role"], "employee");
    assert!(body["employee"].get("credential").is_none());
}

#[actix_web::test]
async fn protected_routes_need_a_bearer_token() {
    let (store, config) = state();
    let app = app!(store, config);

    let req = test::TestRequest::get()
        .uri("/api/leave/balance")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn submission_draws_down_balance_and_notifies_manager() {
    let (store, config) = state();
    let app = app!(store, config);
    let token = login!(app, STAFF);

    // Mon 2 - Wed 4 March 2026, one day from the offset pool
    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/leave").set_json(leave("2026-03-02", "2026-03-04", 1)),
        token
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["request"]["business_days"], 3);
    assert_eq!(body["request"]["status"], "pending");
    assert_eq!(body["notification"]["to"], "omar@company.ae");
    assert_eq!(
        body["notification"]["subject"],
        "Leave Request from Imelda Marcelo - Annual Leave"
    );

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/leave/balance"), token);
    assert_eq!(body["balance"]["remaining"], 3.0);
    assert_eq!(body["balance"]["remaining_offset"], 1.0);
    assert_eq!(body["low_balance"], true);

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/leave").set_json(leave("2026-03-04", "2026-03-04", 0)),
        token
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "These dates overlap with an existing leave request");

    // Mon 9 - Thu 12 March is four days against three remaining
    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/leave").set_json(leave("2026-03-09", "2026-03-12", 0)),
        token
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/notifications"), token);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/leave"), token);
    assert_eq!(body["total"], 1);
}

#[actix_web::test]
async fn preview_stores_nothing() {
    let (store, config) = state();
    let app = app!(store, config);
    let token = login!(app, STAFF);

    // Thu 19 - Sun 22 March 2026 spans the weekend and a holiday
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/leave/preview")
            .set_json(leave("2026-03-19", "2026-03-22", 0)),
        token
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["business_days"], 2);
    assert_eq!(body["charged_days"], 2);
    assert_eq!(body["valid"], true);
    assert_eq!(body["public_holidays_in_range"].as_array().map(Vec::len), Some(1));
    assert!(body["email_preview"].as_str().unwrap().contains("Subject: Leave Request"));

    assert!(store.requests_for("BAYN00003").is_empty());
}

#[actix_web::test]
async fn manager_reviews_own_team_only() {
    let (store, config) = state();
    let app = app!(store, config);
    let staff = login!(app, STAFF);
    let manager = login!(app, MANAGER);

    let (_, body) = call!(
        app,
        test::TestRequest::post().uri("/api/leave").set_json(leave("2026-04-06", "2026-04-07", 0)),
        staff
    );
    let id = body["request"]["id"].as_str().unwrap().to_string();

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/team"), manager);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team_size"], 1);
    assert_eq!(body["members"][0]["employee_id"], "BAYN00003");

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/team"), staff);
    assert_eq!(status, StatusCode::FORBIDDEN);

    let approve = format!("/api/leave/{}/approve", id);
    let (status, body) = call!(app, test::TestRequest::put().uri(&approve), manager);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["status"], "approved");

    let (status, _) = call!(app, test::TestRequest::put().uri(&approve), manager);
    assert_eq!(status, StatusCode::CONFLICT);

    let audit = store.audit_log(Some("BAYN00003"));
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action.to_string(), "edit_leave");
    assert_eq!(audit[0].performed_by, "BAYN00002");
}

#[actix_web::test]
async fn unrelated_manager_cannot_decide() {
    let (store, config) = state();
    let app = app!(store, config);
    let staff = login!(app, STAFF);
    let manager = login!(app, MANAGER);

    // nobody reports to Omar once the manager email is cleared
    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/me/settings")
            .set_json(json!({"manager_email": ""})),
        staff
    );
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call!(
        app,
        test::TestRequest::post().uri("/api/leave").set_json(leave("2026-04-06", "2026-04-06", 0)),
        staff
    );
    assert!(body["notification"].is_null());
    let id = body["request"]["id"].as_str().unwrap().to_string();

    let (status, _) = call!(
        app,
        test::TestRequest::put().uri(&format!("/api/leave/{}/reject", id)),
        manager
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/me/settings")
            .set_json(json!({"manager_email": "not-an-email"})),
        staff
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn hr_import_replaces_roster_and_keeps_requests() {
    let (store, config) = state();
    let app = app!(store, config);
    let hr = login!(app, HR);
    let staff = login!(app, STAFF);

    call!(
        app,
        test::TestRequest::post().uri("/api/leave").set_json(leave("2026-04-06", "2026-04-06", 0)),
        staff
    );

    let import = json!({
        "file_name": "update.csv",
        "content": "Employee No,Employee Name,DOB\nBAYN00001,Hana Haddad,01011980\nBAYN00003,Imelda Marcelo,10121988\n,Broken,\n"
    });

    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/admin/import").set_json(import.clone()),
        staff
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/admin/import").set_json(import),
        hr
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["skipped"], json!(["Row 4: Failed to parse"]));
    assert_eq!(store.employee_count(), 2);
    assert_eq!(store.requests_for("BAYN00003").len(), 1);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/import")
            .set_json(json!({"file_name": "roster.xlsx", "content": ""})),
        hr
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unsupported file format. Please use CSV or JSON.");

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/admin/audit"), hr);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["action"], "admin_update");
}

#[actix_web::test]
async fn history_confirmation_and_change_request() {
    let (store, config) = state();
    let app = app!(store, config);
    let token = login!(app, STAFF);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/history"), token);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"]["records"].as_array().map(Vec::len), Some(12));
    assert_eq!(body["history"]["status"], "pending");

    let records: Vec<Value> = body["history"]["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| json!({"month": r["month"], "leaves_availed": 1.0}))
        .collect();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/history/change-request")
            .set_json(json!({"notes": "  ", "records": records})),
        token
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide details about the discrepancy");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/history/change-request")
            .set_json(json!({"notes": "One day every month", "records": records})),
        token
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"]["status"], "change_requested");

    let (status, body) = call!(app, test::TestRequest::post().uri("/api/history/confirm"), token);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"]["status"], "confirmed");

    let actions: Vec<String> = store
        .audit_log(Some("BAYN00003"))
        .iter()
        .map(|r| r.action.to_string())
        .collect();
    assert_eq!(actions, vec!["request_change", "confirm_balance"]);
}

#[actix_web::test]
async fn refresh_rotates_and_logout_revokes() {
    let (store, config) = state();
    let app = app!(store, config);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({"employee_id": STAFF.0, "date_of_birth": STAFF.1}))
        .to_request();
    let first: TokenPair = test::call_and_read_body_json(&app, req).await;

    let refresh = |token: &str| {
        test::TestRequest::post()
            .uri("/auth/refresh")
            .peer_addr(peer())
            .set_json(json!({"refresh_token": token}))
            .to_request()
    };

    let resp = test::call_service(&app, refresh(&first.refresh_token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: TokenPair = test::read_body_json(resp).await;

    // the first refresh token was spent by the rotation
    let resp = test::call_service(&app, refresh(&first.refresh_token)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // an access token is not a refresh token
    let resp = test::call_service(&app, refresh(&second.access_token)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .peer_addr(peer())
        .set_json(json!({"refresh_token": second.refresh_token}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, refresh(&second.refresh_token)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn business_day_counter_validates_range() {
    let (store, config) = state();
    let app = app!(store, config);
    let token = login!(app, STAFF);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/calendar/business-days?start_date=2026-12-01&end_date=2026-12-06"),
        token
    );
    assert_eq!(status, StatusCode::OK);
    // Tue 1 - Sun 6 December: Fri/Sat are weekend, 2nd and 3rd are holidays
    assert_eq!(body["business_days"], 4);
    assert_eq!(body["working_days"], 2);

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/calendar/business-days?start_date=2026-12-06&end_date=2026-12-01"),
        token
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn concurrent_refreshes_rotate_once() {
    let (store, config) = state();
    let app = app!(store, config);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({"employee_id": STAFF.0, "date_of_birth": STAFF.1}))
        .to_request();
    let pair: TokenPair = test::call_and_read_body_json(&app, req).await;

    let refresh = || {
        test::TestRequest::post()
            .uri("/auth/refresh")
            .peer_addr(peer())
            .set_json(json!({"refresh_token": pair.refresh_token}))
            .to_request()
    };
    let (a, b) = futures::join!(
        test::call_service(&app, refresh()),
        test::call_service(&app, refresh())
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::UNAUTHORIZED]);
}

#[actix_web::test]
async fn logouts_do_not_spend_the_login_quota() {
    let (store, config) = state_with(&[("RATE_LOGIN_PER_MIN", "2")]);
    let app = app!(store, config);

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .peer_addr(peer())
            .set_json(json!({"refresh_token": "not-a-token"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    for expected in [StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS] {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer())
            .set_json(json!({"employee_id": STAFF.0, "date_of_birth": STAFF.1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn huge_ranges_are_counted_promptly() {
    let (store, config) = state();
    let app = app!(store, config);
    let token = login!(app, STAFF);

    let started = std::time::Instant::now();
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/leave/preview")
            .set_json(leave("0001-01-01", "9999-12-31", 0)),
        token
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert!(body["business_days"].as_u64().unwrap() > 2_000_000);

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/calendar/business-days?start_date=0001-01-01&end_date=9999-12-31"),
        token
    );
    assert_eq!(status, StatusCode::OK);
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
}
