//! HTTP API integration tests
//!
//! Every endpoint answers with the `{code, message, data}` envelope.

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use treasury_ledger::api::middleware::{REQUEST_ID_HEADER, RequestIdMiddleware};
use treasury_ledger::api::services::treasury::routes::api_v1_routes;
use treasury_ledger::api::services::treasury::{json_config, path_config, query_config};
use treasury_ledger::api::services::{AppStartTime, health_routes};
use treasury_ledger::config::init_config;
use treasury_ledger::services::{EntryService, InstrumentService, ReportService, UserService};
use treasury_ledger::storage::SeaOrmStorage;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    init_static_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), temp_dir)
}

macro_rules! test_app {
    ($storage:expr) => {{
        let storage: Arc<SeaOrmStorage> = $storage;
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(Arc::new(InstrumentService::new(
                    storage.clone(),
                ))))
                .app_data(web::Data::new(Arc::new(EntryService::new(storage.clone()))))
                .app_data(web::Data::new(Arc::new(ReportService::new(
                    storage.clone(),
                ))))
                .app_data(web::Data::new(Arc::new(UserService::new(storage.clone()))))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .app_data(json_config())
                .app_data(query_config())
                .app_data(path_config())
                .service(web::scope("/api").service(api_v1_routes()))
                .service(health_routes()),
        )
        .await
    }};
}

fn time_deposit(account: &str, beginning: Value) -> Value {
    json!({
        "name": "Landbank",
        "account_number": account,
        "beginning_balance": beginning,
        "maturity_date": "12/31/2098",
    })
}

// =============================================================================
// Instruments
// =============================================================================

#[actix_web::test]
async fn test_create_and_get_instrument() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    let req = TestRequest::post()
        .uri("/api/v1/instruments/time-deposit")
        .set_json(time_deposit("TD-1", json!(1000)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["kind"], "time-deposit");
    assert_eq!(body["data"]["ending_balance"], "1000.00");
    let id = body["data"]["id"].as_i64().unwrap();

    let req = TestRequest::get()
        .uri(&format!("/api/v1/instruments/time-deposit/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["account_number"], "TD-1");
    assert_eq!(body["data"]["renewals"], json!([]));
}

#[actix_web::test]
async fn test_unknown_kind_and_missing_instrument() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    let req = TestRequest::get()
        .uri("/api/v1/instruments/savings")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3006);

    let req = TestRequest::get()
        .uri("/api/v1/instruments/dollar/77")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);

    let req = TestRequest::get()
        .uri("/api/v1/instruments/dollar/abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_validation_errors_use_envelope() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    // collateral needs acquisition date and explanation
    let req = TestRequest::post()
        .uri("/api/v1/instruments/collateral")
        .set_json(time_deposit("COL-1", json!(10)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
    assert!(body.get("data").is_none());

    let req = TestRequest::post()
        .uri("/api/v1/instruments/dollar")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    // beginning balance is required
    let mut missing = time_deposit("USD-2", json!(0));
    missing.as_object_mut().unwrap().remove("beginning_balance");
    let req = TestRequest::post()
        .uri("/api/v1/instruments/dollar")
        .set_json(missing)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
    assert!(body["message"].as_str().unwrap().contains("beginning_balance"));

    // past what a decimal(15,2) column holds
    let req = TestRequest::post()
        .uri("/api/v1/instruments/dollar")
        .set_json(time_deposit("USD-3", json!(10_000_000_000_000i64)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
}

#[actix_web::test]
async fn test_duplicate_account_number() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    for expected in [StatusCode::CREATED, StatusCode::UNPROCESSABLE_ENTITY] {
        let req = TestRequest::post()
            .uri("/api/v1/instruments/dollar")
            .set_json(time_deposit("USD-1", json!(5)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
        if expected != StatusCode::CREATED {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], 3002);
            assert_eq!(
                body["message"],
                "The account number 'USD-1' has already been taken"
            );
        }
    }
}

#[actix_web::test]
async fn test_balance_operations_over_http() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    let req = TestRequest::post()
        .uri("/api/v1/instruments/investment")
        .set_json(json!({
            "name": "Retail Treasury Bonds",
            "reference_number": "RTB-25",
            "beginning_balance": "2000.00",
            "maturity_date": "2098-12-31",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let base = format!("/api/v1/instruments/investment/{}", id);

    let req = TestRequest::post()
        .uri(&format!("{}/collection", base))
        .set_json(json!({"amount": "150.25", "date": "10/16/2026"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["ending_balance"], "2150.25");

    let req = TestRequest::post()
        .uri(&format!("{}/disbursement", base))
        .set_json(json!({"amount": 50, "date": "10/16/2026"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["ending_balance"], "2100.25");

    let req = TestRequest::put()
        .uri(&format!("{}/disbursement", base))
        .set_json(json!({"amount": 0}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["ending_balance"], "2150.25");

    let req = TestRequest::post()
        .uri(&format!("{}/renew", base))
        .set_json(json!({"new_maturity_date": "06/30/2099", "explanation": "Rollover"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["maturity_date"], "2099-06-30");

    let req = TestRequest::post()
        .uri(&format!("{}/withdraw", base))
        .set_json(json!({"amount": 5000, "explanation": "Too much"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = TestRequest::post()
        .uri(&format!("{}/balance", base))
        .set_json(json!({"amount": 100, "explanation": "Reinvested coupon"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["beginning_balance"], "2100.00");

    let req = TestRequest::get().uri(&base).to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["renewals"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["balances"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["withdrawals"].as_array().unwrap().len(), 0);

    let req = TestRequest::delete().uri(&base).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri(&base).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Entries
// =============================================================================

macro_rules! create_operating_account {
    ($app:expr) => {{
        let req = TestRequest::post()
            .uri("/api/v1/instruments/operating-accounts")
            .set_json(time_deposit("OA-1", json!(1000)))
            .to_request();
        let body: Value = test::read_body_json(test::call_service($app, req).await).await;
        body["data"]["id"].as_i64().unwrap()
    }};
}

#[actix_web::test]
async fn test_collections_flow() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);
    let id = create_operating_account!(&app);

    let req = TestRequest::post()
        .uri("/api/v1/collections")
        .set_json(json!({
            "instrument_id": id,
            "collections": [
                {"amount": 100, "deposit_slip": "DS-1", "check": "CHK-1"},
                {"amount": "25.50"}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["check"], "CHK-1");
    assert_eq!(rows[0]["status"], "pending");
    let first = rows[0]["id"].as_i64().unwrap();

    let req = TestRequest::get()
        .uri(&format!("/api/v1/collections?instrument_id={}", id))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = TestRequest::post()
        .uri("/api/v1/collections/process")
        .set_json(json!({"ids": [first]}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["processed"], 1);

    let req = TestRequest::post()
        .uri("/api/v1/collections/process")
        .set_json(json!({"ids": [first, 999]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4000);
}

#[actix_web::test]
async fn test_disbursements_flow() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);
    let id = create_operating_account!(&app);

    let lines = json!([
        {"check_number": "5001", "date": "10/16/2026", "amount": 100},
        {"check_number": "5002", "date": "2026-10-17", "amount": "0.50"}
    ]);

    let req = TestRequest::post()
        .uri("/api/v1/disbursements/validate")
        .set_json(json!({"disbursements": lines}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["valid"], true);

    let req = TestRequest::post()
        .uri("/api/v1/disbursements")
        .set_json(json!({"instrument_id": id, "disbursements": lines}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let saved_id = body["data"][0]["id"].as_i64().unwrap();

    let req = TestRequest::post()
        .uri("/api/v1/disbursements/validate")
        .set_json(json!({"disbursements": [{"check_number": "5002", "date": "10/16/2026", "amount": 1}]}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(
        body["data"]["message"],
        "Check number 5002 already exists. Check numbers must be unique."
    );

    let req = TestRequest::post()
        .uri("/api/v1/disbursements")
        .set_json(json!({"instrument_id": id, "disbursements": [
            {"check_number": "5001", "date": "10/16/2026", "amount": 1}
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4002);

    let req = TestRequest::put()
        .uri(&format!("/api/v1/disbursements/{}", saved_id))
        .set_json(json!({"check_number": "5001-A", "date": "10/18/2026", "amount": 120}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["check_number"], "5001-A");
    assert_eq!(body["data"]["amount"], "120.00");

    let req = TestRequest::post()
        .uri("/api/v1/disbursements/process")
        .set_json(json!({"ids": [saved_id]}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["processed"], 1);

    let req = TestRequest::post()
        .uri("/api/v1/entries/auto-process")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["disbursements"], 1);
    assert_eq!(body["data"]["collections"], 0);

    let req = TestRequest::delete()
        .uri(&format!("/api/v1/disbursements/{}", saved_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/api/v1/disbursements").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_collections_rejected_for_dollar_accounts() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    let req = TestRequest::post()
        .uri("/api/v1/instruments/dollar")
        .set_json(time_deposit("USD-9", json!(10)))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let req = TestRequest::post()
        .uri("/api/v1/collections")
        .set_json(json!({"instrument_id": id, "collections": [{"amount": 1}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4003);
}

// =============================================================================
// Reports
// =============================================================================

#[actix_web::test]
async fn test_daily_report_endpoints() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);
    create_operating_account!(&app);

    let req = TestRequest::get()
        .uri("/api/v1/reports/daily?date=2026-10-16")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["report_date"], "2026-10-16");
    let modules = body["data"]["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 9);
    assert_eq!(modules[4]["name"], "Operating Accounts");
    assert_eq!(modules[4]["record_count"], 1);
    assert_eq!(modules[4]["totals"]["ending_balance"], "1000.00");

    let req = TestRequest::get()
        .uri("/api/v1/reports/daily.csv?date=2026-10-16")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Daily_Deposit_Report_2026-10-16.csv"));
    let csv = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(csv.contains("Operating Accounts,1\n"));

    let req = TestRequest::get()
        .uri("/api/v1/reports/daily?date=16-10-2026")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 5001);
}

// =============================================================================
// Users
// =============================================================================

#[actix_web::test]
async fn test_user_endpoints() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    let new_user = json!({
        "name": "Jose Rizal",
        "email": "jose@treasury.gov",
        "password": "noli-me-tangere",
        "password_confirmation": "noli-me-tangere",
        "role": "accounting2"
    });

    let req = TestRequest::post()
        .uri("/api/v1/users")
        .set_json(&new_user)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "accounting2");
    assert!(body["data"].get("password_hash").is_none());
    let id = body["data"]["id"].as_i64().unwrap();

    let req = TestRequest::post()
        .uri("/api/v1/users")
        .set_json(&new_user)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6002);

    let req = TestRequest::put()
        .uri(&format!("/api/v1/users/{}", id))
        .set_json(json!({
            "name": "Jose P. Rizal",
            "email": "jose@treasury.gov",
            "role": "admin"
        }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["name"], "Jose P. Rizal");
    assert_eq!(body["data"]["role"], "admin");

    let req = TestRequest::get().uri("/api/v1/users").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = TestRequest::delete()
        .uri(&format!("/api/v1/users/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::delete()
        .uri(&format!("/api/v1/users/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health and middleware
// =============================================================================

#[actix_web::test]
async fn test_health_probes() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"]["backend"], "sqlite");

    let req = TestRequest::get().uri("/health/ready").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/health/live").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
}

#[actix_web::test]
async fn test_request_id_header() {
    let (storage, _temp) = create_storage().await;
    let app = test_app!(storage);

    let req = TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    let generated = resp.headers().get(REQUEST_ID_HEADER).unwrap();
    assert_eq!(generated.to_str().unwrap().len(), 36);

    let req = TestRequest::get()
        .uri("/health/live")
        .insert_header((REQUEST_ID_HEADER, "trace-abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get(REQUEST_ID_HEADER).unwrap(),
        "trace-abc-123"
    );
}
