//! HTTP-level tests of the inventory and lending API.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use inventaris::infrastructure::AppState;
use inventaris::{api, auth, db};
use sea_orm::ConnectOptions;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

async fn setup_app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).sqlx_logging(false);
    let db = db::init_db(options).await.expect("Failed to init DB");
    api::api_router(AppState::new(db))
}

fn staff_token() -> String {
    auth::create_jwt("test_admin", auth::ROLE_STAFF).expect("Failed to create token")
}

fn guest_token() -> String {
    auth::create_jwt("siswa", auth::ROLE_GUEST).expect("Failed to create token")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_full_borrow_return_cycle() {
    let app = setup_app().await;
    let token = staff_token();

    // Staff registers an item
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/items",
            Some(&token),
            serde_json::json!({ "name": "Mikroskop", "code": "MKR-01", "condition": "good" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let item_id = body["item"]["id"].as_i64().unwrap();
    assert_eq!(body["item"]["status"], "available");

    // A guest borrows it, no token required
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/loans",
            None,
            serde_json::json!({
                "item_id": item_id,
                "borrower_name": "Alice",
                "borrower_class": "10A",
                "duration_days": 3
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let loan_id = body["loan"]["id"].as_i64().unwrap();
    assert_eq!(body["loan"]["status"], "pending");

    // The item is now held
    let response = app
        .clone()
        .oneshot(get_request(&format!("/items/{}", item_id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["item"]["status"], "pending_approval");

    // A second borrow attempt conflicts
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/loans",
            None,
            serde_json::json!({
                "item_id": item_id,
                "borrower_name": "Budi",
                "borrower_class": "10B",
                "duration_days": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "item no longer available");

    // The active list shows the loan joined with the item
    let response = app.clone().oneshot(get_request("/loans/active")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["loans"].as_array().unwrap().len(), 1);
    assert_eq!(body["loans"][0]["item_code"], "MKR-01");

    // A guest may not close the loan
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/loans/{}/return", loan_id),
            Some(&guest_token()),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff closes it
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/loans/{}/return", loan_id),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["loan"]["status"], "returned");
    assert!(body["loan"]["return_date"].is_string());

    // Closing again is a conflict, surfaced for the UI
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/loans/{}/return", loan_id),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "loan already returned");

    // And the item is back on the shelf
    let response = app
        .oneshot(get_request(&format!("/items/{}", item_id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["item"]["status"], "available");
}

#[tokio::test]
async fn test_item_management_requires_staff() {
    let app = setup_app().await;

    let payload =
        serde_json::json!({ "name": "Proyektor", "code": "PRJ-01", "condition": "good" });

    // No token
    let response = app
        .clone()
        .oneshot(json_request("POST", "/items", None, payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Guest token
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/items",
            Some(&guest_token()),
            payload.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff token
    let response = app
        .oneshot(json_request("POST", "/items", Some(&staff_token()), payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_code_is_a_conflict() {
    let app = setup_app().await;
    let token = staff_token();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/items",
            Some(&token),
            serde_json::json!({ "name": "Microscope", "code": "MC-01", "condition": "good" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/items",
            Some(&token),
            serde_json::json!({ "name": "Microscope2", "code": "MC-01", "condition": "good" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_held_item_is_a_conflict() {
    let app = setup_app().await;
    let token = staff_token();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/items",
            Some(&token),
            serde_json::json!({ "name": "Globe", "code": "GLB-01", "condition": "minor_damage" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let item_id = body["item"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/loans",
            None,
            serde_json::json!({
                "item_id": item_id,
                "borrower_name": "Citra",
                "borrower_class": "12C",
                "duration_days": 7
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/items/{}", item_id))
                .method("DELETE")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Still listed
    let response = app.oneshot(get_request("/items")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_direct_edit_to_engine_status_is_rejected() {
    let app = setup_app().await;
    let token = staff_token();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/items",
            Some(&token),
            serde_json::json!({ "name": "Peta", "code": "PTA-01", "condition": "good" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let item_id = body["item"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/items/{}", item_id),
            Some(&token),
            serde_json::json!({ "status": "on_loan" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Shelving is allowed
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/items/{}", item_id),
            Some(&token),
            serde_json::json!({ "status": "in_storage" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["item"]["status"], "in_storage");
}

#[tokio::test]
async fn test_update_missing_item_is_not_found() {
    let app = setup_app().await;
    let token = staff_token();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/items/999",
            Some(&token),
            serde_json::json!({ "name": "Ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_and_login_roundtrip() {
    let app = setup_app().await;

    // First account becomes staff
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            serde_json::json!({ "username": "guru", "password": "rahasia" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["role"], "staff");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({ "username": "guru", "password": "rahasia" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_owned();

    // The minted token carries the staff capability
    let response = app
        .oneshot(json_request(
            "POST",
            "/items",
            Some(&token),
            serde_json::json!({ "name": "Spidol", "code": "SPD-01", "condition": "good" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let app = setup_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            serde_json::json!({ "username": "guru", "password": "rahasia" }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({ "username": "guru", "password": "salah" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
