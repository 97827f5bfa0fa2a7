use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use boxoffice_server::routes::create_routes;
use boxoffice_server::state::AppState;
use boxoffice_server::store::MemoryStore;

fn app() -> Router {
    create_routes(AppState::new(Arc::new(MemoryStore::new())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register_user(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/user",
        Some(json!({"username": username, "password": "1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

async fn create_event(app: &Router, name: &str, price: f64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/event",
        Some(json!({"name": name, "price": price})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

async fn ticket_status(app: &Router, id: i64) -> String {
    let (status, body) = send(app, "GET", &format!("/ticket/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["status"].as_str().unwrap().to_string()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn sanity_endpoints_respond() {
    let app = app();

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ticket API is working");

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn user_registration_and_fetch() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/user",
        Some(json!({"username": "Panchito", "password": "1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "Panchito");
    // The stored password never comes back out.
    assert!(body["data"].get("password").is_none());

    let id = body["data"]["id"].as_i64().unwrap();
    let (status, body) = send(&app, "GET", &format!("/user/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "Panchito");

    let (status, body) = send(&app, "GET", "/user/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn empty_username_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/user",
        Some(json!({"username": "", "password": "1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn event_creation_and_fetch() {
    let app = app();

    let id = create_event(&app, "concert", 100.0).await;
    let (status, body) = send(&app, "GET", &format!("/event/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "concert");
    assert_eq!(body["data"]["price"], 100.0);

    // Ids start at 1, so 0 never resolves.
    let (status, _) = send(&app, "GET", "/event/0", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/event",
        Some(json!({"name": "", "price": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn listing_returns_created_records() {
    let app = app();
    register_user(&app, "ana").await;
    register_user(&app, "bob").await;
    create_event(&app, "expo", 25.0).await;

    let (status, body) = send(&app, "GET", "/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "GET", "/user?offset=1&limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["username"], "bob");

    let (status, body) = send(&app, "GET", "/event", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn buy_starts_purchased_and_reserve_starts_reserved() {
    let app = app();
    let user = register_user(&app, "ana").await;
    let event = create_event(&app, "concert", 50.0).await;

    let (status, body) = send(&app, "POST", &format!("/ticket/buy/{user}/{event}"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "PURCHASED");
    assert_eq!(body["data"]["user_id"].as_i64().unwrap(), user);
    assert_eq!(body["data"]["event_id"].as_i64().unwrap(), event);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/ticket/reserve/{user}/{event}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "RESERVED");
}

#[tokio::test]
async fn ticket_creation_requires_existing_user_and_event() {
    let app = app();
    let user = register_user(&app, "ana").await;
    let event = create_event(&app, "concert", 50.0).await;

    let (status, body) = send(&app, "POST", &format!("/ticket/buy/999/{event}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"].as_str().unwrap().contains("user"));

    let (status, body) = send(&app, "POST", &format!("/ticket/reserve/{user}/999"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"].as_str().unwrap().contains("event"));

    let (status, _) = send(&app, "POST", "/ticket/buy/999/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // None of the failed creations left a record behind.
    let (_, body) = send(&app, "GET", "/ticket", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn reserved_ticket_is_paid_then_used() {
    let app = app();
    let user = register_user(&app, "A").await;
    let event = create_event(&app, "E", 10.0).await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/ticket/reserve/{user}/{event}"),
        None,
    )
    .await;
    let ticket = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "RESERVED");

    let (status, body) = send(&app, "PATCH", &format!("/ticket/pay/{ticket}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PURCHASED");

    let (status, body) = send(&app, "PATCH", &format!("/ticket/pay/{ticket}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_TRANSITION");
    assert!(body["error"]["message"].as_str().unwrap().contains("paid"));

    let (status, body) = send(&app, "PATCH", &format!("/ticket/use/{ticket}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "USED");

    let (status, body) = send(&app, "PATCH", &format!("/ticket/cancel/{ticket}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("used"));
}

#[tokio::test]
async fn bought_ticket_is_used_once() {
    let app = app();
    let user = register_user(&app, "A").await;
    let event = create_event(&app, "E", 10.0).await;

    let (_, body) = send(&app, "POST", &format!("/ticket/buy/{user}/{event}"), None).await;
    let ticket = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "PURCHASED");

    let (status, body) = send(&app, "PATCH", &format!("/ticket/use/{ticket}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "USED");

    let (status, body) = send(&app, "PATCH", &format!("/ticket/use/{ticket}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_TRANSITION");
}

#[tokio::test]
async fn unpaid_ticket_cannot_enter_and_cancels_cleanly() {
    let app = app();
    let user = register_user(&app, "A").await;
    let event = create_event(&app, "E", 10.0).await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/ticket/reserve/{user}/{event}"),
        None,
    )
    .await;
    let ticket = body["data"]["id"].as_i64().unwrap();

    // Not paid yet: entry is refused with 402, not a plain conflict.
    let (status, body) = send(&app, "PATCH", &format!("/ticket/use/{ticket}"), None).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(error_code(&body), "PAYMENT_REQUIRED");

    let (status, body) = send(&app, "PATCH", &format!("/ticket/cancel/{ticket}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CANCELED");

    let (status, body) = send(&app, "PATCH", &format!("/ticket/pay/{ticket}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("canceled"));
}

#[tokio::test]
async fn terminal_states_absorb_every_operation() {
    let app = app();
    let user = register_user(&app, "A").await;
    let event = create_event(&app, "E", 10.0).await;

    let (_, body) = send(&app, "POST", &format!("/ticket/buy/{user}/{event}"), None).await;
    let ticket = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, "PATCH", &format!("/ticket/cancel/{ticket}"), None).await;
    assert_eq!(status, StatusCode::OK);

    // Repeated in any order, nothing moves a canceled ticket.
    for op in ["pay", "use", "cancel", "pay", "use"] {
        let (status, _) = send(&app, "PATCH", &format!("/ticket/{op}/{ticket}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(ticket_status(&app, ticket).await, "CANCELED");
    }
}

#[tokio::test]
async fn lifecycle_operations_on_missing_ticket_are_not_found() {
    let app = app();

    for op in ["pay", "use", "cancel"] {
        let (status, body) = send(&app, "PATCH", &format!("/ticket/{op}/42"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    let (status, _) = send(&app, "GET", "/ticket/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
