// Local stand-in for the Bayarcash API, served by axum on an ephemeral port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use bayarcash_mcp::{BayarcashClient, BayarcashConfig};

pub const TOKEN: &str = "test-token";
pub const SECRET: &str = "mysecret";

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
    pub query: Option<String>,
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

fn record(
    log: &Log,
    method: &'static str,
    path: String,
    headers: &HeaderMap,
    body: Option<Value>,
    query: Option<String>,
) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.lock().unwrap().push(Recorded {
        method,
        path,
        authorization,
        body,
        query,
    });
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let expected = format!("Bearer {}", TOKEN);
    let ok = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if ok {
        None
    } else {
        Some((StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."}))).into_response())
    }
}

async fn portals(State(log): State<Log>, headers: HeaderMap) -> Response {
    record(&log, "GET", "/portals".into(), &headers, None, None);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    Json(json!({"data": [{"id": "p1", "name": "Main", "channels": []}]})).into_response()
}

async fn fpx_banks(State(log): State<Log>, headers: HeaderMap) -> Response {
    record(&log, "GET", "/fpx/banks".into(), &headers, None, None);
    Json(json!({"data": [{"code": "MB2U0227", "name": "Maybank2u", "active": true}]}))
        .into_response()
}

async fn create_intent(
    State(log): State<Log>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&log, "POST", "/payment-intents".into(), &headers, Some(body.clone()), None);
    (
        StatusCode::CREATED,
        Json(json!({"id": "pi_abc123", "url": "https://pay.example/pi_abc123", "received": body})),
    )
        .into_response()
}

async fn get_intent(Path(id): Path<String>) -> Response {
    if id == "pi_missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Payment intent not found"})))
            .into_response();
    }
    Json(json!({"id": id, "status": "pending"})).into_response()
}

async fn list_transactions(
    State(log): State<Log>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    record(&log, "GET", "/transactions".into(), &headers, None, query.clone());
    Json(json!({"data": [], "meta": {"current_page": 1}, "links": {}})).into_response()
}

async fn get_transaction(Path(id): Path<String>) -> Response {
    Json(json!({"data": {"id": id, "status": 3}})).into_response()
}

async fn transaction_by_order(Path(order_number): Path<String>) -> Response {
    Json(json!({"data": {"order_number": order_number}})).into_response()
}

async fn transaction_by_reference() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
}

async fn enroll(State(log): State<Log>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&log, "POST", "/mandates".into(), &headers, Some(body.clone()), None);
    if body["bank_code"] == "BAD" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": {"bank_code": ["The selected bank code is invalid."]}})),
        )
            .into_response();
    }
    Json(json!({"id": "mdt_1", "status": "pending_authorization"})).into_response()
}

async fn update_mandate(
    State(log): State<Log>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&log, "PUT", format!("/mandates/{}", id), &headers, Some(body.clone()), None);
    Json(json!({"id": id, "updated": body})).into_response()
}

async fn terminate_mandate(
    State(log): State<Log>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&log, "DELETE", format!("/mandates/{}", id), &headers, None, None);
    StatusCode::NO_CONTENT.into_response()
}

/// Start the stub and return its `/v3` base URL with the request log.
pub async fn spawn_upstream() -> (String, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let api = Router::new()
        .route("/portals", get(portals))
        .route("/fpx/banks", get(fpx_banks))
        .route("/payment-intents", post(create_intent))
        .route("/payment-intents/:id", get(get_intent))
        .route("/transactions", get(list_transactions))
        .route("/transactions/:id", get(get_transaction))
        .route("/transactions/order/:order_number", get(transaction_by_order))
        .route("/transactions/reference/:reference", get(transaction_by_reference))
        .route("/mandates", post(enroll))
        .route("/mandates/:id", put(update_mandate).delete(terminate_mandate))
        .with_state(log.clone());
    let app = Router::new().nest("/v3", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v3", addr), log)
}

pub fn client_for(base_url: &str, token: &str, secret: &str) -> BayarcashClient {
    let config = BayarcashConfig::new(token, secret).with_base_url(base_url);
    BayarcashClient::new(config).unwrap()
}
