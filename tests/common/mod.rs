#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// In-memory stand-in for the campaign backend. Records every request line.
#[derive(Clone, Default)]
pub struct MockBackend {
    pub hits: Arc<Mutex<Vec<String>>>,
    pub templates: Arc<Mutex<Vec<Value>>>,
    pub segments: Arc<Mutex<Vec<Value>>>,
    pub campaigns: Arc<Mutex<Vec<Value>>>,
    pub uploads: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    pub inbound: Arc<Mutex<Vec<Value>>>,
    pub stats: Arc<Mutex<Value>>,
}

impl MockBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        *backend.stats.lock().unwrap() = json!({
            "total_users": 200,
            "opt_outs": 25,
            "sent": 90,
            "failed": 10,
            "delivery_pct": 90.0,
            "failed_pct": 10.0
        });
        backend
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn clear_hits(&self) {
        self.hits.lock().unwrap().clear();
    }

    pub fn count(&self, line: &str) -> usize {
        self.hits().iter().filter(|hit| hit.as_str() == line).count()
    }
}

pub fn router(backend: MockBackend) -> Router {
    Router::new()
        .route("/ingestions/users", post(ingest_users))
        .route("/ingestions/events", post(ingest_events))
        .route("/ingestions/stats", get(stats))
        .route("/api/v1/templates/", get(list_templates).post(create_template))
        .route("/api/v1/templates/:id", delete(delete_template))
        .route("/api/v1/segments/", get(list_segments).post(create_segment))
        .route("/api/v1/campaigns/", get(list_campaigns).post(create_campaign))
        .route("/api/v1/orchestration/run/:id", post(run_campaign))
        .route("/api/v1/events/inbound", get(inbound))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

pub async fn spawn(backend: MockBackend) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(backend)).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub fn dead_backend_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn record(State(backend): State<MockBackend>, request: Request, next: Next) -> Response {
    backend
        .hits
        .lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

async fn ingest_users(State(backend): State<MockBackend>, mut multipart: Multipart) -> Response {
    let mut received = 0;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap().to_vec();
        backend.uploads.lock().unwrap().push((name, bytes));
        received += 1;
    }
    if received == 0 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "No file provided" }))).into_response();
    }
    Json(json!({
        "message": "Ingestion completed",
        "summary": { "total": 2, "valid": 2, "invalid": 0, "duplicates": 0, "merged": 0, "new": 2 }
    }))
    .into_response()
}

async fn ingest_events(State(backend): State<MockBackend>, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap().to_vec();
        backend.uploads.lock().unwrap().push((name, bytes));
    }
    Json(json!({ "message": "Events ingested", "count": 1, "campaigns_triggered": 0 }))
}

async fn stats(State(backend): State<MockBackend>) -> Json<Value> {
    Json(backend.stats.lock().unwrap().clone())
}

async fn list_templates(State(backend): State<MockBackend>) -> Json<Value> {
    Json(Value::Array(backend.templates.lock().unwrap().clone()))
}

async fn create_template(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let id = body["id"].as_str().unwrap_or_default().to_string();
    let content = body["content"].as_str().unwrap_or_default().to_string();
    backend
        .templates
        .lock()
        .unwrap()
        .push(json!({ "_id": id, "content": content }));
    (StatusCode::CREATED, Json(json!({ "id": id, "content": content }))).into_response()
}

async fn delete_template(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    let mut templates = backend.templates.lock().unwrap();
    let before = templates.len();
    templates.retain(|template| template["_id"] != id.as_str());
    if templates.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Template not found" }))).into_response();
    }
    Json(json!({ "message": "Template deleted successfully" })).into_response()
}

async fn list_segments(State(backend): State<MockBackend>) -> Json<Value> {
    Json(Value::Array(backend.segments.lock().unwrap().clone()))
}

async fn create_segment(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let mut stored = body.clone();
    stored["_id"] = body["id"].clone();
    backend.segments.lock().unwrap().push(stored);
    (StatusCode::CREATED, Json(json!({ "message": "Segment created successfully" }))).into_response()
}

async fn list_campaigns(State(backend): State<MockBackend>) -> Json<Value> {
    Json(Value::Array(backend.campaigns.lock().unwrap().clone()))
}

async fn create_campaign(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    backend.campaigns.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(json!({ "message": "Campaign created successfully" }))).into_response()
}

async fn run_campaign(Path(id): Path<String>) -> Json<Value> {
    if id == "slow" {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    Json(json!({ "campaign_id": id, "status": "running" }))
}

async fn inbound(State(backend): State<MockBackend>) -> Json<Value> {
    Json(Value::Array(backend.inbound.lock().unwrap().clone()))
}
