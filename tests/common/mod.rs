//! Throwaway REST backend served by axum on a random local port.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use golden_crm::CrmConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct Backend {
    pub collections: HashMap<String, Vec<Value>>,
    pub next_id: u64,
    pub last_query: HashMap<String, String>,
    pub list_calls: usize,
    /// A create request arrived carrying an `id`
    pub create_sent_id: bool,
    pub uploads: Vec<(String, usize)>,
    pub fail_uploads: bool,
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct MockServer {
    pub state: Shared,
    pub config: CrmConfig,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new()
            .route("/api/integrations/core/upload", post(upload))
            .route("/api/{resource}", get(list).post(create))
            .route("/api/{resource}/{id}", get(fetch).put(update).delete(remove))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = CrmConfig::with_base_url(format!("http://{addr}/api")).unwrap();
        Self { state, config }
    }

    pub fn seed(&self, resource: &str, records: Vec<Value>) {
        self.state
            .lock()
            .unwrap()
            .collections
            .insert(resource.to_string(), records);
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn backend(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.state.lock().unwrap()
    }
}

async fn list(
    State(state): State<Shared>,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let mut backend = state.lock().unwrap();
    backend.list_calls += 1;
    backend.last_query = query;
    Json(backend.collections.get(&resource).cloned().unwrap_or_default())
}

async fn create(
    State(state): State<Shared>,
    Path(resource): Path<String>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut backend = state.lock().unwrap();
    if body.get("id").is_some() {
        backend.create_sent_id = true;
    }
    backend.next_id += 1;
    body["id"] = json!(format!("{resource}-{}", backend.next_id));
    backend.collections.entry(resource).or_default().push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn fetch(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let backend = state.lock().unwrap();
    backend
        .collections
        .get(&resource)
        .and_then(|records| records.iter().find(|r| r["id"] == id.as_str()))
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("{resource} {id} not found")))
}

async fn update(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = state.lock().unwrap();
    let records = backend.collections.get_mut(&resource).ok_or(StatusCode::NOT_FOUND)?;
    let slot = records
        .iter_mut()
        .find(|r| r["id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;
    body["id"] = json!(id);
    *slot = body.clone();
    Ok(Json(body))
}

async fn remove(State(state): State<Shared>, Path((resource, id)): Path<(String, String)>) -> StatusCode {
    let mut backend = state.lock().unwrap();
    let Some(records) = backend.collections.get_mut(&resource) else {
        return StatusCode::NOT_FOUND;
    };
    let before = records.len();
    records.retain(|r| r["id"] != id.as_str());
    if records.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Result<Json<Value>, StatusCode> {
    if state.lock().unwrap().fail_uploads {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        state.lock().unwrap().uploads.push((name.clone(), bytes.len()));
        return Ok(Json(json!({ "file_url": format!("https://files.example/{name}") })));
    }
    Err(StatusCode::BAD_REQUEST)
}
