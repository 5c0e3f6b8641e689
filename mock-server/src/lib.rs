use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Counts requests served by every route except `/hits`.
#[derive(Clone, Debug, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// What `/echo` saw. Header names are lowercase.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/ok", get(ok))
        .route("/create", post(create))
        .route("/missing", get(missing))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/slow/{millis}", get(slow))
        .route("/not-json", get(not_json))
        .route("/hits", get(hit_count))
        .with_state(Hits::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok(State(hits): State<Hits>) -> Json<Value> {
    hits.record();
    Json(json!({ "x": 1 }))
}

async fn create(State(hits): State<Hits>) -> StatusCode {
    hits.record();
    StatusCode::CREATED
}

async fn missing(State(hits): State<Hits>) -> (StatusCode, &'static str) {
    hits.record();
    (StatusCode::NOT_FOUND, "not found")
}

async fn echo(
    State(hits): State<Hits>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    hits.record();
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(State(hits): State<Hits>, Path(code): Path<u16>) -> (StatusCode, String) {
    hits.record();
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}

async fn slow(State(hits): State<Hits>, Path(millis): Path<u64>) -> Json<Value> {
    hits.record();
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(json!({ "x": 1 }))
}

async fn not_json(State(hits): State<Hits>) -> &'static str {
    hits.record();
    "not json"
}

async fn hit_count(State(hits): State<Hits>) -> Json<usize> {
    Json(hits.count())
}
