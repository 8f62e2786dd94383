//! Stub backend for integration tests.
//!
//! Routes are supplied per test; every request that reaches the stub is
//! recorded with its method, path, query string, the headers the client is
//! expected to set, and the body.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{self, Body};
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Json;
use serde_json::{Value, json};

use frontend::AppContext;
use frontend::config::{Config, Environment};
use frontend::store::{KeyValueStore, MemoryStore};

#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<SeenRequest>>>);

impl RequestLog {
    pub fn all(&self) -> Vec<SeenRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn to_path(&self, path: &str) -> Vec<SeenRequest> {
        self.all().into_iter().filter(|seen| seen.path == path).collect()
    }
}

fn header(request: &Request, name: impl axum::http::header::AsHeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let mut seen = SeenRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization: header(&request, AUTHORIZATION),
        content_type: header(&request, CONTENT_TYPE),
        request_id: header(&request, "x-request-id"),
        body: None,
    };

    // buffer the body so handlers can still read it
    let (parts, request_body) = request.into_parts();
    let bytes = body::to_bytes(request_body, usize::MAX)
        .await
        .unwrap_or_default();
    seen.body = serde_json::from_slice(&bytes).ok();
    log.0.lock().unwrap().push(seen);

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

pub struct StubBackend {
    pub base_url: String,
    pub log: RequestLog,
}

impl StubBackend {
    pub async fn start(router: Router) -> Self {
        let log = RequestLog::default();
        let app = router.layer(middleware::from_fn_with_state(log.clone(), record));

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            log,
        }
    }

    pub fn config(&self) -> Config {
        config_for(&self.base_url)
    }

    /// Context over an in-memory store, starting signed out.
    pub async fn context(&self) -> (AppContext, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let context = AppContext::with_store(self.config(), store.clone())
            .await
            .expect("Failed to build context");
        (context, store)
    }
}

pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::for_environment(Environment::Development);
    config.api_base_url = base_url.to_string();
    config.health_check_url = format!("{}/actuator/health", base_url);
    config.health_check_timeout_secs = 1;
    config.search_debounce_ms = 50;
    config.hydration_concurrency = 4;
    config
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "code": 200, "message": "success", "data": data }))
}

pub fn fail(code: i32, message: &str) -> Json<Value> {
    Json(json!({ "code": code, "message": message, "data": null }))
}

pub fn place_detail(place_id: i64, lat: f64, lng: f64) -> Value {
    json!({
        "placeId": place_id,
        "name": format!("place {place_id}"),
        "address": "Suwon",
        "lat": lat,
        "lng": lng,
        "tags": ["cozy"],
        "insight": { "emoji": "☕", "keywords": [{ "term": "quiet", "weight": 0.8 }] }
    })
}

pub fn activity_place(place_id: i64) -> Value {
    json!({
        "placeId": place_id,
        "name": format!("place {place_id}"),
        "emoji": "📍",
        "isClosed": false,
        "lat": 37.28,
        "lng": 127.01,
        "distanceM": 120.0
    })
}

pub fn search_place(id: i64) -> Value {
    json!({ "id": id, "name": format!("place {id}"), "lat": 37.28, "lng": 127.01 })
}

pub fn friend(user_id: i64, status: &str) -> Value {
    json!({ "userId": user_id, "nickname": format!("friend {user_id}"), "status": status })
}

pub fn page(content: Vec<Value>) -> Value {
    let total = content.len();
    json!({ "content": content, "page": 0, "size": 50, "totalElements": total })
}
