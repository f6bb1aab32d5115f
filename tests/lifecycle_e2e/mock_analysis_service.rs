//! Mock AI analysis service for E2E tests.
//!
//! Starts an in-process HTTP server serving `/analyze` and `/health`.
//! Tests flip it between healthy and failing and inspect what it received.

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared state for the mock analysis service.
#[derive(Default)]
pub struct MockAnalysisState {
    failing: AtomicBool,
    requests: Mutex<Vec<Value>>,
}

/// Canned analysis document returned while healthy.
pub fn analysis_payload() -> Value {
    json!({
        "results": {"wbc": {"value": 5.2, "interpretation": "normal"}},
        "recommendations": ["No follow-up required"],
        "flags": {},
        "timestamp": "2025-03-01T12:00:00Z"
    })
}

async fn analyze(state: web::Data<Arc<MockAnalysisState>>, body: web::Json<Value>) -> HttpResponse {
    state.requests.lock().unwrap().push(body.into_inner());

    if state.failing.load(Ordering::SeqCst) {
        HttpResponse::InternalServerError().json(json!({"detail": "model unavailable"}))
    } else {
        HttpResponse::Ok().json(analysis_payload())
    }
}

async fn health(state: web::Data<Arc<MockAnalysisState>>) -> HttpResponse {
    let status = if state.failing.load(Ordering::SeqCst) {
        "unhealthy"
    } else {
        "healthy"
    };
    HttpResponse::Ok().json(json!({ "status": status }))
}

/// Mock analysis service bound to an ephemeral port.
pub struct MockAnalysisService {
    pub base_url: String,
    state: Arc<MockAnalysisState>,
}

impl MockAnalysisService {
    /// Start the mock; it answers successfully until told to fail.
    pub async fn start() -> Self {
        let state = Arc::new(MockAnalysisState::default());

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .route("/analyze", web::post().to(analyze))
                .route("/health", web::get().to(health))
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        tokio::spawn(server);

        MockAnalysisService { base_url, state }
    }

    /// Make every subsequent request fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `/analyze` requests received so far.
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Body of the most recent `/analyze` request.
    pub fn last_request(&self) -> Option<Value> {
        self.state.requests.lock().unwrap().last().cloned()
    }
}
