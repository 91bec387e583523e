//! Shared test fixtures: a recording HTTP stub of the insurance API and
//! canned wire payloads.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::models::{InsuranceCompany, UserProfile, UserRole};
use crate::session::Session;

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Canned `(status, body)` per `(method, path)`.
type RouteTable = HashMap<(String, String), (u16, Value)>;

#[derive(Clone, Default)]
struct StubState {
    routes: Arc<Mutex<RouteTable>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server that answers canned JSON per `(method, path)` and
/// records every request. Unrouted requests get 404.
pub struct StubServer {
    addr: SocketAddr,
    state: StubState,
}

impl StubServer {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(record).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    pub fn route(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self, session: Arc<Session>) -> ApiClient {
        ApiClient::new(&self.url(), session).unwrap()
    }
}

async fn record(State(state): State<StubState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let headers = parts
        .headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers,
        body,
    };
    let key = (recorded.method.clone(), recorded.path.clone());
    state.requests.lock().unwrap().push(recorded);

    let canned = state.routes.lock().unwrap().get(&key).cloned();
    match canned {
        Some((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap();
            (status, Json(body)).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
    }
}

/// Base URL of a port nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn sample_user() -> UserProfile {
    UserProfile {
        id: 42,
        name: "Pat Reviewer".into(),
        email: "pat@bcbs.example".into(),
        role: UserRole::ClaimsProcessor,
        insurance_company: InsuranceCompany {
            id: 1,
            name: "Blue Cross Blue Shield".into(),
            code: "BCBS".into(),
        },
    }
}

pub fn user_json() -> Value {
    serde_json::to_value(sample_user()).unwrap()
}

pub fn claim_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "claim_number": format!("CLM-LIVE-{id:04}"),
        "patient_name": "Live Patient",
        "patient_id": 900 + id,
        "therapist_name": "Dr. Live",
        "service_date": "2026-01-05",
        "service_type": "Individual Therapy",
        "billed_amount": 200,
        "status": status
    })
}

pub fn claim_detail_json(id: u64, status: &str) -> Value {
    let mut value = claim_json(id, status);
    let extra = json!({
        "patient": {"id": 900 + id, "name": "Live Patient", "email": "live@example.com"},
        "therapist": {"id": 5, "name": "Dr. Live"},
        "documents": []
    });
    if let (Some(obj), Value::Object(extra)) = (value.as_object_mut(), extra) {
        obj.extend(extra);
    }
    value
}

pub fn analytics_json() -> Value {
    json!({
        "claims_summary": {"total": 10, "pending": 1, "approved": 6, "denied": 2, "paid": 1},
        "financial": {
            "total_billed": 1000, "total_approved": 800,
            "total_paid": 400, "this_month_billed": 100
        },
        "processing": {"avg_processing_days": 3.5, "claims_this_month": 4, "claims_last_month": 2},
        "patients": {"total_active": 7}
    })
}
