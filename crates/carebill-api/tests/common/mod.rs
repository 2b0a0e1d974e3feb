#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use carebill_api::config::ApiConfig;
use carebill_api::state::AppState;
use carebill_auth::jwt::{Role, SessionClaims, issue_token};
use carebill_storage::memory::MemoryStore;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }

    pub fn error(&self) -> String {
        self.json()["error"].as_str().unwrap_or_default().to_string()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let config = ApiConfig::from_lookup(|name| match name {
            "CAREBILL_JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), &config);
        Self {
            router: carebill_api::router(state.clone()),
            state,
            store,
        }
    }

    pub fn staff(&self) -> String {
        let claims = SessionClaims::new("staff-1", "carebill", Role::Staff, 3600).with_name("Front Desk");
        issue_token(&claims, SECRET.as_bytes()).unwrap()
    }

    pub fn patient(&self, patient_id: &str) -> String {
        let claims = SessionClaims::new("patient-1", "carebill", Role::Patient, 3600)
            .for_patient(patient_id.parse::<Uuid>().unwrap())
            .with_name("Jane Doe");
        issue_token(&claims, SECRET.as_bytes()).unwrap()
    }

    pub async fn send(&self, req: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Reply {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Reply {
        self.call("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.call("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.call("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Reply {
        self.call("DELETE", uri, Some(token), None).await
    }

    pub async fn post_text(&self, uri: &str, token: &str, content_type: &str, body: &str) -> Reply {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    /// Create a patient and return its id.
    pub async fn seed_patient(&self, first: &str, last: &str) -> String {
        let reply = self
            .post(
                "/patients",
                &self.staff(),
                json!({
                    "first_name": first,
                    "last_name": last,
                    "date_of_birth": "1980-04-12",
                    "balance": 190.0,
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
        reply.json()["id"].as_str().unwrap().to_string()
    }

    pub async fn seed_provider(&self, npi: &str) -> Value {
        let reply = self
            .post(
                "/providers",
                &self.staff(),
                json!({
                    "first_name": "Ana",
                    "last_name": "Lopez",
                    "npi": npi,
                    "specialty": "Family Medicine",
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
        reply.json()
    }
}

/// The $190 example claim: 99213 x1 at $100 and 80053 x2 at $45.
pub fn draft(patient_id: &str, patient_name: &str) -> Value {
    json!({
        "patient": { "id": patient_id, "name": patient_name },
        "service_date": "2025-02-27",
        "procedures": [
            { "code": "99213", "description": "Office visit", "units": 1, "amount": 100.0 },
            { "code": "80053", "description": "Comprehensive metabolic panel", "units": 2, "amount": 45.0 },
        ],
        "diagnoses": [
            { "code": "E11.9", "description": "Type 2 diabetes", "primary": true },
        ],
        "insurance": {
            "primary": { "id": Uuid::new_v4(), "name": "Acme Health" },
        },
    })
}
