//! Shared helpers for router tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use notes_api::{config::ServerConfig, create_router, AppState};
use notes_db::test_fixtures::TestDatabase;

pub struct TestApp {
    pub router: Router,
    pub test_db: TestDatabase,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let test_db = TestDatabase::new().await;
        let router = create_router(AppState::new(test_db.db.clone()), &config);
        Self { router, test_db }
    }

    /// Send a request as the given caller and return status plus JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Caller<'_>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = caller.user_id {
            builder = builder.header("X-User-Id", id);
        }
        if let Some(role) = caller.role {
            builder = builder.header("X-User-Role", role);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    /// Create a note through the API and return its id.
    pub async fn create_note(&self, caller: Caller<'_>, title: &str, content: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/notes",
                caller,
                Some(serde_json::json!({ "title": title, "content": content })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["id"].as_i64().expect("note id")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Caller<'a> {
    pub user_id: Option<&'a str>,
    pub role: Option<&'a str>,
}

pub fn user(id: &str) -> Caller<'_> {
    Caller {
        user_id: Some(id),
        role: Some("user"),
    }
}

pub fn admin(id: &str) -> Caller<'_> {
    Caller {
        user_id: Some(id),
        role: Some("admin"),
    }
}

pub fn anonymous() -> Caller<'static> {
    Caller::default()
}
