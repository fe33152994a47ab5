#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use maintenance_api::{
    backend::CompanyDirectory,
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    repositories::{CollectionStore, SqlCollectionStore},
    services::Repositories,
    AppState,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

/// A response with its body already read
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// `data` of an `ApiResponse` envelope
    pub fn data(&self) -> Value {
        self.json()["data"].clone()
    }

    /// `message` of an `ErrorResponse`
    pub fn error_message(&self) -> String {
        self.json()["message"]
            .as_str()
            .expect("error message")
            .to_string()
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    );
    cfg.auto_migrate = true;
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg
}

impl TestApp {
    /// Fresh database, default inspection categories seeded, no company backend.
    pub async fn new() -> Self {
        Self::with_directory(None).await
    }

    pub async fn with_directory(directory: Option<Arc<dyn CompanyDirectory>>) -> Self {
        Self::build(test_config(), directory).await
    }

    pub async fn build(cfg: AppConfig, directory: Option<Arc<dyn CompanyDirectory>>) -> Self {
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let store: Arc<dyn CollectionStore> = Arc::new(SqlCollectionStore::new(db_arc.clone()));
        let services = AppServices::new(
            Repositories::new(store),
            event_sender.clone(),
            directory,
            cfg.enforce_unique_order_numbers,
        );
        services
            .inspection_categories
            .seed_defaults()
            .await
            .expect("seed inspection categories");

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", maintenance_api::api_v1_routes())
            .layer(axum::middleware::from_fn(
                maintenance_api::middleware_helpers::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body")
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, None).await
    }

    /// Creates an employee and returns its id
    pub async fn seed_employee(&self, name: &str) -> String {
        let response = self
            .post(
                "/api/v1/employees",
                serde_json::json!({ "name": name, "drt": "DRT-1001", "role": "Técnico" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.data()["id"].as_str().expect("employee id").to_string()
    }

    /// Creates a checklist for the inspection category and returns its id
    pub async fn seed_checklist(&self, category_id: &str, name: &str) -> String {
        let response = self
            .post(
                "/api/v1/checklists",
                serde_json::json!({ "categoryId": category_id, "name": name }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.data()["id"].as_str().expect("checklist id").to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
