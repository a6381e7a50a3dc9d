use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use garmentflow_api::config::AppConfig;
use garmentflow_api::db::{establish_connection_with_config, run_migrations, DbConfig};
use garmentflow_api::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str =
    "integration-test-secret-0123456789-abcdefghijklmnopqrstuvwxyz-ABCDEFGH";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin@local";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token: String,
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        jwt_secret: TEST_JWT_SECRET.into(),
        jwt_expiration: 3600,
        host: "127.0.0.1".into(),
        port: 0,
        environment: "development".into(),
        log_level: "info".into(),
        log_json: false,
        auto_migrate: true,
        cors_allowed_origins: None,
        cors_allow_any_origin: false,
        db_max_connections: 1,
        db_min_connections: 1,
        admin_username: ADMIN_USERNAME.into(),
        admin_password: ADMIN_PASSWORD.into(),
        auth_issuer: "garmentflow-api".into(),
        auth_audience: "garmentflow-app".into(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = Arc::new(test_config());

        // one pooled connection, otherwise each checkout would see its own
        // empty in-memory database
        let db_config = DbConfig {
            url: config.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..DbConfig::default()
        };
        let db = Arc::new(
            establish_connection_with_config(&db_config)
                .await
                .expect("connect to in-memory database"),
        );
        run_migrations(&db).await.expect("create schema");

        let state = AppState::new(db, config);
        state
            .auth
            .ensure_default_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("seed admin");

        let (user, issued) = state
            .auth
            .authenticate(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("authenticate admin");
        assert_eq!(user.username, ADMIN_USERNAME);

        let router = build_router(state.clone());
        Self {
            router,
            state,
            token: issued.token,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, payload)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(&self.token), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(&self.token), Some(body))
            .await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(&self.token), Some(body))
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(&self.token), None)
            .await
    }
}

/// Asserts the envelope's embedded status code matches the HTTP status.
pub fn assert_envelope(status: StatusCode, payload: &Value) {
    assert_eq!(
        payload["statusCode"].as_u64(),
        Some(status.as_u16() as u64),
        "envelope statusCode should mirror the HTTP status, got {}",
        payload
    );
}
