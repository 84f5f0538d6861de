//! Test helpers for account-service integration tests.
//!
//! Builds the full router over a fresh in-memory state and drives it with
//! `tower::ServiceExt::oneshot`, no socket required.

#![allow(dead_code)]

use account_service::{
    build_router,
    config::{AccountConfig, Environment, JwtConfig, SecurityConfig, SwaggerConfig, SwaggerMode},
    AppState,
};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-signing-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let state = AppState::new(create_test_config()).expect("Failed to build state");
        let router = build_router(state.clone())
            .await
            .expect("Failed to build router");
        TestApp { router, state }
    }

    /// Send one request and decode the JSON body (`Null` when empty or not JSON).
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
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Register an identity and return its id.
    pub async fn register(&self, username: &str, password: &str, role: &str) -> i64 {
        let (status, body) = self
            .request(
                Method::POST,
                "/register",
                None,
                Some(json!({ "username": username, "password": password, "role": role })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["id"].as_i64().expect("id in register response")
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().expect("token in login response").to_string()
    }

    /// Register and log in, returning `(id, token)`.
    pub async fn signup(&self, username: &str, role: &str) -> (i64, String) {
        let password = format!("{}-password", username);
        let id = self.register(username, &password, role).await;
        let token = self.login(username, &password).await;
        (id, token)
    }

    pub async fn create_account(&self, admin_token: &str, user_id: i64, balance: f64) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/accounts",
                Some(admin_token),
                Some(json!({ "user_id": user_id, "balance": balance })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create account failed: {}", body);
        body
    }

    pub async fn balance(&self, token: &str, user_id: i64) -> (StatusCode, Value) {
        self.request(
            Method::GET,
            &format!("/balance?user_id={}", user_id),
            Some(token),
            None,
        )
        .await
    }

    pub async fn deposit(&self, token: &str, user_id: i64, amount: f64) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/balance",
            Some(token),
            Some(json!({ "user_id": user_id, "amount": amount })),
        )
        .await
    }

    pub async fn withdraw(&self, token: &str, user_id: i64, amount: f64) -> (StatusCode, Value) {
        self.request(
            Method::DELETE,
            "/balance",
            Some(token),
            Some(json!({ "user_id": user_id, "amount": amount })),
        )
        .await
    }
}

/// Create a test configuration.
pub fn create_test_config() -> AccountConfig {
    AccountConfig {
        common: service_core::config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "account-service-test".to_string(),
        service_version: "0.1.0".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
    }
}
