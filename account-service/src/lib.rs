//! Account Service - per-user balances behind JWT authentication.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    access_log::access_log_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AccountConfig, SwaggerMode};
use crate::middleware::{auth_middleware, metrics_middleware, require_role};
use crate::models::Role;
use crate::services::{CredentialStore, Ledger, OwnershipValidator, TokenService};
use service_core::error::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::metrics::metrics,
        handlers::auth::register,
        handlers::auth::login,
        handlers::accounts::create_account,
        handlers::accounts::list_accounts,
        handlers::balance::get_balance,
        handlers::balance::deposit,
        handlers::balance::withdraw,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::auth::RegisterRequest,
            dtos::auth::LoginRequest,
            dtos::auth::TokenResponse,
            dtos::account::CreateAccountRequest,
            dtos::account::BalanceResponse,
            dtos::account::TransactionRequest,
            models::User,
            models::Role,
            models::Account,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and token issuance"),
        (name = "Accounts", description = "Administrative account management"),
        (name = "Balance", description = "Owner-only balance operations"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AccountConfig,
    pub credentials: CredentialStore,
    pub tokens: TokenService,
    pub ledger: Ledger,
}

impl AppState {
    /// Wire the stores and services for one process.
    pub fn new(config: AccountConfig) -> Result<Self, AppError> {
        let tokens = TokenService::new(&config.jwt).map_err(AppError::ConfigError)?;
        let credentials = CredentialStore::new();
        let ledger = Ledger::new(OwnershipValidator::new(credentials.clone()));

        Ok(Self {
            config,
            credentials,
            tokens,
            ledger,
        })
    }
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Admin-only account management
    let account_routes = Router::new()
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route_layer(from_fn_with_state(Role::Admin, require_role));

    // Owner-scoped balance operations for regular users
    let balance_routes = Router::new()
        .route(
            "/balance",
            get(handlers::get_balance)
                .post(handlers::deposit)
                .delete(handlers::withdraw),
        )
        .route_layer(from_fn_with_state(Role::User, require_role));

    // Every protected route passes the gate before its role check
    let protected_routes = Router::new()
        .merge(account_routes)
        .merge(balance_routes)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics));

    if state.config.swagger.enabled == SwaggerMode::Public {
        app = app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    }

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .security
                .allowed_origins
                .iter()
                .filter_map(|o| match o.parse::<axum::http::HeaderValue>() {
                    Ok(origin) => Some(origin),
                    Err(e) => {
                        tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                        None
                    }
                })
                .collect::<Vec<axum::http::HeaderValue>>(),
        )
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let app = app
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected_routes)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(access_log_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors);

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Service state is unreadable")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<axum::Json<serde_json::Value>, AppError> {
    let users = state.credentials.count()?;
    let accounts = state.ledger.count()?;

    Ok(axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "users": users,
            "accounts": accounts
        }
    })))
}
