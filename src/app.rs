use std::sync::Arc;

use axum::{
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch},
    Router,
};
use sqlx::SqlitePool;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{scopes, TokenVerifier, VerifierError};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{DatabaseError, DatabaseManager, DrinkRepository};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{require_scope, ScopeGuard};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub drinks: DrinkRepository,
    pub verifier: Arc<TokenVerifier>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database setup failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("token verifier setup failed: {0}")]
    Verifier(#[from] VerifierError),
}

impl AppState {
    pub fn new(pool: SqlitePool, verifier: TokenVerifier) -> Self {
        Self {
            drinks: DrinkRepository::new(pool.clone()),
            pool,
            verifier: Arc::new(verifier),
        }
    }

    /// Build the verifier, open the database and prepare the schema
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let verifier = TokenVerifier::from_config(&config.auth).await?;

        let pool = DatabaseManager::connect(&config.database).await?;
        if config.database.reset_on_boot {
            DatabaseManager::reset(&pool).await?;
        } else {
            DatabaseManager::ensure_schema(&pool).await?;
        }

        Ok(Self::new(pool, verifier))
    }
}

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let verifier = Arc::clone(&state.verifier);

    Router::new()
        .route("/health", get(public::health))
        .route(
            "/drinks",
            get(public::drinks_list).post(protected::drinks_create.layer(from_fn_with_state(
                ScopeGuard::new(&verifier, scopes::POST_DRINKS),
                require_scope,
            ))),
        )
        .route(
            "/drinks-detail",
            get(protected::drinks_detail.layer(from_fn_with_state(
                ScopeGuard::new(&verifier, scopes::GET_DRINKS_DETAIL),
                require_scope,
            ))),
        )
        .route(
            "/drinks/:id",
            patch(protected::drinks_update.layer(from_fn_with_state(
                ScopeGuard::new(&verifier, scopes::PATCH_DRINKS),
                require_scope,
            )))
            .delete(protected::drinks_delete.layer(from_fn_with_state(
                ScopeGuard::new(&verifier, scopes::DELETE_DRINKS),
                require_scope,
            ))),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(security)),
        )
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("resource not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("method not allowed")
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
