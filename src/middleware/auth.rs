use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{bearer_token, TokenVerifier};
use crate::error::ApiError;

/// Middleware state: the verifier plus the scope one route requires
#[derive(Clone)]
pub struct ScopeGuard {
    verifier: Arc<TokenVerifier>,
    scope: &'static str,
}

impl ScopeGuard {
    pub fn new(verifier: &Arc<TokenVerifier>, scope: &'static str) -> Self {
        Self {
            verifier: Arc::clone(verifier),
            scope,
        }
    }
}

/// Rejects the request unless it carries a valid bearer token granting the guard's scope.
/// On success the decoded [`Claims`](crate::auth::Claims) are inserted into request extensions.
pub async fn require_scope(
    State(guard): State<ScopeGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = bearer_token(request.headers())
        .and_then(|token| guard.verifier.authorize(token, guard.scope))
        .map_err(|err| {
            tracing::warn!(
                "Authorization failed for {} {} ({}): {}",
                request.method(),
                request.uri().path(),
                err.code(),
                err
            );
            ApiError::from(err)
        })?;

    tracing::debug!("Authorized '{}' for scope {}", claims.sub, guard.scope);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
