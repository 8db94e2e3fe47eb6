pub mod jwks;
pub mod verifier;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

pub use verifier::TokenVerifier;

/// Permission scopes guarding the drink endpoints
pub mod scopes {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

/// `aud` may be a single string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub iss: String,
    pub aud: Audience,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.permissions.iter().any(|p| p == scope)
    }
}

/// Why a request was refused. Everything but `Forbidden` is a 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected")]
    MissingHeader,

    #[error("Authorization header must be a bearer token")]
    InvalidHeader,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Incorrect claims, please check the audience and issuer")]
    InvalidClaims,

    #[error("Unable to find the appropriate key")]
    UnknownKey,

    #[error("Unable to parse authentication token")]
    InvalidToken,

    #[error("Permission '{scope}' not granted")]
    Forbidden { scope: String },
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Forbidden { .. } => 403,
            _ => 401,
        }
    }

    /// Short machine-readable reason, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::InvalidHeader => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::UnknownKey => "unknown_key",
            AuthError::InvalidToken => "invalid_token",
            AuthError::Forbidden { .. } => "forbidden",
        }
    }
}

/// Failures while setting up verification or minting tokens
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("no token verifier configured: set AUTH_DOMAIN or AUTH_JWT_SECRET")]
    NotConfigured,

    #[error("AUTH_JWT_SECRET is required to mint tokens")]
    MissingSecret,

    #[error("invalid identity provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to fetch signing keys: {0}")]
    JwksFetch(#[from] reqwest::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidHeader)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(AuthError::InvalidHeader);
    }
    Ok(token)
}

/// Mint an HS256 token signed with the configured shared secret
pub fn mint_token(
    config: &AuthConfig,
    subject: &str,
    permissions: Vec<String>,
    ttl: Duration,
) -> Result<String, VerifierError> {
    let secret = config
        .jwt_secret
        .as_deref()
        .ok_or(VerifierError::MissingSecret)?;

    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        permissions,
        iss: config.issuer(),
        aud: Audience::One(config.audience.clone()),
        exp: (now + ttl).timestamp(),
        iat: Some(now.timestamp()),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
