use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Drop and recreate the drinks table at startup, seeding one record
    pub reset_on_boot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub bind_host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity provider domain; when set, signing keys come from its JWKS endpoint
    pub domain: Option<String>,
    pub audience: String,
    pub issuer: Option<String>,
    /// HS256 shared secret, used when no domain is configured and for minting local tokens
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty or "*" means any origin
    pub cors_origins: Vec<String>,
}

impl AuthConfig {
    const DEFAULT_ISSUER: &'static str = "drinks-api";

    /// Expected `iss` claim: explicit setting, else derived from the domain
    pub fn issuer(&self) -> String {
        if let Some(issuer) = &self.issuer {
            return issuer.clone();
        }
        match &self.domain {
            Some(domain) => format!("https://{}/", bare_domain(domain)),
            None => Self::DEFAULT_ISSUER.to_string(),
        }
    }
}

/// Strip any scheme and trailing slash from a configured domain
pub fn bare_domain(domain: &str) -> &str {
    domain
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_RESET_ON_BOOT") {
            self.database.reset_on_boot = v.parse().unwrap_or(self.database.reset_on_boot);
        }

        // API overrides
        if let Some(v) = lookup("API_BIND_HOST") {
            self.api.bind_host = v;
        }
        if let Some(port) = lookup("API_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }

        // Auth overrides
        if let Some(v) = lookup("AUTH_DOMAIN").filter(|v| !v.trim().is_empty()) {
            self.auth.domain = Some(v);
        }
        if let Some(v) = lookup("AUTH_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Some(v) = lookup("AUTH_ISSUER").filter(|v| !v.trim().is_empty()) {
            self.auth.issuer = Some(v);
        }
        if let Some(v) = lookup("AUTH_JWT_SECRET").filter(|v| !v.is_empty()) {
            self.auth.jwt_secret = Some(v);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite://drinks.db?mode=rwc".to_string(),
                max_connections: 5,
                reset_on_boot: false,
            },
            api: ApiConfig {
                bind_host: "127.0.0.1".to_string(),
                port: 5000,
            },
            auth: AuthConfig {
                domain: None,
                audience: "drinks".to_string(),
                issuer: None,
                jwt_secret: None,
            },
            security: SecurityConfig {
                cors_origins: Vec::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "sqlite://drinks.db?mode=rwc".to_string(),
                max_connections: 10,
                reset_on_boot: false,
            },
            api: ApiConfig {
                bind_host: "0.0.0.0".to_string(),
                port: 8080,
            },
            auth: AuthConfig {
                domain: None,
                audience: "drinks".to_string(),
                issuer: None,
                jwt_secret: None,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:8100".to_string()],
            },
        }
    }
}
