#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::Duration;
use drinks_api::auth::mint_token;
use drinks_api::config::AppConfig;
use drinks_api::{app, AppState};
use tokio::net::TcpListener;

pub const SECRET: &str = "integration-test-secret";
pub const AUDIENCE: &str = "drinks";
pub const ISSUER: &str = "https://drinks.test/";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token signed with the server's secret carrying the given permissions
    pub fn token(&self, scopes: &[&str]) -> String {
        self.token_with_ttl(scopes, Duration::minutes(10))
    }

    pub fn token_with_ttl(&self, scopes: &[&str], ttl: Duration) -> String {
        let permissions = scopes.iter().map(|s| s.to_string()).collect();
        mint_token(&self.config.auth, "auth0|tester", permissions, ttl).expect("mint token")
    }
}

fn test_config(extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = [
        ("DATABASE_URL", "sqlite::memory:"),
        ("AUTH_JWT_SECRET", SECRET),
        ("AUTH_AUDIENCE", AUDIENCE),
        ("AUTH_ISSUER", ISSUER),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_vars(|key| vars.get(key).cloned())
}

/// Start the app in-process against a fresh in-memory database
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(&[]).await
}

pub async fn spawn_server_with(extra: &[(&str, &str)]) -> Result<TestServer> {
    let config = test_config(extra);
    let state = AppState::from_config(&config)
        .await
        .context("failed to build app state")?;
    let router = app(state, &config.security);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server exited: {e}");
        }
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        config,
        client: reqwest::Client::new(),
    })
}
