mod common;

use anyhow::Result;
use chrono::Duration;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn missing_token_is_401() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/drinks-detail")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 401);
    assert!(body["message"].is_string(), "missing message: {}", body);
    Ok(())
}

#[tokio::test]
async fn malformed_header_and_garbage_token_are_401() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url("/drinks-detail"))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .get(server.url("/drinks-detail"))
        .bearer_auth("definitely.not.valid")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_401() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token_with_ttl(&["get:drinks-detail"], Duration::minutes(-30));

    let res = server
        .client
        .get(server.url("/drinks-detail"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_without_scope_is_403() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token(&["get:drinks-detail"]);

    let res = server
        .client
        .post(server.url("/drinks"))
        .bearer_auth(&token)
        .json(&json!({"title": "Water", "recipe": {"name": "water", "color": "blue", "parts": 1}}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], 403);

    // The rejected request must not have reached the store
    let res = server.client.get(server.url("/drinks")).send().await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["drinks"], json!([]));
    Ok(())
}

#[tokio::test]
async fn token_with_scope_is_accepted() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token(&["get:drinks-detail"]);

    let res = server
        .client
        .get(server.url("/drinks-detail"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn each_mutation_requires_its_own_scope() -> Result<()> {
    let server = common::spawn_server().await?;
    let post_only = server.token(&["post:drinks"]);

    let res = server
        .client
        .patch(server.url("/drinks/1"))
        .bearer_auth(&post_only)
        .json(&json!({"title": "Renamed"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .delete(server.url("/drinks/1"))
        .bearer_auth(&post_only)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
