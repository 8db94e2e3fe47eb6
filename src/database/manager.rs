use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Input rejected before or by the store; maps to 400
    #[error("{0}")]
    Validation(String),

    #[error("drink {0} not found")]
    NotFound(i64),

    #[error("drink {id} has an unreadable recipe: {source}")]
    CorruptRecipe {
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_DRINKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        recipe TEXT NOT NULL
    )
"#;

/// Pool construction and schema lifecycle for the drinks database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for the configured URL, creating the database file if needed
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        // Each connection to an in-memory database is a separate database,
        // so it must be pinned to a single connection that never expires.
        let pool = if Self::is_memory_url(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .connect_with(options)
                .await?
        };

        info!("Connected to database: {}", config.url);
        Ok(pool)
    }

    /// Create the drinks table if it does not exist yet
    pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_DRINKS_TABLE).execute(pool).await?;
        Ok(())
    }

    /// Drop and recreate the drinks table, seeding a single "Water" drink
    pub async fn reset(pool: &SqlitePool) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS drinks")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_DRINKS_TABLE).execute(&mut *tx).await?;

        let seed = json!([{ "name": "water", "color": "blue", "parts": 1 }]);
        sqlx::query("INSERT INTO drinks (title, recipe) VALUES (?, ?)")
            .bind("Water")
            .bind(seed.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Reset drinks table");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn is_memory_url(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}
