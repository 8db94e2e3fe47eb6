use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Drink, DrinkRow, Ingredient};

/// Longest title the catalog accepts
pub const MAX_TITLE_LEN: usize = 80;

/// Fields a PATCH may change; at least one must be present
#[derive(Debug, Clone, Default)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

/// Store for drink records, backed by the `drinks` table
#[derive(Clone)]
pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All drinks in id order; empty when the table has none
    pub async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(into_drink).collect()
    }

    pub async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, DatabaseError> {
        let title = validate_title(title)?;
        let recipe_json = encode_recipe(recipe)?;

        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(recipe_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, title))?;

        let drink = into_drink(row)?;
        tracing::debug!("Inserted drink {} ({})", drink.id, drink.title);
        Ok(drink)
    }

    pub async fn update(&self, id: i64, changes: DrinkChanges) -> Result<Drink, DatabaseError> {
        // A missing record is reported ahead of any problem with the body
        let (title, recipe_json) = match prepare_changes(&changes) {
            Ok(prepared) => prepared,
            Err(err) => {
                self.exists(id).await?;
                return Err(err);
            }
        };

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET title = COALESCE(?, title),
                recipe = COALESCE(?, recipe)
            WHERE id = ?
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(recipe_json)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, title.unwrap_or_default()))?
        .ok_or(DatabaseError::NotFound(id))?;

        into_drink(row)
    }

    async fn exists(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM drinks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or(DatabaseError::NotFound(id))
    }

    /// Remove a drink, returning the id that was deleted
    pub async fn delete(&self, id: i64) -> Result<i64, DatabaseError> {
        sqlx::query_scalar::<_, i64>("DELETE FROM drinks WHERE id = ? RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(id))
    }
}

fn prepare_changes(changes: &DrinkChanges) -> Result<(Option<&str>, Option<String>), DatabaseError> {
    if changes.is_empty() {
        return Err(DatabaseError::Validation(
            "request must include a title or a recipe".to_string(),
        ));
    }
    let title = changes.title.as_deref().map(validate_title).transpose()?;
    let recipe_json = changes.recipe.as_deref().map(encode_recipe).transpose()?;
    Ok((title, recipe_json))
}

fn validate_title(title: &str) -> Result<&str, DatabaseError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DatabaseError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DatabaseError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title)
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String, DatabaseError> {
    serde_json::to_string(recipe)
        .map_err(|e| DatabaseError::Validation(format!("recipe could not be encoded: {}", e)))
}

fn into_drink(row: DrinkRow) -> Result<Drink, DatabaseError> {
    let id = row.id;
    Drink::try_from(row).map_err(|source| DatabaseError::CorruptRecipe { id, source })
}

fn map_write_error(err: sqlx::Error, title: &str) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DatabaseError::Validation(format!("a drink titled '{}' already exists", title))
        }
        _ => err.into(),
    }
}
