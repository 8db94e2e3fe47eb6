use serde::{Deserialize, Serialize};

use crate::database::models::RecipeInput;

/// `{"drinks": [...]}` payload shared by every drink-returning endpoint
#[derive(Debug, Serialize)]
pub struct DrinkList<T: Serialize> {
    pub drinks: Vec<T>,
}

impl<T: Serialize> DrinkList<T> {
    pub fn one(drink: T) -> Self {
        Self { drinks: vec![drink] }
    }
}

/// `{"delete": <id>}` payload for DELETE /drinks/:id
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub delete: i64,
}

/// POST /drinks body
#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

/// PATCH /drinks/:id body; a field that is absent or null is left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}
