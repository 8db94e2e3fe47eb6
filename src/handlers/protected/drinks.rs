use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    Json,
};

use crate::api::{CreateDrinkRequest, Deleted, DrinkList, UpdateDrinkRequest};
use crate::app::AppState;
use crate::auth::Claims;
use crate::database::models::Drink;
use crate::database::DrinkChanges;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// A non-numeric id can never match a drink
fn drink_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found("drink not found"))
}

/// GET /drinks-detail - every drink in long form (scope `get:drinks-detail`)
pub async fn detail(State(state): State<AppState>) -> ApiResult<DrinkList<Drink>> {
    let drinks = state.drinks.list().await?;
    Ok(ApiResponse::success(DrinkList { drinks }))
}

/// POST /drinks - create a drink (scope `post:drinks`)
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> ApiResult<DrinkList<Drink>> {
    let Json(body) = payload?;
    let recipe = body
        .recipe
        .ok_or_else(|| ApiError::bad_request("recipe is required"))?;

    let drink = state
        .drinks
        .insert(body.title.as_deref().unwrap_or_default(), &Vec::from(recipe))
        .await?;

    tracing::info!("Drink {} ({}) created by {}", drink.id, drink.title, claims.sub);
    Ok(ApiResponse::success(DrinkList::one(drink)))
}

/// PATCH /drinks/:id - change the title and/or recipe (scope `patch:drinks`)
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> ApiResult<DrinkList<Drink>> {
    let id = drink_id(id)?;
    let Json(body) = payload?;

    let changes = DrinkChanges {
        title: body.title,
        recipe: body.recipe.map(Vec::from),
    };
    let drink = state.drinks.update(id, changes).await?;

    tracing::info!("Drink {} updated by {}", drink.id, claims.sub);
    Ok(ApiResponse::success(DrinkList::one(drink)))
}

/// DELETE /drinks/:id (scope `delete:drinks`)
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Deleted> {
    let id = drink_id(id)?;
    let deleted = state.drinks.delete(id).await?;

    tracing::info!("Drink {} deleted by {}", deleted, claims.sub);
    Ok(ApiResponse::success(Deleted { delete: deleted }))
}
