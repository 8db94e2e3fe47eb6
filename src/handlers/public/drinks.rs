use axum::extract::State;

use crate::api::DrinkList;
use crate::app::AppState;
use crate::database::models::{Drink, DrinkShort};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /drinks - every drink in short form; ingredient amounts are not shown
pub async fn list(State(state): State<AppState>) -> ApiResult<DrinkList<DrinkShort>> {
    let drinks = state.drinks.list().await?;

    Ok(ApiResponse::success(DrinkList {
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}
