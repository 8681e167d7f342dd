use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    dto::{GenerateRequest, GenerateResponse, GroceryListView, SaveRequest, SaveResponse},
    repo, services,
};
use crate::{auth::extractors::AuthUser, error::AppError, pantry, state::AppState};

pub fn grocery_routes() -> Router<AppState> {
    Router::new()
        .route("/grocery-list", get(list_saved))
        .route("/grocery-list/generate", post(generate))
        .route("/grocery-list/save", post(save))
}

/// Missing ingredients for the selected recipes; names only, no quantities.
#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let pantry = pantry::repo::ingredient_names(&state.db, account_id).await?;
    let grocery_list =
        services::grocery_list_for(state.recipes.as_ref(), &payload, &pantry).await?;
    info!(account_id, missing = grocery_list.len(), "grocery list generated");
    Ok(Json(GenerateResponse { grocery_list }))
}

#[instrument(skip(state, payload))]
pub async fn save(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<SaveRequest>,
) -> Result<(StatusCode, Json<SaveResponse>), AppError> {
    let list = payload.validate(OffsetDateTime::now_utc())?;
    let saved = repo::save(&state.db, account_id, &list.name, &list.items).await?;
    info!(account_id, list_id = saved.id, items = list.items.len(), "grocery list saved");
    Ok((
        StatusCode::CREATED,
        Json(SaveResponse {
            message: "Grocery list saved",
            list_id: saved.id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_saved(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<Vec<GroceryListView>>, AppError> {
    Ok(Json(repo::list_by_account(&state.db, account_id).await?))
}
