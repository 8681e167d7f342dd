use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::AddIngredientRequest,
    repo::{self, PantryEntry},
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn pantry_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry", get(list_ingredients).post(add_ingredient))
        .route("/pantry/", get(list_ingredients).post(add_ingredient))
        .route("/pantry/:id", delete(delete_ingredient))
}

#[instrument(skip(state, payload))]
pub async fn add_ingredient(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<AddIngredientRequest>,
) -> Result<(StatusCode, Json<PantryEntry>), AppError> {
    let name = payload.validated_name()?;
    let entry = repo::add(&state.db, account_id, &name).await?;
    info!(account_id, entry_id = entry.id, "pantry ingredient stored");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<Vec<PantryEntry>>, AppError> {
    let entries = repo::list_by_account(&state.db, account_id).await?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, account_id, id).await? {
        return Err(AppError::NotFound("Ingredient not found"));
    }
    info!(account_id, entry_id = id, "pantry ingredient removed");
    Ok(StatusCode::NO_CONTENT)
}
