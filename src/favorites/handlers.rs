use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{validated_recipe_id, FavoriteCreate},
    repo::{self, FavoriteRecipe},
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/", get(list_favorites))
        .route(
            "/favorites/:recipe_id",
            post(add_favorite).delete(remove_favorite),
        )
}

#[instrument(skip(state, payload))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(recipe_id): Path<String>,
    Json(payload): Json<FavoriteCreate>,
) -> Result<(StatusCode, Json<FavoriteRecipe>), AppError> {
    let recipe_id = validated_recipe_id(&recipe_id)?;
    payload.validate()?;
    let favorite = repo::add(&state.db, account_id, recipe_id, &payload.recipe_json).await?;
    info!(account_id, recipe_id, "favorite stored");
    Ok((StatusCode::CREATED, Json(favorite)))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(recipe_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let recipe_id = validated_recipe_id(&recipe_id)?;
    if !repo::delete(&state.db, account_id, recipe_id).await? {
        return Err(AppError::NotFound("Favorite not found"));
    }
    info!(account_id, recipe_id, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<Vec<FavoriteRecipe>>, AppError> {
    Ok(Json(repo::list_by_account(&state.db, account_id).await?))
}
