use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{PreferencesResponse, PreferencesUpdate},
    repo,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn preferences_routes() -> Router<AppState> {
    Router::new()
        .route("/preferences", post(save_preferences))
        .route("/preferences/", post(save_preferences))
        .route("/preferences/me", get(get_preferences))
}

#[instrument(skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = repo::list_by_account(&state.db, account_id).await?;
    Ok(Json(PreferencesResponse { preferences }))
}

/// Replaces every stored preference of the account with the given set.
#[instrument(skip(state, payload))]
pub async fn save_preferences(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<PreferencesUpdate>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = payload.validated()?;
    repo::replace_all(&state.db, account_id, &preferences).await?;
    info!(account_id, count = preferences.len(), "preferences replaced");
    Ok(Json(PreferencesResponse { preferences }))
}
