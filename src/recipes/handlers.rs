use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::catalog::RecipeSummary;
use crate::{auth::extractors::AuthUser, error::AppError, preferences, state::AppState};

/// Used when no stored preference maps to a catalog category.
pub const FALLBACK_CATEGORY: &str = "Seafood";

/// Preference tags that map to catalog categories, highest priority first.
const PREFERENCE_CATEGORIES: [(&str, &str); 2] = [("vegan", "Vegan"), ("vegetarian", "Vegetarian")];

pub fn recipes_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/recommendations", get(recommendations))
        .route("/recipes/search", get(search))
        .route("/recipes/ingredients", get(ingredients))
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub category: &'static str,
    pub preferences_used: Vec<String>,
    pub meals: Vec<RecipeSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub meals: Vec<RecipeSummary>,
}

#[derive(Debug, Serialize)]
pub struct IngredientsResponse {
    pub ingredients: Vec<String>,
}

pub fn category_for(preferences: &BTreeSet<String>) -> Option<&'static str> {
    PREFERENCE_CATEGORIES
        .iter()
        .find(|(tag, _)| preferences.contains(*tag))
        .map(|(_, category)| *category)
}

#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let prefs: BTreeSet<String> = preferences::repo::list_by_account(&state.db, account_id)
        .await?
        .into_iter()
        .map(|p| p.to_lowercase())
        .collect();

    let category = category_for(&prefs).unwrap_or(FALLBACK_CATEGORY);
    let meals = state.recipes.filter_by_category(category).await?;
    info!(account_id, category, count = meals.len(), "recommendations served");

    Ok(Json(RecommendationsResponse {
        category,
        preferences_used: prefs.into_iter().collect(),
        meals,
    }))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    AuthUser(_account_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let name = q.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Search term is required"));
    }
    let meals = state.recipes.search_by_name(name).await?;
    Ok(Json(SearchResponse { meals }))
}

#[instrument(skip(state))]
pub async fn ingredients(
    State(state): State<AppState>,
) -> Result<Json<IngredientsResponse>, AppError> {
    let ingredients = state.recipes.list_ingredients().await?;
    Ok(Json(IngredientsResponse { ingredients }))
}
