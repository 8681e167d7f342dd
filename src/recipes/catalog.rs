//! TheMealDB-backed recipe catalog.
//!
//! The adapter owns transport details only: URL building, timeout and status
//! mapping, and decoding TheMealDB's `{"meals": [...] | null}` envelopes.

use std::{collections::BTreeSet, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::RecipeApiConfig, error::AppError};

/// TheMealDB stores at most this many `strIngredientN` fields per meal.
const MAX_INGREDIENT_SLOTS: usize = 20;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("recipe catalog unreachable: {0}")]
    Transport(String),
    #[error("recipe catalog returned status {0}")]
    Status(u16),
    #[error("recipe catalog payload invalid: {0}")]
    Decode(String),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::BadGateway(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

/// Read-only recipe source. Failures are reported, never retried.
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    async fn filter_by_category(&self, category: &str)
        -> Result<Vec<RecipeSummary>, CatalogError>;
    async fn search_by_name(&self, name: &str) -> Result<Vec<RecipeSummary>, CatalogError>;
    /// `None` when the catalog has no recipe with this id.
    async fn ingredients_for(&self, recipe_id: &str)
        -> Result<Option<Vec<String>>, CatalogError>;
    async fn list_ingredients(&self) -> Result<Vec<String>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct IngredientEntry {
    #[serde(rename = "strIngredient")]
    name: Option<String>,
}

pub struct HttpRecipeCatalog {
    client: Client,
    base_url: String,
}

impl HttpRecipeCatalog {
    pub fn new(cfg: &RecipeApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
        })
    }

    async fn get_meals<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, endpoint, "recipe catalog returned error status");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let meals = parse_meals::<T>(&body)?;
        debug!(endpoint, count = meals.len(), "recipe catalog response");
        Ok(meals)
    }
}

#[async_trait]
impl RecipeCatalog for HttpRecipeCatalog {
    async fn filter_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<RecipeSummary>, CatalogError> {
        self.get_meals("filter.php", &[("c", category)]).await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<RecipeSummary>, CatalogError> {
        self.get_meals("search.php", &[("s", name)]).await
    }

    async fn ingredients_for(
        &self,
        recipe_id: &str,
    ) -> Result<Option<Vec<String>>, CatalogError> {
        let meals: Vec<Map<String, Value>> =
            self.get_meals("lookup.php", &[("i", recipe_id)]).await?;
        Ok(meals.first().map(ingredients_of))
    }

    async fn list_ingredients(&self) -> Result<Vec<String>, CatalogError> {
        let entries: Vec<IngredientEntry> =
            self.get_meals("list.php", &[("i", "list")]).await?;
        let names: BTreeSet<String> = entries
            .into_iter()
            .filter_map(|e| e.name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        Ok(names.into_iter().collect())
    }
}

/// `{"meals": null}` decodes to an empty list.
fn parse_meals<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, CatalogError> {
    let envelope: MealsEnvelope<T> =
        serde_json::from_slice(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(envelope.meals.unwrap_or_default())
}

/// Collects the non-blank `strIngredient1..=20` values of a full meal record.
fn ingredients_of(meal: &Map<String, Value>) -> Vec<String> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|i| meal.get(&format!("strIngredient{i}")))
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
