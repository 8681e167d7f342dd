use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::jwt::TokenKeys;
use crate::auth::repo::{AccountDirectory, PgAccountDirectory};
use crate::config::AppConfig;
use crate::recipes::catalog::{HttpRecipeCatalog, RecipeCatalog};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenKeys,
    pub accounts: Arc<dyn AccountDirectory>,
    pub recipes: Arc<dyn RecipeCatalog>,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let recipes = Arc::new(
            HttpRecipeCatalog::new(&config.recipe_api).context("build recipe api client")?,
        ) as Arc<dyn RecipeCatalog>;

        Ok(Self {
            tokens: TokenKeys::new(&config.jwt),
            accounts: Arc::new(PgAccountDirectory::new(db.clone())),
            db,
            recipes,
        })
    }
}
