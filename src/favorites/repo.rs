use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FavoriteRecipe {
    pub id: i64,
    pub recipe_id: String,
    pub recipe_json: Json<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Stores the favorite, or returns the existing row for this recipe unchanged.
pub async fn add(
    db: &PgPool,
    account_id: i64,
    recipe_id: &str,
    recipe_json: &serde_json::Value,
) -> anyhow::Result<FavoriteRecipe> {
    let row = sqlx::query_as::<_, FavoriteRecipe>(
        r#"
        INSERT INTO favorite_recipes (account_id, recipe_id, recipe_json)
        VALUES ($1, $2, $3)
        ON CONFLICT (account_id, recipe_id)
            DO UPDATE SET recipe_id = favorite_recipes.recipe_id
        RETURNING id, recipe_id, recipe_json, created_at, updated_at
        "#,
    )
    .bind(account_id)
    .bind(recipe_id)
    .bind(Json(recipe_json))
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn list_by_account(db: &PgPool, account_id: i64) -> anyhow::Result<Vec<FavoriteRecipe>> {
    let rows = sqlx::query_as::<_, FavoriteRecipe>(
        r#"
        SELECT id, recipe_id, recipe_json, created_at, updated_at
        FROM favorite_recipes
        WHERE account_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn delete(db: &PgPool, account_id: i64, recipe_id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM favorite_recipes WHERE account_id = $1 AND recipe_id = $2")
        .bind(account_id)
        .bind(recipe_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
