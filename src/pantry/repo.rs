use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PantryEntry {
    pub id: i64,
    pub account_id: i64,
    pub ingredient_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Inserts the entry, or returns the one already stored under the same name.
pub async fn add(db: &PgPool, account_id: i64, ingredient_name: &str) -> anyhow::Result<PantryEntry> {
    let entry = sqlx::query_as::<_, PantryEntry>(
        r#"
        INSERT INTO pantry_entries (account_id, ingredient_name)
        VALUES ($1, $2)
        ON CONFLICT (account_id, ingredient_name)
            DO UPDATE SET ingredient_name = EXCLUDED.ingredient_name
        RETURNING id, account_id, ingredient_name, created_at
        "#,
    )
    .bind(account_id)
    .bind(ingredient_name)
    .fetch_one(db)
    .await?;
    Ok(entry)
}

pub async fn list_by_account(db: &PgPool, account_id: i64) -> anyhow::Result<Vec<PantryEntry>> {
    let rows = sqlx::query_as::<_, PantryEntry>(
        r#"
        SELECT id, account_id, ingredient_name, created_at
        FROM pantry_entries
        WHERE account_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(account_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn ingredient_names(db: &PgPool, account_id: i64) -> anyhow::Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT ingredient_name FROM pantry_entries WHERE account_id = $1",
    )
    .bind(account_id)
    .fetch_all(db)
    .await?;
    Ok(names)
}

/// Returns `false` when no entry with this id belongs to the account.
pub async fn delete(db: &PgPool, account_id: i64, entry_id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM pantry_entries WHERE id = $1 AND account_id = $2")
        .bind(entry_id)
        .bind(account_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
