use anyhow::Context;
use sqlx::PgPool;

pub async fn list_by_account(db: &PgPool, account_id: i64) -> anyhow::Result<Vec<String>> {
    let prefs = sqlx::query_scalar::<_, String>(
        "SELECT preference FROM dietary_preferences WHERE account_id = $1 ORDER BY id ASC",
    )
    .bind(account_id)
    .fetch_all(db)
    .await
    .context("list preferences")?;
    Ok(prefs)
}

/// Deletes the account's preferences and inserts `prefs` in one transaction.
pub async fn replace_all(db: &PgPool, account_id: i64, prefs: &[String]) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;

    sqlx::query("DELETE FROM dietary_preferences WHERE account_id = $1")
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .context("delete preferences")?;

    if !prefs.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO dietary_preferences (account_id, preference)
            SELECT $1, p FROM UNNEST($2::text[]) WITH ORDINALITY AS t(p, ord)
            ORDER BY ord
            "#,
        )
        .bind(account_id)
        .bind(prefs)
        .execute(&mut *tx)
        .await
        .context("insert preferences")?;
    }

    tx.commit().await.context("commit tx")?;
    Ok(())
}
