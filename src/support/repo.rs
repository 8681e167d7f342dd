use anyhow::Context;
use sqlx::PgPool;

use super::dto::ValidatedMessage;

pub async fn insert(db: &PgPool, msg: &ValidatedMessage) -> anyhow::Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO support_messages (name, email, message) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&msg.name)
    .bind(&msg.email)
    .bind(&msg.message)
    .fetch_one(db)
    .await
    .context("insert support message")?;
    Ok(id)
}
