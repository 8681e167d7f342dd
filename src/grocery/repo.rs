use std::collections::HashMap;

use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use super::dto::GroceryListView;

#[derive(Debug, Clone, FromRow)]
pub struct GroceryList {
    pub id: i64,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct GroceryListItem {
    pub grocery_list_id: i64,
    pub ingredient_name: String,
}

/// Stores the list and its items in one transaction.
pub async fn save(
    db: &PgPool,
    account_id: i64,
    name: &str,
    items: &[String],
) -> anyhow::Result<GroceryList> {
    let mut tx = db.begin().await.context("begin tx")?;

    let list = sqlx::query_as::<_, GroceryList>(
        r#"
        INSERT INTO grocery_lists (account_id, name)
        VALUES ($1, $2)
        RETURNING id, name, created_at
        "#,
    )
    .bind(account_id)
    .bind(name)
    .fetch_one(&mut *tx)
    .await
    .context("insert grocery list")?;

    sqlx::query(
        r#"
        INSERT INTO grocery_list_items (grocery_list_id, ingredient_name)
        SELECT $1, item FROM UNNEST($2::text[]) AS item
        "#,
    )
    .bind(list.id)
    .bind(items)
    .execute(&mut *tx)
    .await
    .context("insert grocery list items")?;

    tx.commit().await.context("commit tx")?;
    Ok(list)
}

/// Saved lists for the account, newest first, with their items.
pub async fn list_by_account(db: &PgPool, account_id: i64) -> anyhow::Result<Vec<GroceryListView>> {
    let lists = sqlx::query_as::<_, GroceryList>(
        r#"
        SELECT id, name, created_at
        FROM grocery_lists
        WHERE account_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(db)
    .await
    .context("list grocery lists")?;

    let items = sqlx::query_as::<_, GroceryListItem>(
        r#"
        SELECT i.grocery_list_id, i.ingredient_name
        FROM grocery_list_items i
        JOIN grocery_lists l ON l.id = i.grocery_list_id
        WHERE l.account_id = $1
        ORDER BY i.id ASC
        "#,
    )
    .bind(account_id)
    .fetch_all(db)
    .await
    .context("list grocery list items")?;

    let mut by_list: HashMap<i64, Vec<String>> = HashMap::new();
    for item in items {
        by_list
            .entry(item.grocery_list_id)
            .or_default()
            .push(item.ingredient_name);
    }

    Ok(lists
        .into_iter()
        .map(|l| GroceryListView {
            items: by_list.remove(&l.id).unwrap_or_default(),
            id: l.id,
            name: l.name,
            created_at: l.created_at,
        })
        .collect())
}
