use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::error;

use crate::{auth::repo_types::Account, error::AppError};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("an account with this email or username already exists")]
    DuplicateIdentity,
    #[error("account storage unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::DuplicateIdentity => AppError::DuplicateIdentity,
            DirectoryError::Unavailable(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Identity lookups and creation. Implementations own uniqueness of email
/// and username and report violations as [`DirectoryError::DuplicateIdentity`].
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// `identifier` is matched against email (case-insensitively) or username.
    async fn find_by_identifier(&self, identifier: &str)
        -> Result<Option<Account>, DirectoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DirectoryError>;
    async fn create(
        &self,
        username: Option<&str>,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, DirectoryError>;
    async fn touch_last_login(&self, id: i64) -> Result<(), DirectoryError>;
}

#[derive(Clone)]
pub struct PgAccountDirectory {
    db: PgPool,
}

impl PgAccountDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn storage_error(op: &'static str) -> impl Fn(sqlx::Error) -> DirectoryError {
    move |e| {
        error!(error = %e, op, "account storage error");
        DirectoryError::Unavailable(format!("{op}: {e}"))
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, DirectoryError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash, created_at, last_login
            FROM accounts
            WHERE email = lower($1) OR username = $1
            ORDER BY (email = lower($1)) DESC
            LIMIT 1
            "#,
        )
        .bind(identifier.trim())
        .fetch_optional(&self.db)
        .await
        .map_err(storage_error("find_by_identifier"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DirectoryError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash, created_at, last_login
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(storage_error("find_by_id"))
    }

    async fn create(
        &self,
        username: Option<&str>,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, DirectoryError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, last_login
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return DirectoryError::DuplicateIdentity;
                }
            }
            storage_error("create")(e)
        })
    }

    async fn touch_last_login(&self, id: i64) -> Result<(), DirectoryError> {
        sqlx::query("UPDATE accounts SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(storage_error("touch_last_login"))?;
        Ok(())
    }
}

/// In-process directory with the same uniqueness rules as the database.
#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use time::OffsetDateTime;

    use super::*;

    #[derive(Default)]
    pub struct MemoryAccountDirectory {
        accounts: Mutex<Vec<Account>>,
    }

    impl MemoryAccountDirectory {
        pub fn snapshot(&self) -> Vec<Account> {
            self.accounts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AccountDirectory for MemoryAccountDirectory {
        async fn find_by_identifier(
            &self,
            identifier: &str,
        ) -> Result<Option<Account>, DirectoryError> {
            let identifier = identifier.trim();
            let email = identifier.to_lowercase();
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts
                .iter()
                .find(|a| a.email == email)
                .or_else(|| {
                    accounts
                        .iter()
                        .find(|a| a.username.as_deref() == Some(identifier))
                })
                .cloned())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DirectoryError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.iter().find(|a| a.id == id).cloned())
        }

        async fn create(
            &self,
            username: Option<&str>,
            email: &str,
            password_hash: &str,
        ) -> Result<Account, DirectoryError> {
            let mut accounts = self.accounts.lock().unwrap();
            let taken = accounts.iter().any(|a| {
                a.email == email || (username.is_some() && a.username.as_deref() == username)
            });
            if taken {
                return Err(DirectoryError::DuplicateIdentity);
            }
            let account = Account {
                id: accounts.len() as i64 + 1,
                username: username.map(str::to_string),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: OffsetDateTime::now_utc(),
                last_login: None,
            };
            accounts.push(account.clone());
            Ok(account)
        }

        async fn touch_last_login(&self, id: i64) -> Result<(), DirectoryError> {
            let mut accounts = self.accounts.lock().unwrap();
            if let Some(a) = accounts.iter_mut().find(|a| a.id == id) {
                a.last_login = Some(OffsetDateTime::now_utc());
            }
            Ok(())
        }
    }
}
