use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    jwt::TokenKeys,
    password::{hash_password, verify_password},
    repo::AccountDirectory,
    repo_types::Account,
};
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 100;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates, hashes and stores a new account.
pub async fn register(
    accounts: &dyn AccountDirectory,
    username: Option<&str>,
    email: &str,
    password: &str,
) -> Result<Account, AppError> {
    let email = normalize_email(email);
    if email.len() > MAX_EMAIL_LEN || !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation("Password too short"));
    }

    let username = username.map(str::trim).filter(|u| !u.is_empty());
    if let Some(u) = username {
        if u.chars().count() > MAX_USERNAME_LEN {
            return Err(AppError::validation("Username too long"));
        }
        if u.contains('@') {
            return Err(AppError::validation("Username must not contain '@'"));
        }
    }

    let hash = hash_password(password)?;
    let account = accounts.create(username, &email, &hash).await.map_err(|e| {
        warn!(email = %email, error = %e, "registration rejected");
        AppError::from(e)
    })?;

    info!(account_id = account.id, email = %account.email, "account registered");
    Ok(account)
}

/// Checks credentials, records the login and mints a session token.
///
/// Unknown identifiers and wrong passwords produce the same
/// [`AppError::InvalidCredentials`]; `last_login` is only touched on success.
pub async fn login(
    accounts: &dyn AccountDirectory,
    keys: &TokenKeys,
    identifier: &str,
    password: &str,
) -> Result<(Account, String), AppError> {
    let identifier = identifier.trim();
    let Some(mut account) = accounts.find_by_identifier(identifier).await? else {
        warn!(identifier = %identifier, "login unknown identifier");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &account.password_hash) {
        warn!(account_id = account.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    accounts.touch_last_login(account.id).await?;
    if let Some(fresh) = accounts.find_by_id(account.id).await? {
        account = fresh;
    }

    let token = keys.issue(account.id)?;
    info!(account_id = account.id, "account logged in");
    Ok((account, token))
}
