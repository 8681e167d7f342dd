use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const MAX_PREFERENCE_LEN: usize = 50;
pub const MAX_PREFERENCES: usize = 32;

#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    pub preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub preferences: Vec<String>,
}

impl PreferencesUpdate {
    /// Trimmed, non-blank, distinct tags in the order given.
    pub fn validated(&self) -> Result<Vec<String>, AppError> {
        let mut out: Vec<String> = Vec::new();
        for raw in &self.preferences {
            let tag = raw.trim();
            if tag.is_empty() || out.iter().any(|t| t == tag) {
                continue;
            }
            if tag.chars().count() > MAX_PREFERENCE_LEN {
                return Err(AppError::validation("Preference too long"));
            }
            out.push(tag.to_string());
        }
        if out.len() > MAX_PREFERENCES {
            return Err(AppError::validation("Too many preferences"));
        }
        Ok(out)
    }
}
