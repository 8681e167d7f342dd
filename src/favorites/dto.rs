use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

pub const MAX_RECIPE_ID_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct FavoriteCreate {
    pub recipe_json: Value,
}

impl FavoriteCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.recipe_json.is_object() {
            return Err(AppError::validation("recipe_json must be an object"));
        }
        Ok(())
    }
}

pub fn validated_recipe_id(raw: &str) -> Result<&str, AppError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::validation("Recipe id is required"));
    }
    if id.chars().count() > MAX_RECIPE_ID_LEN {
        return Err(AppError::validation("Recipe id too long"));
    }
    Ok(id)
}
