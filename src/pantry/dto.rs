use serde::Deserialize;

use crate::{error::AppError, grocery::differ::normalize};

pub const MAX_INGREDIENT_LEN: usize = 120;

#[derive(Debug, Deserialize)]
pub struct AddIngredientRequest {
    pub ingredient_name: String,
}

impl AddIngredientRequest {
    /// Normalized ingredient name, or a validation error when blank or too long.
    pub fn validated_name(&self) -> Result<String, AppError> {
        let name = normalize(&self.ingredient_name);
        if name.is_empty() {
            return Err(AppError::validation("Ingredient name is required"));
        }
        if name.chars().count() > MAX_INGREDIENT_LEN {
            return Err(AppError::validation("Ingredient name too long"));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str) -> AddIngredientRequest {
        AddIngredientRequest {
            ingredient_name: name.into(),
        }
    }

    #[test]
    fn normalizes_name() {
        assert_eq!(req("  Tomato ").validated_name().unwrap(), "tomato");
    }

    #[test]
    fn rejects_blank_and_oversize() {
        assert!(matches!(
            req("   ").validated_name(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            req(&"a".repeat(MAX_INGREDIENT_LEN + 1)).validated_name(),
            Err(AppError::Validation(_))
        ));
        assert!(req(&"a".repeat(MAX_INGREDIENT_LEN)).validated_name().is_ok());
    }
}
