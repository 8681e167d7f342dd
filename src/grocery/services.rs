use tracing::{debug, warn};

use super::{
    differ,
    dto::{GenerateRequest, MAX_RECIPE_IDS},
};
use crate::{error::AppError, recipes::catalog::RecipeCatalog};

/// Ingredients needed for the request: explicit names plus every ingredient
/// of each requested catalog recipe. An unknown recipe id is a 404.
pub async fn required_ingredients(
    catalog: &dyn RecipeCatalog,
    req: &GenerateRequest,
) -> Result<Vec<String>, AppError> {
    if req.recipe_ids.is_empty() && req.ingredients.is_empty() {
        return Err(AppError::validation("Select at least one recipe or ingredient"));
    }
    if req.recipe_ids.len() > MAX_RECIPE_IDS {
        return Err(AppError::validation(format!(
            "At most {MAX_RECIPE_IDS} recipes per grocery list"
        )));
    }

    let mut required = req.ingredients.clone();
    for recipe_id in &req.recipe_ids {
        let recipe_id = recipe_id.trim();
        match catalog.ingredients_for(recipe_id).await? {
            Some(ingredients) => {
                debug!(recipe_id, count = ingredients.len(), "recipe ingredients resolved");
                required.extend(ingredients);
            }
            None => {
                warn!(recipe_id, "recipe not found in catalog");
                return Err(AppError::NotFound("Recipe not found"));
            }
        }
    }
    Ok(required)
}

pub async fn grocery_list_for(
    catalog: &dyn RecipeCatalog,
    req: &GenerateRequest,
    pantry: &[String],
) -> Result<Vec<String>, AppError> {
    let required = required_ingredients(catalog, req).await?;
    Ok(differ::missing(&required, pantry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::StubCatalog;

    fn catalog() -> StubCatalog {
        let mut stub = StubCatalog::default();
        stub.ingredients.insert(
            "52771".into(),
            vec!["Penne Rigate".into(), "Olive Oil".into(), "Garlic".into()],
        );
        stub.ingredients
            .insert("52772".into(), vec!["garlic".into(), "Soy Sauce".into()]);
        stub
    }

    fn req(ids: &[&str], extra: &[&str]) -> GenerateRequest {
        GenerateRequest {
            recipe_ids: ids.iter().map(|s| s.to_string()).collect(),
            ingredients: extra.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn combines_recipes_and_subtracts_pantry() {
        let pantry = vec!["garlic".to_string(), "olive oil".to_string()];
        let out = grocery_list_for(&catalog(), &req(&["52771", "52772"], &["Lime"]), &pantry)
            .await
            .unwrap();
        assert_eq!(out, vec!["lime", "penne rigate", "soy sauce"]);
    }

    #[tokio::test]
    async fn explicit_ingredients_only() {
        let pantry = vec!["tomato".to_string()];
        let out = grocery_list_for(
            &catalog(),
            &req(&[], &["tomato", "onion", "garlic", "pasta"]),
            &pantry,
        )
        .await
        .unwrap();
        assert_eq!(out, vec!["garlic", "onion", "pasta"]);
    }

    #[tokio::test]
    async fn unknown_recipe_is_not_found() {
        let err = required_ingredients(&catalog(), &req(&["99999"], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_request_is_invalid() {
        let err = required_ingredients(&catalog(), &req(&[], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn too_many_recipes_rejected_before_lookup() {
        // a failing catalog proves no lookup is attempted
        let stub = StubCatalog {
            fail: true,
            ..StubCatalog::default()
        };
        let ids: Vec<String> = (0..=MAX_RECIPE_IDS).map(|i| (52700 + i).to_string()).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let err = required_ingredients(&stub, &req(&ids, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn catalog_failure_is_bad_gateway() {
        let stub = StubCatalog {
            fail: true,
            ..StubCatalog::default()
        };
        let err = required_ingredients(&stub, &req(&["52771"], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadGateway(_)));
    }
}
