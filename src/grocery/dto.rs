use serde::{Deserialize, Serialize};
use time::{macros::format_description, OffsetDateTime};

use crate::{error::AppError, grocery::differ::normalize};

pub const MAX_LIST_NAME_LEN: usize = 100;
pub const MAX_ITEM_LEN: usize = 120;
/// Each recipe id costs one catalog lookup.
pub const MAX_RECIPE_IDS: usize = 20;

/// Required ingredients come from catalog recipes, explicit names, or both.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub recipe_ids: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub grocery_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub grocery_list: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub message: &'static str,
    pub list_id: i64,
}

#[derive(Debug, Serialize)]
pub struct GroceryListView {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub items: Vec<String>,
}

/// A save request after validation: a name and at least one distinct item,
/// in the order first given.
#[derive(Debug, PartialEq)]
pub struct ValidatedList {
    pub name: String,
    pub items: Vec<String>,
}

impl SaveRequest {
    pub fn validate(self, now: OffsetDateTime) -> Result<ValidatedList, AppError> {
        let mut items: Vec<String> = Vec::with_capacity(self.grocery_list.len());
        for raw in &self.grocery_list {
            let item = normalize(raw);
            if item.is_empty() || items.contains(&item) {
                continue;
            }
            if item.chars().count() > MAX_ITEM_LEN {
                return Err(AppError::validation("Grocery item too long"));
            }
            items.push(item);
        }
        if items.is_empty() {
            return Err(AppError::validation("No items to save"));
        }

        let name = match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => default_list_name(now),
        };
        if name.chars().count() > MAX_LIST_NAME_LEN {
            return Err(AppError::validation("List name too long"));
        }

        Ok(ValidatedList { name, items })
    }
}

pub fn default_list_name(now: OffsetDateTime) -> String {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]");
    match now.format(&fmt) {
        Ok(stamp) => format!("Grocery List {stamp}"),
        Err(_) => "Grocery List".to_string(),
    }
}
