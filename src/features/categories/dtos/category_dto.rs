use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::categories::models::Category;
use crate::features::categories::services::{CategoryListing, CategorySource};
use crate::shared::constants::DEFAULT_CATEGORY_ICON;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub display_order: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        let icon = if c.category_icon.trim().is_empty() {
            DEFAULT_CATEGORY_ICON.to_string()
        } else {
            c.category_icon
        };

        Self {
            id: c.category_id,
            name: c.category_name,
            icon,
            description: c.description,
            display_order: c.display_order,
        }
    }
}

/// Category listing plus whether it came from the store or the cached snapshot
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryListDto {
    pub categories: Vec<CategoryResponseDto>,
    pub source: CategorySource,
}

impl From<CategoryListing> for CategoryListDto {
    fn from(listing: CategoryListing) -> Self {
        Self {
            categories: listing
                .categories
                .into_iter()
                .map(CategoryResponseDto::from)
                .collect(),
            source: listing.source,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryNamesDto {
    pub names: Vec<String>,
    pub source: CategorySource,
}
