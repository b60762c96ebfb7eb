use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::{pg_text_enum, ClothingItemId, StoreId};
use crate::validation::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClothingCategory {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
}

impl ClothingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingCategory::Tops => "tops",
            ClothingCategory::Bottoms => "bottoms",
            ClothingCategory::Dresses => "dresses",
            ClothingCategory::Outerwear => "outerwear",
            ClothingCategory::Shoes => "shoes",
            ClothingCategory::Accessories => "accessories",
        }
    }
}

impl FromStr for ClothingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tops" => Ok(ClothingCategory::Tops),
            "bottoms" => Ok(ClothingCategory::Bottoms),
            "dresses" => Ok(ClothingCategory::Dresses),
            "outerwear" => Ok(ClothingCategory::Outerwear),
            "shoes" => Ok(ClothingCategory::Shoes),
            "accessories" => Ok(ClothingCategory::Accessories),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

pg_text_enum!(ClothingCategory);

#[derive(Debug, Clone, FromRow)]
pub struct ClothingItem {
    pub id: ClothingItemId,
    pub store_id: StoreId,
    pub name: String,
    pub category: ClothingCategory,
    /// Unique within a store, not globally.
    pub barcode: Option<String>,
    /// Storage key of the garment image.
    pub image_ref: String,
    pub is_available: bool,
    /// Cumulative successful try-ons; only ever incremented by storage.
    pub try_on_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClothingItem {
    pub fn new(
        store_id: StoreId,
        name: String,
        category: ClothingCategory,
        barcode: Option<String>,
        image_ref: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ClothingItemId::new(),
            store_id,
            name,
            category,
            barcode,
            image_ref,
            is_available: true,
            try_on_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Validate)]
/// Fields of the multipart form a manager submits to add an item.
pub struct NewClothingItem {
    #[validate(length(min = 1, max = 120), custom(function = "rules::validate_not_blank"))]
    pub name: String,
    pub category: ClothingCategory,
    #[validate(custom(function = "rules::validate_barcode"))]
    pub barcode: Option<String>,
    pub image: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
/// Partial update applied by a manager. An empty barcode clears it.
pub struct UpdateClothingItem {
    #[validate(length(min = 1, max = 120), custom(function = "rules::validate_not_blank"))]
    pub name: Option<String>,
    pub category: Option<ClothingCategory>,
    #[validate(custom(function = "rules::validate_barcode"))]
    pub barcode: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ItemListQuery {
    pub category: Option<ClothingCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClothingItemResponse {
    pub id: ClothingItemId,
    pub store_id: StoreId,
    pub name: String,
    pub category: ClothingCategory,
    pub barcode: Option<String>,
    pub image_url: String,
    pub is_available: bool,
    pub try_on_count: i64,
}

impl ClothingItemResponse {
    pub fn from_item(item: ClothingItem, image_url: String) -> Self {
        Self {
            id: item.id,
            store_id: item.store_id,
            name: item.name,
            category: item.category,
            barcode: item.barcode,
            image_url,
            is_available: item.is_available,
            try_on_count: item.try_on_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_from_str() {
        for category in [
            ClothingCategory::Tops,
            ClothingCategory::Bottoms,
            ClothingCategory::Dresses,
            ClothingCategory::Outerwear,
            ClothingCategory::Shoes,
            ClothingCategory::Accessories,
        ] {
            assert_eq!(category.as_str().parse::<ClothingCategory>(), Ok(category));
        }
        assert!("Tops".parse::<ClothingCategory>().is_err());
    }

    #[test]
    fn new_items_start_available_with_zero_count() {
        let item = ClothingItem::new(
            StoreId::new(),
            "Linen shirt".into(),
            ClothingCategory::Tops,
            None,
            "items/shirt.png".into(),
        );
        assert!(item.is_available);
        assert_eq!(item.try_on_count, 0);
    }
}
