mod client;

pub use client::GrocyClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ImportError;
use crate::model::{Product, QuantityUnit, ResolvedIngredient};

/// Recipe header sent to Grocy.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub base_servings: u32,
    pub desired_servings: u32,
}

impl NewRecipe {
    pub fn new(name: impl Into<String>, description: impl Into<String>, servings: u32) -> Self {
        NewRecipe {
            name: name.into(),
            description: description.into(),
            base_servings: servings,
            desired_servings: servings,
        }
    }
}

/// Product created on the fly; every quantity unit is set to the chosen default.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub location_id: u64,
    pub qu_id_purchase: u64,
    pub qu_id_stock: u64,
    pub qu_id_consume: u64,
    pub qu_id_price: u64,
}

/// Link between a recipe and a product ("recipe position" in Grocy).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipePosition {
    pub recipe_id: u64,
    pub product_id: u64,
    pub qu_id: u64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_group: Option<String>,
    pub price_factor: f64,
}

impl RecipePosition {
    pub fn new(recipe_id: u64, ingredient: &ResolvedIngredient, group: Option<&str>) -> Self {
        RecipePosition {
            recipe_id,
            product_id: ingredient.product_id,
            qu_id: ingredient.unit_id,
            amount: ingredient.amount,
            note: ingredient.note.clone(),
            ingredient_group: group
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string),
            price_factor: 1.0,
        }
    }
}

/// The Grocy operations an import needs.
#[async_trait]
pub trait GrocyApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ImportError>;

    async fn list_units(&self) -> Result<Vec<QuantityUnit>, ImportError>;

    /// Create a product measured in `default_unit_id`, returning its id.
    async fn create_product(&self, name: &str, default_unit_id: u64) -> Result<u64, ImportError>;

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<u64, ImportError>;

    async fn delete_recipe(&self, recipe_id: u64) -> Result<(), ImportError>;

    /// Add one ingredient to a recipe, returning the position id.
    async fn link_ingredient(&self, position: &RecipePosition) -> Result<u64, ImportError>;
}
