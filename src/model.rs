use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scraped recipe as produced by recipe-scrapers style tools.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RecipeDocument {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub total_time: Option<serde_json::Value>,
    #[serde(default)]
    pub yields: Option<String>,
    #[serde(default)]
    pub instructions_list: Vec<String>,
    #[serde(default)]
    pub nutrients: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub ingredient_groups: Vec<IngredientGroup>,
    /// Flat ingredient list emitted by older scrapers.
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct IngredientGroup {
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl RecipeDocument {
    /// Ingredient groups to import, falling back to the flat list as one unnamed group.
    pub fn groups(&self) -> Vec<IngredientGroup> {
        if !self.ingredient_groups.is_empty() {
            return self.ingredient_groups.clone();
        }
        if self.ingredients.is_empty() {
            return Vec::new();
        }
        vec![IngredientGroup {
            purpose: None,
            ingredients: self.ingredients.clone(),
        }]
    }
}

/// Product as known by Grocy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Product {
    #[serde(deserialize_with = "grocy_id")]
    pub id: u64,
    pub name: String,
}

/// Quantity unit as known by Grocy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QuantityUnit {
    #[serde(deserialize_with = "grocy_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub name_plural: Option<String>,
}

/// Grocy returns ids as numbers, older releases as numeric strings.
pub(crate) fn grocy_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// The three fields an ingredient needs before it can be linked to a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Product,
    Unit,
    Amount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Product => write!(f, "product"),
            Field::Unit => write!(f, "unit"),
            Field::Amount => write!(f, "amount"),
        }
    }
}

/// Ingredient as far as the parser got; any field may still be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedIngredient {
    pub product_id: Option<u64>,
    pub unit_id: Option<u64>,
    pub amount: Option<f64>,
    pub note: Option<String>,
}

impl ParsedIngredient {
    /// Fields still unset, in the order they are prompted for.
    pub fn missing(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.product_id.is_none() {
            missing.push(Field::Product);
        }
        if self.unit_id.is_none() {
            missing.push(Field::Unit);
        }
        if self.amount.is_none() {
            missing.push(Field::Amount);
        }
        missing
    }

    /// Promote to a submittable record once every required field is set.
    pub fn resolved(&self) -> Option<ResolvedIngredient> {
        Some(ResolvedIngredient {
            product_id: self.product_id?,
            unit_id: self.unit_id?,
            amount: self.amount?,
            note: self.note.clone(),
        })
    }
}

/// Ingredient with every required field present, ready to link to a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIngredient {
    pub product_id: u64,
    pub unit_id: u64,
    pub amount: f64,
    pub note: Option<String>,
}

/// A fuzzy product match, used to rank choices.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub name: String,
    pub id: u64,
    pub score: f64,
}
