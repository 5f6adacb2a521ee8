//! Import scraped recipes into Grocy.
//!
//! Each ingredient line is parsed into a product, a quantity unit and an amount resolved
//! against the Grocy catalogs, then linked to a newly created recipe.

pub mod catalog;
pub mod config;
pub mod description;
pub mod error;
pub mod grocy;
pub mod importer;
pub mod interactive;
pub mod model;
pub mod parser;
pub mod session;

pub use config::GrocyConfig;
pub use error::ImportError;
pub use grocy::{GrocyApi, GrocyClient};
pub use importer::{dry_run, ImportSummary, RecipeImporter};
pub use interactive::{FieldFallback, Interactive, Prompter, Terminal, Unattended};
pub use model::{Field, RecipeDocument, ResolvedIngredient};
pub use parser::{parse_line, ParseMode, Resolution};
pub use session::Session;

/// Decode a recipe document as written by recipe-scrapers style tools.
pub fn read_recipe(json: &str) -> Result<RecipeDocument, ImportError> {
    let doc: RecipeDocument = serde_json::from_str(json)?;
    if doc.title.trim().is_empty() {
        return Err(ImportError::InvalidRecipe("missing title".to_string()));
    }
    Ok(doc)
}
