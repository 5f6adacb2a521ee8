use log::{error, info, warn};

use crate::description::{build_description, default_recipe_name, parse_servings};
use crate::error::ImportError;
use crate::grocy::{GrocyApi, NewRecipe, RecipePosition};
use crate::interactive::FieldFallback;
use crate::model::{IngredientGroup, RecipeDocument};
use crate::parser::{parse_line, ParseMode, Resolution};
use crate::session::Session;

/// Result of a successful import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub recipe_id: u64,
    /// Ids of the created recipe positions, in document order.
    pub positions: Vec<u64>,
}

/// Imports recipe documents into Grocy, one at a time.
///
/// The recipe is created before its ingredients are linked. If any ingredient fails the
/// recipe is deleted again; products created along the way are kept.
///
/// # Example
/// ```no_run
/// use grocy_import::{GrocyClient, GrocyConfig, ParseMode, RecipeImporter, Session, Unattended};
///
/// # async fn run(doc: grocy_import::RecipeDocument) -> Result<(), grocy_import::ImportError> {
/// let config = GrocyConfig::load()?;
/// let client = GrocyClient::new(&config)?;
/// let session = Session::load(&client).await?;
/// let summary = RecipeImporter::new(&client, session, Unattended)
///     .mode(ParseMode::Automatic)
///     .import(&doc)
///     .await?;
/// println!("created recipe {}", summary.recipe_id);
/// # Ok(())
/// # }
/// ```
pub struct RecipeImporter<'a, F> {
    api: &'a dyn GrocyApi,
    session: Session,
    mode: ParseMode,
    fallback: F,
}

impl<'a, F: FieldFallback> RecipeImporter<'a, F> {
    pub fn new(api: &'a dyn GrocyApi, session: Session, fallback: F) -> Self {
        RecipeImporter {
            api,
            session,
            mode: ParseMode::default(),
            fallback,
        }
    }

    /// Set the ingredient parsing strategy
    pub fn mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Create the recipe and link every ingredient line to it.
    pub async fn import(&mut self, doc: &RecipeDocument) -> Result<ImportSummary, ImportError> {
        let groups = doc.groups();
        if groups.iter().all(|g| lines(g).next().is_none()) {
            return Err(ImportError::InvalidRecipe(format!(
                "\"{}\" has no ingredients",
                doc.title
            )));
        }

        let name = self.fallback.recipe_name(default_recipe_name(doc))?;
        let yields = doc.yields.as_deref().unwrap_or_default();
        let servings = match parse_servings(yields) {
            Some(servings) => servings,
            None => self.fallback.servings(yields)?,
        };

        let recipe = NewRecipe::new(name, build_description(doc), servings);
        let recipe_id = self.api.create_recipe(&recipe).await?;

        match self.link_all(recipe_id, doc).await {
            Ok(positions) => {
                info!(
                    "Imported \"{}\" ({}) with {} ingredients",
                    recipe.name,
                    recipe_id,
                    positions.len()
                );
                Ok(ImportSummary {
                    recipe_id,
                    positions,
                })
            }
            Err(e) => {
                self.roll_back(recipe_id).await;
                Err(e)
            }
        }
    }

    async fn link_all(
        &mut self,
        recipe_id: u64,
        doc: &RecipeDocument,
    ) -> Result<Vec<u64>, ImportError> {
        let mut positions = Vec::new();
        for group in doc.groups() {
            for line in lines(&group) {
                let resolution = parse_line(line, self.mode, &self.session);
                let ingredient = self
                    .fallback
                    .complete(line, resolution, &mut self.session, self.api)
                    .await?;
                let purpose = group.purpose.as_deref();
                let position = RecipePosition::new(recipe_id, &ingredient, purpose);
                positions.push(self.api.link_ingredient(&position).await?);
            }
        }
        Ok(positions)
    }

    async fn roll_back(&self, recipe_id: u64) {
        warn!("Import failed, deleting recipe {}", recipe_id);
        if let Err(e) = self.api.delete_recipe(recipe_id).await {
            error!("Failed to delete recipe {}: {}", recipe_id, e);
        }
        warn!("Products created during this import were kept");
    }
}

/// Parse every line of `doc` without touching Grocy.
pub fn dry_run(
    doc: &RecipeDocument,
    session: &Session,
    mode: ParseMode,
) -> Vec<(String, Resolution)> {
    doc.groups()
        .iter()
        .flat_map(lines)
        .map(|line| (line.to_string(), parse_line(line, mode, session)))
        .collect()
}

/// Trimmed ingredient lines of a group, blank ones skipped.
fn lines(group: &IngredientGroup) -> impl Iterator<Item = &str> {
    group
        .ingredients
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
}
