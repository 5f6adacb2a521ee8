//! Completing ingredients the parser could not fully resolve.
//!
//! [`Interactive`] asks the user for each missing field; [`Unattended`] refuses and aborts
//! the import instead, naming the field and the line.

use async_trait::async_trait;
use log::{debug, warn};
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::error::ImportError;
use crate::grocy::GrocyApi;
use crate::model::{Field, ParsedIngredient, Product, ResolvedIngredient};
use crate::parser::amount::parse_amount;
use crate::parser::products::{find_similar, resolve_product};
use crate::parser::units::resolve_unit;
use crate::parser::Resolution;
use crate::session::Session;

const MAKE_NEW_PRODUCT: &str = "Make new product";

/// Line-oriented user interaction.
pub trait Prompter: Send {
    /// Show a message.
    fn say(&mut self, message: &str) -> Result<(), ImportError>;

    /// Ask a free-text question; an empty answer yields `default` when given.
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String, ImportError>;

    /// Ask until one of `choices` is picked, returning its index.
    fn choose(&mut self, question: &str, choices: &[String]) -> Result<usize, ImportError> {
        if choices.is_empty() {
            return Err(ImportError::Prompt(format!("no choices for \"{}\"", question)));
        }
        loop {
            self.say(question)?;
            for (i, choice) in choices.iter().enumerate() {
                self.say(&format!("{}) {}", i + 1, choice))?;
            }
            let answer = self.ask("Select an option", None)?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(&format!("Enter a number from 1 to {}", choices.len()))?,
            }
        }
    }

    /// Ask until a positive quantity is entered; fractions such as `1 1/2` are accepted.
    fn ask_positive_decimal(&mut self, question: &str) -> Result<f64, ImportError> {
        loop {
            let answer = self.ask(question, None)?;
            match parse_amount(&answer) {
                Some(value) if value > 0.0 => return Ok(value),
                _ => self.say("Could not convert to a positive decimal")?,
            }
        }
    }

    fn ask_positive_integer(&mut self, question: &str) -> Result<u32, ImportError> {
        loop {
            let answer = self.ask(question, None)?;
            match answer.trim().parse::<u32>() {
                Ok(value) if value > 0 => return Ok(value),
                _ => self.say("Could not convert to a positive integer")?,
            }
        }
    }
}

/// Prompter over any reader/writer pair, stdin/stdout for the CLI.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Terminal::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Terminal { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead + Send, W: Write + Send> Prompter for Terminal<R, W> {
    fn say(&mut self, message: &str) -> Result<(), ImportError> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String, ImportError> {
        match default {
            Some(default) => write!(self.output, "{} ({}): ", question, default)?,
            None => write!(self.output, "{}: ", question)?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ImportError::Prompt("input closed".to_string()));
        }
        let answer = line.trim();
        Ok(match default {
            Some(default) if answer.is_empty() => default.to_string(),
            _ => answer.to_string(),
        })
    }
}

/// Supplies whatever the parser could not determine.
#[async_trait]
pub trait FieldFallback: Send {
    /// Final recipe name, starting from a suggestion.
    fn recipe_name(&mut self, suggested: String) -> Result<String, ImportError>;

    /// Servings when the recipe's yield text was not a number.
    fn servings(&mut self, yields: &str) -> Result<u32, ImportError>;

    /// Turn a parse result into a complete ingredient, or fail.
    async fn complete(
        &mut self,
        line: &str,
        resolution: Resolution,
        session: &mut Session,
        api: &dyn GrocyApi,
    ) -> Result<ResolvedIngredient, ImportError>;
}

/// Aborts at the first thing that would need a prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unattended;

#[async_trait]
impl FieldFallback for Unattended {
    fn recipe_name(&mut self, suggested: String) -> Result<String, ImportError> {
        Ok(suggested)
    }

    fn servings(&mut self, yields: &str) -> Result<u32, ImportError> {
        Err(ImportError::InvalidRecipe(format!(
            "could not read servings from \"{}\"",
            yields
        )))
    }

    async fn complete(
        &mut self,
        line: &str,
        resolution: Resolution,
        _session: &mut Session,
        _api: &dyn GrocyApi,
    ) -> Result<ResolvedIngredient, ImportError> {
        match resolution {
            Resolution::Complete(ingredient) => Ok(ingredient),
            unresolved => Err(unresolved_error(line, &unresolved.missing())),
        }
    }
}

fn unresolved_error(line: &str, missing: &[Field]) -> ImportError {
    ImportError::Unresolved {
        field: missing.first().copied().unwrap_or(Field::Product),
        line: line.to_string(),
    }
}

/// Prompts for every missing field.
pub struct Interactive<P> {
    prompter: P,
}

impl<P: Prompter> Interactive<P> {
    pub fn new(prompter: P) -> Self {
        Interactive { prompter }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    async fn ask_product(
        &mut self,
        line: &str,
        hint: Option<&str>,
        session: &mut Session,
        api: &dyn GrocyApi,
    ) -> Result<u64, ImportError> {
        self.prompter.say("No existing product matches exactly")?;
        let question = format!("What is the name of the product in \"{}\"?", line);
        let name = loop {
            let name = self.prompter.ask(&question, hint)?;
            if !name.trim().is_empty() {
                break name.trim().to_string();
            }
        };

        if let Some(found) = resolve_product(
            &name,
            &session.products,
            &session.lexicon.products,
            None,
        ) {
            debug!("\"{}\" is product {} ({:?} match)", name, found.id, found.kind);
            return Ok(found.id);
        }

        let threshold = session.matching.similarity_threshold;
        let mut candidates = find_similar(&name, &session.products, threshold);
        candidates.truncate(session.matching.max_candidates);
        if !candidates.is_empty() {
            let mut choices: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
            choices.push(MAKE_NEW_PRODUCT.to_string());
            let picked = self.prompter.choose("Closest matching products are:", &choices)?;
            if let Some(candidate) = candidates.get(picked) {
                return Ok(candidate.id);
            }
        }

        self.create_product(line, &name, session, api).await
    }

    async fn create_product(
        &mut self,
        line: &str,
        name: &str,
        session: &mut Session,
        api: &dyn GrocyApi,
    ) -> Result<u64, ImportError> {
        self.prompter.say(&format!("Creating product \"{}\"", name))?;
        let question = "Select a default unit for this product";
        let unit_id = self.choose_unit(question, line, session)?;
        let id = api.create_product(name, unit_id).await?;
        warn!(
            "Created product \"{}\" ({}); it stays in Grocy even if this import fails",
            name, id
        );

        session.refresh_products(api).await?;
        if session.products.name_of(id).is_none() {
            session.products.push(Product {
                id,
                name: name.to_string(),
            });
        }
        Ok(id)
    }

    /// Pick a unit by menu number, or by typing a unit such as `tbsp`.
    fn choose_unit(
        &mut self,
        question: &str,
        line: &str,
        session: &Session,
    ) -> Result<u64, ImportError> {
        if session.units.is_empty() {
            return Err(unresolved_error(line, &[Field::Unit]));
        }
        let units = session.units.units();
        loop {
            self.prompter.say(question)?;
            for (i, unit) in units.iter().enumerate() {
                self.prompter.say(&format!("{}) {}", i + 1, unit.name))?;
            }
            let answer = self.prompter.ask("Select an option or type a unit", None)?;
            if let Ok(n) = answer.trim().parse::<usize>() {
                if let Some(unit) = n.checked_sub(1).and_then(|i| units.get(i)) {
                    return Ok(unit.id);
                }
            } else if let Some(unit) =
                resolve_unit(&answer, &session.units, &session.lexicon.units)
            {
                debug!("\"{}\" is unit {} ({})", answer, unit.id, unit.canonical);
                return Ok(unit.id);
            }
            self.prompter.say(&format!(
                "Enter a number from 1 to {} or a unit name",
                units.len()
            ))?;
        }
    }
}

#[async_trait]
impl<P: Prompter> FieldFallback for Interactive<P> {
    fn recipe_name(&mut self, suggested: String) -> Result<String, ImportError> {
        self.prompter.ask("Name", Some(&suggested))
    }

    fn servings(&mut self, yields: &str) -> Result<u32, ImportError> {
        self.prompter
            .say(&format!("Couldn't convert \"{}\" to a number of servings", yields))?;
        self.prompter.ask_positive_integer("Servings")
    }

    async fn complete(
        &mut self,
        line: &str,
        resolution: Resolution,
        session: &mut Session,
        api: &dyn GrocyApi,
    ) -> Result<ResolvedIngredient, ImportError> {
        let (mut partial, hint) = match resolution {
            Resolution::Complete(ingredient) => return Ok(ingredient),
            Resolution::Incomplete {
                partial,
                product_hint,
                ..
            } => (partial, product_hint),
            Resolution::Failed => (ParsedIngredient::default(), None),
        };

        self.prompter.say(&format!("Processing: \"{}\"", line))?;
        if partial.product_id.is_none() {
            let id = self.ask_product(line, hint.as_deref(), session, api).await?;
            partial.product_id = Some(id);
        }
        if partial.unit_id.is_none() {
            let question = format!("What is the unit in \"{}\"?", line);
            partial.unit_id = Some(self.choose_unit(&question, line, session)?);
        }
        if partial.amount.is_none() {
            let question = format!("What is the amount in \"{}\"?", line);
            partial.amount = Some(self.prompter.ask_positive_decimal(&question)?);
        }

        partial
            .resolved()
            .ok_or_else(|| unresolved_error(line, &partial.missing()))
    }
}
