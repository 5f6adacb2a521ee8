//! Ingredient line parsing.
//!
//! [`parse_line`] turns one free-text ingredient line into a [`Resolution`] without any
//! user interaction. Completing what it could not determine is left to a
//! [`FieldFallback`](crate::interactive::FieldFallback).

pub mod amount;
pub mod grammar;
pub mod lexicon;
pub mod normalize;
pub mod products;
pub mod rules;
pub mod similarity;
pub mod units;

use log::debug;

use crate::model::{Field, ParsedIngredient, ResolvedIngredient};
use crate::session::Session;

use self::grammar::Token;
use self::products::{resolve_product, skip_fillers, strip_preparation};
use self::units::catalog_unit;

/// Parsing strategy for ingredient lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Unit-anchored heuristic; friendly to interactive correction.
    #[default]
    Guess,
    /// Structural patterns only, suited to unattended imports.
    Automatic,
}

/// Outcome of parsing one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Every required field was determined.
    Complete(ResolvedIngredient),
    /// The line was understood but some fields are still missing.
    Incomplete {
        partial: ParsedIngredient,
        missing: Vec<Field>,
        /// Product phrase read from the line, offered as the default when prompting.
        product_hint: Option<String>,
    },
    /// The line could not be parsed at all.
    Failed,
}

impl Resolution {
    fn from_parts(partial: ParsedIngredient, product_hint: Option<String>) -> Self {
        match partial.resolved() {
            Some(resolved) => Resolution::Complete(resolved),
            None => Resolution::Incomplete {
                missing: partial.missing(),
                partial,
                product_hint,
            },
        }
    }

    /// Fields still to be filled; all of them for a failed line.
    pub fn missing(&self) -> Vec<Field> {
        match self {
            Resolution::Complete(_) => Vec::new(),
            Resolution::Incomplete { missing, .. } => missing.clone(),
            Resolution::Failed => vec![Field::Product, Field::Unit, Field::Amount],
        }
    }
}

/// Parse one ingredient line against the session catalogs.
pub fn parse_line(line: &str, mode: ParseMode, session: &Session) -> Resolution {
    let resolution = match mode {
        ParseMode::Guess => parse_guess(line, session),
        ParseMode::Automatic => parse_automatic(line, session),
    };
    debug!("{:?} parse of \"{}\": {:?}", mode, line, resolution);
    resolution
}

/// Locate a unit anywhere in the line; the amount precedes it and the product follows.
fn parse_guess(line: &str, session: &Session) -> Resolution {
    let lexicon = &session.lexicon;
    let tokens = grammar::tokenize(line);
    let Some(hit) = lexicon.units.find(&grammar::texts(&tokens)) else {
        return Resolution::Failed;
    };

    // The quantity is the run of numbers and range words right before the unit.
    let start = tokens[..hit.start]
        .iter()
        .rposition(|t| !matches!(t, Token::Number(_) | Token::Dash) && !is_range_word(t))
        .map_or(0, |i| i + 1);
    let amount = match grammar::amount(&tokens[..hit.start], start) {
        Some((value, end)) if end == hit.start => value,
        _ => return Resolution::Failed,
    };

    let words: Vec<&str> = tokens[hit.end()..]
        .iter()
        .filter_map(|t| match t {
            Token::Word(w) | Token::Number(w) => Some(w.as_str()),
            _ => None,
        })
        .collect();
    let phrase = skip_fillers(&words).join(" ");
    let product = if phrase.is_empty() {
        None
    } else {
        resolve_product(&phrase, &session.products, &lexicon.products, None)
    };

    let unit_name = product
        .as_ref()
        .and_then(|p| rules::override_unit(&lexicon.overrides, &p.name, &hit.canonical))
        .unwrap_or(hit.canonical.as_str());

    let partial = ParsedIngredient {
        product_id: product.map(|p| p.id),
        unit_id: catalog_unit(unit_name, &session.units).map(|u| u.id),
        amount: positive(amount),
        note: None,
    };
    Resolution::from_parts(partial, Some(phrase).filter(|p| !p.is_empty()))
}

fn is_range_word(token: &Token) -> bool {
    matches!(token, Token::Word(w) if w == "to" || w == "or")
}

/// Match the structural patterns, then resolve unit and product.
fn parse_automatic(line: &str, session: &Session) -> Resolution {
    let lexicon = &session.lexicon;
    let Some(matched) = grammar::match_line(line, &lexicon.units) else {
        return Resolution::Failed;
    };

    let prepared = strip_preparation(&matched.product, &lexicon.prep_verbs);
    let product = resolve_product(
        &prepared.product,
        &session.products,
        &lexicon.products,
        Some(session.matching.automatic_threshold),
    );
    if let Some(found) = &product {
        debug!("\"{}\" is {} ({:?} match)", prepared.product, found.name, found.kind);
    }

    let mut notes = prepared.preparation;
    notes.extend(product.as_ref().and_then(|p| p.note.clone()));
    notes.extend(matched.notes);
    notes.extend(matched.containers);

    let unit = matched.unit.unwrap_or_else(|| lexicon.count_unit.clone());
    let unit_name = product
        .as_ref()
        .and_then(|p| rules::override_unit(&lexicon.overrides, &p.name, &unit))
        .unwrap_or(unit.as_str());

    let partial = ParsedIngredient {
        product_id: product.as_ref().map(|p| p.id),
        unit_id: catalog_unit(unit_name, &session.units).map(|u| u.id),
        amount: positive(matched.amount),
        note: Some(notes.join(", ")).filter(|n| !n.is_empty()),
    };
    Resolution::from_parts(partial, Some(prepared.product))
}

fn positive(amount: f64) -> Option<f64> {
    (amount.is_finite() && amount > 0.0).then_some(amount)
}
