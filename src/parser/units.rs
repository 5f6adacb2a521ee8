use log::debug;
use std::collections::BTreeMap;

use crate::catalog::UnitCatalog;
use crate::parser::grammar::{texts, tokenize};

/// Built-in unit synonyms, surface form first.
const DEFAULT_UNIT_NICKNAMES: &[(&str, &str)] = &[
    ("c", "cup"),
    ("cup", "cup"),
    ("cups", "cup"),
    ("tbsp", "tablespoon"),
    ("tbs", "tablespoon"),
    ("tbl", "tablespoon"),
    ("tablespoon", "tablespoon"),
    ("tablespoons", "tablespoon"),
    ("tsp", "teaspoon"),
    ("teaspoon", "teaspoon"),
    ("teaspoons", "teaspoon"),
    ("oz", "ounce"),
    ("ounce", "ounce"),
    ("ounces", "ounce"),
    ("floz", "fluid ounce"),
    ("fl oz", "fluid ounce"),
    ("fluid ounce", "fluid ounce"),
    ("fluid ounces", "fluid ounce"),
    ("lb", "pound"),
    ("lbs", "pound"),
    ("pound", "pound"),
    ("pounds", "pound"),
    ("g", "gram"),
    ("gram", "gram"),
    ("grams", "gram"),
    ("kg", "kilogram"),
    ("kilogram", "kilogram"),
    ("kilograms", "kilogram"),
    ("ml", "milliliter"),
    ("milliliter", "milliliter"),
    ("milliliters", "milliliter"),
    ("l", "liter"),
    ("liter", "liter"),
    ("liters", "liter"),
    ("pt", "pint"),
    ("pint", "pint"),
    ("pints", "pint"),
    ("qt", "quart"),
    ("quart", "quart"),
    ("quarts", "quart"),
    ("gal", "gallon"),
    ("gallon", "gallon"),
    ("gallons", "gallon"),
    ("pinch", "pinch"),
    ("pinches", "pinch"),
    ("dash", "dash"),
    ("dashes", "dash"),
    ("stick", "stick"),
    ("sticks", "stick"),
    ("slice", "slice"),
    ("slices", "slice"),
    ("count", "count"),
    ("piece", "count"),
    ("pieces", "count"),
    ("whole", "count"),
];

/// A nickname found in a token sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitHit {
    /// Index of the first matching token.
    pub start: usize,
    /// Number of tokens the nickname spans.
    pub len: usize,
    pub canonical: String,
}

impl UnitHit {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A unit nickname that also exists in the live unit catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUnit {
    pub id: u64,
    pub canonical: String,
}

/// Surface-form unit synonyms mapped to canonical unit names.
#[derive(Debug, Clone)]
pub struct UnitNicknames {
    entries: BTreeMap<String, String>,
}

impl Default for UnitNicknames {
    fn default() -> Self {
        let mut nicknames = UnitNicknames {
            entries: BTreeMap::new(),
        };
        for (nickname, canonical) in DEFAULT_UNIT_NICKNAMES {
            nicknames.insert(nickname, canonical);
        }
        nicknames
    }
}

impl UnitNicknames {
    pub fn empty() -> Self {
        UnitNicknames {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, nickname: &str, canonical: &str) {
        let key = words(nickname).join(" ");
        if !key.is_empty() {
            self.entries.insert(key, canonical.trim().to_lowercase());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Find the earliest nickname in `tokens`, preferring the longest one at that position.
    pub fn find<S: AsRef<str>>(&self, tokens: &[S]) -> Option<UnitHit> {
        (0..tokens.len()).find_map(|start| self.match_at(tokens, start))
    }

    /// Longest nickname starting exactly at `start`.
    pub fn match_at<S: AsRef<str>>(&self, tokens: &[S], start: usize) -> Option<UnitHit> {
        let mut best: Option<UnitHit> = None;
        for (key, canonical) in &self.entries {
            let key_tokens: Vec<&str> = key.split(' ').collect();
            let end = start + key_tokens.len();
            if end > tokens.len() {
                continue;
            }
            let matches = key_tokens
                .iter()
                .zip(&tokens[start..end])
                .all(|(k, t)| t.as_ref().eq_ignore_ascii_case(k));
            if matches && best.as_ref().map_or(true, |b| key_tokens.len() > b.len) {
                best = Some(UnitHit {
                    start,
                    len: key_tokens.len(),
                    canonical: canonical.clone(),
                });
            }
        }
        best
    }
}

/// Lowercase alphanumeric words of `text`; every other character separates words.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Find a unit nickname in free text and look its canonical name up in the catalog.
///
/// Returns `None` both when no nickname occurs and when the canonical unit is not in
/// the catalog; the latter is left for interactive resolution.
pub fn resolve_unit(
    text: &str,
    catalog: &UnitCatalog,
    nicknames: &UnitNicknames,
) -> Option<ResolvedUnit> {
    let tokens = tokenize(text);
    let hit = nicknames.find(&texts(&tokens))?;
    catalog_unit(&hit.canonical, catalog)
}

/// Catalog entry for a canonical unit name.
pub fn catalog_unit(canonical: &str, catalog: &UnitCatalog) -> Option<ResolvedUnit> {
    match catalog.id_of(canonical) {
        Some(id) => Some(ResolvedUnit {
            id,
            canonical: canonical.to_string(),
        }),
        None => {
            debug!("Unit \"{}\" is missing from the unit catalog", canonical);
            None
        }
    }
}
