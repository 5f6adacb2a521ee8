use crate::config::LexiconConfig;
use crate::parser::products::{PrepVerbs, ProductNicknames};
use crate::parser::rules::{default_overrides, UnitOverride};
use crate::parser::units::UnitNicknames;

/// Static vocabulary the parser works with, built-ins plus configured additions.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub units: UnitNicknames,
    pub products: ProductNicknames,
    pub prep_verbs: PrepVerbs,
    pub overrides: Vec<UnitOverride>,
    /// Canonical unit assumed when a line names no unit.
    pub count_unit: String,
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon {
            units: UnitNicknames::default(),
            products: ProductNicknames::default(),
            prep_verbs: PrepVerbs::default(),
            overrides: default_overrides(),
            count_unit: "count".to_string(),
        }
    }
}

impl Lexicon {
    /// Built-in tables extended (and overridden where keys collide) by configuration.
    pub fn from_config(config: &LexiconConfig) -> Self {
        let mut lexicon = Lexicon::default();
        for (nickname, canonical) in &config.units {
            lexicon.units.insert(nickname, canonical);
        }
        for (phrase, nickname) in &config.products {
            lexicon
                .products
                .insert(phrase, &nickname.name, nickname.note.clone());
        }
        for verb in &config.prep_verbs {
            lexicon.prep_verbs.insert(verb);
        }
        lexicon.overrides.extend(
            config
                .unit_overrides
                .iter()
                .map(|o| UnitOverride::new(&o.product, &o.from_unit, &o.to_unit)),
        );
        lexicon.count_unit = config.count_unit.trim().to_lowercase();
        lexicon
    }
}
