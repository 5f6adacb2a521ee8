//! Product-specific unit corrections.
//!
//! Recipes often count things that Grocy tracks by measure ("3 garlic cloves"). A rule
//! replaces the resolved unit for one product when the parser fell back to a given unit.

use log::debug;

/// Replace `from_unit` with `to_unit` whenever the resolved product is `product`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOverride {
    pub product: String,
    pub from_unit: String,
    pub to_unit: String,
}

impl UnitOverride {
    pub fn new(product: &str, from_unit: &str, to_unit: &str) -> Self {
        UnitOverride {
            product: product.to_string(),
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
        }
    }

    fn applies(&self, product: &str, unit: &str) -> bool {
        self.product.eq_ignore_ascii_case(product.trim())
            && self.from_unit.eq_ignore_ascii_case(unit.trim())
    }
}

/// Built-in overrides.
pub fn default_overrides() -> Vec<UnitOverride> {
    vec![UnitOverride::new("garlic", "count", "teaspoon")]
}

/// Canonical unit to use for `product` measured in `unit`, if any rule rewrites it.
pub fn override_unit<'a>(rules: &'a [UnitOverride], product: &str, unit: &str) -> Option<&'a str> {
    let rule = rules.iter().find(|rule| rule.applies(product, unit))?;
    debug!(
        "Unit override: {} measured in {} becomes {}",
        product, unit, rule.to_unit
    );
    Some(rule.to_unit.as_str())
}
