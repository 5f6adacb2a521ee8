use crate::model::{Product, QuantityUnit};
use crate::parser::normalize::{normalize, Strictness};

/// Quantity units known to Grocy, loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    units: Vec<QuantityUnit>,
}

impl UnitCatalog {
    pub fn new(units: Vec<QuantityUnit>) -> Self {
        UnitCatalog { units }
    }

    /// Unit whose name or plural name equals `name`, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&QuantityUnit> {
        let name = name.trim();
        self.units.iter().find(|unit| {
            unit.name.eq_ignore_ascii_case(name)
                || unit
                    .name_plural
                    .as_deref()
                    .is_some_and(|plural| plural.eq_ignore_ascii_case(name))
        })
    }

    pub fn id_of(&self, name: &str) -> Option<u64> {
        self.find(name).map(|unit| unit.id)
    }

    pub fn name_of(&self, id: u64) -> Option<&str> {
        self.units
            .iter()
            .find(|unit| unit.id == id)
            .map(|unit| unit.name.as_str())
    }

    pub fn units(&self) -> &[QuantityUnit] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Products known to Grocy. Grows when products are created during an import.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        ProductCatalog { products }
    }

    /// Product whose name equals `name` case-insensitively, after punctuation clean-up.
    pub fn find_exact(&self, name: &str) -> Option<&Product> {
        let wanted = fold(name);
        if wanted.is_empty() {
            return None;
        }
        self.products
            .iter()
            .find(|product| fold(&product.name) == wanted)
    }

    pub fn name_of(&self, id: u64) -> Option<&str> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .map(|product| product.name.as_str())
    }

    pub fn push(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Swap in a freshly fetched product list, keeping anything the fetch lacks.
    pub fn refresh(&mut self, latest: Vec<Product>) {
        let missing: Vec<Product> = self
            .products
            .drain(..)
            .filter(|known| !latest.iter().any(|p| p.id == known.id))
            .collect();
        self.products = latest;
        self.products.extend(missing);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Comparison form for names: lowercase, punctuation-free, single-spaced.
pub fn fold(name: &str) -> String {
    normalize(name, Strictness::Strict).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_unit_lookup_ignores_case_and_plural() {
        let catalog = UnitCatalog::new(vec![QuantityUnit {
            id: 4,
            name: "Cup".to_string(),
            name_plural: Some("Cups".to_string()),
        }]);
        assert_eq!(catalog.id_of("cup"), Some(4));
        assert_eq!(catalog.id_of("cups"), Some(4));
        assert_eq!(catalog.id_of("gram"), None);
        assert_eq!(catalog.name_of(4), Some("Cup"));
    }

    #[test]
    fn test_exact_product_match() {
        let catalog = ProductCatalog::new(vec![
            product(1, "All-Purpose Flour"),
            product(2, "Salt"),
        ]);
        assert_eq!(catalog.find_exact("salt").map(|p| p.id), Some(2));
        assert_eq!(catalog.find_exact("all-purpose flour").map(|p| p.id), Some(1));
        assert_eq!(catalog.find_exact("allpurpose flour").map(|p| p.id), Some(1));
        assert!(catalog.find_exact("sal").is_none());
        assert!(catalog.find_exact("").is_none());
    }

    #[test]
    fn test_refresh_is_append_only() {
        let mut catalog = ProductCatalog::new(vec![product(1, "Salt")]);
        catalog.push(product(9, "Saffron"));
        catalog.refresh(vec![product(1, "Salt"), product(2, "Pepper")]);
        let ids: Vec<u64> = catalog.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 9]);
    }
}
