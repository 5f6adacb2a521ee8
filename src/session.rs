use log::{debug, info};

use crate::catalog::{ProductCatalog, UnitCatalog};
use crate::config::MatchingConfig;
use crate::error::ImportError;
use crate::grocy::GrocyApi;
use crate::model::{Product, QuantityUnit};
use crate::parser::lexicon::Lexicon;

/// Everything ingredient resolution reads: catalogs from Grocy plus the static lexicon.
///
/// Built once per import run. Only product creation mutates it, through
/// [`Session::refresh_products`].
#[derive(Debug, Clone)]
pub struct Session {
    pub units: UnitCatalog,
    pub products: ProductCatalog,
    pub lexicon: Lexicon,
    pub matching: MatchingConfig,
}

impl Session {
    pub fn new(units: Vec<QuantityUnit>, products: Vec<Product>) -> Self {
        Session {
            units: UnitCatalog::new(units),
            products: ProductCatalog::new(products),
            lexicon: Lexicon::default(),
            matching: MatchingConfig::default(),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Fetch the unit and product catalogs from Grocy.
    pub async fn load(api: &dyn GrocyApi) -> Result<Self, ImportError> {
        let units = api.list_units().await?;
        let products = api.list_products().await?;
        info!(
            "Loaded {} quantity units and {} products",
            units.len(),
            products.len()
        );
        Ok(Session::new(units, products))
    }

    /// Re-read products after creating one so later lines can match it.
    pub async fn refresh_products(&mut self, api: &dyn GrocyApi) -> Result<(), ImportError> {
        let latest = api.list_products().await?;
        debug!("Refreshed product catalog: {} products", latest.len());
        self.products.refresh(latest);
        Ok(())
    }
}
