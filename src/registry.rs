//! Model registry.
//!
//! Holds every estimator the dashboard uses, loaded once at startup:
//! the coffee and tea price models, one sales model per trained product
//! and the aggregate sales model. Read-only after construction and
//! shared between handlers behind an `Arc`.

use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

use crate::config::ModelsConfig;
use crate::estimator::{load_artifact, Estimator};
use crate::types::{ForecastError, PriceTrack, ProductSelection};

pub struct ModelRegistry {
    coffee: Box<dyn Estimator>,
    tea: Box<dyn Estimator>,
    products: BTreeMap<u32, Box<dyn Estimator>>,
    total_sales: Box<dyn Estimator>,
}

impl ModelRegistry {
    /// Load all artifacts. Any missing or unreadable file fails the
    /// whole load; there is no partial registry.
    pub fn load(cfg: &ModelsConfig) -> Result<Self, ForecastError> {
        let started = Instant::now();

        let mut products = BTreeMap::new();
        for product_id in 1..=cfg.product_count {
            products.insert(product_id, load_artifact(&cfg.product_path(product_id))?);
        }
        let total_sales = load_artifact(&cfg.total_sales_path())?;
        let coffee = load_artifact(&cfg.price_path(PriceTrack::Coffee))?;
        let tea = load_artifact(&cfg.price_path(PriceTrack::Tea))?;

        info!(
            dir = %cfg.dir.display(),
            product_models = products.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model registry loaded"
        );

        Ok(Self::from_parts(coffee, tea, products, total_sales))
    }

    /// Assemble a registry from already-built estimators.
    pub fn from_parts(
        coffee: Box<dyn Estimator>,
        tea: Box<dyn Estimator>,
        products: BTreeMap<u32, Box<dyn Estimator>>,
        total_sales: Box<dyn Estimator>,
    ) -> Self {
        Self {
            coffee,
            tea,
            products,
            total_sales,
        }
    }

    /// Sales estimator for a selection. The aggregate sentinel routes to
    /// the total-sales model; ids without a trained model fail.
    pub fn estimator_for(
        &self,
        selection: ProductSelection,
    ) -> Result<&dyn Estimator, ForecastError> {
        match selection {
            ProductSelection::Total => Ok(self.total_sales.as_ref()),
            ProductSelection::Product(id) => self
                .products
                .get(&id)
                .map(|e| e.as_ref())
                .ok_or(ForecastError::UnknownProduct(selection)),
        }
    }

    pub fn price_estimator(&self, track: PriceTrack) -> &dyn Estimator {
        match track {
            PriceTrack::Coffee => self.coffee.as_ref(),
            PriceTrack::Tea => self.tea.as_ref(),
        }
    }

    /// Number of per-product sales models.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Highest product id with a trained model.
    pub fn max_product_id(&self) -> Option<u32> {
        self.products.keys().next_back().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
