//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section falls back to defaults, so a missing key never
//! prevents startup; only a missing or malformed file does.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::types::{ForecastError, Period, PriceTrack, ProductSelection};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: GeneralConfig,
    pub models: ModelsConfig,
    pub inputs: InputsConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub name: String,
    pub currency_symbol: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "BREWCAST".into(),
            currency_symbol: "$".into(),
        }
    }
}

/// Where the exported model artifacts live and how they are named.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelsConfig {
    pub dir: PathBuf,
    /// Per-product sales models are expected for ids `1..=product_count`.
    pub product_count: u32,
    pub product_file_prefix: String,
    pub total_sales_file: String,
    pub coffee_file: String,
    pub tea_file: String,
    pub extension: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            product_count: 78,
            product_file_prefix: "svr_model_productid_".into(),
            total_sales_file: "svr_model_total_sales".into(),
            coffee_file: "coffee_model".into(),
            tea_file: "tea_model".into(),
            extension: "json".into(),
        }
    }
}

impl ModelsConfig {
    pub fn product_path(&self, product_id: u32) -> PathBuf {
        self.file(&format!("{}{product_id}", self.product_file_prefix))
    }

    pub fn total_sales_path(&self) -> PathBuf {
        self.file(&self.total_sales_file)
    }

    pub fn price_path(&self, track: PriceTrack) -> PathBuf {
        match track {
            PriceTrack::Coffee => self.file(&self.coffee_file),
            PriceTrack::Tea => self.file(&self.tea_file),
        }
    }

    fn file(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", self.extension))
    }
}

/// Bounds and defaults of the dashboard's input widgets.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputsConfig {
    pub year_min: i32,
    pub year_max: i32,
    pub default_year: i32,
    pub default_month: u32,
    /// The product selector offers `1..=selectable_products` plus "Total Sale".
    /// This may exceed `models.product_count`; the extra ids fail lookup.
    pub selectable_products: u32,
    /// Window length shown as a hint; not enforced.
    pub history_window: usize,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            year_min: 1990,
            year_max: 2020,
            default_year: 2019,
            default_month: 1,
            selectable_products: 87,
            history_window: 14,
        }
    }
}

impl InputsConfig {
    /// Reject periods the input widgets would not allow.
    pub fn validate_period(&self, period: Period) -> Result<(), ForecastError> {
        if period.year < self.year_min || period.year > self.year_max {
            return Err(ForecastError::InvalidInput(format!(
                "year must be between {} and {}, got {}",
                self.year_min, self.year_max, period.year
            )));
        }
        if !(1..=12).contains(&period.month) {
            return Err(ForecastError::InvalidInput(format!(
                "month must be between 1 and 12, got {}",
                period.month
            )));
        }
        Ok(())
    }

    /// Reject products the selector would not offer.
    pub fn validate_product(&self, selection: ProductSelection) -> Result<(), ForecastError> {
        match selection {
            ProductSelection::Total => Ok(()),
            ProductSelection::Product(id) if (1..=self.selectable_products).contains(&id) => Ok(()),
            ProductSelection::Product(id) => Err(ForecastError::InvalidInput(format!(
                "product id must be between 1 and {}, got {id}",
                self.selectable_products
            ))),
        }
    }

    pub fn selectable(&self) -> Vec<ProductSelection> {
        (1..=self.selectable_products)
            .map(ProductSelection::Product)
            .chain(std::iter::once(ProductSelection::Total))
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8501,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        if config.inputs.year_min > config.inputs.year_max {
            anyhow::bail!(
                "inputs.year_min ({}) is greater than inputs.year_max ({})",
                config.inputs.year_min,
                config.inputs.year_max
            );
        }
        Ok(config)
    }
}
