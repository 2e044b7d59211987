//! Shared types for the BREWCAST dashboard.
//!
//! The data model used by the registry, the predictors and the
//! dashboard handlers. Kept free of I/O so every module can depend
//! on it without cycles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire literal for the aggregate sales selection.
pub const TOTAL_SALE_LABEL: &str = "Total Sale";

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// A (year, month) pair, the feature input of the price estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The period one month earlier. January rolls back to December of
    /// the previous year; no other calendar validation is performed.
    pub fn previous(&self) -> Self {
        if self.month > 1 {
            Self::new(self.year, self.month - 1)
        } else {
            Self::new(self.year - 1, 12)
        }
    }

    /// Feature vector in the column order the price models were fit on.
    pub fn features(&self) -> [f64; 2] {
        [f64::from(self.year), f64::from(self.month)]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Unpadded month, matching how the messages have always read ("2019-1").
        write!(f, "{}-{}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Product selection
// ---------------------------------------------------------------------------

/// What the sales predictor is asked about: one product or the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProductSelection {
    Product(u32),
    Total,
}

impl ProductSelection {
    /// The numeric product id, if this is not the aggregate.
    pub fn product_id(&self) -> Option<u32> {
        match self {
            ProductSelection::Product(id) => Some(*id),
            ProductSelection::Total => None,
        }
    }
}

impl fmt::Display for ProductSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductSelection::Product(id) => write!(f, "{id}"),
            ProductSelection::Total => write!(f, "{TOTAL_SALE_LABEL}"),
        }
    }
}

impl FromStr for ProductSelection {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == TOTAL_SALE_LABEL {
            return Ok(ProductSelection::Total);
        }
        s.parse::<u32>()
            .map(ProductSelection::Product)
            .map_err(|_| ForecastError::InvalidInput(format!("Unrecognised product: {s:?}")))
    }
}

impl TryFrom<String> for ProductSelection {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductSelection> for String {
    fn from(value: ProductSelection) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Price track
// ---------------------------------------------------------------------------

/// Commodity price series a product's restocking depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrack {
    Coffee,
    Tea,
}

impl PriceTrack {
    /// Band routing for restocking advice: products 1–10 follow coffee
    /// bean prices, 11–18 loose tea. Everything else, including the
    /// aggregate, gets no advice.
    pub fn for_product(selection: ProductSelection) -> Option<Self> {
        match selection {
            ProductSelection::Product(1..=10) => Some(PriceTrack::Coffee),
            ProductSelection::Product(11..=18) => Some(PriceTrack::Tea),
            ProductSelection::Product(_) | ProductSelection::Total => None,
        }
    }

    /// Human label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            PriceTrack::Coffee => "Coffee Bean",
            PriceTrack::Tea => "Loose Tea",
        }
    }

    pub fn all() -> &'static [PriceTrack] {
        &[PriceTrack::Coffee, PriceTrack::Tea]
    }
}

impl fmt::Display for PriceTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceTrack::Coffee => write!(f, "coffee"),
            PriceTrack::Tea => write!(f, "tea"),
        }
    }
}

impl FromStr for PriceTrack {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coffee" => Ok(PriceTrack::Coffee),
            "tea" => Ok(PriceTrack::Tea),
            other => Err(ForecastError::InvalidInput(format!("Unknown commodity: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

/// Restocking suggestion derived from a month-over-month price comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Advisory {
    /// Price fell: buy now.
    Buy,
    /// Price rose: wait.
    Wait,
    /// Price unchanged: hold.
    Hold,
}

impl Advisory {
    /// The sentence shown under the sales prediction.
    pub fn message(&self) -> String {
        format!("Our suggestion on restocking: {self}")
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Buy => write!(f, "Buy"),
            Advisory::Wait => write!(f, "Wait"),
            Advisory::Hold => write!(f, "Hold"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for BREWCAST.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Missing or corrupt model artifact. Fatal at startup.
    #[error("Failed to load model artifact {path}: {message}")]
    Load { path: String, message: String },

    #[error("No sales model for product {0}")]
    UnknownProduct(ProductSelection),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ForecastError {
    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Load { .. } => "load_error",
            ForecastError::UnknownProduct(_) => "unknown_product",
            ForecastError::Prediction(_) => "prediction_error",
            ForecastError::InvalidInput(_) => "invalid_input",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
