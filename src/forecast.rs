//! Price and sales prediction, and restocking advice.
//!
//! Thin, synchronous wrappers around the registry's estimators. Each
//! call is independent: nothing here holds state between requests.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::estimator::Estimator;
use crate::registry::ModelRegistry;
use crate::types::{Advisory, ForecastError, Period, PriceTrack, ProductSelection};

/// Width of the price models' feature vector: `[year, month]`.
const PRICE_FEATURES: usize = 2;

// ---------------------------------------------------------------------------
// Predictors
// ---------------------------------------------------------------------------

/// Predict a commodity price for a period.
///
/// The period is forwarded as-is; range checks belong to the input
/// surface.
pub fn predict_price(estimator: &dyn Estimator, period: Period) -> Result<f64, ForecastError> {
    if let Some(n) = estimator.n_features() {
        if n != PRICE_FEATURES {
            return Err(ForecastError::Prediction(format!(
                "price model expects {n} features, periods provide {PRICE_FEATURES}"
            )));
        }
    }
    estimator.predict(&period.features())
}

/// Predict the next value of a sales series.
///
/// The whole history is one observation; the estimator is invoked once.
/// An empty history is refused before the estimator is touched.
pub fn predict_sales(estimator: &dyn Estimator, history: &[f64]) -> Result<f64, ForecastError> {
    if history.is_empty() {
        return Err(ForecastError::Prediction("sales history is empty".into()));
    }
    if let Some(n) = estimator.n_features() {
        if n != history.len() {
            return Err(ForecastError::Prediction(format!(
                "sales model expects {n} past values, got {}",
                history.len()
            )));
        }
    }
    estimator.predict(history)
}

// ---------------------------------------------------------------------------
// Restocking advice
// ---------------------------------------------------------------------------

/// Compare this period's predicted price to the previous one.
pub fn advise(current_price: f64, previous_price: f64) -> Advisory {
    match current_price.partial_cmp(&previous_price) {
        Some(Ordering::Less) => Advisory::Buy,
        Some(Ordering::Greater) => Advisory::Wait,
        // Equal, or incomparable (NaN): nothing to act on.
        Some(Ordering::Equal) | None => Advisory::Hold,
    }
}

/// A restocking suggestion and the prices it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockAdvice {
    pub commodity: PriceTrack,
    pub period: Period,
    pub current_price: f64,
    pub previous_period: Period,
    pub previous_price: f64,
    pub advisory: Advisory,
}

/// Restocking advice for a product, or `None` when the product is not
/// tied to a commodity price track (ids 19 and up, and the aggregate).
pub fn restock_advice(
    registry: &ModelRegistry,
    selection: ProductSelection,
    period: Period,
) -> Result<Option<RestockAdvice>, ForecastError> {
    let Some(track) = PriceTrack::for_product(selection) else {
        return Ok(None);
    };

    let estimator = registry.price_estimator(track);
    let previous_period = period.previous();
    let current_price = predict_price(estimator, period)?;
    let previous_price = predict_price(estimator, previous_period)?;
    let advisory = advise(current_price, previous_price);

    debug!(
        product = %selection,
        commodity = %track,
        current = %format!("{current_price:.2}"),
        previous = %format!("{previous_price:.2}"),
        advisory = %advisory,
        "Restocking advice computed"
    );

    Ok(Some(RestockAdvice {
        commodity: track,
        period,
        current_price,
        previous_period,
        previous_price,
        advisory,
    }))
}

// ---------------------------------------------------------------------------
// Sales forecast
// ---------------------------------------------------------------------------

/// Everything the sales button produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesForecast {
    pub product: ProductSelection,
    pub history: Vec<f64>,
    pub prediction: f64,
    pub restock: Option<RestockAdvice>,
}

/// Look up the product's model, predict the next value, then attach
/// restocking advice where the product has a price track.
pub fn forecast_sales(
    registry: &ModelRegistry,
    selection: ProductSelection,
    history: Vec<f64>,
    period: Period,
) -> Result<SalesForecast, ForecastError> {
    let estimator = registry.estimator_for(selection)?;
    let prediction = predict_sales(estimator, &history)?;
    let restock = restock_advice(registry, selection, period)?;

    Ok(SalesForecast {
        product: selection,
        history,
        prediction,
        restock,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
