//! Ordinary linear regression: `intercept + coefficients · x`.

use serde::{Deserialize, Serialize};

use super::{check_shape, Estimator};
use crate::types::ForecastError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self { intercept, coefficients }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear model has no coefficients".into());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("linear model has non-finite parameters".into());
        }
        Ok(())
    }
}

impl Estimator for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, ForecastError> {
        check_shape(self.coefficients.len(), features)?;
        let dot: f64 = self.coefficients.iter().zip(features).map(|(c, x)| c * x).sum();
        Ok(self.intercept + dot)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict() {
        let m = LinearModel::new(2.0, vec![0.5, -1.0, 0.25]);
        let y = m.predict(&[4.0, 1.0, 8.0]).unwrap();
        assert!((y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let m = LinearModel::new(0.0, vec![1.0; 14]);
        let err = m.predict(&[1.0; 13]).unwrap_err();
        assert!(err.to_string().contains("expected 14 features, got 13"));
    }

    #[test]
    fn test_validate() {
        assert!(LinearModel::new(0.0, vec![1.0]).validate().is_ok());
        assert!(LinearModel::new(0.0, vec![]).validate().is_err());
        assert!(LinearModel::new(f64::NAN, vec![1.0]).validate().is_err());
        assert!(LinearModel::new(0.0, vec![f64::INFINITY]).validate().is_err());
    }
}
