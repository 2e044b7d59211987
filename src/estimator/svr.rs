//! Epsilon support-vector regression, evaluated from its dual form.
//!
//! `f(x) = intercept + Σ dual_coef[i] · K(support_vectors[i], x)`
//!
//! The training pipeline exports the fitted support vectors and dual
//! coefficients; nothing here refits or rescales inputs.

use serde::{Deserialize, Serialize};

use super::{check_shape, Estimator};
use crate::types::ForecastError;

/// Kernel function used at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    /// `exp(-gamma * ‖a - b‖²)`
    Rbf { gamma: f64 },
    /// `a · b`
    Linear,
}

impl Kernel {
    fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Kernel::Rbf { gamma } => {
                let sq_dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * sq_dist).exp()
            }
            Kernel::Linear => a.iter().zip(b).map(|(x, y)| x * y).sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportVectorRegressor {
    pub kernel: Kernel,
    pub intercept: f64,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
}

impl SupportVectorRegressor {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let Some(first) = self.support_vectors.first() else {
            return Err("svr model has no support vectors".into());
        };
        let width = first.len();
        if width == 0 {
            return Err("svr support vectors are empty".into());
        }
        if self.support_vectors.iter().any(|sv| sv.len() != width) {
            return Err("svr support vectors have inconsistent widths".into());
        }
        if self.dual_coef.len() != self.support_vectors.len() {
            return Err(format!(
                "svr has {} dual coefficients for {} support vectors",
                self.dual_coef.len(),
                self.support_vectors.len()
            ));
        }
        if let Kernel::Rbf { gamma } = self.kernel {
            if !gamma.is_finite() || gamma <= 0.0 {
                return Err(format!("svr rbf gamma must be positive, got {gamma}"));
            }
        }
        let params_finite = self.intercept.is_finite()
            && self.dual_coef.iter().all(|c| c.is_finite())
            && self.support_vectors.iter().flatten().all(|x| x.is_finite());
        if !params_finite {
            return Err("svr model has non-finite parameters".into());
        }
        Ok(())
    }
}

impl Estimator for SupportVectorRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ForecastError> {
        let width = self.n_features().unwrap_or(0);
        check_shape(width, features)?;

        let sum: f64 = self
            .support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| coef * self.kernel.eval(sv, features))
            .sum();
        Ok(self.intercept + sum)
    }

    fn n_features(&self) -> Option<usize> {
        self.support_vectors.first().map(Vec::len)
    }

    fn kind(&self) -> &'static str {
        "svr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rbf_model() -> SupportVectorRegressor {
        SupportVectorRegressor {
            kernel: Kernel::Rbf { gamma: 0.5 },
            intercept: 10.0,
            support_vectors: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            dual_coef: vec![1.0, -2.0],
        }
    }

    #[test]
    fn test_rbf_at_support_vector() {
        let m = rbf_model();
        // K(sv0, x) = 1, K(sv1, x) = exp(-0.5 * 2) = e^-1
        let y = m.predict(&[0.0, 0.0]).unwrap();
        let expected = 10.0 + 1.0 - 2.0 * (-1.0f64).exp();
        assert!((y - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rbf_far_away_returns_intercept() {
        let m = rbf_model();
        let y = m.predict(&[1e3, -1e3]).unwrap();
        assert!((y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_kernel() {
        let m = SupportVectorRegressor {
            kernel: Kernel::Linear,
            intercept: 1.0,
            support_vectors: vec![vec![1.0, 2.0, 3.0]],
            dual_coef: vec![0.5],
        };
        let y = m.predict(&[1.0, 1.0, 1.0]).unwrap();
        assert!((y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let m = rbf_model();
        assert!(matches!(m.predict(&[1.0]), Err(ForecastError::Prediction(_))));
        assert!(matches!(m.predict(&[]), Err(ForecastError::Prediction(_))));
    }

    #[test]
    fn test_validate_rejects_bad_models() {
        let mut m = rbf_model();
        m.dual_coef.pop();
        assert!(m.validate().unwrap_err().contains("dual coefficients"));

        let mut m = rbf_model();
        m.support_vectors[1].push(3.0);
        assert!(m.validate().unwrap_err().contains("inconsistent"));

        let mut m = rbf_model();
        m.kernel = Kernel::Rbf { gamma: 0.0 };
        assert!(m.validate().unwrap_err().contains("gamma"));

        let mut m = rbf_model();
        m.support_vectors.clear();
        m.dual_coef.clear();
        assert!(m.validate().is_err());

        assert!(rbf_model().validate().is_ok());
    }

    #[test]
    fn test_kernel_deserialize() {
        let k: Kernel = serde_json::from_str(r#"{"type":"rbf","gamma":0.1}"#).unwrap();
        assert_eq!(k, Kernel::Rbf { gamma: 0.1 });
        let k: Kernel = serde_json::from_str(r#"{"type":"linear"}"#).unwrap();
        assert_eq!(k, Kernel::Linear);
    }
}
