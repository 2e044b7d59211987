//! Pre-trained estimators exported by the training pipeline.
//!
//! Defines the `Estimator` trait and the JSON artifact format the
//! registry deserializes from disk. Concrete kinds live in `linear`
//! and `svr`.

pub mod linear;
pub mod svr;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::types::ForecastError;

pub use linear::LinearModel;
pub use svr::{Kernel, SupportVectorRegressor};

/// Abstraction over opaque regression models.
///
/// Implementors map a single observation's feature vector to a scalar.
/// They are immutable after load and shared across request handlers.
#[cfg_attr(test, mockall::automock)]
pub trait Estimator: Send + Sync {
    /// Predict a scalar for one observation.
    fn predict(&self, features: &[f64]) -> Result<f64, ForecastError>;

    /// Number of features the model was fit on, if it declares one.
    fn n_features(&self) -> Option<usize>;

    /// Short identifier of the model family, for logs.
    fn kind(&self) -> &'static str;
}

/// On-disk artifact, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Svr(SupportVectorRegressor),
}

impl ModelArtifact {
    /// Structural checks that would otherwise surface as nonsense
    /// predictions at request time.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::Svr(m) => m.validate(),
        }
    }

    pub fn into_estimator(self) -> Box<dyn Estimator> {
        match self {
            ModelArtifact::Linear(m) => Box::new(m),
            ModelArtifact::Svr(m) => Box::new(m),
        }
    }
}

/// Read, parse and validate one artifact file.
pub fn load_artifact(path: &Path) -> Result<Box<dyn Estimator>, ForecastError> {
    let load_err = |message: String| ForecastError::Load {
        path: path.display().to_string(),
        message,
    };

    let json = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
    let artifact: ModelArtifact =
        serde_json::from_str(&json).map_err(|e| load_err(format!("invalid artifact: {e}")))?;
    artifact.validate().map_err(load_err)?;

    let estimator = artifact.into_estimator();
    debug!(
        path = %path.display(),
        kind = estimator.kind(),
        n_features = ?estimator.n_features(),
        "Model artifact loaded"
    );
    Ok(estimator)
}

/// Shared shape check used by the concrete estimators.
pub(crate) fn check_shape(expected: usize, features: &[f64]) -> Result<(), ForecastError> {
    if features.len() != expected {
        return Err(ForecastError::Prediction(format!(
            "expected {expected} features, got {}",
            features.len()
        )));
    }
    if features.iter().any(|x| !x.is_finite()) {
        return Err(ForecastError::Prediction("features must be finite".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
