//! Ranking models fit against a synthetic target.
//!
//! There is no external label: each wallet's target is its row position, so a
//! fitted model is a deterministic re-ranking of feature space. Outputs are
//! reproducible only for identical wallet order and feature values.

mod artifact;
mod forest;
mod linear;

pub use artifact::{fingerprint, ModelArtifact};
pub use forest::TrainedEnsembleRanker;
pub use linear::LinearRanker;

use crate::config::{RankerStrategy, ScorerConfig};
use crate::error::{Result, ScoreError};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

pub trait RankingModel {
    fn name(&self) -> &'static str;

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()>;

    /// Raw, unscaled output per row
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;
}

/// `0, 1, …, n-1`
pub fn synthetic_target(n: usize) -> Array1<f64> {
    Array1::from_iter((0..n).map(|i| i as f64))
}

pub(crate) fn check_shape(x: &ArrayView2<f64>, y_len: usize) -> Result<()> {
    if x.nrows() != y_len {
        return Err(ScoreError::Model(format!(
            "feature rows ({}) and target length ({}) differ",
            x.nrows(),
            y_len
        )));
    }
    Ok(())
}

/// Splits and least squares are undefined on NaN/inf inputs
pub(crate) fn check_finite(x: &ArrayView2<f64>) -> Result<()> {
    if let Some(pos) = x.iter().position(|v| !v.is_finite()) {
        let (row, col) = (pos / x.ncols().max(1), pos % x.ncols().max(1));
        return Err(ScoreError::Model(format!(
            "non-finite feature value at row {}, column {}",
            row, col
        )));
    }
    Ok(())
}

pub(crate) fn check_columns(x: &ArrayView2<f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(ScoreError::Model(format!(
            "model was fit on {} features, got {}",
            expected,
            x.ncols()
        )));
    }
    Ok(())
}

/// Output is the synthetic target itself: pure input-order ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityRanker {
    n_features: usize,
}

impl RankingModel for IdentityRanker {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        check_shape(&x, y.len())?;
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_columns(&x, self.n_features)?;
        Ok(synthetic_target(x.nrows()))
    }
}

/// Concrete strategy, serializable as part of the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Ranker {
    Ensemble(TrainedEnsembleRanker),
    Linear(LinearRanker),
    Identity(IdentityRanker),
}

impl Ranker {
    pub fn from_config(config: &ScorerConfig) -> Self {
        match config.strategy {
            RankerStrategy::Ensemble => Ranker::Ensemble(TrainedEnsembleRanker::new(
                config.n_estimators,
                config.seed,
                config.max_depth,
                config.min_samples_split,
            )),
            RankerStrategy::Linear => Ranker::Linear(LinearRanker::default()),
            RankerStrategy::Identity => Ranker::Identity(IdentityRanker::default()),
        }
    }

    pub fn strategy(&self) -> RankerStrategy {
        match self {
            Ranker::Ensemble(_) => RankerStrategy::Ensemble,
            Ranker::Linear(_) => RankerStrategy::Linear,
            Ranker::Identity(_) => RankerStrategy::Identity,
        }
    }

    fn inner(&self) -> &dyn RankingModel {
        match self {
            Ranker::Ensemble(m) => m,
            Ranker::Linear(m) => m,
            Ranker::Identity(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn RankingModel {
        match self {
            Ranker::Ensemble(m) => m,
            Ranker::Linear(m) => m,
            Ranker::Identity(m) => m,
        }
    }
}

impl RankingModel for Ranker {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.inner().predict(x)
    }
}
