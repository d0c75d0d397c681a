//! Fits a ranking model on the synthetic target and min-max rescales its output.

use crate::config::ScorerConfig;
use crate::error::Result;
use crate::features::{FeatureTable, FEATURE_NAMES};
use crate::model::{fingerprint, synthetic_target, ModelArtifact, Ranker, RankingModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredWallet {
    pub wallet: String,
    pub credit_score: u32,
}

/// Fitted model plus the scores it produced for its own training rows
#[derive(Debug, Clone)]
pub struct ScoredBatch {
    pub artifact: ModelArtifact,
    pub raw: Vec<f64>,
    pub scores: Vec<ScoredWallet>,
}

/// Linear min-max map of `raw` onto `[0, max]`, truncated toward zero.
/// All-equal (or non-finite spread) input maps every value to 0.
pub fn rescale(raw: &[f64], max: u32) -> Vec<u32> {
    let lo = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    if !(range.is_finite() && range > 0.0) {
        return vec![0; raw.len()];
    }
    raw.iter()
        .map(|v| {
            let scaled = (v - lo) / range * f64::from(max);
            (scaled as u32).min(max)
        })
        .collect()
}

pub struct ScoreEngine {
    config: ScorerConfig,
}

impl ScoreEngine {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Fit on `0..n` as target; each wallet's row position is its label.
    pub fn fit(&self, features: &FeatureTable) -> Result<ModelArtifact> {
        let x = features.to_matrix();
        let y = synthetic_target(x.nrows());
        let mut model = Ranker::from_config(&self.config);
        model.fit(x.view(), y.view())?;

        let fingerprint = fingerprint(features.wallets(), x.view());
        tracing::info!(
            strategy = model.name(),
            rows = x.nrows(),
            fingerprint = %fingerprint,
            "ranking model fitted"
        );
        Ok(ModelArtifact {
            strategy: model.strategy(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            n_rows: x.nrows(),
            fingerprint,
            model,
        })
    }

    /// Predict with `artifact` and rescale into credit scores
    pub fn score(&self, features: &FeatureTable, artifact: &ModelArtifact) -> Result<(Vec<f64>, Vec<ScoredWallet>)> {
        let x = features.to_matrix();
        let raw = artifact.predict(x.view())?.to_vec();
        let scores = rescale(&raw, self.config.score_max)
            .into_iter()
            .zip(features.wallets())
            .map(|(credit_score, wallet)| ScoredWallet {
                wallet: wallet.to_string(),
                credit_score,
            })
            .collect();
        Ok((raw, scores))
    }

    pub fn fit_and_score(&self, features: &FeatureTable) -> Result<ScoredBatch> {
        let artifact = self.fit(features)?;
        let (raw, scores) = self.score(features, &artifact)?;
        Ok(ScoredBatch { artifact, raw, scores })
    }
}
