//! Pipeline configuration. Paths and scorer parameters are explicit instead of
//! hard-coded; every section falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Ledger JSON to score
    pub input_path: PathBuf,
    /// Destination of the `wallet,credit_score` table
    pub output_path: PathBuf,
    /// Destination of the fitted model artifact
    pub model_path: PathBuf,
    /// Ranking model parameters
    pub scorer: ScorerConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankerStrategy {
    /// Seeded random-forest ensemble
    Ensemble,
    /// Least-squares linear fit
    Linear,
    /// Raw output is the synthetic target itself
    Identity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub strategy: RankerStrategy,
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Seed for bootstrap sampling
    pub seed: u64,
    /// Maximum tree depth; unlimited when absent
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it is split
    pub min_samples_split: usize,
    /// Upper bound of the rescaled score range (lower bound is 0)
    pub score_max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/user-wallet-transactions.json"),
            output_path: PathBuf::from("wallet_scores.csv"),
            model_path: PathBuf::from("model.bin"),
            scorer: ScorerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            strategy: RankerStrategy::Ensemble,
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            score_max: 1000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl ScoringConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<ScoringConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
