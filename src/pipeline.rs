//! End-to-end run: load → normalize → features → score → write.
//!
//! Every stage completes before the first output is written. Both outputs are
//! staged beside their destinations and renamed into place only once both
//! staged writes succeeded.

use crate::config::{RankerStrategy, ScoringConfig, ScorerConfig};
use crate::error::Result;
use crate::features::{FeatureGenerator, FeatureTable};
use crate::ledger::{self, LedgerTable};
use crate::normalize::{self, CoercionReport};
use crate::scoring::{write_scores, ScoreEngine, ScoredBatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Everything computed in memory for one ledger
#[derive(Debug, Clone)]
pub struct ScoredLedger {
    pub transactions: usize,
    pub coercion: CoercionReport,
    pub features: FeatureTable,
    pub batch: ScoredBatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub transactions: usize,
    pub wallets: usize,
    pub coercion_warnings: usize,
    pub strategy: RankerStrategy,
    pub fingerprint: String,
    pub min_score: Option<u32>,
    pub max_score: Option<u32>,
    pub output_path: PathBuf,
    pub model_path: PathBuf,
}

/// In-memory stages only; nothing touches disk.
pub fn score_ledger(table: LedgerTable, scorer: &ScorerConfig, now: DateTime<Utc>) -> Result<ScoredLedger> {
    let normalized = normalize::preprocess(table)?;
    let features = FeatureGenerator::new(now).generate(&normalized);
    let batch = ScoreEngine::new(scorer.clone()).fit_and_score(&features)?;
    Ok(ScoredLedger {
        transactions: normalized.transactions.len(),
        coercion: normalized.coercion,
        features,
        batch,
    })
}

pub fn run(config: &ScoringConfig, now: DateTime<Utc>) -> Result<RunSummary> {
    let run_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let table = ledger::load(&config.input_path)?;
    let scored = score_ledger(table, &config.scorer, now)?;

    publish_outputs(config, &scored.batch)?;

    let scores = scored.batch.scores.iter().map(|s| s.credit_score);
    let summary = RunSummary {
        run_id,
        transactions: scored.transactions,
        wallets: scored.features.len(),
        coercion_warnings: scored.coercion.total(),
        strategy: scored.batch.artifact.strategy,
        fingerprint: scored.batch.artifact.fingerprint.clone(),
        min_score: scores.clone().min(),
        max_score: scores.max(),
        output_path: config.output_path.clone(),
        model_path: config.model_path.clone(),
    };
    tracing::info!(wallets = summary.wallets, transactions = summary.transactions, "run complete");
    Ok(summary)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn publish_outputs(config: &ScoringConfig, batch: &ScoredBatch) -> Result<()> {
    let model_tmp = staging_path(&config.model_path);
    let output_tmp = staging_path(&config.output_path);

    let staged = batch
        .artifact
        .save(&model_tmp)
        .and_then(|_| write_scores(&output_tmp, &batch.scores));
    if let Err(e) = staged {
        let _ = std::fs::remove_file(&model_tmp);
        let _ = std::fs::remove_file(&output_tmp);
        return Err(e);
    }

    std::fs::rename(&model_tmp, &config.model_path)?;
    if let Err(e) = std::fs::rename(&output_tmp, &config.output_path) {
        let _ = std::fs::remove_file(&config.model_path);
        let _ = std::fs::remove_file(&output_tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("out/wallet_scores.csv")),
            PathBuf::from("out/wallet_scores.csv.partial")
        );
    }
}
