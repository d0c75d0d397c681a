//! Feature pipeline: normalized transactions → per-wallet activity → feature rows → matrix.

use super::{WalletActivity, WalletFeatures, FEATURE_DIM};
use crate::normalize::NormalizedLedger;
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Feature rows in first-appearance order of wallets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureTable {
    pub rows: Vec<WalletFeatures>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn wallets(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.wallet.as_str())
    }

    pub fn get(&self, wallet: &str) -> Option<&WalletFeatures> {
        self.rows.iter().find(|r| r.wallet == wallet)
    }

    /// `[n_wallets, FEATURE_DIM]` model input, wallet column excluded
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut m = Array2::<f64>::zeros((self.rows.len(), FEATURE_DIM));
        for (i, row) in self.rows.iter().enumerate() {
            for (j, v) in row.to_vector().into_iter().enumerate() {
                m[[i, j]] = v;
            }
        }
        m
    }
}

pub struct FeatureGenerator {
    now: DateTime<Utc>,
}

impl FeatureGenerator {
    /// `now` anchors `days_since_last_txn`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn generate(&self, ledger: &NormalizedLedger) -> FeatureTable {
        let mut order: Vec<String> = Vec::new();
        let mut by_wallet: HashMap<String, WalletActivity> = HashMap::new();
        let mut skipped = 0usize;

        for tx in &ledger.transactions {
            let Some(ref wallet) = tx.wallet else {
                skipped += 1;
                continue;
            };
            by_wallet
                .entry(wallet.clone())
                .or_insert_with(|| {
                    order.push(wallet.clone());
                    WalletActivity::default()
                })
                .record(tx);
        }
        if skipped > 0 {
            tracing::warn!(skipped, "transactions without wallet id ignored");
        }

        let recency: Vec<Option<i64>> = order
            .iter()
            .map(|w| by_wallet.get(w).and_then(|a| a.days_since_last(self.now)))
            .collect();
        // Unknown recency is treated as the most dormant observed
        let fallback = recency.iter().flatten().copied().max().unwrap_or(0);
        let imputed = recency.iter().filter(|r| r.is_none()).count();

        let rows: Vec<WalletFeatures> = order
            .into_iter()
            .zip(recency)
            .filter_map(|(wallet, days)| {
                let activity = by_wallet.remove(&wallet)?;
                Some(activity.into_features(wallet, days.unwrap_or(fallback)))
            })
            .collect();

        tracing::info!(wallets = rows.len(), imputed_recency = imputed, "features generated");
        FeatureTable { rows }
    }
}
