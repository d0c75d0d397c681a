//! Persisted model: bincode-encoded ranker plus the layout it was fit on.

use super::{Ranker, RankingModel};
use crate::config::RankerStrategy;
use crate::error::{Result, ScoreError};
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub strategy: RankerStrategy,
    pub feature_names: Vec<String>,
    pub n_rows: usize,
    /// SHA-256 over wallet order and training values
    pub fingerprint: String,
    pub model: Ranker,
}

impl ModelArtifact {
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        tracing::info!(path = %path.display(), strategy = ?self.strategy, "model artifact written");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }

    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.feature_names.len() {
            return Err(ScoreError::Model(format!(
                "artifact expects {} features, got {}",
                self.feature_names.len(),
                x.ncols()
            )));
        }
        self.model.predict(x)
    }
}

/// Identical wallet order and values give an identical fingerprint
pub fn fingerprint<'a>(wallets: impl IntoIterator<Item = &'a str>, x: ArrayView2<f64>) -> String {
    let mut hasher = Sha256::new();
    for w in wallets {
        hasher.update(w.as_bytes());
        hasher.update([0u8]);
    }
    for v in x.iter() {
        hasher.update(v.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn fingerprint_depends_on_order() {
        let x = array![[1.0], [2.0]];
        let a = fingerprint(["a", "b"], x.view());
        let b = fingerprint(["b", "a"], x.view());
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(a, fingerprint(["a", "b"], x.view()));
    }
}
