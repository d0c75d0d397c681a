//! Error taxonomy. Structural problems abort the run; value-level coercion
//! failures never surface here (they become nulls, see `normalize`).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed ledger JSON: {0}")]
    Parse(String),

    #[error("expected keys not found: {}. Check JSON structure.", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("model error: {0}")]
    Model(String),

    #[error("model artifact: {0}")]
    Artifact(#[from] bincode::Error),

    #[error("csv output: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ScoreError {
    /// True for missing/unreadable input and malformed JSON
    pub fn is_parse(&self) -> bool {
        matches!(self, ScoreError::Read { .. } | ScoreError::Parse(_))
    }
}

impl From<serde_json::Error> for ScoreError {
    fn from(e: serde_json::Error) -> Self {
        ScoreError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
