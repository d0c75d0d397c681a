//! Credit scoring: raw ranker output rescaled to `[0, score_max]` and written as CSV.

mod engine;
mod output;

pub use engine::{rescale, ScoreEngine, ScoredBatch, ScoredWallet};
pub use output::{read_scores, write_scores};
