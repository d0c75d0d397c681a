//! Wallet credit scoring over a lending-protocol transaction ledger.
//!
//! Modular structure:
//! - [`ledger`]: JSON ingestion and key-path flattening
//! - [`normalize`]: type coercion and USD valuation with stablecoin correction
//! - [`features`]: per-wallet behavioral aggregates
//! - [`model`]: ranking models fit against a synthetic target
//! - [`scoring`]: min-max rescaling to credit scores and CSV output
//! - [`pipeline`]: end-to-end run
//! - [`logging`]: structured JSON logging

pub mod config;
pub mod error;
pub mod ledger;
pub mod normalize;
pub mod features;
pub mod model;
pub mod scoring;
pub mod pipeline;
pub mod logging;

pub use config::ScoringConfig;
pub use error::{Result, ScoreError};
pub use ledger::LedgerTable;
pub use normalize::{NormalizedLedger, NormalizedTransaction};
pub use features::{FeatureGenerator, FeatureTable, WalletFeatures};
pub use model::{ModelArtifact, RankingModel};
pub use scoring::{ScoreEngine, ScoredWallet};
pub use pipeline::{run, score_ledger, RunSummary};
pub use logging::StructuredLogger;
