//! Per-wallet behavioral feature generation from normalized transactions.

mod behavioral;
mod pipeline;

pub use behavioral::WalletActivity;
pub use pipeline::{FeatureGenerator, FeatureTable};

use serde::{Deserialize, Serialize};

/// Column order of the model input matrix
pub const FEATURE_NAMES: [&str; 12] = [
    "total_txns",
    "total_deposit_usd",
    "total_borrow_usd",
    "total_repay_usd",
    "total_redeem_usd",
    "total_liquidations",
    "unique_assets",
    "num_actions",
    "repay_to_borrow_ratio",
    "net_flow",
    "is_liquidated",
    "days_since_last_txn",
];

pub const FEATURE_DIM: usize = FEATURE_NAMES.len();

/// One row per wallet; every aggregate defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletFeatures {
    pub wallet: String,
    pub total_txns: u64,
    pub total_deposit_usd: f64,
    pub total_borrow_usd: f64,
    pub total_repay_usd: f64,
    pub total_redeem_usd: f64,
    pub total_liquidations: u64,
    pub unique_assets: u64,
    pub num_actions: u64,
    /// `total_repay_usd / (total_borrow_usd + 1)`
    pub repay_to_borrow_ratio: f64,
    pub net_flow: f64,
    pub is_liquidated: u8,
    pub days_since_last_txn: i64,
}

impl WalletFeatures {
    /// Encode in [`FEATURE_NAMES`] order
    pub fn to_vector(&self) -> [f64; FEATURE_DIM] {
        [
            self.total_txns as f64,
            self.total_deposit_usd,
            self.total_borrow_usd,
            self.total_repay_usd,
            self.total_redeem_usd,
            self.total_liquidations as f64,
            self.unique_assets as f64,
            self.num_actions as f64,
            self.repay_to_borrow_ratio,
            self.net_flow,
            self.is_liquidated as f64,
            self.days_since_last_txn as f64,
        ]
    }
}
