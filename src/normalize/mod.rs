//! Numeric and temporal normalization of flattened ledger rows.

mod preprocess;

pub use preprocess::{
    amount_usd, coerce_number, is_stablecoin, parse_timestamp, preprocess, CoercionReport,
    NormalizedLedger, DEFAULT_DIVISOR, REQUIRED_COLUMNS, STABLECOIN_DIVISOR,
};

use crate::ledger::FlatRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transaction type as recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Deposit,
    Borrow,
    Repay,
    RedeemUnderlying,
    LiquidationCall,
    Other(String),
}

impl Action {
    /// Exact, case-sensitive match on the ledger's action names
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "deposit" => Action::Deposit,
            "borrow" => Action::Borrow,
            "repay" => Action::Repay,
            "redeemunderlying" => Action::RedeemUnderlying,
            "liquidationcall" => Action::LiquidationCall,
            other => Action::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::Deposit => "deposit",
            Action::Borrow => "borrow",
            Action::Repay => "repay",
            Action::RedeemUnderlying => "redeemunderlying",
            Action::LiquidationCall => "liquidationcall",
            Action::Other(s) => s.as_str(),
        }
    }
}

/// Ledger row with parsed and derived fields. `raw` keeps every original column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub wallet: Option<String>,
    pub action: Option<Action>,
    pub datetime: Option<DateTime<Utc>>,
    pub asset_symbol: Option<String>,
    pub amount: Option<f64>,
    pub asset_price_usd: Option<f64>,
    /// USD value; null when amount or price could not be resolved
    pub amount_usd: Option<f64>,
    pub raw: FlatRecord,
}
