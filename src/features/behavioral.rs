//! Running aggregates for a single wallet.

use super::WalletFeatures;
use crate::normalize::{Action, NormalizedTransaction};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct WalletActivity {
    pub total_txns: u64,
    pub total_deposit_usd: f64,
    pub total_borrow_usd: f64,
    pub total_repay_usd: f64,
    pub total_redeem_usd: f64,
    pub total_liquidations: u64,
    assets: HashSet<String>,
    actions: HashSet<Action>,
    /// Latest resolvable transaction time
    pub last_seen: Option<DateTime<Utc>>,
}

impl WalletActivity {
    pub fn record(&mut self, tx: &NormalizedTransaction) {
        self.total_txns += 1;
        match (&tx.action, tx.amount_usd) {
            (Some(Action::Deposit), Some(usd)) => saturating_add(&mut self.total_deposit_usd, usd),
            (Some(Action::Borrow), Some(usd)) => saturating_add(&mut self.total_borrow_usd, usd),
            (Some(Action::Repay), Some(usd)) => saturating_add(&mut self.total_repay_usd, usd),
            (Some(Action::RedeemUnderlying), Some(usd)) => saturating_add(&mut self.total_redeem_usd, usd),
            _ => {}
        }
        if tx.action == Some(Action::LiquidationCall) {
            self.total_liquidations += 1;
        }
        if let Some(ref a) = tx.action {
            self.actions.insert(a.clone());
        }
        if let Some(ref s) = tx.asset_symbol {
            self.assets.insert(s.clone());
        }
        if let Some(ts) = tx.datetime {
            self.last_seen = Some(self.last_seen.map_or(ts, |prev| prev.max(ts)));
        }
    }

    pub fn unique_assets(&self) -> u64 {
        self.assets.len() as u64
    }

    pub fn num_actions(&self) -> u64 {
        self.actions.len() as u64
    }

    /// Whole days between the last transaction and `now`, floored
    pub fn days_since_last(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_seen
            .map(|last| (now - last).num_milliseconds().div_euclid(86_400_000))
    }

    /// Finalize into a feature row using an already-resolved recency
    pub fn into_features(self, wallet: String, days_since_last_txn: i64) -> WalletFeatures {
        WalletFeatures {
            wallet,
            total_txns: self.total_txns,
            total_deposit_usd: self.total_deposit_usd,
            total_borrow_usd: self.total_borrow_usd,
            total_repay_usd: self.total_repay_usd,
            total_redeem_usd: self.total_redeem_usd,
            total_liquidations: self.total_liquidations,
            unique_assets: self.unique_assets(),
            num_actions: self.num_actions(),
            repay_to_borrow_ratio: saturate(self.total_repay_usd / (self.total_borrow_usd + 1.0)),
            net_flow: saturate(self.total_deposit_usd - self.total_borrow_usd - self.total_redeem_usd),
            is_liquidated: u8::from(self.total_liquidations > 0),
            days_since_last_txn,
        }
    }
}

/// Overflow clamps to the largest finite magnitude
fn saturate(v: f64) -> f64 {
    v.clamp(f64::MIN, f64::MAX)
}

fn saturating_add(total: &mut f64, usd: f64) {
    *total = saturate(*total + usd);
}
