//! Preprocessor: schema check, type coercion, USD valuation with stablecoin correction.

use super::{Action, NormalizedTransaction};
use crate::error::{Result, ScoreError};
use crate::ledger::{FlatRecord, LedgerTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const WALLET_COLUMN: &str = "userWallet";
pub const ACTION_COLUMN: &str = "action";
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const AMOUNT_COLUMN: &str = "actionData_amount";
pub const PRICE_COLUMN: &str = "actionData_assetPriceUSD";
pub const SYMBOL_COLUMN: &str = "actionData_assetSymbol";

/// Columns whose absence aborts the run
pub const REQUIRED_COLUMNS: [&str; 3] = [WALLET_COLUMN, AMOUNT_COLUMN, PRICE_COLUMN];

/// Token amounts are 18-decimal fixed point by default
pub const DEFAULT_DIVISOR: f64 = 1e18;
/// USDC/USDT amounts are 6-decimal fixed point
pub const STABLECOIN_DIVISOR: f64 = 1e6;

const STABLECOIN_MARKERS: [&str; 2] = ["USDC", "USDT"];

/// Counts of present values that failed coercion and became null
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionReport {
    pub amount: usize,
    pub price: usize,
    pub timestamp: usize,
    /// Rows whose `amount * price` overflowed
    pub usd: usize,
}

impl CoercionReport {
    pub fn total(&self) -> usize {
        self.amount + self.price + self.timestamp + self.usd
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedLedger {
    pub transactions: Vec<NormalizedTransaction>,
    pub coercion: CoercionReport,
}

pub fn is_stablecoin(symbol: &str) -> bool {
    let upper = symbol.to_uppercase();
    STABLECOIN_MARKERS.iter().any(|m| upper.contains(m))
}

/// Default 1e18 scaling, then the stablecoin override to 1e6.
/// A non-finite product is null.
pub fn amount_usd(amount: Option<f64>, price: Option<f64>, symbol: Option<&str>) -> Option<f64> {
    let mut usd = amount.zip(price).map(|(a, p)| a * p / DEFAULT_DIVISOR);
    if symbol.is_some_and(is_stablecoin) {
        usd = amount.zip(price).map(|(a, p)| a * p / STABLECOIN_DIVISOR);
    }
    usd.filter(|v| v.is_finite())
}

/// Numbers and numeric strings become `f64`; anything else is `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// Unix seconds (integer, fractional, or numeric string) to a UTC datetime
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let secs = coerce_number(value)?;
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Normalize every row. Fails only when a required column is absent from the whole table.
pub fn preprocess(table: LedgerTable) -> Result<NormalizedLedger> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ScoreError::Schema { missing });
    }

    let mut coercion = CoercionReport::default();
    let transactions: Vec<NormalizedTransaction> = table
        .into_rows()
        .into_iter()
        .map(|row| normalize_row(row, &mut coercion))
        .collect();

    if coercion.amount > 0 {
        tracing::warn!(field = AMOUNT_COLUMN, count = coercion.amount, "non-numeric values coerced to null");
    }
    if coercion.price > 0 {
        tracing::warn!(field = PRICE_COLUMN, count = coercion.price, "non-numeric values coerced to null");
    }
    if coercion.timestamp > 0 {
        tracing::warn!(field = TIMESTAMP_COLUMN, count = coercion.timestamp, "unparseable timestamps coerced to null");
    }
    if coercion.usd > 0 {
        tracing::warn!(field = "amount_usd", count = coercion.usd, "overflowing USD values coerced to null");
    }
    let stablecoin_rows = transactions
        .iter()
        .filter(|t| t.asset_symbol.as_deref().is_some_and(is_stablecoin))
        .count();
    tracing::info!(rows = transactions.len(), stablecoin_rows, "ledger normalized");

    Ok(NormalizedLedger {
        transactions,
        coercion,
    })
}

fn normalize_row(raw: FlatRecord, coercion: &mut CoercionReport) -> NormalizedTransaction {
    let amount = coerce_field(&raw, AMOUNT_COLUMN, coerce_number, &mut coercion.amount);
    let asset_price_usd = coerce_field(&raw, PRICE_COLUMN, coerce_number, &mut coercion.price);
    let datetime = coerce_field(&raw, TIMESTAMP_COLUMN, parse_timestamp, &mut coercion.timestamp);
    let asset_symbol = text_field(&raw, SYMBOL_COLUMN);
    let usd = amount_usd(amount, asset_price_usd, asset_symbol.as_deref());
    if usd.is_none() && amount.is_some() && asset_price_usd.is_some() {
        coercion.usd += 1;
    }

    NormalizedTransaction {
        wallet: text_field(&raw, WALLET_COLUMN),
        action: text_field(&raw, ACTION_COLUMN).map(|a| Action::from_raw(&a)),
        datetime,
        asset_symbol,
        amount,
        asset_price_usd,
        amount_usd: usd,
        raw,
    }
}

fn coerce_field<T>(
    row: &FlatRecord,
    key: &str,
    coerce: impl Fn(&Value) -> Option<T>,
    failures: &mut usize,
) -> Option<T> {
    match row.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => {
            let out = coerce(v);
            if out.is_none() {
                *failures += 1;
            }
            out
        }
    }
}

fn text_field(row: &FlatRecord, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::load_str;
    use chrono::TimeZone;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn stablecoin_match_is_case_insensitive_substring() {
        assert!(is_stablecoin("USDC"));
        assert!(is_stablecoin("usdt"));
        assert!(is_stablecoin("USDC.e"));
        assert!(is_stablecoin("aUsdT"));
        assert!(!is_stablecoin("WETH"));
        assert!(!is_stablecoin("DAI"));
        assert!(!is_stablecoin("USD"));
    }

    #[test]
    fn divisor_depends_on_symbol() {
        let weth = amount_usd(Some(2e18), Some(1500.0), Some("WETH")).unwrap();
        assert!(approx(weth, 3000.0));
        let usdc = amount_usd(Some(2_000_000.0), Some(1.0), Some("USDC")).unwrap();
        assert!(approx(usdc, 2.0));
        let no_symbol = amount_usd(Some(2e18), Some(1.0), None).unwrap();
        assert!(approx(no_symbol, 2.0));
        assert_eq!(amount_usd(None, Some(1.0), Some("USDC")), None);
        assert_eq!(amount_usd(Some(1e200), Some(1e200), Some("WETH")), None);
        assert_eq!(amount_usd(Some(1e200), Some(1e200), Some("USDT")), None);
    }

    #[test]
    fn coercion_maps_garbage_to_none() {
        assert_eq!(coerce_number(&Value::from("12.5")), Some(12.5));
        assert_eq!(coerce_number(&Value::from(7)), Some(7.0));
        assert_eq!(coerce_number(&Value::from("abc")), None);
        assert_eq!(coerce_number(&Value::from("NaN")), None);
        assert_eq!(coerce_number(&Value::Bool(true)), None);
    }

    #[test]
    fn timestamp_parsing() {
        let expected = Utc.with_ymd_and_hms(2021, 8, 17, 5, 29, 26).unwrap();
        assert_eq!(parse_timestamp(&Value::from(1629178166)), Some(expected));
        assert_eq!(parse_timestamp(&Value::from("1629178166")), Some(expected));
        assert_eq!(parse_timestamp(&Value::from("yesterday")), None);
    }

    #[test]
    fn missing_required_columns_is_schema_error() {
        let table = load_str(r#"[{"userWallet":"a","action":"deposit","timestamp":1}]"#).unwrap();
        match preprocess(table) {
            Err(ScoreError::Schema { missing }) => {
                assert_eq!(missing, vec![AMOUNT_COLUMN.to_string(), PRICE_COLUMN.to_string()]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn bad_values_propagate_as_null() {
        let table = load_str(
            r#"[
                {"userWallet":"a","action":"deposit","timestamp":1,
                 "actionData":{"amount":"oops","assetPriceUSD":"1","assetSymbol":"WETH"}},
                {"userWallet":"a","action":"deposit","timestamp":"never",
                 "actionData":{"amount":"1000000","assetPriceUSD":"1","assetSymbol":"usdc"}}
            ]"#,
        )
        .unwrap();
        let out = preprocess(table).unwrap();
        assert_eq!(out.transactions.len(), 2);
        assert_eq!(out.transactions[0].amount_usd, None);
        assert_eq!(out.transactions[1].amount_usd, Some(1.0));
        assert_eq!(out.transactions[1].datetime, None);
        assert_eq!(out.coercion.amount, 1);
        assert_eq!(out.coercion.timestamp, 1);
        assert_eq!(out.coercion.price, 0);
        assert!(out.transactions[0].raw.contains_key("actionData_assetSymbol"));
    }

    #[test]
    fn overflowing_product_is_counted_and_nulled() {
        let table = load_str(
            r#"[{"userWallet":"a","action":"deposit","timestamp":1,
                 "actionData":{"amount":"1e200","assetPriceUSD":"1e200","assetSymbol":"WETH"}}]"#,
        )
        .unwrap();
        let out = preprocess(table).unwrap();
        assert_eq!(out.transactions[0].amount, Some(1e200));
        assert_eq!(out.transactions[0].amount_usd, None);
        assert_eq!(out.coercion.usd, 1);
        assert_eq!(out.coercion.total(), 1);
    }

    #[test]
    fn action_names_are_exact() {
        assert_eq!(Action::from_raw("redeemunderlying"), Action::RedeemUnderlying);
        assert_eq!(Action::from_raw("Deposit"), Action::Other("Deposit".into()));
        assert_eq!(Action::from_raw("liquidationcall").as_str(), "liquidationcall");
    }
}
