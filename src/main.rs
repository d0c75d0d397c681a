//! Scores every wallet in the configured ledger and writes `wallet,credit_score`
//! plus the fitted model artifact. Takes no arguments; paths come from the
//! JSON config named by `WALLET_SCORE_CONFIG` (default `config.json`).

use chrono::Utc;
use wallet_credit_score::{config::ScoringConfig, logging::StructuredLogger, pipeline};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("WALLET_SCORE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = ScoringConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(
        input = %config.input_path.display(),
        strategy = ?config.scorer.strategy,
        "wallet scoring starting"
    );

    let summary = match pipeline::run(&config, Utc::now()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            return Err(e.into());
        }
    };
    StructuredLogger::emit_json(&summary, &mut std::io::stdout().lock())?;
    Ok(())
}
