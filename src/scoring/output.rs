//! `wallet,credit_score` CSV table.

use super::ScoredWallet;
use crate::error::Result;
use std::path::Path;

pub fn write_scores(path: &Path, scores: &[ScoredWallet]) -> Result<()> {
    // Header written by hand so an empty batch still gets one
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(["wallet", "credit_score"])?;
    for record in scores {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    tracing::info!(path = %path.display(), rows = scores.len(), "scores written");
    Ok(())
}

pub fn read_scores(path: &Path) -> Result<Vec<ScoredWallet>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        out.push(record?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let scores = vec![
            ScoredWallet {
                wallet: "0xa".into(),
                credit_score: 0,
            },
            ScoredWallet {
                wallet: "0xb".into(),
                credit_score: 1000,
            },
        ];
        write_scores(&path, &scores).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "wallet,credit_score\n0xa,0\n0xb,1000\n");
        assert_eq!(read_scores(&path).unwrap(), scores);
    }

    #[test]
    fn empty_batch_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        write_scores(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "wallet,credit_score\n");
    }
}
