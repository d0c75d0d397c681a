//! Least-squares linear ranker on standardized features with a small ridge term.

use super::{check_columns, check_finite, check_shape, RankingModel};
use crate::error::{Result, ScoreError};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

const RIDGE: f64 = 1e-6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRanker {
    means: Array1<f64>,
    scales: Array1<f64>,
    weights: Array1<f64>,
    intercept: f64,
}

impl LinearRanker {
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    fn standardize(&self, x: &ArrayView2<f64>) -> Array2<f64> {
        (x - &self.means) / &self.scales
    }
}

impl RankingModel for LinearRanker {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        check_shape(&x, y.len())?;
        check_finite(&x)?;
        let d = x.ncols();
        if x.nrows() == 0 {
            self.means = Array1::zeros(d);
            self.scales = Array1::ones(d);
            self.weights = Array1::zeros(d);
            self.intercept = 0.0;
            return Ok(());
        }

        self.means = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(d));
        // Constant columns keep unit scale and end up with zero weight
        self.scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });
        self.intercept = y.mean().unwrap_or(0.0);

        let z = self.standardize(&x);
        let centered = y.mapv(|v| v - self.intercept);
        let mut gram = z.t().dot(&z);
        for i in 0..d {
            gram[[i, i]] += RIDGE;
        }
        let rhs = z.t().dot(&centered);
        self.weights = solve(gram, rhs)?;
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_columns(&x, self.weights.len())?;
        Ok(self.standardize(&x).dot(&self.weights) + self.intercept)
    }
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot, col]].abs() < f64::EPSILON {
            return Err(ScoreError::Model("singular normal equations".to_string()));
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }
        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut out = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * out[k]).sum();
        out[row] = (b[row] - tail) / a[[row, row]];
    }
    Ok(out)
}
