//! Random forest of CART regression trees. Each tree sees a bootstrap sample
//! and considers every feature at each split; prediction is the mean over trees.

use super::{check_columns, check_finite, check_shape, RankingModel};
use crate::error::Result;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegressionTree {
    nodes: Vec<Node>,
}

struct TreeParams {
    max_depth: Option<usize>,
    min_samples_split: usize,
}

impl RegressionTree {
    fn fit(x: &ArrayView2<f64>, y: &ArrayView1<f64>, samples: Vec<usize>, params: &TreeParams) -> Self {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut stack = vec![(0usize, samples, 0usize)];

        while let Some((id, samples, depth)) = stack.pop() {
            let mean = samples.iter().map(|&i| y[i]).sum::<f64>() / samples.len() as f64;
            let splittable = samples.len() >= params.min_samples_split
                && params.max_depth.map_or(true, |d| depth < d)
                && samples.iter().any(|&i| y[i] != y[samples[0]]);

            let split = if splittable { best_split(x, y, &samples) } else { None };
            let Some((feature, threshold)) = split else {
                nodes[id] = Node::Leaf { value: mean };
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) =
                samples.iter().copied().partition(|&i| x[[i, feature]] <= threshold);
            if left_samples.is_empty() || right_samples.is_empty() {
                nodes[id] = Node::Leaf { value: mean };
                continue;
            }
            let left = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            let right = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            nodes[id] = Node::Split {
                feature,
                threshold,
                left,
                right,
            };
            stack.push((right, right_samples, depth + 1));
            stack.push((left, left_samples, depth + 1));
        }
        Self { nodes }
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

/// Best `(feature, threshold)` by squared-error reduction; `None` when every feature is constant.
fn best_split(x: &ArrayView2<f64>, y: &ArrayView1<f64>, samples: &[usize]) -> Option<(usize, f64)> {
    let n = samples.len() as f64;
    let total: f64 = samples.iter().map(|&i| y[i]).sum();
    // Maximizing sum_l²/n_l + sum_r²/n_r minimizes the children's squared error
    let parent = total * total / n;
    let mut best: Option<(usize, f64, f64)> = None;
    let mut order = samples.to_vec();

    for feature in 0..x.ncols() {
        order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
        let mut left_sum = 0.0;
        for k in 0..order.len() - 1 {
            left_sum += y[order[k]];
            let lo = x[[order[k], feature]];
            let hi = x[[order[k + 1], feature]];
            if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
                continue;
            }
            let n_left = (k + 1) as f64;
            let right_sum = total - left_sum;
            let gain = left_sum * left_sum / n_left + right_sum * right_sum / (n - n_left);
            if gain > parent && best.map_or(true, |(_, _, g)| gain > g) {
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi || !threshold.is_finite() {
                    threshold = lo;
                }
                best = Some((feature, threshold, gain));
            }
        }
    }
    best.map(|(f, t, _)| (f, t))
}

/// Seeded random-forest ranker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedEnsembleRanker {
    n_estimators: usize,
    seed: u64,
    max_depth: Option<usize>,
    min_samples_split: usize,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl TrainedEnsembleRanker {
    pub fn new(n_estimators: usize, seed: u64, max_depth: Option<usize>, min_samples_split: usize) -> Self {
        Self {
            n_estimators: n_estimators.max(1),
            seed,
            max_depth,
            min_samples_split: min_samples_split.max(2),
            n_features: 0,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl RankingModel for TrainedEnsembleRanker {
    fn name(&self) -> &'static str {
        "ensemble"
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        check_shape(&x, y.len())?;
        check_finite(&x)?;
        self.n_features = x.ncols();
        self.trees.clear();
        let n = x.nrows();
        if n == 0 {
            return Ok(());
        }

        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
        };
        let mut rng = StdRng::seed_from_u64(self.seed);
        for _ in 0..self.n_estimators {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            self.trees.push(RegressionTree::fit(&x, &y, bootstrap, &params));
        }
        tracing::debug!(trees = self.trees.len(), rows = n, "ensemble fitted");
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_columns(&x, self.n_features)?;
        if self.trees.is_empty() {
            return Ok(Array1::zeros(x.nrows()));
        }
        let k = self.trees.len() as f64;
        Ok(x.rows()
            .into_iter()
            .map(|row| self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / k)
            .collect())
    }
}
