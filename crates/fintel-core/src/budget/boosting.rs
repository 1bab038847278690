//! Gradient-boosted regression trees for next-month spending
//!
//! Least-squares boosting: start from the mean, then repeatedly fit a shallow
//! tree to the residuals and add it with shrinkage. Splits are found by
//! exhaustive search, so the fit is deterministic for a given input.

use crate::error::ModelError;
use crate::stats::error_metrics;

use super::{BudgetRegressor, RegressionOutcome};

const FEATURES: usize = 2;

type Row = [f64; FEATURES];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
    pub min_samples_leaf: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            max_depth: 3,
            learning_rate: 0.1,
            min_samples_leaf: 1,
        }
    }
}

/// Zero-mean, unit-variance feature scaling
#[derive(Debug, Clone)]
struct StandardScaler {
    means: Row,
    scales: Row,
}

impl StandardScaler {
    fn fit(rows: &[Row]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut means = [0.0; FEATURES];
        let mut scales = [1.0; FEATURES];

        for f in 0..FEATURES {
            means[f] = rows.iter().map(|r| r[f]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[f] - means[f]).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            // Constant features keep their centered value
            scales[f] = if std > 0.0 { std } else { 1.0 };
        }

        Self { means, scales }
    }

    fn transform(&self, row: Row) -> Row {
        let mut out = [0.0; FEATURES];
        for f in 0..FEATURES {
            out[f] = (row[f] - self.means[f]) / self.scales[f];
        }
        out
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &Row) -> f64 {
        match self {
            Node::Leaf(value) => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

struct SplitChoice {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

fn node_mean(y: &[f64], idx: &[usize]) -> f64 {
    idx.iter().map(|&i| y[i]).sum::<f64>() / idx.len() as f64
}

/// Best variance-reducing split of `idx`, if any improves on the parent
fn best_split(x: &[Row], y: &[f64], idx: &[usize], min_leaf: usize) -> Option<SplitChoice> {
    let k = idx.len();
    let total: f64 = idx.iter().map(|&i| y[i]).sum();
    // Maximizing sum_l^2/n_l + sum_r^2/n_r minimizes the children's squared error
    let parent_score = total * total / k as f64;
    let mut best: Option<(f64, usize, f64, Vec<usize>, usize)> = None;

    for feature in 0..FEATURES {
        let mut sorted = idx.to_vec();
        sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        for p in 1..k {
            left_sum += y[sorted[p - 1]];
            if p < min_leaf || k - p < min_leaf {
                continue;
            }
            let lo = x[sorted[p - 1]][feature];
            let hi = x[sorted[p]][feature];
            if lo == hi {
                continue;
            }

            let right_sum = total - left_sum;
            let score = left_sum * left_sum / p as f64 + right_sum * right_sum / (k - p) as f64;
            let improves = score > parent_score + 1e-9;
            let beats_best = best.as_ref().map_or(true, |(s, ..)| score > *s);
            if improves && beats_best {
                best = Some((score, feature, (lo + hi) / 2.0, sorted.clone(), p));
            }
        }
    }

    best.map(|(_, feature, threshold, sorted, p)| SplitChoice {
        feature,
        threshold,
        left: sorted[..p].to_vec(),
        right: sorted[p..].to_vec(),
    })
}

fn build_tree(x: &[Row], y: &[f64], idx: &[usize], depth: usize, params: &BoostingParams) -> Node {
    let value = node_mean(y, idx);
    if depth >= params.max_depth || idx.len() < 2 * params.min_samples_leaf.max(1) {
        return Node::Leaf(value);
    }

    match best_split(x, y, idx, params.min_samples_leaf.max(1)) {
        Some(split) => Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(build_tree(x, y, &split.left, depth + 1, params)),
            right: Box::new(build_tree(x, y, &split.right, depth + 1, params)),
        },
        None => Node::Leaf(value),
    }
}

/// A fitted boosted ensemble
#[derive(Debug, Clone)]
struct Ensemble {
    init: f64,
    learning_rate: f64,
    trees: Vec<Node>,
}

impl Ensemble {
    fn fit(x: &[Row], y: &[f64], params: &BoostingParams) -> Self {
        let init = y.iter().sum::<f64>() / y.len() as f64;
        let idx: Vec<usize> = (0..y.len()).collect();
        let mut current = vec![init; y.len()];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let residuals: Vec<f64> = y.iter().zip(&current).map(|(a, f)| a - f).collect();
            let tree = build_tree(x, &residuals, &idx, 0, params);
            for (i, row) in x.iter().enumerate() {
                current[i] += params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Self {
            init,
            learning_rate: params.learning_rate,
            trees,
        }
    }

    fn predict(&self, row: &Row) -> f64 {
        self.init
            + self
                .trees
                .iter()
                .map(|t| self.learning_rate * t.predict(row))
                .sum::<f64>()
    }
}

/// Preferred budget model: boosted trees over `(month_index, previous_total)`
#[derive(Debug, Clone, Default)]
pub struct GradientBoostingRegressor {
    params: BoostingParams,
}

impl GradientBoostingRegressor {
    pub fn new(params: BoostingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }
}

impl BudgetRegressor for GradientBoostingRegressor {
    fn name(&self) -> &'static str {
        "gradient_boosting"
    }

    fn predict_next(&self, totals: &[f64]) -> Result<RegressionOutcome, ModelError> {
        let n = totals.len();
        if n < 2 {
            return Err(ModelError::Runtime(format!(
                "need at least 2 months to fit, got {}",
                n
            )));
        }
        if totals.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Runtime("non-finite monthly total".into()));
        }
        if self.params.n_estimators == 0 || self.params.learning_rate <= 0.0 {
            return Err(ModelError::Runtime("invalid boosting parameters".into()));
        }

        // The first month's "previous" total is itself
        let rows: Vec<Row> = (0..n)
            .map(|i| [i as f64, totals[i.saturating_sub(1)]])
            .collect();

        let scaler = StandardScaler::fit(&rows);
        let scaled: Vec<Row> = rows.iter().map(|r| scaler.transform(*r)).collect();
        let ensemble = Ensemble::fit(&scaled, totals, &self.params);

        let next = scaler.transform([n as f64, totals[n - 1]]);
        let predicted = ensemble.predict(&next);
        if !predicted.is_finite() {
            return Err(ModelError::Runtime("non-finite prediction".into()));
        }

        let fitted: Vec<f64> = scaled.iter().map(|r| ensemble.predict(r)).collect();
        let training_mape = error_metrics(totals, &fitted).mape;

        Ok(RegressionOutcome {
            predicted,
            training_mape,
        })
    }
}
