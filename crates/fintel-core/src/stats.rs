//! Small descriptive statistics shared by the forecast and budget pipelines

/// Arithmetic mean (0 for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Least-squares slope of `values` against their index (0, 1, 2, ...)
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Weighted mean; falls back to the plain mean when weights sum to zero
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0.0 {
        return mean(values);
    }
    values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .sum::<f64>()
        / total_weight
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Accuracy of fitted values against actuals
#[derive(Debug, Clone, Copy)]
pub struct ErrorMetrics {
    pub mae: f64,
    /// Percentage (0-100+), zero actuals are treated as 1
    pub mape: f64,
    pub rmse: f64,
}

pub fn error_metrics(actual: &[f64], fitted: &[f64]) -> ErrorMetrics {
    let n = actual.len().min(fitted.len());
    if n == 0 {
        return ErrorMetrics {
            mae: 0.0,
            mape: 0.0,
            rmse: 0.0,
        };
    }

    let mut abs_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut sq_sum = 0.0;
    for (a, f) in actual.iter().zip(fitted).take(n) {
        let err = a - f;
        let denom = if *a == 0.0 { 1.0 } else { *a };
        abs_sum += err.abs();
        pct_sum += (err / denom).abs();
        sq_sum += err * err;
    }

    ErrorMetrics {
        mae: abs_sum / n as f64,
        mape: pct_sum / n as f64 * 100.0,
        rmse: (sq_sum / n as f64).sqrt(),
    }
}
