//! Preferred seasonal/trend forecaster
//!
//! Additive Holt-Winters exponential smoothing with a yearly (12 month)
//! season once two full years of history exist; Holt's linear trend method
//! below that. Forecast months continue the input month sequence.

use chrono::{Months, NaiveDate};

use crate::error::ModelError;
use crate::models::{ForecastMetrics, ForecastModel, ForecastPoint, ForecastResult, MonthlyPoint};
use crate::stats::{error_metrics, mean, round_to};

use super::SeriesModel;

/// Smoothing and interval parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalParams {
    /// Level smoothing
    pub alpha: f64,
    /// Trend smoothing (low keeps the trend from chasing noise)
    pub beta: f64,
    /// Seasonal smoothing
    pub gamma: f64,
    /// Months per season
    pub season_length: usize,
    /// Interval half width in residual standard deviations (1.28 ~ 80%)
    pub interval_z: f64,
}

impl Default for SeasonalParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.1,
            gamma: 0.3,
            season_length: 12,
            interval_z: 1.28,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeasonalTrendModel {
    params: SeasonalParams,
}

/// Smoothed state after a pass over the history
struct Fit {
    fitted: Vec<f64>,
    level: f64,
    trend: f64,
    seasonals: Option<Vec<f64>>,
}

impl Fit {
    /// Point forecast `step` months past the last observation (1-based)
    fn project(&self, n: usize, step: usize) -> f64 {
        let base = self.level + self.trend * step as f64;
        match &self.seasonals {
            Some(s) => base + s[(n + step - 1) % s.len()],
            None => base,
        }
    }
}

impl SeasonalTrendModel {
    pub fn new(params: SeasonalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SeasonalParams {
        &self.params
    }

    fn fit(&self, values: &[f64]) -> Fit {
        let m = self.params.season_length;
        if m >= 2 && values.len() >= 2 * m {
            self.fit_seasonal(values, m)
        } else {
            self.fit_trend(values)
        }
    }

    fn fit_trend(&self, values: &[f64]) -> Fit {
        let SeasonalParams { alpha, beta, .. } = self.params;

        let mut level = values[0];
        let mut trend = values.get(1).map(|v| v - values[0]).unwrap_or(0.0);
        let mut fitted = vec![values[0]];

        for &y in &values[1..] {
            fitted.push(level + trend);
            let new_level = alpha * y + (1.0 - alpha) * (level + trend);
            trend = beta * (new_level - level) + (1.0 - beta) * trend;
            level = new_level;
        }

        Fit {
            fitted,
            level,
            trend,
            seasonals: None,
        }
    }

    fn fit_seasonal(&self, values: &[f64], m: usize) -> Fit {
        let SeasonalParams {
            alpha, beta, gamma, ..
        } = self.params;

        let first = mean(&values[..m]);
        let second = mean(&values[m..2 * m]);

        let mut level = first;
        let mut trend = (second - first) / m as f64;
        let mut seasonals: Vec<f64> = values[..m].iter().map(|v| v - first).collect();
        let mut fitted: Vec<f64> = values[..m].to_vec();

        for (t, &y) in values.iter().enumerate().skip(m) {
            let s = seasonals[t % m];
            fitted.push(level + trend + s);
            let new_level = alpha * (y - s) + (1.0 - alpha) * (level + trend);
            trend = beta * (new_level - level) + (1.0 - beta) * trend;
            seasonals[t % m] = gamma * (y - new_level) + (1.0 - gamma) * s;
            level = new_level;
        }

        Fit {
            fitted,
            level,
            trend,
            seasonals: Some(seasonals),
        }
    }
}

fn parse_month(label: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(&format!("{}-01", label.trim()), "%Y-%m-%d")
        .map_err(|e| ModelError::Runtime(format!("invalid month label '{}': {}", label, e)))
}

impl SeriesModel for SeasonalTrendModel {
    fn name(&self) -> &'static str {
        "seasonal_trend"
    }

    fn forecast(
        &self,
        history: &[MonthlyPoint],
        horizon: usize,
    ) -> Result<ForecastResult, ModelError> {
        if history.len() < 2 {
            return Err(ModelError::Runtime(format!(
                "need at least 2 points to fit, got {}",
                history.len()
            )));
        }

        let values: Vec<f64> = history.iter().map(|p| p.total).collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Runtime("non-finite monthly total".into()));
        }

        let last_month = history
            .last()
            .map(|p| parse_month(&p.month))
            .transpose()?
            .ok_or_else(|| ModelError::Runtime("empty history".into()))?;

        let fit = self.fit(&values);
        let metrics = error_metrics(&values, &fit.fitted);
        let sigma = metrics.rmse;
        let n = values.len();

        let mut points = Vec::with_capacity(horizon);
        for step in 1..=horizon {
            let raw = fit.project(n, step);
            if !raw.is_finite() {
                return Err(ModelError::Runtime(format!(
                    "non-finite prediction at step {}",
                    step
                )));
            }

            let month = u32::try_from(step)
                .ok()
                .and_then(|s| last_month.checked_add_months(Months::new(s)))
                .ok_or_else(|| ModelError::Runtime("forecast month out of range".into()))?;

            let half_width = self.params.interval_z * sigma * (step as f64).sqrt();
            let predicted = raw.max(0.0);
            let lower = (raw - half_width).max(0.0).min(predicted);
            let upper = (raw + half_width).max(predicted);
            let confidence = (1.0 - (upper - lower) / predicted.max(1.0)).clamp(0.0, 1.0);

            points.push(ForecastPoint {
                month: month.format("%Y-%m").to_string(),
                predicted: round_to(predicted, 2),
                lower: round_to(lower, 2),
                upper: round_to(upper, 2),
                confidence: round_to(confidence, 2),
            });
        }

        Ok(ForecastResult {
            points,
            model: ForecastModel::SeasonalTrend,
            data_points: n,
            metrics: ForecastMetrics {
                mae: round_to(metrics.mae, 2),
                mape: round_to(metrics.mape, 1),
                rmse: round_to(metrics.rmse, 2),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(start_year: i32, values: &[f64]) -> Vec<MonthlyPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let year = start_year + (i / 12) as i32;
                let month = i % 12 + 1;
                MonthlyPoint::new(format!("{}-{:02}", year, month), *v)
            })
            .collect()
    }

    #[test]
    fn test_linear_series_is_tracked() {
        let history = monthly(2024, &[100.0, 200.0, 300.0, 400.0, 500.0]);
        let result = SeasonalTrendModel::default().forecast(&history, 2).unwrap();

        assert_eq!(result.model, ForecastModel::SeasonalTrend);
        // Perfectly linear input: no residuals, exact extrapolation
        assert_eq!(result.points[0].predicted, 600.0);
        assert_eq!(result.points[1].predicted, 700.0);
        assert_eq!(result.points[0].lower, 600.0);
        assert_eq!(result.points[0].upper, 600.0);
        assert_eq!(result.points[0].confidence, 1.0);
        assert_eq!(result.metrics.mae, 0.0);
    }

    #[test]
    fn test_months_continue_input_sequence() {
        let history = vec![
            MonthlyPoint::new("2024-11", 1000.0),
            MonthlyPoint::new("2024-12", 1100.0),
            MonthlyPoint::new("2025-01", 1050.0),
        ];
        let result = SeasonalTrendModel::default().forecast(&history, 3).unwrap();
        let months: Vec<&str> = result.points.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2025-02", "2025-03", "2025-04"]);
    }

    #[test]
    fn test_seasonal_pattern_repeats() {
        // Two identical years with a December spike
        let year = [
            100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 400.0,
        ];
        let values: Vec<f64> = year.iter().chain(year.iter()).copied().collect();
        let history = monthly(2023, &values);

        let result = SeasonalTrendModel::default().forecast(&history, 12).unwrap();
        assert_eq!(result.points[11].month, "2025-12");
        assert!(result.points[11].predicted > result.points[0].predicted * 2.0);
    }

    #[test]
    fn test_intervals_widen_with_horizon() {
        let history = monthly(2024, &[1000.0, 1400.0, 900.0, 1300.0, 1100.0, 1500.0]);
        let result = SeasonalTrendModel::default().forecast(&history, 3).unwrap();

        let widths: Vec<f64> = result.points.iter().map(|p| p.upper - p.lower).collect();
        assert!(widths[0] > 0.0);
        assert!(widths[2] >= widths[0]);
        for p in &result.points {
            assert!(p.lower <= p.predicted && p.predicted <= p.upper);
            assert!((0.0..=1.0).contains(&p.confidence));
        }
    }

    #[test]
    fn test_declining_series_floored() {
        let history = monthly(2024, &[900.0, 600.0, 300.0]);
        let result = SeasonalTrendModel::default().forecast(&history, 5).unwrap();
        for p in &result.points {
            assert!(p.predicted >= 0.0);
            assert!(p.lower >= 0.0);
        }
    }

    #[test]
    fn test_bad_month_label_is_runtime_failure() {
        let history = vec![
            MonthlyPoint::new("Jan", 1.0),
            MonthlyPoint::new("Feb", 2.0),
            MonthlyPoint::new("Mar", 3.0),
        ];
        let err = SeasonalTrendModel::default().forecast(&history, 1).unwrap_err();
        assert!(matches!(err, ModelError::Runtime(_)));
    }

    #[test]
    fn test_non_finite_is_runtime_failure() {
        let history = monthly(2024, &[1.0, f64::NAN, 3.0]);
        assert!(SeasonalTrendModel::default().forecast(&history, 1).is_err());
    }
}
