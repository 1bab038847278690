//! Statistical fallback forecaster
//!
//! Linear trend over the series index plus the series' own dispersion. Pure
//! arithmetic, so it cannot fail for a non-empty series whose horizon stays
//! within the calendar.

use chrono::{Duration, Local, NaiveDate};

use crate::error::{Error, Result};
use crate::models::{ForecastMetrics, ForecastModel, ForecastPoint, ForecastResult, MonthlyPoint};
use crate::stats::{linear_slope, mean, round_to, std_dev};

const INTERVAL_STD_MULTIPLIER: f64 = 1.5;
const MIN_CONFIDENCE: f64 = 0.5;
/// Accuracy is not measured for this path; this is a fixed estimate
const ASSUMED_MAPE: f64 = 15.0;
const RMSE_STD_FACTOR: f64 = 1.2;
const DAYS_PER_STEP: i64 = 30;

#[derive(Debug, Clone, Default)]
pub struct StatisticalForecaster {
    /// Date that forecast month labels are counted from (defaults to today)
    reference_date: Option<NaiveDate>,
}

impl StatisticalForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the date month labels are derived from
    pub fn with_reference_date(date: NaiveDate) -> Self {
        Self {
            reference_date: Some(date),
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Date labelling forecast step `step`, or `None` past the calendar's range
    pub fn step_date(&self, step: usize) -> Option<NaiveDate> {
        step_from(self.reference_date(), step)
    }

    /// Forecast `horizon` months past the end of `history`
    pub fn forecast(&self, history: &[MonthlyPoint], horizon: usize) -> Result<ForecastResult> {
        let today = self.reference_date();
        let last = step_from(today, horizon).ok_or(Error::InvalidHorizon(horizon))?;

        let values: Vec<f64> = history.iter().map(|p| p.total).collect();
        let n = values.len();

        let slope = linear_slope(&values);
        let mean_val = mean(&values);
        let std = if n > 1 {
            std_dev(&values)
        } else {
            mean_val * 0.15
        };
        let confidence = round_to((1.0 - std / mean_val.max(1.0)).max(MIN_CONFIDENCE), 2);

        let points = (1..=horizon)
            .map(|i| {
                let predicted = (mean_val + slope * (n + i - 1) as f64).max(0.0);
                // Every step up to the horizon is representable once `last` is
                let month = step_from(today, i).unwrap_or(last);
                ForecastPoint {
                    month: month.format("%Y-%m").to_string(),
                    predicted: round_to(predicted, 2),
                    lower: round_to((predicted - INTERVAL_STD_MULTIPLIER * std).max(0.0), 2),
                    upper: round_to(predicted + INTERVAL_STD_MULTIPLIER * std, 2),
                    confidence,
                }
            })
            .collect();

        let series_std = std_dev(&values);

        Ok(ForecastResult {
            points,
            model: ForecastModel::StatisticalFallback,
            data_points: n,
            metrics: ForecastMetrics {
                mae: round_to(series_std, 2),
                mape: ASSUMED_MAPE,
                rmse: round_to(series_std * RMSE_STD_FACTOR, 2),
            },
        })
    }
}

fn step_from(date: NaiveDate, step: usize) -> Option<NaiveDate> {
    let days = i64::try_from(step).ok()?.checked_mul(DAYS_PER_STEP)?;
    date.checked_add_signed(Duration::try_days(days)?)
}
