//! Spending forecast pipeline
//!
//! Two interchangeable strategies with the same output contract:
//! - a preferred `SeriesModel` (seasonal/trend smoothing by default), injected
//!   as an optional capability
//! - the `StatisticalForecaster` fallback, which cannot fail
//!
//! ```text
//! Start -> TryPreferred -> Done
//!               |  (unavailable / ModelError)
//!               v
//!          TryFallback -> Done
//! ```

pub mod seasonal;
pub mod statistical;

pub use seasonal::{SeasonalParams, SeasonalTrendModel};
pub use statistical::StatisticalForecaster;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{Error, ModelError, Result};
use crate::models::{ForecastResult, MonthlyPoint};

/// Minimum history length accepted by the pipeline
pub const MIN_POINTS: usize = 3;

/// Months forecast when the caller does not say
pub const DEFAULT_HORIZON: usize = 3;

/// A preferred time-series model
pub trait SeriesModel: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Forecast `horizon` months after `history`
    fn forecast(
        &self,
        history: &[MonthlyPoint],
        horizon: usize,
    ) -> std::result::Result<ForecastResult, ModelError>;
}

/// Forecast pipeline with a preferred model and a statistical fallback
#[derive(Clone)]
pub struct ForecastPipeline {
    preferred: Option<Arc<dyn SeriesModel>>,
    fallback: StatisticalForecaster,
}

impl Default for ForecastPipeline {
    fn default() -> Self {
        Self::new(Some(Arc::new(SeasonalTrendModel::default())))
    }
}

impl ForecastPipeline {
    /// `None` means the preferred capability is unavailable
    pub fn new(preferred: Option<Arc<dyn SeriesModel>>) -> Self {
        Self {
            preferred,
            fallback: StatisticalForecaster::new(),
        }
    }

    /// Pipeline that always uses the statistical fallback
    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    /// Pin the date the fallback counts forecast months from
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.fallback = StatisticalForecaster::with_reference_date(date);
        self
    }

    /// Whether a preferred model is configured
    pub fn has_preferred(&self) -> bool {
        self.preferred.is_some()
    }

    /// Forecast `horizon` months from a chronological monthly series
    ///
    /// The horizon must be at least 1 and its last month must be a
    /// representable date; both are checked before any model runs.
    pub fn forecast(&self, history: &[MonthlyPoint], horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 || self.fallback.step_date(horizon).is_none() {
            return Err(Error::InvalidHorizon(horizon));
        }
        if history.len() < MIN_POINTS {
            return Err(Error::InsufficientData {
                required: MIN_POINTS,
                actual: history.len(),
            });
        }

        match &self.preferred {
            Some(model) => match run_preferred(model.as_ref(), history, horizon) {
                Ok(result) => {
                    tracing::debug!(
                        model = model.name(),
                        points = history.len(),
                        horizon,
                        "Forecast from preferred model"
                    );
                    return Ok(result);
                }
                Err(ModelError::Unavailable(reason)) => {
                    tracing::debug!(
                        model = model.name(),
                        reason = %reason,
                        "Preferred forecaster unavailable, using statistical fallback"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        model = model.name(),
                        error = %e,
                        "Preferred forecaster failed, using statistical fallback"
                    );
                }
            },
            None => {
                tracing::debug!("No preferred forecaster, using statistical fallback");
            }
        }

        self.fallback.forecast(history, horizon)
    }
}

/// Run the preferred model and hold its output to the pipeline contract
fn run_preferred(
    model: &dyn SeriesModel,
    history: &[MonthlyPoint],
    horizon: usize,
) -> std::result::Result<ForecastResult, ModelError> {
    let result = model.forecast(history, horizon)?;

    if result.points.len() != horizon {
        return Err(ModelError::Runtime(format!(
            "expected {} points, model returned {}",
            horizon,
            result.points.len()
        )));
    }
    if let Some(p) = result
        .points
        .iter()
        .find(|p| !(p.predicted >= 0.0 && p.lower <= p.predicted && p.predicted <= p.upper))
    {
        return Err(ModelError::Runtime(format!(
            "interval invariant violated for {}",
            p.month
        )));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ForecastModel;
    use crate::test_utils::{sample_series, FailingSeriesModel, MisshapenSeriesModel};

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    #[test]
    fn test_insufficient_data_checked_first() {
        let pipeline = ForecastPipeline::new(Some(Arc::new(FailingSeriesModel::runtime())));
        let err = pipeline.forecast(&sample_series()[..2], 3).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientData {
                required: 3,
                actual: 2
            }
        ));
        assert!(err.is_validation());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = ForecastPipeline::default()
            .forecast(&sample_series(), 0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHorizon(0)));
    }

    #[test]
    fn test_horizon_beyond_calendar_rejected() {
        let pipelines = [
            ForecastPipeline::default(),
            ForecastPipeline::fallback_only(),
            ForecastPipeline::new(Some(Arc::new(FailingSeriesModel::runtime()))),
        ];

        for pipeline in pipelines {
            let pipeline = pipeline.with_reference_date(reference());
            for horizon in [3_300_000, usize::MAX] {
                let err = pipeline.forecast(&sample_series(), horizon).unwrap_err();
                assert!(matches!(err, Error::InvalidHorizon(h) if h == horizon));
                assert!(err.is_validation());
            }
        }
    }

    #[test]
    fn test_preferred_used_when_available() {
        let result = ForecastPipeline::default()
            .forecast(&sample_series(), 3)
            .unwrap();
        assert_eq!(result.model, ForecastModel::SeasonalTrend);
        assert_eq!(result.points.len(), 3);
    }

    #[test]
    fn test_runtime_failure_falls_back() {
        let pipeline = ForecastPipeline::new(Some(Arc::new(FailingSeriesModel::runtime())))
            .with_reference_date(reference());
        let result = pipeline.forecast(&sample_series(), 2).unwrap();
        assert_eq!(result.model, ForecastModel::StatisticalFallback);
        assert_eq!(result.points.len(), 2);
    }

    #[test]
    fn test_unavailable_falls_back() {
        let pipeline = ForecastPipeline::new(Some(Arc::new(FailingSeriesModel::unavailable())));
        let result = pipeline.forecast(&sample_series(), 2).unwrap();
        assert!(result.model.is_fallback());
    }

    #[test]
    fn test_contract_violation_falls_back() {
        let pipeline = ForecastPipeline::new(Some(Arc::new(MisshapenSeriesModel)));
        let result = pipeline.forecast(&sample_series(), 4).unwrap();
        assert!(result.model.is_fallback());
        assert_eq!(result.points.len(), 4);
    }

    #[test]
    fn test_fallback_only_example() {
        let history = vec![
            MonthlyPoint::new("2025-01", 1000.0),
            MonthlyPoint::new("2025-02", 1200.0),
            MonthlyPoint::new("2025-03", 1100.0),
        ];
        let result = ForecastPipeline::fallback_only()
            .forecast(&history, 2)
            .unwrap();

        assert_eq!(result.points.len(), 2);
        assert_eq!(result.model.as_str(), "statistical_fallback");
        assert_eq!(result.metrics.mape, 15.0);
    }

    #[test]
    fn test_shape_identical_across_paths() {
        let series = sample_series();
        for horizon in 1..=6 {
            let preferred = ForecastPipeline::default().forecast(&series, horizon).unwrap();
            let fallback = ForecastPipeline::fallback_only()
                .forecast(&series, horizon)
                .unwrap();

            assert_eq!(preferred.points.len(), horizon);
            assert_eq!(fallback.points.len(), horizon);
            assert_eq!(preferred.data_points, fallback.data_points);
            assert_ne!(preferred.model, fallback.model);

            for p in preferred.points.iter().chain(&fallback.points) {
                assert!(p.predicted >= 0.0);
                assert!(p.lower <= p.predicted && p.predicted <= p.upper);
            }
        }
    }
}
