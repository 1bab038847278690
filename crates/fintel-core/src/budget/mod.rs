//! Budget recommendation pipeline
//!
//! Per category, by history length:
//! - fewer than 2 months: average plus buffer
//! - 3 or more months with a preferred regressor: regressor prediction plus buffer
//! - otherwise (or when the regressor fails): recency-weighted statistical estimate
//!
//! Categories are independent; one category's path never affects another's.

pub mod boosting;
pub mod statistical;

pub use boosting::{BoostingParams, GradientBoostingRegressor};

use std::sync::Arc;

use crate::error::{Error, ModelError, Result};
use crate::models::{BudgetMethod, BudgetRecommendation, CategoryHistory, Trend};
use crate::stats::{mean, round_to};

/// Headroom applied on top of predicted spending
pub const BUDGET_BUFFER: f64 = 1.10;

/// Months required before the preferred regressor is tried
pub const MIN_MONTHS_FOR_REGRESSION: usize = 3;

const RECENT_MONTHS: usize = 3;
const REGRESSION_MIN_CONFIDENCE: f64 = 0.5;

/// Prediction from a preferred regressor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionOutcome {
    /// Next month's spending
    pub predicted: f64,
    /// In-sample mean absolute percentage error, in percent
    pub training_mape: f64,
}

/// A preferred next-month spending model
pub trait BudgetRegressor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Predict the month after `totals` (chronological)
    fn predict_next(&self, totals: &[f64]) -> std::result::Result<RegressionOutcome, ModelError>;
}

#[derive(Clone)]
pub struct BudgetPipeline {
    preferred: Option<Arc<dyn BudgetRegressor>>,
}

impl Default for BudgetPipeline {
    fn default() -> Self {
        Self::new(Some(Arc::new(GradientBoostingRegressor::default())))
    }
}

impl BudgetPipeline {
    /// `None` means the preferred capability is unavailable
    pub fn new(preferred: Option<Arc<dyn BudgetRegressor>>) -> Self {
        Self { preferred }
    }

    /// Pipeline that never tries the preferred regressor
    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    pub fn has_preferred(&self) -> bool {
        self.preferred.is_some()
    }

    /// One recommendation per input category, in input order
    pub fn recommend(&self, histories: &[CategoryHistory]) -> Result<Vec<BudgetRecommendation>> {
        if histories.is_empty() {
            return Err(Error::MissingHistory);
        }

        let recommendations: Vec<_> = histories.iter().map(|h| self.recommend_one(h)).collect();

        tracing::debug!(
            categories = recommendations.len(),
            preferred = self.has_preferred(),
            "Budget recommendations computed"
        );

        Ok(recommendations)
    }

    /// Recommendation for a single category
    pub fn recommend_one(&self, history: &CategoryHistory) -> BudgetRecommendation {
        let category = history.category.as_str();
        let totals = history.monthly_totals.as_slice();

        if totals.len() < 2 {
            return statistical::average_fallback(category, totals);
        }

        if totals.len() >= MIN_MONTHS_FOR_REGRESSION {
            if let Some(model) = &self.preferred {
                match model.predict_next(totals) {
                    Ok(outcome) if outcome.predicted.is_finite() => {
                        return regression_recommendation(category, totals, outcome);
                    }
                    Ok(_) => {
                        tracing::warn!(
                            model = model.name(),
                            category,
                            "Preferred regressor returned a non-finite prediction, using statistical estimate"
                        );
                    }
                    Err(ModelError::Unavailable(reason)) => {
                        tracing::debug!(
                            model = model.name(),
                            category,
                            reason = %reason,
                            "Preferred regressor unavailable, using statistical estimate"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            model = model.name(),
                            category,
                            error = %e,
                            "Preferred regressor failed, using statistical estimate"
                        );
                    }
                }
            }
        }

        statistical::weighted_estimate(category, totals)
    }
}

fn regression_recommendation(
    category: &str,
    totals: &[f64],
    outcome: RegressionOutcome,
) -> BudgetRecommendation {
    let split = totals.len().saturating_sub(RECENT_MONTHS);
    let recent = mean(&totals[split..]);
    let earlier = if split > 0 {
        mean(&totals[..split])
    } else {
        recent
    };
    let confidence = (1.0 - outcome.training_mape / 100.0).max(REGRESSION_MIN_CONFIDENCE);

    BudgetRecommendation {
        category: category.to_string(),
        recommended_budget: round_to((outcome.predicted * BUDGET_BUFFER).max(0.0), 2),
        predicted_spending: Some(round_to(outcome.predicted, 2)),
        confidence: round_to(confidence.min(1.0), 2),
        method: BudgetMethod::GradientBoosting,
        trend: Trend::classify(recent, earlier),
        history_months: totals.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_histories, FailingRegressor, FixedRegressor};

    #[test]
    fn test_empty_input_rejected() {
        let err = BudgetPipeline::default().recommend(&[]).unwrap_err();
        assert!(matches!(err, Error::MissingHistory));
        assert!(err.is_validation());
    }

    #[test]
    fn test_single_month_example() {
        let recs = BudgetPipeline::default()
            .recommend(&[CategoryHistory::new("Rent", vec![5000.0])])
            .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].recommended_budget, 5500.0);
        assert_eq!(recs[0].confidence, 0.4);
        assert_eq!(recs[0].trend, Trend::InsufficientData);
        assert_eq!(recs[0].method, BudgetMethod::AverageFallback);
    }

    #[test]
    fn test_one_recommendation_per_category_in_order() {
        let histories = sample_histories();
        let recs = BudgetPipeline::default().recommend(&histories).unwrap();

        let names: Vec<&str> = recs.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Transport", "Rent"]);
        assert_eq!(recs[0].method, BudgetMethod::GradientBoosting);
        assert_eq!(recs[1].method, BudgetMethod::Statistical);
        assert_eq!(recs[2].method, BudgetMethod::AverageFallback);
        for r in &recs {
            assert!(r.recommended_budget >= 0.0);
        }
    }

    #[test]
    fn test_two_months_never_use_regressor() {
        let pipeline = BudgetPipeline::new(Some(Arc::new(FixedRegressor {
            predicted: 1.0,
            training_mape: 0.0,
        })));
        let rec = pipeline.recommend_one(&CategoryHistory::new("Transport", vec![100.0, 200.0]));
        assert_eq!(rec.method, BudgetMethod::Statistical);
        assert_eq!(rec.recommended_budget, 217.5);
    }

    #[test]
    fn test_regressor_failure_falls_back() {
        let history = CategoryHistory::new("Groceries", vec![3000.0, 3200.0, 3100.0, 3500.0]);
        for model in [FailingRegressor::runtime(), FailingRegressor::unavailable()] {
            let rec = BudgetPipeline::new(Some(Arc::new(model))).recommend_one(&history);
            assert_eq!(rec.method, BudgetMethod::Statistical);
        }
    }

    #[test]
    fn test_fallback_only_uses_statistical() {
        let history = CategoryHistory::new("Groceries", vec![3000.0, 3200.0, 3100.0, 3500.0]);
        let rec = BudgetPipeline::fallback_only().recommend_one(&history);
        assert_eq!(rec.method, BudgetMethod::Statistical);
    }

    #[test]
    fn test_regression_path_values() {
        let pipeline = BudgetPipeline::new(Some(Arc::new(FixedRegressor {
            predicted: 1000.0,
            training_mape: 20.0,
        })));
        // recent mean 400 vs earlier mean 100
        let rec = pipeline.recommend_one(&CategoryHistory::new(
            "Food",
            vec![100.0, 100.0, 400.0, 400.0, 400.0],
        ));

        assert_eq!(rec.method, BudgetMethod::GradientBoosting);
        assert_eq!(rec.recommended_budget, 1100.0);
        assert_eq!(rec.predicted_spending, Some(1000.0));
        assert_eq!(rec.confidence, 0.8);
        assert_eq!(rec.trend, Trend::Increasing);
    }

    #[test]
    fn test_regression_confidence_floor_and_negative_prediction() {
        let pipeline = BudgetPipeline::new(Some(Arc::new(FixedRegressor {
            predicted: -50.0,
            training_mape: 90.0,
        })));
        let rec = pipeline.recommend_one(&CategoryHistory::new("Misc", vec![10.0, 10.0, 10.0]));
        assert_eq!(rec.recommended_budget, 0.0);
        assert_eq!(rec.confidence, 0.5);
        // Three months: recent window is the whole history
        assert_eq!(rec.trend, Trend::Stable);
    }
}
