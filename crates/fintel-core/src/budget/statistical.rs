//! Closed-form budget estimators used when the preferred regressor is absent,
//! fails, or the history is too short for it

use crate::models::{BudgetMethod, BudgetRecommendation, Trend};
use crate::stats::{linspace, mean, round_to, std_dev, weighted_mean};

use super::BUDGET_BUFFER;

const AVERAGE_CONFIDENCE: f64 = 0.4;
const STATISTICAL_MIN_CONFIDENCE: f64 = 0.4;
const DISPERSION_WEIGHT: f64 = 0.5;
const RECENCY_WEIGHT_RANGE: (f64, f64) = (0.5, 1.5);

/// Fewer than two months: average plus buffer
pub fn average_fallback(category: &str, totals: &[f64]) -> BudgetRecommendation {
    let average = if totals.is_empty() {
        0.0
    } else {
        mean(totals)
    };

    BudgetRecommendation {
        category: category.to_string(),
        recommended_budget: round_to((average * BUDGET_BUFFER).max(0.0), 2),
        predicted_spending: (!totals.is_empty()).then(|| round_to(average, 2)),
        confidence: AVERAGE_CONFIDENCE,
        method: BudgetMethod::AverageFallback,
        trend: Trend::InsufficientData,
        history_months: totals.len(),
    }
}

/// Recency-weighted mean plus half a standard deviation of headroom
pub fn weighted_estimate(category: &str, totals: &[f64]) -> BudgetRecommendation {
    let (lo, hi) = RECENCY_WEIGHT_RANGE;
    let weights = linspace(lo, hi, totals.len());
    let predicted = weighted_mean(totals, &weights);

    let avg = mean(totals);
    let std = std_dev(totals);
    let recommended = (predicted * BUDGET_BUFFER + DISPERSION_WEIGHT * std).max(0.0);
    let confidence = (1.0 - std / avg.max(1.0)).max(STATISTICAL_MIN_CONFIDENCE);
    let latest = totals.last().copied().unwrap_or(avg);

    BudgetRecommendation {
        category: category.to_string(),
        recommended_budget: round_to(recommended, 2),
        predicted_spending: Some(round_to(predicted, 2)),
        confidence: round_to(confidence, 2),
        method: BudgetMethod::Statistical,
        trend: Trend::classify(latest, avg),
        history_months: totals.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_month() {
        let rec = average_fallback("Rent", &[5000.0]);
        assert_eq!(rec.recommended_budget, 5500.0);
        assert_eq!(rec.predicted_spending, Some(5000.0));
        assert_eq!(rec.confidence, 0.4);
        assert_eq!(rec.method, BudgetMethod::AverageFallback);
        assert_eq!(rec.trend, Trend::InsufficientData);
        assert_eq!(rec.history_months, 1);
    }

    #[test]
    fn test_empty_history() {
        let rec = average_fallback("Misc", &[]);
        assert_eq!(rec.recommended_budget, 0.0);
        assert_eq!(rec.predicted_spending, None);
        assert_eq!(rec.history_months, 0);
    }

    #[test]
    fn test_two_months() {
        // mean 150, std 50, weights [0.5, 1.5] -> weighted mean 175
        let rec = weighted_estimate("Transport", &[100.0, 200.0]);
        assert_eq!(rec.predicted_spending, Some(175.0));
        assert_eq!(rec.recommended_budget, 217.5);
        assert_eq!(rec.confidence, 0.67);
        assert_eq!(rec.trend, Trend::Increasing);
        assert_eq!(rec.method, BudgetMethod::Statistical);
    }

    #[test]
    fn test_flat_history_is_stable() {
        let rec = weighted_estimate("Utilities", &[1200.0, 1200.0, 1200.0]);
        assert_eq!(rec.recommended_budget, 1320.0);
        assert_eq!(rec.confidence, 1.0);
        assert_eq!(rec.trend, Trend::Stable);
    }

    #[test]
    fn test_falling_history() {
        let rec = weighted_estimate("Shopping", &[3000.0, 2500.0, 1000.0]);
        assert_eq!(rec.trend, Trend::Decreasing);
        assert!(rec.confidence >= 0.4);
    }

    #[test]
    fn test_negative_totals_floor_at_zero() {
        let rec = weighted_estimate("Refunds", &[-500.0, -400.0, -450.0]);
        assert_eq!(rec.recommended_budget, 0.0);
    }
}
