//! Shared fixtures and scripted models for tests

use crate::budget::{BudgetRegressor, RegressionOutcome};
use crate::error::ModelError;
use crate::forecast::SeriesModel;
use crate::models::{
    CategoryHistory, ForecastMetrics, ForecastModel, ForecastPoint, ForecastResult, MonthlyPoint,
};

/// OCR-like text from a typical cafe receipt
pub const SAMPLE_RECEIPT: &str = "STARBUCKS\n12/03/2024\nLatte 250\nMuffin 150\nTotal: 400.00";

/// Transactions CSV spanning three months and two categories
pub const SAMPLE_TRANSACTIONS_CSV: &str = "\
date,description,amount,merchant,category
2024-01-05,Swiggy dinner,450.50,Swiggy,Food & Dining
2024-01-18,Uber to office,220.00,Uber,Transport
2024-02-03,Zomato lunch,380.00,Zomato,Food & Dining
2024-02-21,Metro card recharge,500.00,,Transport
2024-03-09,Pizza night,610.25,Dominos,Food & Dining
2024-03-28,Ola cab,190.00,Ola,
";

/// Eight months of spending with some noise
pub fn sample_series() -> Vec<MonthlyPoint> {
    [
        ("2024-05", 4200.0),
        ("2024-06", 3900.0),
        ("2024-07", 5100.0),
        ("2024-08", 4700.0),
        ("2024-09", 4400.0),
        ("2024-10", 5300.0),
        ("2024-11", 4900.0),
        ("2024-12", 6100.0),
    ]
    .iter()
    .map(|(month, total)| MonthlyPoint::new(*month, *total))
    .collect()
}

pub fn sample_histories() -> Vec<CategoryHistory> {
    vec![
        CategoryHistory::new("Groceries", vec![3000.0, 3200.0, 3100.0, 3500.0, 3400.0]),
        CategoryHistory::new("Transport", vec![800.0, 950.0]),
        CategoryHistory::new("Rent", vec![15000.0]),
    ]
}

/// Series model that always fails with the configured error
#[derive(Debug, Clone)]
pub struct FailingSeriesModel {
    error: ModelError,
}

impl FailingSeriesModel {
    pub fn runtime() -> Self {
        Self {
            error: ModelError::Runtime("scripted failure".into()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            error: ModelError::Unavailable("scripted absence".into()),
        }
    }
}

impl SeriesModel for FailingSeriesModel {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn forecast(
        &self,
        _history: &[MonthlyPoint],
        _horizon: usize,
    ) -> Result<ForecastResult, ModelError> {
        Err(self.error.clone())
    }
}

/// Series model that returns one point too many
#[derive(Debug, Clone, Copy)]
pub struct MisshapenSeriesModel;

impl SeriesModel for MisshapenSeriesModel {
    fn name(&self) -> &'static str {
        "misshapen"
    }

    fn forecast(
        &self,
        history: &[MonthlyPoint],
        horizon: usize,
    ) -> Result<ForecastResult, ModelError> {
        let points = (0..=horizon)
            .map(|i| ForecastPoint {
                month: format!("2099-{:02}", i % 12 + 1),
                predicted: 1.0,
                lower: 0.0,
                upper: 2.0,
                confidence: 0.9,
            })
            .collect();

        Ok(ForecastResult {
            points,
            model: ForecastModel::SeasonalTrend,
            data_points: history.len(),
            metrics: ForecastMetrics {
                mae: 0.0,
                mape: 0.0,
                rmse: 0.0,
            },
        })
    }
}

/// Budget regressor that always fails with the configured error
#[derive(Debug, Clone)]
pub struct FailingRegressor {
    error: ModelError,
}

impl FailingRegressor {
    pub fn runtime() -> Self {
        Self {
            error: ModelError::Runtime("scripted failure".into()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            error: ModelError::Unavailable("scripted absence".into()),
        }
    }
}

impl BudgetRegressor for FailingRegressor {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn predict_next(&self, _totals: &[f64]) -> Result<RegressionOutcome, ModelError> {
        Err(self.error.clone())
    }
}

/// Budget regressor returning a fixed prediction
#[derive(Debug, Clone, Copy)]
pub struct FixedRegressor {
    pub predicted: f64,
    pub training_mape: f64,
}

impl BudgetRegressor for FixedRegressor {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn predict_next(&self, _totals: &[f64]) -> Result<RegressionOutcome, ModelError> {
        Ok(RegressionOutcome {
            predicted: self.predicted,
            training_mape: self.training_mape,
        })
    }
}
