//! Engine configuration
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--config`), which must exist
//! 2. The override in the data dir (~/.local/share/fintel/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default values.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::budget::BoostingParams;
use crate::categorize::{CategoryKeywords, CategoryTaxonomy, DEFAULT_CATEGORY};
use crate::error::{Error, Result};
use crate::forecast::{SeasonalParams, DEFAULT_HORIZON};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastConfig {
    pub default_horizon: usize,
    /// Preferred seasonal/trend model enabled
    pub seasonal_model: bool,
    pub interval_z: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_horizon: DEFAULT_HORIZON,
            seasonal_model: true,
            interval_z: SeasonalParams::default().interval_z,
        }
    }
}

impl ForecastConfig {
    pub fn seasonal_params(&self) -> SeasonalParams {
        SeasonalParams {
            interval_z: self.interval_z,
            ..SeasonalParams::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetConfig {
    /// Preferred gradient boosting regressor enabled
    pub gradient_boosting: bool,
    pub n_estimators: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let params = BoostingParams::default();
        Self {
            gradient_boosting: true,
            n_estimators: params.n_estimators,
            max_depth: params.max_depth,
            learning_rate: params.learning_rate,
        }
    }
}

impl BudgetConfig {
    pub fn boosting_params(&self) -> BoostingParams {
        BoostingParams {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            learning_rate: self.learning_rate,
            ..BoostingParams::default()
        }
    }
}

/// Which OCR engine backs receipt scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    Tesseract,
    Mock,
    None,
}

impl OcrBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tesseract => "tesseract",
            Self::Mock => "mock",
            Self::None => "none",
        }
    }
}

impl fmt::Display for OcrBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OcrBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "mock" => Ok(Self::Mock),
            "none" | "disabled" => Ok(Self::None),
            _ => Err(format!("Unknown OCR backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrConfig {
    pub backend: OcrBackend,
    /// Executable invoked by the tesseract backend
    pub command: String,
    pub language: String,
    /// Text returned by the mock backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_text: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Tesseract,
            command: "tesseract".to_string(),
            language: "eng".to_string(),
            mock_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyConfig {
    pub default_category: String,
    /// Replaces the built-in table when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryKeywords>>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
            categories: None,
        }
    }
}

impl TaxonomyConfig {
    /// Build the shared taxonomy; the built-in table is reused when unchanged
    pub fn build(&self) -> Arc<CategoryTaxonomy> {
        match &self.categories {
            Some(categories) => Arc::new(CategoryTaxonomy::new(
                categories.clone(),
                self.default_category.clone(),
            )),
            None if self.default_category == DEFAULT_CATEGORY => CategoryTaxonomy::builtin(),
            None => Arc::new(CategoryTaxonomy::new(
                CategoryTaxonomy::builtin().categories().to_vec(),
                self.default_category.clone(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineConfig {
    pub forecast: ForecastConfig,
    pub budget: BudgetConfig,
    pub ocr: OcrConfig,
    pub taxonomy: TaxonomyConfig,
}

/// Where a loaded config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "embedded defaults"),
        }
    }
}

impl EngineConfig {
    /// Resolve and load configuration
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let source = match explicit {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => ConfigSource::File(path.to_path_buf()),
            None => match default_config_path() {
                Some(path) if path.exists() => ConfigSource::File(path),
                _ => ConfigSource::Embedded,
            },
        };

        let config = match &source {
            ConfigSource::File(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&content)?
            }
            ConfigSource::Embedded => Self::from_toml(DEFAULT_CONFIG)?,
        };

        tracing::debug!(source = %source, "Loaded engine config");
        Ok((config, source))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(forecast) = raw.forecast {
            if let Some(horizon) = forecast.default_horizon {
                config.forecast.default_horizon = horizon;
            }
            if let Some(enabled) = forecast.seasonal_model {
                config.forecast.seasonal_model = enabled;
            }
            if let Some(z) = forecast.interval_z {
                config.forecast.interval_z = z;
            }
        }

        if let Some(budget) = raw.budget {
            if let Some(enabled) = budget.gradient_boosting {
                config.budget.gradient_boosting = enabled;
            }
            if let Some(n) = budget.n_estimators {
                config.budget.n_estimators = n;
            }
            if let Some(depth) = budget.max_depth {
                config.budget.max_depth = depth;
            }
            if let Some(rate) = budget.learning_rate {
                config.budget.learning_rate = rate;
            }
        }

        if let Some(ocr) = raw.ocr {
            if let Some(backend) = ocr.backend {
                config.ocr.backend = backend.parse().map_err(Error::Config)?;
            }
            if let Some(command) = ocr.command {
                config.ocr.command = command;
            }
            if let Some(language) = ocr.language {
                config.ocr.language = language;
            }
            config.ocr.mock_text = ocr.mock_text;
        }

        if let Some(taxonomy) = raw.taxonomy {
            if let Some(default) = taxonomy.default_category {
                config.taxonomy.default_category = default;
            }
            config.taxonomy.categories = taxonomy.categories;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.forecast.default_horizon == 0 {
            return Err(Error::Config("forecast.default_horizon must be at least 1".into()));
        }
        if !(self.forecast.interval_z > 0.0) {
            return Err(Error::Config("forecast.interval_z must be positive".into()));
        }
        if self.budget.n_estimators == 0 || self.budget.max_depth == 0 {
            return Err(Error::Config(
                "budget.n_estimators and budget.max_depth must be at least 1".into(),
            ));
        }
        if !(self.budget.learning_rate > 0.0 && self.budget.learning_rate <= 1.0) {
            return Err(Error::Config("budget.learning_rate must be in (0, 1]".into()));
        }
        if let Some(categories) = &self.taxonomy.categories {
            if let Some(empty) = categories.iter().find(|c| c.name.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "taxonomy category with keywords {:?} has no name",
                    empty.keywords
                )));
            }
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fintel").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    budget: Option<RawBudget>,
    ocr: Option<RawOcr>,
    taxonomy: Option<RawTaxonomy>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    default_horizon: Option<usize>,
    seasonal_model: Option<bool>,
    interval_z: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    gradient_boosting: Option<bool>,
    n_estimators: Option<usize>,
    max_depth: Option<usize>,
    learning_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawOcr {
    backend: Option<String>,
    command: Option<String>,
    language: Option<String>,
    mock_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTaxonomy {
    default_category: Option<String>,
    categories: Option<Vec<CategoryKeywords>>,
}
