use serde::Deserialize;
use std::{fs, path::PathBuf};

use anyhow::Context;

use crate::variant::Variant;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Hex blake3 digest the artifact file must match, if set.
    #[serde(default)]
    pub blake3: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsConfig {
    pub hourly: Option<ModelConfig>,
    pub timestamped: Option<ModelConfig>,
}

impl ModelsConfig {
    pub fn for_variant(&self, variant: Variant) -> Option<&ModelConfig> {
        match variant {
            Variant::Hourly => self.hourly.as_ref(),
            Variant::Timestamped => self.timestamped.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_cost_per_kwh")]
    pub cost_per_kwh: f64,
    #[serde(default = "default_days_per_month")]
    pub days_per_month: u32,
}

fn default_cost_per_kwh() -> f64 {
    0.15
}

fn default_days_per_month() -> u32 {
    30
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cost_per_kwh: default_cost_per_kwh(),
            days_per_month: default_days_per_month(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("ESTIMATOR_CONFIG").unwrap_or_else(|_| "estimator-config.toml".to_string());
        let contents = fs::read_to_string(&path).with_context(|| format!("failed to read config {path}"))?;
        Self::from_toml_str(&contents).with_context(|| format!("invalid config {path}"))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        if !(cfg.pricing.cost_per_kwh.is_finite() && cfg.pricing.cost_per_kwh >= 0.0) {
            anyhow::bail!("pricing.cost_per_kwh must be a non-negative number");
        }
        if cfg.pricing.days_per_month == 0 {
            anyhow::bail!("pricing.days_per_month must be positive");
        }
        Ok(cfg)
    }
}
