//! Body of the one-shot `estimate` binary.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use crate::{clock::Clock, config::AppConfig, form::FormInputs, Estimator, Variant};

/// Load the configured model for `variant`, failing if none is configured.
pub fn load_estimator(cfg: &AppConfig, variant: Variant, clock: Arc<dyn Clock>) -> Result<Estimator> {
    Estimator::from_config(cfg, variant, clock)
        .with_context(|| format!("failed to load {variant} model"))?
        .ok_or_else(|| anyhow!("no model configured for the {variant} variant"))
}

/// Parse a TOML form, score it and render the result text.
pub fn estimate_toml(estimator: &Estimator, form_toml: &str) -> Result<String> {
    let form: FormInputs = toml::from_str(form_toml).context("invalid form")?;
    let view = estimator.estimate_form(&form)?;
    Ok(view.to_string())
}

/// `estimate <variant> <form.toml>` with the form already read from disk.
pub fn run(cfg: &AppConfig, variant: &str, form_toml: &str, clock: Arc<dyn Clock>) -> Result<String> {
    let variant: Variant = variant.parse().map_err(|e: String| anyhow!(e))?;
    let estimator = load_estimator(cfg, variant, clock)?;
    estimate_toml(&estimator, form_toml)
}
