use std::sync::Arc;

use anyhow::{bail, Context, Result};
use estimator_service::{
    clock::SystemClock, config::AppConfig, http, metrics_server, observability, Estimator, Variant,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Artifacts are loaded once and shared read-only; any load failure is fatal.
    let mut state = http::AppState::default();
    for variant in Variant::ALL {
        let estimator = Estimator::from_config(&cfg, variant, Arc::new(SystemClock))
            .with_context(|| format!("failed to load {variant} model"))?;
        match estimator {
            Some(e) => state.insert(e),
            None => tracing::info!(variant = %variant, "no model configured, variant disabled"),
        }
    }
    if state.hourly.is_none() && state.timestamped.is_none() {
        bail!("no models configured; set [models.hourly] and/or [models.timestamped]");
    }

    http::serve(&cfg.server.bind_addr, state).await
}
