use std::sync::Arc;

use crate::{
    adapter::{EstimateAdapter, InferenceFailure},
    clock::Clock,
    config::AppConfig,
    display::EstimateView,
    form::{validate_form, FormError, FormInputs},
    model::{self, ArtifactError},
    record::{build, BuildError},
    variant::Variant,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("invalid form: {0}")]
    Form(#[from] FormError),
    #[error("invalid form: {0}")]
    Build(#[from] BuildError),
    #[error(transparent)]
    Inference(#[from] InferenceFailure),
}

/// One variant's full request path: form check, record build, inference.
#[derive(Clone)]
pub struct Estimator {
    adapter: EstimateAdapter,
    clock: Arc<dyn Clock>,
}

impl Estimator {
    pub fn new(adapter: EstimateAdapter, clock: Arc<dyn Clock>) -> Self {
        Self { adapter, clock }
    }

    /// Load the variant's artifact if the config names one. Artifact
    /// errors are meant to abort startup.
    pub fn from_config(
        cfg: &AppConfig,
        variant: Variant,
        clock: Arc<dyn Clock>,
    ) -> Result<Option<Self>, ArtifactError> {
        let Some(model_cfg) = cfg.models.for_variant(variant) else {
            return Ok(None);
        };
        let model = model::load(model_cfg)?;
        Ok(Some(Self::new(EstimateAdapter::new(model, variant, cfg.pricing), clock)))
    }

    pub fn variant(&self) -> Variant {
        self.adapter.variant()
    }

    /// Score one submitted form. Each call builds a fresh record and makes
    /// exactly one inference call.
    pub fn estimate_form(&self, form: &FormInputs) -> Result<EstimateView, EstimateError> {
        let variant = self.variant();
        metrics::counter!("estimate_requests_total", "variant" => variant.as_str()).increment(1);

        let outcome = self.run(variant, form);
        match &outcome {
            Ok(view) => {
                tracing::info!(variant = %variant, hourly_kwh = view.hourly_kwh, "estimate served");
            }
            Err(EstimateError::Form(e)) => {
                metrics::counter!("form_rejected_total", "variant" => variant.as_str()).increment(1);
                tracing::debug!(variant = %variant, error = %e, "form rejected");
            }
            Err(e) => {
                metrics::counter!("estimate_failures_total", "variant" => variant.as_str()).increment(1);
                tracing::warn!(variant = %variant, error = %e, "estimate failed");
            }
        }
        outcome
    }

    fn run(&self, variant: Variant, form: &FormInputs) -> Result<EstimateView, EstimateError> {
        validate_form(form, variant)?;
        let record = build(variant, &form.raw_inputs(), self.clock.as_ref())?;
        let result = self.adapter.estimate(&record, form.active_hours_per_day())?;
        Ok(EstimateView::new(variant, form, &result))
    }
}
