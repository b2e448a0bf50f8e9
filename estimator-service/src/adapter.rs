use std::{sync::Arc, time::Instant};

use energy_client::{EstimateResult, FeatureRecord, MonthlyEstimate};

use crate::{
    config::PricingConfig,
    model::{ModelError, Regressor},
    variant::Variant,
};

/// The model could not score a record. Carries the underlying cause so the
/// display layer can show it; no partial result exists.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("prediction failed: {cause}")]
pub struct InferenceFailure {
    #[source]
    pub cause: ModelError,
}

/// Scores feature records against one model and turns the raw output into an
/// [`EstimateResult`] according to the variant.
#[derive(Clone)]
pub struct EstimateAdapter {
    model: Arc<dyn Regressor>,
    variant: Variant,
    pricing: PricingConfig,
}

impl EstimateAdapter {
    pub fn new(model: Arc<dyn Regressor>, variant: Variant, pricing: PricingConfig) -> Self {
        Self {
            model,
            variant,
            pricing,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn pricing(&self) -> PricingConfig {
        self.pricing
    }

    /// Run one inference call.
    ///
    /// `active_hours_per_day` only matters for variants that derive monthly
    /// figures; without it the result carries the hourly estimate alone.
    pub fn estimate(
        &self,
        record: &FeatureRecord,
        active_hours_per_day: Option<u8>,
    ) -> Result<EstimateResult, InferenceFailure> {
        let started = Instant::now();
        let raw = self.raw_prediction(record).map_err(|cause| {
            metrics::counter!("inference_failures_total").increment(1);
            tracing::warn!(variant = %self.variant, error = %cause, "inference failed");
            InferenceFailure { cause }
        })?;
        metrics::histogram!("inference_latency_seconds").record(started.elapsed().as_secs_f64());

        let hourly_kwh = self.variant.output_transform().apply(raw);

        let monthly = if self.variant.derives_monthly() {
            active_hours_per_day.map(|hours| self.monthly(hourly_kwh, hours))
        } else {
            None
        };

        tracing::debug!(variant = %self.variant, raw, hourly_kwh, "inference complete");
        Ok(EstimateResult { hourly_kwh, monthly })
    }

    fn raw_prediction(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        let raw = self
            .model
            .predict(record)?
            .first()
            .copied()
            .ok_or(ModelError::EmptyOutput)?;
        if !raw.is_finite() {
            return Err(ModelError::NonFinite(raw));
        }
        Ok(raw)
    }

    fn monthly(&self, hourly_kwh: f64, active_hours_per_day: u8) -> MonthlyEstimate {
        let monthly_kwh =
            hourly_kwh * f64::from(active_hours_per_day) * f64::from(self.pricing.days_per_month);
        MonthlyEstimate {
            active_hours_per_day,
            monthly_kwh,
            cost_per_kwh: self.pricing.cost_per_kwh,
            monthly_bill: monthly_kwh * self.pricing.cost_per_kwh,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use energy_client::FeatureValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed raw output regardless of input.
    pub(crate) struct ConstantModel(pub f64);

    impl Regressor for ConstantModel {
        fn predict(&self, _record: &FeatureRecord) -> Result<Vec<f64>, ModelError> {
            Ok(vec![self.0])
        }
    }

    pub(crate) struct FailingModel;

    impl Regressor for FailingModel {
        fn predict(&self, _record: &FeatureRecord) -> Result<Vec<f64>, ModelError> {
            Err(ModelError::Internal("input contains NaN".to_string()))
        }
    }

    struct EmptyModel;

    impl Regressor for EmptyModel {
        fn predict(&self, _record: &FeatureRecord) -> Result<Vec<f64>, ModelError> {
            Ok(Vec::new())
        }
    }

    struct CountingModel(AtomicUsize);

    impl Regressor for CountingModel {
        fn predict(&self, _record: &FeatureRecord) -> Result<Vec<f64>, ModelError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0])
        }
    }

    fn record() -> FeatureRecord {
        FeatureRecord::from_fields(vec![("meter", FeatureValue::Int(0))])
    }

    fn adapter(model: impl Regressor + 'static, variant: Variant) -> EstimateAdapter {
        EstimateAdapter::new(Arc::new(model), variant, PricingConfig::default())
    }

    #[test]
    fn hourly_variant_back_transforms_log1p_output() {
        let a = adapter(ConstantModel(2f64.ln()), Variant::Hourly);
        let result = a.estimate(&record(), None).unwrap();
        assert!((result.hourly_kwh - 1.0).abs() < 1e-12);
        assert_eq!(format!("{:.2}", result.hourly_kwh), "1.00");
        assert!(result.monthly.is_none());
    }

    #[test]
    fn hourly_variant_derives_monthly_consumption_and_bill() {
        let a = adapter(ConstantModel(10f64.ln_1p()), Variant::Hourly);
        let result = a.estimate(&record(), Some(8)).unwrap();
        let monthly = result.monthly.unwrap();

        assert!((result.hourly_kwh - 10.0).abs() < 1e-9);
        assert!((monthly.monthly_kwh - 2400.0).abs() < 1e-6);
        assert!((monthly.monthly_bill - 360.0).abs() < 1e-6);
        assert_eq!(format!("{:.2}", monthly.monthly_bill), "360.00");
        assert_eq!(monthly.cost_per_kwh, 0.15);
        assert_eq!(monthly.active_hours_per_day, 8);
    }

    #[test]
    fn monthly_uses_configured_pricing() {
        let pricing = PricingConfig {
            cost_per_kwh: 0.2,
            days_per_month: 31,
        };
        let a = EstimateAdapter::new(Arc::new(ConstantModel(0.0)), Variant::Hourly, pricing);
        let m = a.monthly(10.0, 8);
        assert_eq!(m.monthly_kwh, 2480.0);
        assert!((m.monthly_bill - 496.0).abs() < 1e-9);
    }

    #[test]
    fn timestamped_variant_uses_raw_output() {
        let a = adapter(ConstantModel(42.5), Variant::Timestamped);
        let result = a.estimate(&record(), Some(8)).unwrap();
        assert_eq!(result.hourly_kwh, 42.5);
        assert!(result.monthly.is_none());
    }

    #[test]
    fn model_failure_is_reported_not_raised() {
        let a = adapter(FailingModel, Variant::Hourly);
        let err = a.estimate(&record(), Some(8)).unwrap_err();
        assert_eq!(err.to_string(), "prediction failed: input contains NaN");
        assert_eq!(err.cause, ModelError::Internal("input contains NaN".to_string()));
    }

    #[test]
    fn empty_and_non_finite_outputs_are_failures() {
        let err = adapter(EmptyModel, Variant::Timestamped)
            .estimate(&record(), None)
            .unwrap_err();
        assert_eq!(err.cause, ModelError::EmptyOutput);

        let err = adapter(ConstantModel(f64::INFINITY), Variant::Timestamped)
            .estimate(&record(), None)
            .unwrap_err();
        assert!(matches!(err.cause, ModelError::NonFinite(_)));
    }

    #[test]
    fn negative_back_transform_is_floored_at_zero() {
        let a = adapter(ConstantModel(-0.5), Variant::Hourly);
        let result = a.estimate(&record(), Some(10)).unwrap();
        assert_eq!(result.hourly_kwh, 0.0);
        assert_eq!(result.monthly.unwrap().monthly_bill, 0.0);
    }

    #[test]
    fn timestamped_negative_output_passes_through() {
        let a = adapter(ConstantModel(-3.0), Variant::Timestamped);
        let result = a.estimate(&record(), None).unwrap();
        assert_eq!(result.hourly_kwh, -3.0);
    }

    #[test]
    fn estimate_is_deterministic_and_calls_model_once() {
        let model = Arc::new(CountingModel(AtomicUsize::new(0)));
        let a = EstimateAdapter::new(model.clone(), Variant::Hourly, PricingConfig::default());

        let first = a.estimate(&record(), Some(5)).unwrap();
        let second = a.estimate(&record(), Some(5)).unwrap();

        assert_eq!(first, second);
        assert_eq!(model.0.load(Ordering::SeqCst), 2);
    }
}
