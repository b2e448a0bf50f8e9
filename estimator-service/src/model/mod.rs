use std::sync::Arc;

use energy_client::FeatureRecord;

use crate::config::ModelConfig;

pub mod linear;

pub use linear::{ArtifactError, LinearPipeline};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("feature names mismatch: model was fit on [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },
    #[error("column '{column}' expects a {expected} value, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("found unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },
    #[error("model returned no predictions")]
    EmptyOutput,
    #[error("model produced a non-finite value ({0})")]
    NonFinite(f64),
    #[error("{0}")]
    Internal(String),
}

/// A fitted regression model scoring one-row tables.
///
/// Implementations are loaded once and shared read-only for the life of the
/// process.
pub trait Regressor: Send + Sync {
    /// Score `record` as the single row of a table, returning one value per
    /// row.
    fn predict(&self, record: &FeatureRecord) -> Result<Vec<f64>, ModelError>;
}

/// Load the artifact described by `cfg`.
pub fn load(cfg: &ModelConfig) -> Result<Arc<dyn Regressor>, ArtifactError> {
    let model = LinearPipeline::load(&cfg.path, cfg.blake3.as_deref())?;
    tracing::info!(
        path = %cfg.path.display(),
        columns = model.feature_names().len(),
        "model artifact loaded"
    );
    Ok(Arc::new(model))
}
