use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use energy_client::FeatureRecord;
use serde::{Deserialize, Serialize};

use super::{ModelError, Regressor};

pub const FORMAT: &str = "linear-pipeline/v1";

#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact digest mismatch: expected {expected}, found {actual}")]
    DigestMismatch { expected: String, actual: String },
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported model artifact format '{0}' (expected '{FORMAT}')")]
    UnsupportedFormat(String),
    #[error("inconsistent model artifact: {0}")]
    Inconsistent(String),
}

/// Standardised numeric column: contributes `coefficient * (x - center) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub coefficient: f64,
    #[serde(default)]
    pub center: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Ignore,
    Error,
}

/// One-hot encoded column: contributes the weight of the matching level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub levels: BTreeMap<String, f64>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

/// JSON export of a fitted preprocessing + linear regression pipeline.
///
/// `feature_names` is the column order the pipeline was fit on; records
/// with any other column set or order are refused at predict time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPipeline {
    format: String,
    feature_names: Vec<String>,
    intercept: f64,
    #[serde(default)]
    numeric: BTreeMap<String, NumericTerm>,
    #[serde(default)]
    categorical: BTreeMap<String, CategoricalTerm>,
}

impl LinearPipeline {
    /// Read, optionally verify against a blake3 hex digest, parse and check
    /// an artifact file.
    pub fn load(path: &Path, expected_blake3: Option<&str>) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(expected) = expected_blake3 {
            let actual = blake3::hash(&bytes).to_hex().to_string();
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                return Err(ArtifactError::DigestMismatch {
                    expected: expected.trim().to_string(),
                    actual,
                });
            }
        }

        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let pipeline: Self = serde_json::from_slice(bytes)?;
        pipeline.check()?;
        Ok(pipeline)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn check(&self) -> Result<(), ArtifactError> {
        if self.format != FORMAT {
            return Err(ArtifactError::UnsupportedFormat(self.format.clone()));
        }
        if self.feature_names.is_empty() {
            return Err(ArtifactError::Inconsistent("feature_names is empty".to_string()));
        }
        if !self.intercept.is_finite() {
            return Err(ArtifactError::Inconsistent("intercept is not finite".to_string()));
        }

        let mut seen = BTreeSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::Inconsistent(format!("duplicate column '{name}'")));
            }
            match (self.numeric.get(name), self.categorical.contains_key(name)) {
                (Some(term), false) => {
                    if !term.coefficient.is_finite() || !term.center.is_finite() {
                        return Err(ArtifactError::Inconsistent(format!(
                            "non-finite numeric term for '{name}'"
                        )));
                    }
                    if term.scale == 0.0 || !term.scale.is_finite() {
                        return Err(ArtifactError::Inconsistent(format!("invalid scale for '{name}'")));
                    }
                }
                (None, true) => {}
                (Some(_), true) => {
                    return Err(ArtifactError::Inconsistent(format!(
                        "column '{name}' is both numeric and categorical"
                    )));
                }
                (None, false) => {
                    return Err(ArtifactError::Inconsistent(format!("no term for column '{name}'")));
                }
            }
        }

        if let Some(extra) = self
            .numeric
            .keys()
            .chain(self.categorical.keys())
            .find(|k| !seen.contains(k.as_str()))
        {
            return Err(ArtifactError::Inconsistent(format!(
                "term '{extra}' is not in feature_names"
            )));
        }

        Ok(())
    }

    fn score(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        if !record.names().eq(self.feature_names.iter().map(String::as_str)) {
            return Err(ModelError::SchemaMismatch {
                expected: self.feature_names.join(", "),
                actual: record.names().collect::<Vec<_>>().join(", "),
            });
        }

        let mut acc = self.intercept;
        for (name, value) in record.fields() {
            if let Some(term) = self.numeric.get(*name) {
                let x = value.as_f64().ok_or_else(|| ModelError::TypeMismatch {
                    column: name.to_string(),
                    expected: "numeric",
                    actual: value.kind(),
                })?;
                acc += term.coefficient * (x - term.center) / term.scale;
            } else if let Some(term) = self.categorical.get(*name) {
                let level = value.as_category().ok_or_else(|| ModelError::TypeMismatch {
                    column: name.to_string(),
                    expected: "category",
                    actual: value.kind(),
                })?;
                match (term.levels.get(level), term.handle_unknown) {
                    (Some(weight), _) => acc += weight,
                    (None, HandleUnknown::Ignore) => {}
                    (None, HandleUnknown::Error) => {
                        return Err(ModelError::UnknownCategory {
                            column: name.to_string(),
                            value: level.to_string(),
                        });
                    }
                }
            } else {
                return Err(ModelError::Internal(format!("no term for column '{name}'")));
            }
        }

        if !acc.is_finite() {
            return Err(ModelError::NonFinite(acc));
        }
        Ok(acc)
    }
}

impl Regressor for LinearPipeline {
    fn predict(&self, record: &FeatureRecord) -> Result<Vec<f64>, ModelError> {
        Ok(vec![self.score(record)?])
    }
}
