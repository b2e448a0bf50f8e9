pub mod adapter;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod form;
pub mod http;
pub mod metrics_server;
pub mod model;
pub mod observability;
pub mod record;
pub mod service;
pub mod variant;

pub use adapter::{EstimateAdapter, InferenceFailure};
pub use record::{build, BuildError, RawInputs, TimeSelection};
pub use service::{EstimateError, Estimator};
pub use variant::{OutputTransform, Variant};
