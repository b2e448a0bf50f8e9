pub mod domain;
pub mod encoding;

pub use domain::{BuildingInputs, EstimateResult, FeatureRecord, FeatureValue, MonthlyEstimate, WeatherInputs};
