pub mod building;
pub mod estimate;
pub mod feature_record;

pub use building::{BuildingInputs, WeatherInputs};
pub use estimate::{EstimateResult, MonthlyEstimate};
pub use feature_record::{FeatureRecord, FeatureValue};
