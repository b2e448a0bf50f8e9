use energy_client::{
    encoding::{self, EncodeError},
    BuildingInputs, FeatureRecord, FeatureValue, WeatherInputs,
};
use serde::{Deserialize, Serialize};

use crate::{clock::Clock, variant::Variant};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("hour and month selection is required for the hourly variant")]
    MissingSelection,
    #[error("no value source for column '{0}'")]
    UnsupportedColumn(&'static str),
}

/// Hour-of-day and month labels picked on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSelection {
    pub hour: String,
    pub month: String,
}

/// Everything the builder reads besides the clock.
#[derive(Debug, Clone, Copy)]
pub struct RawInputs<'a> {
    pub building: &'a BuildingInputs,
    pub weather: &'a WeatherInputs,
    /// Required by `Variant::Hourly`, ignored otherwise.
    pub selection: Option<&'a TimeSelection>,
}

struct Calendar {
    hour: i64,
    month: i64,
    day: Option<i64>,
    year: Option<i64>,
}

impl Calendar {
    fn resolve(variant: Variant, selection: Option<&TimeSelection>, clock: &dyn Clock) -> Result<Self, BuildError> {
        match variant {
            Variant::Hourly => {
                let sel = selection.ok_or(BuildError::MissingSelection)?;
                Ok(Self {
                    hour: encoding::hour_code(&sel.hour)?,
                    month: encoding::month_code(&sel.month)?,
                    day: None,
                    year: None,
                })
            }
            Variant::Timestamped => {
                let now = clock.now();
                Ok(Self {
                    hour: i64::from(now.hour()),
                    month: i64::from(u8::from(now.month())),
                    day: Some(i64::from(now.day())),
                    year: Some(i64::from(now.year())),
                })
            }
        }
    }
}

/// Assemble the single-row feature record for `variant`.
///
/// Columns are emitted by walking the variant schema, so the record order
/// always matches what the artifact was fit on. The clock is read at most
/// once and only for `Variant::Timestamped`.
pub fn build(variant: Variant, inputs: &RawInputs<'_>, clock: &dyn Clock) -> Result<FeatureRecord, BuildError> {
    let b = inputs.building;
    let w = inputs.weather;

    let meter = encoding::meter_code(&b.meter)?;
    let primary_use = encoding::primary_use_label(&b.primary_use)?;
    let calendar = Calendar::resolve(variant, inputs.selection, clock)?;

    let schema = variant.schema();
    let mut fields = Vec::with_capacity(schema.len());
    for &name in schema {
        let value = match name {
            "meter" => FeatureValue::Int(meter),
            "site_id" => FeatureValue::Int(i64::from(b.site_id)),
            "square_feet" => FeatureValue::Int(i64::from(b.square_feet)),
            "year_built" => FeatureValue::Int(i64::from(b.year_built)),
            "floor_count" => FeatureValue::Int(i64::from(b.floor_count)),
            "air_temperature" => FeatureValue::Float(w.air_temperature),
            "cloud_coverage" => FeatureValue::Float(w.cloud_coverage),
            "dew_temperature" => FeatureValue::Float(w.dew_temperature),
            "precip_depth_1_hr" => FeatureValue::Float(w.precip_depth_1_hr),
            "sea_level_pressure" => FeatureValue::Float(w.sea_level_pressure),
            "wind_direction" => FeatureValue::Float(w.wind_direction),
            "wind_speed" => FeatureValue::Float(w.wind_speed),
            "hour" => FeatureValue::Int(calendar.hour),
            "month" => FeatureValue::Int(calendar.month),
            "day" => FeatureValue::Int(calendar.day.ok_or(BuildError::UnsupportedColumn(name))?),
            "year" => FeatureValue::Int(calendar.year.ok_or(BuildError::UnsupportedColumn(name))?),
            "primary_use" => FeatureValue::Category(primary_use.to_string()),
            other => return Err(BuildError::UnsupportedColumn(other)),
        };
        fields.push((name, value));
    }

    tracing::debug!(variant = %variant, columns = fields.len(), "feature record built");
    Ok(FeatureRecord::from_fields(fields))
}
