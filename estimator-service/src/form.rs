use energy_client::{BuildingInputs, WeatherInputs};
use serde::{Deserialize, Serialize};

use crate::{
    record::{RawInputs, TimeSelection},
    variant::Variant,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("the {0} variant requires a schedule (hour, month, active_hours_per_day)")]
    MissingSchedule(Variant),
}

/// Hour and month the estimate is for, plus how many hours a day the
/// building draws that load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(flatten)]
    pub selection: TimeSelection,
    #[serde(default = "default_active_hours")]
    pub active_hours_per_day: u8,
}

fn default_active_hours() -> u8 {
    10
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            selection: TimeSelection {
                hour: "12 AM".to_string(),
                month: "January".to_string(),
            },
            active_hours_per_day: default_active_hours(),
        }
    }
}

/// Everything the estimate form submits. Missing sections take the form's
/// initial widget values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInputs {
    pub building: BuildingInputs,
    pub weather: WeatherInputs,
    pub schedule: Option<Schedule>,
}

impl Default for FormInputs {
    fn default() -> Self {
        Self {
            building: BuildingInputs::default(),
            weather: WeatherInputs::default(),
            schedule: Some(Schedule::default()),
        }
    }
}

impl FormInputs {
    pub fn raw_inputs(&self) -> RawInputs<'_> {
        RawInputs {
            building: &self.building,
            weather: &self.weather,
            selection: self.schedule.as_ref().map(|s| &s.selection),
        }
    }

    pub fn active_hours_per_day(&self) -> Option<u8> {
        self.schedule.as_ref().map(|s| s.active_hours_per_day)
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), FormError> {
    // NaN fails the containment check as well.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FormError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Enforce the ranges the form widgets allow.
///
/// Categorical labels are not checked here; the record builder rejects
/// labels outside the encoding tables.
pub fn validate_form(form: &FormInputs, variant: Variant) -> Result<(), FormError> {
    let b = &form.building;
    in_range("site_id", f64::from(b.site_id), 0.0, 16.0)?;
    in_range("square_feet", f64::from(b.square_feet), 300.0, 500_000.0)?;
    in_range("year_built", f64::from(b.year_built), 1900.0, 2025.0)?;
    in_range("floor_count", f64::from(b.floor_count), 1.0, 100.0)?;

    let w = &form.weather;
    in_range("air_temperature", w.air_temperature, -30.0, 50.0)?;
    in_range("cloud_coverage", w.cloud_coverage, 0.0, 9.0)?;
    in_range("dew_temperature", w.dew_temperature, -30.0, 30.0)?;
    in_range("precip_depth_1_hr", w.precip_depth_1_hr, 0.0, 100.0)?;
    in_range("sea_level_pressure", w.sea_level_pressure, 900.0, 1100.0)?;
    in_range("wind_direction", w.wind_direction, 0.0, 360.0)?;
    in_range("wind_speed", w.wind_speed, 0.0, 50.0)?;

    if !variant.derives_monthly() {
        return Ok(());
    }
    match &form.schedule {
        Some(s) => in_range("active_hours_per_day", f64::from(s.active_hours_per_day), 1.0, 24.0),
        None => Err(FormError::MissingSchedule(variant)),
    }
}
