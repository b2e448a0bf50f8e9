use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

// Column order is the order the artifacts were fit on; do not reorder.
static HOURLY_SCHEMA: &[&str] = &[
    "meter",
    "site_id",
    "square_feet",
    "year_built",
    "floor_count",
    "air_temperature",
    "cloud_coverage",
    "dew_temperature",
    "precip_depth_1_hr",
    "sea_level_pressure",
    "wind_direction",
    "wind_speed",
    "hour",
    "month",
    "primary_use",
];

static TIMESTAMPED_SCHEMA: &[&str] = &[
    "meter",
    "site_id",
    "square_feet",
    "year_built",
    "floor_count",
    "air_temperature",
    "cloud_coverage",
    "dew_temperature",
    "precip_depth_1_hr",
    "sea_level_pressure",
    "wind_direction",
    "wind_speed",
    "hour",
    "day",
    "month",
    "year",
    "primary_use",
];

/// Which of the two trained models a request is scored against.
///
/// The variant fixes the record schema, the transform applied to the raw
/// model output, and whether monthly figures are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Hour and month picked by the user; target was log1p-transformed.
    Hourly,
    /// Hour, day, month and year taken from the clock; raw target.
    Timestamped,
}

/// Post-processing applied to the raw model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTransform {
    Identity,
    /// Inverse of `ln(1 + x)`, floored at zero consumption.
    Expm1,
}

impl OutputTransform {
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            Self::Identity => raw,
            Self::Expm1 => raw.exp_m1().max(0.0),
        }
    }
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Hourly, Variant::Timestamped];

    /// Column names in the exact order the model was fit on.
    pub fn schema(self) -> &'static [&'static str] {
        match self {
            Self::Hourly => HOURLY_SCHEMA,
            Self::Timestamped => TIMESTAMPED_SCHEMA,
        }
    }

    pub fn output_transform(self) -> OutputTransform {
        match self {
            Self::Hourly => OutputTransform::Expm1,
            Self::Timestamped => OutputTransform::Identity,
        }
    }

    pub fn derives_monthly(self) -> bool {
        matches!(self, Self::Hourly)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Timestamped => "timestamped",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "timestamped" => Ok(Self::Timestamped),
            other => Err(format!("unknown variant '{other}' (expected 'hourly' or 'timestamped')")),
        }
    }
}
