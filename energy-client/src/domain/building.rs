/// Static attributes of the building being estimated.
///
/// `meter` and `primary_use` hold the human-readable labels offered by the
/// form; they are encoded when a feature record is built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct BuildingInputs {
    pub site_id: u8,
    pub square_feet: u32,
    pub year_built: u16,
    pub floor_count: u16,
    pub meter: String,
    pub primary_use: String,
}

/// Weather observation for the hour being estimated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct WeatherInputs {
    /// °C
    pub air_temperature: f64,
    /// Oktas, 0 to 9.
    pub cloud_coverage: f64,
    /// °C
    pub dew_temperature: f64,
    /// Millimetres over one hour.
    pub precip_depth_1_hr: f64,
    /// hPa
    pub sea_level_pressure: f64,
    /// Degrees, 0 to 360.
    pub wind_direction: f64,
    /// m/s
    pub wind_speed: f64,
}

impl Default for BuildingInputs {
    fn default() -> Self {
        Self {
            site_id: 0,
            square_feet: 50_000,
            year_built: 2000,
            floor_count: 5,
            meter: "Electricity".to_string(),
            primary_use: "Education".to_string(),
        }
    }
}

impl Default for WeatherInputs {
    fn default() -> Self {
        Self {
            air_temperature: 25.0,
            cloud_coverage: 4.0,
            dew_temperature: 10.0,
            precip_depth_1_hr: 0.0,
            sea_level_pressure: 1013.0,
            wind_direction: 180.0,
            wind_speed: 5.0,
        }
    }
}
