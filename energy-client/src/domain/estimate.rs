/// Outcome of one successful inference call.
///
/// Values are carried unrounded; rounding is a display concern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EstimateResult {
    pub hourly_kwh: f64,
    pub monthly: Option<MonthlyEstimate>,
}

/// Monthly figures derived from the hourly estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonthlyEstimate {
    pub active_hours_per_day: u8,
    pub monthly_kwh: f64,
    pub cost_per_kwh: f64,
    pub monthly_bill: f64,
}
