use std::fmt;

use energy_client::EstimateResult;
use serde::Serialize;

use crate::{form::FormInputs, variant::Variant};

/// Two decimals with comma thousands separators, e.g. `12,345.68`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && fixed != "0.00" {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}

pub fn format_kwh(value: f64) -> String {
    format!("{} kWh", format_amount(value))
}

pub fn format_usd(value: f64) -> String {
    format!("US${}", format_amount(value))
}

/// Text rendering of the monthly bill card.
#[derive(Debug, Clone, PartialEq)]
pub struct BillSummary {
    pub site_id: u8,
    pub meter: String,
    pub month: String,
    pub active_hours_per_day: u8,
    pub hourly_kwh: f64,
    pub monthly_kwh: f64,
    pub cost_per_kwh: f64,
    pub monthly_bill: f64,
}

impl BillSummary {
    /// `None` when the result carries no monthly figures.
    pub fn from_estimate(form: &FormInputs, result: &EstimateResult) -> Option<Self> {
        let monthly = result.monthly.as_ref()?;
        let month = form
            .schedule
            .as_ref()
            .map(|s| s.selection.month.clone())
            .unwrap_or_default();

        Some(Self {
            site_id: form.building.site_id,
            meter: form.building.meter.clone(),
            month,
            active_hours_per_day: monthly.active_hours_per_day,
            hourly_kwh: result.hourly_kwh,
            monthly_kwh: monthly.monthly_kwh,
            cost_per_kwh: monthly.cost_per_kwh,
            monthly_bill: monthly.monthly_bill,
        })
    }
}

impl fmt::Display for BillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Monthly Energy Bill")?;
        writeln!(f, "  Location Site_ID:     {}", self.site_id)?;
        writeln!(f, "  Meter Type:           {}", self.meter)?;
        writeln!(f, "  Month:                {}", self.month)?;
        writeln!(f, "  Active Hours per Day: {} hrs", self.active_hours_per_day)?;
        writeln!(f, "  Hourly Consumption:   {}", format_kwh(self.hourly_kwh))?;
        writeln!(f, "  Monthly Consumption:  {}", format_kwh(self.monthly_kwh))?;
        writeln!(f, "  Cost per kWh:         ${:.2}", self.cost_per_kwh)?;
        write!(f, "Estimated Monthly Bill: {}", format_usd(self.monthly_bill))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyView {
    pub active_hours_per_day: u8,
    pub monthly_kwh: f64,
    pub monthly_kwh_display: String,
    pub cost_per_kwh: f64,
    pub monthly_bill: f64,
    pub monthly_bill_display: String,
}

/// Outbound shape of an estimate: raw values alongside display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateView {
    pub variant: Variant,
    pub hourly_kwh: f64,
    pub hourly_kwh_display: String,
    pub monthly: Option<MonthlyView>,
    pub summary: Option<String>,
}

impl EstimateView {
    pub fn new(variant: Variant, form: &FormInputs, result: &EstimateResult) -> Self {
        let monthly = result.monthly.as_ref().map(|m| MonthlyView {
            active_hours_per_day: m.active_hours_per_day,
            monthly_kwh: m.monthly_kwh,
            monthly_kwh_display: format_kwh(m.monthly_kwh),
            cost_per_kwh: m.cost_per_kwh,
            monthly_bill: m.monthly_bill,
            monthly_bill_display: format_usd(m.monthly_bill),
        });

        Self {
            variant,
            hourly_kwh: result.hourly_kwh,
            hourly_kwh_display: format_kwh(result.hourly_kwh),
            monthly,
            summary: BillSummary::from_estimate(form, result).map(|s| s.to_string()),
        }
    }
}

impl fmt::Display for EstimateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            Variant::Hourly => writeln!(f, "Estimated Hourly Meter Reading: {}", self.hourly_kwh_display)?,
            Variant::Timestamped => writeln!(f, "Estimated Meter Reading: {}", self.hourly_kwh_display)?,
        }
        if let Some(m) = &self.monthly {
            writeln!(f, "Estimated Monthly Energy Consumption: {}", m.monthly_kwh_display)?;
            writeln!(f, "Estimated Monthly Bill for Energy Consumption: {}", m.monthly_bill_display)?;
        }
        if let Some(summary) = &self.summary {
            writeln!(f)?;
            writeln!(f, "{summary}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_client::MonthlyEstimate;

    #[test]
    fn amounts_are_grouped_and_rounded_for_display_only() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1.0), "1.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-2500.5), "-2,500.50");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn units_are_appended() {
        assert_eq!(format_kwh(2400.0), "2,400.00 kWh");
        assert_eq!(format_usd(360.0), "US$360.00");
    }

    fn hourly_result() -> EstimateResult {
        EstimateResult {
            hourly_kwh: 10.0,
            monthly: Some(MonthlyEstimate {
                active_hours_per_day: 8,
                monthly_kwh: 2400.0,
                cost_per_kwh: 0.15,
                monthly_bill: 360.0,
            }),
        }
    }

    #[test]
    fn bill_summary_lists_the_card_fields() {
        let mut form = FormInputs::default();
        form.building.site_id = 7;
        form.building.meter = "Hot Water".to_string();
        if let Some(s) = form.schedule.as_mut() {
            s.selection.month = "July".to_string();
        }

        let summary = BillSummary::from_estimate(&form, &hourly_result()).unwrap().to_string();

        assert!(summary.contains("Location Site_ID:     7"));
        assert!(summary.contains("Meter Type:           Hot Water"));
        assert!(summary.contains("Month:                July"));
        assert!(summary.contains("Active Hours per Day: 8 hrs"));
        assert!(summary.contains("Monthly Consumption:  2,400.00 kWh"));
        assert!(summary.contains("Cost per kWh:         $0.15"));
        assert!(summary.ends_with("Estimated Monthly Bill: US$360.00"));
    }

    #[test]
    fn view_without_monthly_has_no_summary() {
        let result = EstimateResult {
            hourly_kwh: 42.5,
            monthly: None,
        };
        let view = EstimateView::new(Variant::Timestamped, &FormInputs::default(), &result);

        assert_eq!(view.hourly_kwh_display, "42.50 kWh");
        assert!(view.monthly.is_none());
        assert!(view.summary.is_none());
        assert_eq!(view.to_string(), "Estimated Meter Reading: 42.50 kWh\n");
    }

    #[test]
    fn hourly_view_renders_monthly_lines() {
        let view = EstimateView::new(Variant::Hourly, &FormInputs::default(), &hourly_result());
        let text = view.to_string();

        assert!(text.starts_with("Estimated Hourly Meter Reading: 10.00 kWh\n"));
        assert!(text.contains("Estimated Monthly Energy Consumption: 2,400.00 kWh"));
        assert!(text.contains("Estimated Monthly Bill for Energy Consumption: US$360.00"));
        assert!(view.summary.is_some());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["variant"], "hourly");
        assert_eq!(json["monthly"]["monthly_bill_display"], "US$360.00");
    }
}
