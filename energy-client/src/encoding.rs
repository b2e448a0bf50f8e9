//! Categorical encodings the regression models were trained with.
//!
//! Every table is closed: the form only ever offers these labels, so a miss
//! means the caller handed us something it should not have.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {table} label '{label}'")]
pub struct EncodeError {
    pub table: &'static str,
    pub label: String,
}

pub static METER_CODES: &[(&str, i64)] = &[
    ("Electricity", 0),
    ("Chilled Water", 1),
    ("Steam", 2),
    ("Hot Water", 3),
];

pub static MONTH_CODES: &[(&str, i64)] = &[
    ("January", 1),
    ("February", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
];

pub static HOUR_CODES: &[(&str, i64)] = &[
    ("12 AM", 0),
    ("1 AM", 1),
    ("2 AM", 2),
    ("3 AM", 3),
    ("4 AM", 4),
    ("5 AM", 5),
    ("6 AM", 6),
    ("7 AM", 7),
    ("8 AM", 8),
    ("9 AM", 9),
    ("10 AM", 10),
    ("11 AM", 11),
    ("12 PM", 12),
    ("1 PM", 13),
    ("2 PM", 14),
    ("3 PM", 15),
    ("4 PM", 16),
    ("5 PM", 17),
    ("6 PM", 18),
    ("7 PM", 19),
    ("8 PM", 20),
    ("9 PM", 21),
    ("10 PM", 22),
    ("11 PM", 23),
];

/// Building primary-use categories, passed to the model as raw strings.
pub static PRIMARY_USES: &[&str] = &[
    "Education",
    "Office",
    "Residential",
    "Public services",
    "Healthcare",
    "Lodging/residential",
    "Entertainment/public assembly",
    "Retail",
    "Parking",
    "Warehouse/storage",
    "Food sales and service",
    "Religious worship",
    "Utility",
    "Technology/science",
];

fn lookup(table_name: &'static str, table: &[(&str, i64)], label: &str) -> Result<i64, EncodeError> {
    table
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, code)| *code)
        .ok_or_else(|| EncodeError {
            table: table_name,
            label: label.to_string(),
        })
}

pub fn meter_code(label: &str) -> Result<i64, EncodeError> {
    lookup("meter", METER_CODES, label)
}

/// 1-indexed: January is 1.
pub fn month_code(label: &str) -> Result<i64, EncodeError> {
    lookup("month", MONTH_CODES, label)
}

/// 12-hour clock label to hour of day; "12 AM" is midnight.
pub fn hour_code(label: &str) -> Result<i64, EncodeError> {
    lookup("hour", HOUR_CODES, label)
}

/// Returns the canonical primary-use label if `label` is one of the known
/// categories.
pub fn primary_use_label(label: &str) -> Result<&'static str, EncodeError> {
    PRIMARY_USES
        .iter()
        .copied()
        .find(|l| *l == label)
        .ok_or_else(|| EncodeError {
            table: "primary_use",
            label: label.to_string(),
        })
}
