// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use time::macros::format_description;

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidScore,
    NegativeScore,
    InvalidDate,
    InvalidCoefficient,
    InvalidCapacity,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidScore => f.write_str("invalid score value"),
            Self::NegativeScore => f.write_str("negative score value"),
            Self::InvalidDate => f.write_str("invalid date value"),
            Self::InvalidCoefficient => f.write_str("invalid coefficient value"),
            Self::InvalidCapacity => f.write_str("invalid capacity value"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

pub fn parse_required_score(input: &str) -> ValidationResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidScore);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidScore)?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidScore);
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeScore);
    }
    Ok(value)
}

pub fn format_score(value: f64) -> String {
    if (value - value.trunc()).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub fn parse_required_date(input: &str) -> ValidationResult<Date> {
    parse_date(input.trim())
}

pub fn parse_optional_date(input: &str) -> ValidationResult<Option<Date>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_date(trimmed).map(Some)
}

pub fn format_date(value: Option<Date>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    value
        .format(&format_description!("[year]-[month]-[day]"))
        .expect("date format is valid")
}

pub fn parse_coefficient(input: &str) -> ValidationResult<i32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(1);
    }
    let value = trimmed
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidCoefficient)?;
    if value < 1 {
        return Err(ValidationError::InvalidCoefficient);
    }
    Ok(value)
}

pub fn parse_optional_capacity(input: &str) -> ValidationResult<Option<i32>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidCapacity)?;
    if value <= 0 {
        return Err(ValidationError::InvalidCapacity);
    }
    Ok(Some(value))
}

fn parse_date(input: &str) -> ValidationResult<Date> {
    Date::parse(input, &format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate)
}
