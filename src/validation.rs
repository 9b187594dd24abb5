// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input validation for profile, account, goal and daily-metric fields.
//!
//! Every validator takes the raw value as the caller received it and
//! returns a [`ValidationResult`]. Checks run in a fixed order per field and
//! the first failing check decides the message, so callers can show it
//! next to the offending input.

use crate::error::AppError;
use crate::models::profile::gender_selection;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// Upper bound for daily steps (ultra-marathon territory).
pub const MAX_STEPS_PER_DAY: i32 = 250_000;
/// Upper bound for daily calories burned.
pub const MAX_CALORIES_PER_DAY: i32 = 30_000;
/// Minutes in a day.
pub const MAX_ACTIVE_MINUTES: i64 = 1440;

pub const MIN_AGE: i32 = 10;
pub const MAX_AGE: i32 = 100;
pub const MIN_HEIGHT_CM: i32 = 100;
pub const MAX_HEIGHT_CM: i32 = 300;
pub const MIN_WEIGHT_KG: f32 = 20.0;
pub const MAX_WEIGHT_KG: f32 = 300.0;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Selector value meaning "no gender picked".
pub const GENDER_UNSELECTED: i32 = -1;

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FailureKind {
    Null,
    Empty,
    NotNumeric,
    OutOfRange,
    NotSelected,
    InvalidFormat,
    TooShort,
    Negative,
    TooLarge,
    NotWhole,
    LeadingZero,
    BadFormat,
    InvalidValues,
    ExceedsDay,
}

/// A rejected value: the failure kind plus the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of validating one field.
///
/// Holds a message exactly when the value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    failure: Option<ValidationFailure>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { failure: None }
    }

    pub fn invalid(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            failure: Some(ValidationFailure {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }

    pub fn kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }

    /// Convert into an application error scoped to `field`.
    pub fn check(self, field: Field) -> Result<(), AppError> {
        match self.failure {
            None => Ok(()),
            Some(failure) => Err(AppError::Validation {
                field: field.as_str(),
                message: failure.message,
            }),
        }
    }
}

/// Field families known to the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Field {
    Name,
    Age,
    Height,
    Weight,
    Gender,
    Email,
    Password,
    Steps,
    Calories,
    ActiveTime,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Gender => "gender",
            Field::Email => "email",
            Field::Password => "password",
            Field::Steps => "steps",
            Field::Calories => "calories",
            Field::ActiveTime => "active_time",
        }
    }
}

/// Validate a raw value by field name.
///
/// For [`Field::Gender`] the value is the chosen label; a missing or blank
/// label counts as unselected.
pub fn validate_field(field: Field, value: Option<&str>) -> ValidationResult {
    match field {
        Field::Name => validate_name(value),
        Field::Age => validate_age(value),
        Field::Height => validate_height(value),
        Field::Weight => validate_weight(value),
        Field::Gender => validate_gender(gender_selection(value)),
        Field::Email => validate_email(value),
        Field::Password => validate_password(value),
        Field::Steps => validate_steps(value),
        Field::Calories => validate_calories(value),
        Field::ActiveTime => validate_active_time(value),
    }
}

// ─── Profile & Account ───────────────────────────────────────

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub fn validate_name(name: Option<&str>) -> ValidationResult {
    if is_blank(name) {
        return ValidationResult::invalid(FailureKind::Empty, "Name is required");
    }
    ValidationResult::valid()
}

/// Shared shape of the age/height checks: presence, integer, inclusive range.
fn validate_int_range(value: Option<&str>, label: &str, min: i32, max: i32) -> ValidationResult {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return ValidationResult::invalid(FailureKind::Empty, format!("{label} is required"));
    };

    match raw.parse::<i32>() {
        Ok(n) if n < min || n > max => ValidationResult::invalid(
            FailureKind::OutOfRange,
            format!("{label} must be between {min} and {max}"),
        ),
        Ok(_) => ValidationResult::valid(),
        Err(_) => {
            ValidationResult::invalid(FailureKind::NotNumeric, format!("{label} must be a number"))
        }
    }
}

pub fn validate_age(age: Option<&str>) -> ValidationResult {
    validate_int_range(age, "Age", MIN_AGE, MAX_AGE)
}

pub fn validate_height(height: Option<&str>) -> ValidationResult {
    validate_int_range(height, "Height", MIN_HEIGHT_CM, MAX_HEIGHT_CM)
}

pub fn validate_weight(weight: Option<&str>) -> ValidationResult {
    let Some(raw) = weight.filter(|v| !v.trim().is_empty()) else {
        return ValidationResult::invalid(FailureKind::Empty, "Weight is required");
    };

    match raw.trim().parse::<f32>() {
        Ok(kg) if !kg.is_finite() => {
            ValidationResult::invalid(FailureKind::NotNumeric, "Weight must be a number")
        }
        Ok(kg) if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&kg) => ValidationResult::invalid(
            FailureKind::OutOfRange,
            "Weight must be between 20 and 300",
        ),
        Ok(_) => ValidationResult::valid(),
        Err(_) => ValidationResult::invalid(FailureKind::NotNumeric, "Weight must be a number"),
    }
}

/// Any selector other than [`GENDER_UNSELECTED`] is accepted.
pub fn validate_gender(selection: i32) -> ValidationResult {
    if selection == GENDER_UNSELECTED {
        return ValidationResult::invalid(FailureKind::NotSelected, "Please select a gender");
    }
    ValidationResult::valid()
}

pub fn validate_email(email: Option<&str>) -> ValidationResult {
    let Some(email) = email.filter(|v| !v.trim().is_empty()) else {
        return ValidationResult::invalid(FailureKind::Empty, "Insert email");
    };
    if !email.validate_email() {
        return ValidationResult::invalid(FailureKind::InvalidFormat, "Insert a valid email");
    }
    ValidationResult::valid()
}

pub fn validate_password(password: Option<&str>) -> ValidationResult {
    let Some(password) = password.filter(|v| !v.trim().is_empty()) else {
        return ValidationResult::invalid(FailureKind::Empty, "Insert password");
    };
    if password.chars().count() < MIN_PASSWORD_LEN {
        return ValidationResult::invalid(
            FailureKind::TooShort,
            "Password must be at least 6 characters",
        );
    }
    ValidationResult::valid()
}

// ─── Daily Metrics ───────────────────────────────────────────

/// Messages for one whole-number daily metric.
struct MetricRules {
    label: &'static str,
    max: i32,
    too_large: fn(i32) -> String,
    not_whole: &'static str,
    not_numeric: &'static str,
}

fn steps_too_large(max: i32) -> String {
    format!("Steps exceed human capacity (max {max})")
}

fn calories_too_large(max: i32) -> String {
    format!("Calories exceed physiological limits (max {max})")
}

const STEPS_RULES: MetricRules = MetricRules {
    label: "Steps",
    max: MAX_STEPS_PER_DAY,
    too_large: steps_too_large,
    not_whole: "Steps must be whole numbers",
    not_numeric: "Steps must be a valid number",
};

const CALORIES_RULES: MetricRules = MetricRules {
    label: "Calories",
    max: MAX_CALORIES_PER_DAY,
    too_large: calories_too_large,
    not_whole: "Use whole numbers for calories",
    not_numeric: "Calories must be a valid number",
};

/// Null and whitespace-only checks; yields the trimmed value otherwise.
fn require_trimmed<'a>(value: Option<&'a str>, label: &str) -> Result<&'a str, ValidationResult> {
    let Some(value) = value else {
        return Err(ValidationResult::invalid(
            FailureKind::Null,
            format!("{label} cannot be null"),
        ));
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationResult::invalid(
            FailureKind::Empty,
            format!("{label} cannot be empty"),
        ));
    }
    Ok(trimmed)
}

fn validate_whole_metric(trimmed: &str, rules: &MetricRules) -> ValidationResult {
    match trimmed.parse::<i32>() {
        Ok(n) if n < 0 => ValidationResult::invalid(
            FailureKind::Negative,
            format!("{} cannot be negative", rules.label),
        ),
        Ok(n) if n > rules.max => {
            ValidationResult::invalid(FailureKind::TooLarge, (rules.too_large)(rules.max))
        }
        Ok(_) => ValidationResult::valid(),
        Err(_) if trimmed.contains('.') => {
            ValidationResult::invalid(FailureKind::NotWhole, rules.not_whole)
        }
        Err(_) => ValidationResult::invalid(FailureKind::NotNumeric, rules.not_numeric),
    }
}

pub fn validate_steps(steps: Option<&str>) -> ValidationResult {
    match require_trimmed(steps, STEPS_RULES.label) {
        Ok(trimmed) => validate_whole_metric(trimmed, &STEPS_RULES),
        Err(result) => result,
    }
}

pub fn validate_calories(calories: Option<&str>) -> ValidationResult {
    let trimmed = match require_trimmed(calories, CALORIES_RULES.label) {
        Ok(trimmed) => trimmed,
        Err(result) => return result,
    };

    // Checked before parsing: "0123" is rejected even though 123 is in range.
    if trimmed.len() > 1 && trimmed.starts_with('0') {
        return ValidationResult::invalid(FailureKind::LeadingZero, "Remove leading zeros");
    }

    validate_whole_metric(trimmed, &CALORIES_RULES)
}

/// Accepts either whole minutes or an `HH:MM` duration.
pub fn validate_active_time(active_time: Option<&str>) -> ValidationResult {
    let trimmed = match require_trimmed(active_time, "Active time") {
        Ok(trimmed) => trimmed,
        Err(result) => return result,
    };

    if trimmed.contains(':') {
        return validate_clock_duration(trimmed);
    }

    match trimmed.parse::<i32>() {
        Ok(n) if n < 0 => ValidationResult::invalid(FailureKind::Negative, "Time cannot be negative"),
        Ok(n) if i64::from(n) > MAX_ACTIVE_MINUTES => ValidationResult::invalid(
            FailureKind::ExceedsDay,
            format!("Exceeds 24 hours (max {MAX_ACTIVE_MINUTES} minutes)"),
        ),
        Ok(_) => ValidationResult::valid(),
        Err(_) if trimmed.contains('.') => {
            ValidationResult::invalid(FailureKind::NotWhole, "Use whole minutes")
        }
        Err(_) => ValidationResult::invalid(FailureKind::NotNumeric, "Enter valid minutes (0-1440)"),
    }
}

/// Split `HH:MM` into its parts, ignoring trailing empty segments
/// (`"1:30:"` has two parts, `"1:"` has one).
pub(crate) fn clock_parts(value: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = value.split(':').collect();
    while parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}

fn validate_clock_duration(value: &str) -> ValidationResult {
    let parts = clock_parts(value);
    if parts.len() != 2 {
        return ValidationResult::invalid(FailureKind::BadFormat, "Use HH:MM format");
    }

    let (Ok(hours), Ok(minutes)) = (parts[0].parse::<i32>(), parts[1].parse::<i32>()) else {
        return ValidationResult::invalid(FailureKind::NotNumeric, "Use numbers in HH:MM format");
    };

    if hours < 0 || minutes < 0 || minutes >= 60 {
        return ValidationResult::invalid(FailureKind::InvalidValues, "Invalid time values");
    }

    if i64::from(hours) * 60 + i64::from(minutes) > MAX_ACTIVE_MINUTES {
        return ValidationResult::invalid(FailureKind::ExceedsDay, "Time exceeds 24 hours");
    }

    ValidationResult::valid()
}

// ─── Whole Forms ─────────────────────────────────────────────

/// Validate the daily-metrics form (also used for goals), first failure wins.
pub fn validate_daily_entry(
    steps: Option<&str>,
    calories: Option<&str>,
    active_time: Option<&str>,
) -> Result<(), AppError> {
    validate_steps(steps).check(Field::Steps)?;
    validate_calories(calories).check(Field::Calories)?;
    validate_active_time(active_time).check(Field::ActiveTime)?;
    Ok(())
}

/// Validate the profile form in on-screen order, first failure wins.
pub fn validate_profile(
    name: Option<&str>,
    age: Option<&str>,
    height: Option<&str>,
    weight: Option<&str>,
    gender: Option<&str>,
) -> Result<(), AppError> {
    validate_name(name).check(Field::Name)?;
    validate_age(age).check(Field::Age)?;
    validate_height(height).check(Field::Height)?;
    validate_weight(weight).check(Field::Weight)?;
    validate_gender(gender_selection(gender)).check(Field::Gender)?;
    Ok(())
}
