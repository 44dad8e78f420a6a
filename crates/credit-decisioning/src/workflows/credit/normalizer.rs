use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationInput, RawApplication, RawField};

/// Input fields known to the decisioning engine, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    AnnualIncome,
    MonthlyDebt,
    EmploymentYears,
    Age,
    CreditAmountRequested,
    ExistingCreditLines,
}

impl InputField {
    pub const fn label(self) -> &'static str {
        match self {
            InputField::AnnualIncome => "annualIncome",
            InputField::MonthlyDebt => "monthlyDebt",
            InputField::EmploymentYears => "employmentYears",
            InputField::Age => "age",
            InputField::CreditAmountRequested => "creditAmountRequested",
            InputField::ExistingCreditLines => "existingCreditLines",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationReason {
    Missing,
    NotNumeric { value: String },
    NotFinite,
    NotAnInteger { value: f64 },
    OutOfRange { value: f64, min: f64, max: Option<f64> },
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationReason::Missing => write!(f, "is required"),
            ViolationReason::NotNumeric { value } => write!(f, "'{value}' is not a number"),
            ViolationReason::NotFinite => write!(f, "must be a finite number"),
            ViolationReason::NotAnInteger { value } => write!(f, "{value} is not a whole number"),
            ViolationReason::OutOfRange {
                value,
                min,
                max: Some(max),
            } => write!(f, "{value} is outside the allowed range {min}-{max}"),
            ViolationReason::OutOfRange {
                value,
                min,
                max: None,
            } => write!(f, "{value} is below the minimum of {min}"),
        }
    }
}

/// A single rejected field together with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: InputField,
    pub reason: ViolationReason,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Raised when an application cannot be normalized into an [`ApplicationInput`].
///
/// Always carries at least one violation; every failing field is reported, not just the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("invalid application input: {}", describe(.violations))]
pub struct InvalidInputError {
    violations: Vec<FieldViolation>,
}

impl InvalidInputError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn fields(&self) -> impl Iterator<Item = InputField> + '_ {
        self.violations.iter().map(|violation| violation.field)
    }

    pub fn involves(&self, field: InputField) -> bool {
        self.fields().any(|candidate| candidate == field)
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates violations so a single pass reports every bad field.
#[derive(Debug, Default)]
pub(crate) struct Violations {
    entries: Vec<FieldViolation>,
}

impl Violations {
    fn push(&mut self, field: InputField, reason: ViolationReason) {
        self.entries.push(FieldViolation { field, reason });
    }

    pub(crate) fn require_non_negative(&mut self, field: InputField, value: f64) {
        if !value.is_finite() {
            self.push(field, ViolationReason::NotFinite);
        } else if value < 0.0 {
            self.push(
                field,
                ViolationReason::OutOfRange {
                    value,
                    min: 0.0,
                    max: None,
                },
            );
        }
    }

    pub(crate) fn require_age(&mut self, value: f64) {
        let min = f64::from(ApplicationInput::MIN_AGE);
        let max = f64::from(ApplicationInput::MAX_AGE);
        if !value.is_finite() {
            self.push(InputField::Age, ViolationReason::NotFinite);
        } else if value < min || value > max {
            self.push(
                InputField::Age,
                ViolationReason::OutOfRange {
                    value,
                    min,
                    max: Some(max),
                },
            );
        } else if value.fract() != 0.0 {
            self.push(InputField::Age, ViolationReason::NotAnInteger { value });
        }
    }

    pub(crate) fn require_credit_amount(&mut self, value: f64) {
        if !value.is_finite() {
            self.push(InputField::CreditAmountRequested, ViolationReason::NotFinite);
        } else if value < ApplicationInput::MIN_CREDIT_AMOUNT {
            self.push(
                InputField::CreditAmountRequested,
                ViolationReason::OutOfRange {
                    value,
                    min: ApplicationInput::MIN_CREDIT_AMOUNT,
                    max: None,
                },
            );
        }
    }

    pub(crate) fn into_result(self) -> Result<(), InvalidInputError> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(InvalidInputError {
                violations: self.entries,
            })
        }
    }
}

enum ParsedField {
    Missing,
    NotNumeric(String),
    Value(f64),
}

fn parse_field(raw: Option<&RawField>) -> ParsedField {
    match raw {
        None => ParsedField::Missing,
        Some(RawField::Number(value)) => ParsedField::Value(*value),
        Some(RawField::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return ParsedField::Missing;
            }
            match trimmed.parse::<f64>() {
                Ok(value) => ParsedField::Value(value),
                Err(_) => ParsedField::NotNumeric(trimmed.to_string()),
            }
        }
    }
}

/// Fields feeding derived ratios fall back to zero when unusable.
fn lenient_amount(raw: Option<&RawField>) -> f64 {
    match parse_field(raw) {
        ParsedField::Value(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

fn lenient_count(raw: Option<&RawField>) -> u32 {
    let value = lenient_amount(raw).trunc();
    value.min(f64::from(u32::MAX)) as u32
}

fn strict_value(raw: Option<&RawField>, field: InputField, violations: &mut Violations) -> Option<f64> {
    match parse_field(raw) {
        ParsedField::Missing => {
            violations.push(field, ViolationReason::Missing);
            None
        }
        ParsedField::NotNumeric(value) => {
            violations.push(field, ViolationReason::NotNumeric { value });
            None
        }
        ParsedField::Value(value) => Some(value),
    }
}

/// Convert raw form values into a validated [`ApplicationInput`].
///
/// `annualIncome`, `monthlyDebt`, `employmentYears` and `existingCreditLines` coerce empty,
/// non-numeric, non-finite or negative values to zero. `age` and `creditAmountRequested` are
/// never coerced: anything unusable is reported as a violation.
pub fn normalize(raw: &RawApplication) -> Result<ApplicationInput, InvalidInputError> {
    let mut violations = Violations::default();

    let age = strict_value(raw.age.as_ref(), InputField::Age, &mut violations);
    if let Some(age) = age {
        violations.require_age(age);
    }

    let credit_amount = strict_value(
        raw.credit_amount_requested.as_ref(),
        InputField::CreditAmountRequested,
        &mut violations,
    );
    if let Some(amount) = credit_amount {
        violations.require_credit_amount(amount);
    }

    violations.into_result()?;

    // Both are present and in range once the violation check above passes.
    let age = age.map(|value| value as u8).unwrap_or_default();
    let credit_amount = credit_amount.unwrap_or_default();

    ApplicationInput::new(
        lenient_amount(raw.annual_income.as_ref()),
        lenient_amount(raw.monthly_debt.as_ref()),
        lenient_amount(raw.employment_years.as_ref()),
        age,
        credit_amount,
        lenient_count(raw.existing_credit_lines.as_ref()),
    )
}
