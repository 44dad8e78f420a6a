use serde::{Deserialize, Serialize};

use super::normalizer::{self, InputField, InvalidInputError, Violations};

/// Identifier wrapper for submitted credit applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// A single form value as it arrives from a client: either a JSON number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for RawField {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Unvalidated applicant data, typically straight from the submission form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawApplication {
    #[serde(default)]
    pub annual_income: Option<RawField>,
    #[serde(default)]
    pub monthly_debt: Option<RawField>,
    #[serde(default)]
    pub employment_years: Option<RawField>,
    #[serde(default)]
    pub age: Option<RawField>,
    #[serde(default, alias = "creditAmount")]
    pub credit_amount_requested: Option<RawField>,
    #[serde(default, alias = "existingCredits")]
    pub existing_credit_lines: Option<RawField>,
}

impl From<&ApplicationInput> for RawApplication {
    fn from(input: &ApplicationInput) -> Self {
        Self {
            annual_income: Some(input.annual_income.into()),
            monthly_debt: Some(input.monthly_debt.into()),
            employment_years: Some(input.employment_years.into()),
            age: Some(u32::from(input.age).into()),
            credit_amount_requested: Some(input.credit_amount_requested.into()),
            existing_credit_lines: Some(input.existing_credit_lines.into()),
        }
    }
}

/// Validated applicant financials consumed by the decisioning engine.
///
/// Every numeric field is finite and non-negative, `age` lies in `18..=100` and the requested
/// credit amount is at least 1000. Deserialization runs through the input normalizer, so a value
/// of this type can only exist in a valid state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawApplication")]
pub struct ApplicationInput {
    annual_income: f64,
    monthly_debt: f64,
    employment_years: f64,
    age: u8,
    credit_amount_requested: f64,
    existing_credit_lines: u32,
}

impl ApplicationInput {
    pub const MIN_AGE: u8 = 18;
    pub const MAX_AGE: u8 = 100;
    pub const MIN_CREDIT_AMOUNT: f64 = 1000.0;

    /// Strict constructor for already-typed values. No coercion is applied.
    pub fn new(
        annual_income: f64,
        monthly_debt: f64,
        employment_years: f64,
        age: u8,
        credit_amount_requested: f64,
        existing_credit_lines: u32,
    ) -> Result<Self, InvalidInputError> {
        let mut violations = Violations::default();
        violations.require_non_negative(InputField::AnnualIncome, annual_income);
        violations.require_non_negative(InputField::MonthlyDebt, monthly_debt);
        violations.require_non_negative(InputField::EmploymentYears, employment_years);
        violations.require_age(f64::from(age));
        violations.require_credit_amount(credit_amount_requested);
        violations.into_result()?;

        Ok(Self {
            annual_income,
            monthly_debt,
            employment_years,
            age,
            credit_amount_requested,
            existing_credit_lines,
        })
    }

    pub fn annual_income(&self) -> f64 {
        self.annual_income
    }

    pub fn monthly_debt(&self) -> f64 {
        self.monthly_debt
    }

    pub fn employment_years(&self) -> f64 {
        self.employment_years
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn credit_amount_requested(&self) -> f64 {
        self.credit_amount_requested
    }

    pub fn existing_credit_lines(&self) -> u32 {
        self.existing_credit_lines
    }
}

impl TryFrom<RawApplication> for ApplicationInput {
    type Error = InvalidInputError;

    fn try_from(raw: RawApplication) -> Result<Self, Self::Error> {
        normalizer::normalize(&raw)
    }
}

/// Review status tracked for a stored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Only pending applications can be decided, and only once.
    pub const fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (
                ApplicationStatus::Pending,
                ApplicationStatus::Approved | ApplicationStatus::Rejected
            )
        )
    }
}
