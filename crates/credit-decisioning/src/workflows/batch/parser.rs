use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::BatchImportError;
use crate::workflows::credit::domain::{RawApplication, RawField};
use crate::workflows::credit::normalizer::InputField;

/// Header spellings accepted for each field; must stay in step with `ApplicationCsvRow`.
const COLUMN_NAMES: [(InputField, &[&str]); 6] = [
    (InputField::AnnualIncome, &["annualIncome", "Annual Income"]),
    (InputField::MonthlyDebt, &["monthlyDebt", "Monthly Debt"]),
    (InputField::EmploymentYears, &["employmentYears", "Employment Years"]),
    (InputField::Age, &["age", "Age"]),
    (
        InputField::CreditAmountRequested,
        &["creditAmountRequested", "creditAmount", "Credit Amount"],
    ),
    (
        InputField::ExistingCreditLines,
        &["existingCreditLines", "existingCredits", "Existing Credits"],
    ),
];

#[derive(Debug)]
pub(crate) struct CsvApplicationRow {
    pub(crate) line: u64,
    pub(crate) application: RawApplication,
}

pub(crate) fn parse_rows<R: Read>(
    reader: R,
    row_limit: Option<usize>,
) -> Result<Vec<CsvApplicationRow>, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    reject_duplicate_columns(&headers)?;
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        if let Some(limit) = row_limit {
            if rows.len() >= limit {
                return Err(BatchImportError::TooManyRows { limit });
            }
        }

        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: ApplicationCsvRow = record.deserialize(Some(&headers))?;
        rows.push(CsvApplicationRow {
            line,
            application: row.into_raw(),
        });
    }

    Ok(rows)
}

/// Two headers naming the same field would otherwise fail every row during deserialization.
fn reject_duplicate_columns(headers: &csv::StringRecord) -> Result<(), BatchImportError> {
    let mut seen: Vec<(InputField, &str)> = Vec::new();

    for header in headers.iter() {
        let Some(field) = COLUMN_NAMES
            .iter()
            .find(|(_, names)| names.contains(&header))
            .map(|(field, _)| *field)
        else {
            continue;
        };

        if let Some((_, first)) = seen.iter().find(|(known, _)| *known == field) {
            return Err(BatchImportError::DuplicateColumn {
                field,
                first: first.to_string(),
                second: header.to_string(),
            });
        }
        seen.push((field, header));
    }

    Ok(())
}

/// Column layout accepted for batch scoring. Both the API field names and the
/// spreadsheet headers used by the operations team are recognised.
#[derive(Debug, Deserialize)]
struct ApplicationCsvRow {
    #[serde(
        rename = "annualIncome",
        alias = "Annual Income",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    annual_income: Option<String>,
    #[serde(
        rename = "monthlyDebt",
        alias = "Monthly Debt",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    monthly_debt: Option<String>,
    #[serde(
        rename = "employmentYears",
        alias = "Employment Years",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    employment_years: Option<String>,
    #[serde(
        rename = "age",
        alias = "Age",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    age: Option<String>,
    #[serde(
        rename = "creditAmountRequested",
        alias = "creditAmount",
        alias = "Credit Amount",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    credit_amount_requested: Option<String>,
    #[serde(
        rename = "existingCreditLines",
        alias = "existingCredits",
        alias = "Existing Credits",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    existing_credit_lines: Option<String>,
}

impl ApplicationCsvRow {
    fn into_raw(self) -> RawApplication {
        RawApplication {
            annual_income: self.annual_income.map(RawField::Text),
            monthly_debt: self.monthly_debt.map(RawField::Text),
            employment_years: self.employment_years.map(RawField::Text),
            age: self.age.map(RawField::Text),
            credit_amount_requested: self.credit_amount_requested.map(RawField::Text),
            existing_credit_lines: self.existing_credit_lines.map(RawField::Text),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
