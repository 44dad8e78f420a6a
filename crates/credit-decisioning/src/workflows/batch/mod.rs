//! Batch scoring of applications exported as CSV.

mod parser;

use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::workflows::credit::decisioning::{DecisionEngine, DecisionResult};
use crate::workflows::credit::normalizer::{InputField, InvalidInputError};

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    TooManyRows { limit: usize },
    DuplicateColumn {
        field: InputField,
        first: String,
        second: String,
    },
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read application export: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid application CSV data: {}", err),
            BatchImportError::TooManyRows { limit } => {
                write!(f, "batch exceeds the limit of {} rows", limit)
            }
            BatchImportError::DuplicateColumn {
                field,
                first,
                second,
            } => write!(
                f,
                "columns '{}' and '{}' both map to {}; keep only one",
                first, second, field
            ),
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::TooManyRows { .. } | BatchImportError::DuplicateColumn { .. } => None,
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Result of scoring one CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum BatchOutcome {
    Scored(DecisionResult),
    Rejected(InvalidInputError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    /// 1-based line number in the source file (the header is line 1).
    pub line: u64,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
}

impl BatchReport {
    pub fn scored(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.outcome, BatchOutcome::Scored(_)))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.rows.len() - self.scored()
    }
}

pub struct CsvApplicationImporter {
    engine: DecisionEngine,
    row_limit: Option<usize>,
}

impl CsvApplicationImporter {
    pub fn new(engine: DecisionEngine) -> Self {
        Self {
            engine,
            row_limit: None,
        }
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<BatchReport, BatchImportError> {
        let file = std::fs::File::open(path)?;
        self.from_reader(file)
    }

    /// Each row is scored independently; an invalid row is reported, never fatal.
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<BatchReport, BatchImportError> {
        let rows = parser::parse_rows(reader, self.row_limit)?
            .into_iter()
            .map(|row| BatchRow {
                line: row.line,
                outcome: match self.engine.decide(&row.application) {
                    Ok(decision) => BatchOutcome::Scored(decision),
                    Err(error) => BatchOutcome::Rejected(error),
                },
            })
            .collect();

        Ok(BatchReport { rows })
    }
}
