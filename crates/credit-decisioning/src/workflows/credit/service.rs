use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::analytics::DashboardStats;
use super::decisioning::{DecisionEngine, DecisionResult};
use super::domain::{ApplicationId, ApplicationStatus, RawApplication};
use super::normalizer::{normalize, InvalidInputError};
use super::repository::{ApplicationRecord, ApplicationRepository, RepositoryError};
use crate::config::IntakeConfig;
use crate::workflows::batch::{BatchImportError, BatchReport, CsvApplicationImporter};

/// Service composing the decisioning engine with application storage.
pub struct CreditApplicationService<R> {
    repository: Arc<R>,
    engine: DecisionEngine,
    intake: IntakeConfig,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R> CreditApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, intake: IntakeConfig) -> Self {
        Self {
            repository,
            engine: DecisionEngine::new(),
            intake,
        }
    }

    pub fn intake(&self) -> &IntakeConfig {
        &self.intake
    }

    /// Score an application without storing it.
    pub fn calculate(
        &self,
        raw: &RawApplication,
    ) -> Result<DecisionResult, ApplicationServiceError> {
        let decision = self.engine.decide(raw).map_err(log_rejection)?;
        Ok(decision)
    }

    /// Validate, score and persist a new application in `Pending` status.
    pub fn submit(
        &self,
        raw: &RawApplication,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let input = normalize(raw).map_err(log_rejection)?;
        let decision = self.engine.score(&input);

        let record = ApplicationRecord {
            application_id: next_application_id(),
            input,
            decision,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            updated_at: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            application_id = %stored.application_id.0,
            score = stored.decision.score,
            risk_tier = stored.decision.risk_tier.label(),
            "credit application scored"
        );
        Ok(stored)
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Page through stored applications; `limit` is capped at the configured page size.
    pub fn list(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        let limit = limit
            .unwrap_or(self.intake.page_size)
            .min(self.intake.page_size);
        Ok(self.repository.list(offset, limit)?)
    }

    /// Record the reviewer's verdict on a pending application.
    pub fn update_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let current = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?
            .status;

        if !current.can_transition_to(status) {
            return Err(ApplicationServiceError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        // A concurrent review may have decided the record since the fetch above.
        let record = self
            .repository
            .update_status(application_id, current, status, Utc::now())
            .map_err(|error| match error {
                RepositoryError::StatusChanged { current } => {
                    ApplicationServiceError::InvalidTransition {
                        from: current,
                        to: status,
                    }
                }
                other => ApplicationServiceError::Repository(other),
            })?;

        info!(
            application_id = %record.application_id.0,
            status = status.label(),
            "credit application reviewed"
        );
        Ok(record)
    }

    pub fn dashboard(&self) -> Result<DashboardStats, ApplicationServiceError> {
        let records = self.repository.list(0, usize::MAX)?;
        Ok(DashboardStats::from_records(&records))
    }

    /// Score every row of a CSV export. Rows are independent; nothing is stored.
    pub fn import_csv<Rd: Read>(&self, reader: Rd) -> Result<BatchReport, ApplicationServiceError> {
        let report = CsvApplicationImporter::new(self.engine)
            .with_row_limit(self.intake.max_batch_rows)
            .from_reader(reader)?;

        info!(
            rows = report.rows.len(),
            scored = report.scored(),
            rejected = report.rejected(),
            "batch scoring finished"
        );
        Ok(report)
    }
}

fn log_rejection(error: InvalidInputError) -> InvalidInputError {
    let fields: Vec<&str> = error.fields().map(|field| field.label()).collect();
    warn!(?fields, "application input rejected");
    error
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Input(#[from] InvalidInputError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("cannot move application from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error(transparent)]
    Import(#[from] BatchImportError),
}
