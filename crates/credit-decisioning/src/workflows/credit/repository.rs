use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decisioning::{DecisionResult, RiskTier};
use super::domain::{ApplicationId, ApplicationInput, ApplicationStatus};

/// Repository record pairing the validated input with its decision and review status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub input: ApplicationInput,
    pub decision: DecisionResult,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ApplicationRecord {
    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            application_id: self.application_id.clone(),
            status: self.status.label(),
            credit_score: self.decision.score,
            risk_tier: self.decision.risk_tier,
            approval_probability_pct: self.decision.approval_probability_pct,
            loan_amount: self.input.credit_amount_requested(),
            decision_summary: self.decision.summary(),
            submitted_at: self.submitted_at,
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    /// Move a record from `expected` to `next` as one step. Returns `StatusChanged` when the
    /// stored status is no longer `expected`.
    fn update_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Records in submission order.
    fn list(&self, offset: usize, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record status is already {}", .current.label())]
    StatusChanged { current: ApplicationStatus },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Public projection of a stored application.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub credit_score: u16,
    pub risk_tier: RiskTier,
    pub approval_probability_pct: u8,
    pub loan_amount: f64,
    pub decision_summary: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
