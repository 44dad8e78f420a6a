use std::collections::BTreeMap;
use std::sync::{Arc, Barrier, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::workflows::credit::domain::{ApplicationId, ApplicationStatus, RawApplication, RawField};
use crate::workflows::credit::repository::{
    ApplicationRecord, ApplicationRepository, RepositoryError,
};
use crate::workflows::credit::{application_router, CreditApplicationService};

fn field(value: f64) -> Option<RawField> {
    Some(RawField::Number(value))
}

/// Scores 795: Low risk, 95% approval.
pub(super) fn strong_application() -> RawApplication {
    RawApplication {
        annual_income: field(60_000.0),
        monthly_debt: field(1_000.0),
        employment_years: field(6.0),
        age: field(40.0),
        credit_amount_requested: field(15_000.0),
        existing_credit_lines: field(0.0),
    }
}

/// Scores 510: no income, so both ratios take their worst branch.
pub(super) fn no_income_application() -> RawApplication {
    RawApplication {
        annual_income: field(0.0),
        monthly_debt: field(0.0),
        employment_years: field(0.0),
        age: field(25.0),
        credit_amount_requested: field(5_000.0),
        existing_credit_lines: field(1.0),
    }
}

pub(super) fn underage_application() -> RawApplication {
    RawApplication {
        age: field(15.0),
        ..strong_application()
    }
}

pub(super) fn intake_config() -> IntakeConfig {
    IntakeConfig {
        page_size: 10,
        max_batch_rows: 3,
    }
}

pub(super) fn build_service() -> (
    Arc<CreditApplicationService<MemoryRepository>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(CreditApplicationService::new(
        repository.clone(),
        intake_config(),
    ));
    (service, repository)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<BTreeMap<ApplicationId, ApplicationRecord>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("lock").len()
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record.status != expected {
            return Err(RepositoryError::StatusChanged {
                current: record.status,
            });
        }
        record.status = next;
        record.updated_at = Some(at);
        Ok(record.clone())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, offset: usize, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.values().skip(offset).take(limit).cloned().collect())
    }
}

/// Holds every `fetch` until `parties` callers have read, so concurrent reviews all see the
/// same stored status before any of them writes.
pub(super) struct LockstepRepository {
    inner: MemoryRepository,
    barrier: Barrier,
}

impl LockstepRepository {
    pub(super) fn new(parties: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            barrier: Barrier::new(parties),
        }
    }

    pub(super) fn seed(&self, record: ApplicationRecord) {
        self.inner.insert(record).expect("seed record");
    }

    pub(super) fn stored_status(&self, id: &ApplicationId) -> Option<ApplicationStatus> {
        self.inner
            .fetch(id)
            .expect("memory fetch")
            .map(|record| record.status)
    }
}

impl ApplicationRepository for LockstepRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        self.inner.update_status(id, expected, next, at)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let record = self.inner.fetch(id);
        self.barrier.wait();
        record
    }

    fn list(&self, offset: usize, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.list(offset, limit)
    }
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _expected: ApplicationStatus,
        _next: ApplicationStatus,
        _at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _offset: usize, _limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _expected: ApplicationStatus,
        _next: ApplicationStatus,
        _at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }

    fn list(&self, _offset: usize, _limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn router_with_service(
    service: Arc<CreditApplicationService<MemoryRepository>>,
) -> axum::Router {
    application_router(service)
}
