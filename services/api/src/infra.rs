use chrono::{DateTime, Utc};
use credit_decisioning::workflows::credit::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Store {
    order: Vec<ApplicationId>,
    records: HashMap<ApplicationId, ApplicationRecord>,
}

/// Process-local storage; records are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryApplicationRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.records.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.order.push(record.application_id.clone());
        guard
            .records
            .insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let record = guard
            .records
            .get_mut(id)
            .ok_or(RepositoryError::NotFound)?;
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
        let guard = self.lock()?;
        Ok(guard.records.get(id).cloned())
    }

    fn list(&self, offset: usize, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .order
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|id| guard.records.get(id).cloned())
            .collect())
    }
}
