//! In-process worksheet store.
//!
//! Backs the server when no external store is configured and gives tests a
//! real repository without I/O. Ids come from UUID v4 and timestamps from the
//! injected clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{WorksheetRepository, WorksheetRepositoryError};
use crate::domain::{NewWorksheet, Worksheet, WorksheetChanges, WorksheetId};

/// Mutex-guarded map of worksheets keyed by id.
pub struct InMemoryWorksheetRepository {
    rows: Mutex<HashMap<WorksheetId, Worksheet>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryWorksheetRepository {
    /// Create an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Create a store holding `worksheets` verbatim.
    ///
    /// Rows are kept exactly as given, including unrecognised labels, so tests
    /// can reproduce data written by other clients.
    pub fn with_worksheets(clock: Arc<dyn Clock>, worksheets: Vec<Worksheet>) -> Self {
        let repository = Self::new(clock);
        {
            let mut rows = repository.rows();
            for worksheet in worksheets {
                rows.insert(worksheet.id, worksheet);
            }
        }
        repository
    }

    /// Number of stored worksheets.
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    fn rows(&self) -> MutexGuard<'_, HashMap<WorksheetId, Worksheet>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WorksheetRepository for InMemoryWorksheetRepository {
    async fn list(&self) -> Result<Vec<Worksheet>, WorksheetRepositoryError> {
        let mut worksheets: Vec<_> = self.rows().values().cloned().collect();
        worksheets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(worksheets)
    }

    async fn find_by_id(&self, id: &WorksheetId) -> Result<Worksheet, WorksheetRepositoryError> {
        self.rows()
            .get(id)
            .cloned()
            .ok_or_else(|| WorksheetRepositoryError::not_found(*id))
    }

    async fn insert(&self, worksheet: &NewWorksheet) -> Result<Worksheet, WorksheetRepositoryError> {
        let now = self.clock.utc();
        let stored = Worksheet {
            id: WorksheetId::random(),
            client_name: worksheet.client_name().to_owned(),
            tax_type: worksheet.tax_type().into(),
            period: worksheet.period().to_owned(),
            status: worksheet.status().into(),
            assignee: worksheet.assignee().map(str::to_owned),
            amount: worksheet.amount(),
            notes: worksheet.notes().map(str::to_owned),
            created_at: now,
            updated_at: now,
        };
        debug!(id = %stored.id, "worksheet inserted in memory");
        self.rows().insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: &WorksheetId,
        changes: &WorksheetChanges,
    ) -> Result<Worksheet, WorksheetRepositoryError> {
        let mut rows = self.rows();
        let worksheet = rows
            .get_mut(id)
            .ok_or_else(|| WorksheetRepositoryError::not_found(*id))?;
        changes.apply_to(worksheet);
        Ok(worksheet.clone())
    }

    async fn delete(&self, id: &WorksheetId) -> Result<(), WorksheetRepositoryError> {
        self.rows()
            .remove(id)
            .map(drop)
            .ok_or_else(|| WorksheetRepositoryError::not_found(*id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{TaxType, WorksheetDraft, WorksheetPatch, WorksheetStatus};
    use crate::test_support::{SteppingClock, sample_worksheet};

    #[fixture]
    fn clock() -> Arc<SteppingClock> {
        Arc::new(SteppingClock::default())
    }

    fn draft(client_name: &str) -> NewWorksheet {
        NewWorksheet::new(WorksheetDraft {
            client_name: client_name.to_owned(),
            tax_type: TaxType::Ppn,
            period: "Juli 2025".to_owned(),
            ..WorksheetDraft::default()
        })
        .expect("valid draft")
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_id_and_timestamps(clock: Arc<SteppingClock>) {
        let repo = InMemoryWorksheetRepository::new(clock.clone());
        let stored = repo.insert(&draft("PT Maju")).await.expect("insert");

        assert_eq!(stored.created_at, clock.utc());
        assert_eq!(stored.updated_at, stored.created_at);
        assert!(stored.status.is(WorksheetStatus::Draft));
        assert_eq!(repo.find_by_id(&stored.id).await.expect("find"), stored);
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_newest_first(clock: Arc<SteppingClock>) {
        let repo = InMemoryWorksheetRepository::new(clock.clone());
        let first = repo.insert(&draft("PT Lama")).await.expect("insert");
        clock.advance(TimeDelta::minutes(1));
        let second = repo.insert(&draft("PT Baru")).await.expect("insert");

        let ids: Vec<_> = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_missing_rows(clock: Arc<SteppingClock>) {
        let repo = InMemoryWorksheetRepository::new(clock.clone());
        let id = WorksheetId::random();
        let changes =
            WorksheetChanges::new(WorksheetPatch::touching(clock.utc())).expect("valid patch");

        let update = repo.update(&id, &changes).await.expect_err("missing");
        let delete = repo.delete(&id).await.expect_err("missing");
        assert_eq!(update, WorksheetRepositoryError::not_found(id));
        assert_eq!(delete, WorksheetRepositoryError::not_found(id));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_row_from_list(clock: Arc<SteppingClock>) {
        let kept = sample_worksheet("PT Maju", "PPN", "Draft");
        let doomed = sample_worksheet("CV Sejahtera", "PBB", "Arsip");
        let repo =
            InMemoryWorksheetRepository::with_worksheets(clock, vec![kept.clone(), doomed.clone()]);

        repo.delete(&doomed.id).await.expect("delete");

        assert_eq!(repo.list().await.expect("list"), vec![kept]);
        assert_eq!(repo.len(), 1);
    }
}
