//! Worksheet domain services implementing the query and command ports.
//!
//! The query service derives the same filtered list, per-type summaries and
//! status partitions the list view shows, so API clients and the view agree.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::listing::{EmptyState, StatusPartitions, summarize_by_type};
use crate::domain::ports::{
    CreateWorksheetRequest, ListWorksheetsRequest, ListWorksheetsResponse, PartitionCounts,
    UpdateWorksheetRequest, WorksheetCommand, WorksheetPayload, WorksheetQuery,
    WorksheetRepository, WorksheetRepositoryError,
};
use crate::domain::{
    Error, NewWorksheet, WorksheetChanges, WorksheetId, WorksheetValidationError,
};

pub(crate) fn map_repository_error(error: WorksheetRepositoryError) -> Error {
    match error {
        WorksheetRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("worksheet store unavailable: {message}"))
        }
        WorksheetRepositoryError::Query { message } => {
            Error::internal(format!("worksheet store error: {message}"))
        }
        WorksheetRepositoryError::NotFound { id } => {
            Error::not_found(format!("worksheet {id} not found"))
        }
    }
}

pub(crate) fn map_validation_error(error: WorksheetValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "validation_failed",
    }))
}

/// Read-side worksheet service.
#[derive(Clone)]
pub struct WorksheetQueryService<R> {
    repository: Arc<R>,
}

impl<R> WorksheetQueryService<R> {
    /// Create a query service over a record store.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> WorksheetQuery for WorksheetQueryService<R>
where
    R: WorksheetRepository,
{
    async fn list_worksheets(
        &self,
        request: ListWorksheetsRequest,
    ) -> Result<ListWorksheetsResponse, Error> {
        let all = self.repository.list().await.map_err(|error| {
            debug!(%error, "listing worksheets failed");
            map_repository_error(error)
        })?;

        let summaries = summarize_by_type(&all)
            .into_iter()
            .map(Into::into)
            .collect();
        let partitions = StatusPartitions::from_filtered(request.filter.apply(&all));
        let counts = PartitionCounts::from(&partitions);

        Ok(ListWorksheetsResponse {
            empty_state: EmptyState::for_counts(all.len(), partitions.all.len()),
            worksheets: partitions.all.into_iter().map(Into::into).collect(),
            summaries,
            partitions: counts,
            total: all.len(),
        })
    }

    async fn get_worksheet(&self, id: &WorksheetId) -> Result<WorksheetPayload, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map(Into::into)
            .map_err(map_repository_error)
    }
}

/// Write-side worksheet service.
#[derive(Clone)]
pub struct WorksheetCommandService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> WorksheetCommandService<R> {
    /// Create a command service; `clock` stamps `updated_at` on edits.
    ///
    /// Edits read the stored record first so the stamp always moves forward.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl<R> WorksheetCommand for WorksheetCommandService<R>
where
    R: WorksheetRepository,
{
    async fn create_worksheet(
        &self,
        request: CreateWorksheetRequest,
    ) -> Result<WorksheetPayload, Error> {
        let worksheet = NewWorksheet::new(request.draft).map_err(map_validation_error)?;
        self.repository
            .insert(&worksheet)
            .await
            .map(Into::into)
            .map_err(map_repository_error)
    }

    async fn update_worksheet(
        &self,
        request: UpdateWorksheetRequest,
    ) -> Result<WorksheetPayload, Error> {
        let UpdateWorksheetRequest { id, edit } = request;
        let changes =
            WorksheetChanges::new(edit.at(self.clock.utc())).map_err(map_validation_error)?;
        let previous = self
            .repository
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?;
        let changes = changes.advancing_past(previous.updated_at);
        self.repository
            .update(&id, &changes)
            .await
            .map(Into::into)
            .map_err(map_repository_error)
    }

    async fn delete_worksheet(&self, id: &WorksheetId) -> Result<(), Error> {
        self.repository.delete(id).await.map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "worksheet_service_tests.rs"]
mod tests;
