//! Driving port for worksheet mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, TaxType, WorksheetDraft, WorksheetId, WorksheetPatch, WorksheetStatus};

use super::worksheet_query::WorksheetPayload;

/// Field edits requested by a caller; the service stamps the time.
///
/// `None` leaves a column untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorksheetEdit {
    pub client_name: Option<String>,
    pub tax_type: Option<TaxType>,
    pub period: Option<String>,
    pub status: Option<WorksheetStatus>,
    pub assignee: Option<Option<String>>,
    pub amount: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
}

impl WorksheetEdit {
    /// Stamp the edit with its mutation time.
    #[must_use]
    pub fn at(self, updated_at: DateTime<Utc>) -> WorksheetPatch {
        WorksheetPatch {
            client_name: self.client_name,
            tax_type: self.tax_type,
            period: self.period,
            status: self.status,
            assignee: self.assignee,
            amount: self.amount,
            notes: self.notes,
            updated_at,
        }
    }
}

/// Request to create a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWorksheetRequest {
    pub draft: WorksheetDraft,
}

/// Request to edit a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateWorksheetRequest {
    pub id: WorksheetId,
    pub edit: WorksheetEdit,
}

/// Domain use-case port for changing worksheets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorksheetCommand: Send + Sync {
    /// Validate and store a new worksheet.
    async fn create_worksheet(
        &self,
        request: CreateWorksheetRequest,
    ) -> Result<WorksheetPayload, Error>;

    /// Validate and apply a partial update.
    async fn update_worksheet(
        &self,
        request: UpdateWorksheetRequest,
    ) -> Result<WorksheetPayload, Error>;

    /// Delete a worksheet permanently.
    async fn delete_worksheet(&self, id: &WorksheetId) -> Result<(), Error>;
}
