//! Driving port for worksheet reads.
//!
//! Inbound adapters use this port to list and fetch worksheets together with
//! the derived overview data, without reaching into the record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::listing::{EmptyState, StatusPartitions, StatusView, TypeSummary, WorksheetFilter};
use crate::domain::presentation::{
    StatusBadge, format_date_long, format_date_short, format_rupiah, status_badge,
};
use crate::domain::{Error, TaxType, Worksheet, WorksheetId};

/// Serialisable worksheet for driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetPayload {
    pub id: Uuid,
    pub client_name: String,
    /// Stored tax type label.
    #[serde(rename = "type")]
    pub tax_type: String,
    pub period: String,
    /// Stored status label.
    pub status: String,
    pub assignee: Option<String>,
    pub amount: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Badge styling for the status.
    pub status_badge: StatusBadge,
    /// Amount formatted as rupiah.
    pub amount_display: String,
    /// Creation time in long Indonesian form, for the detail view.
    pub created_at_display: String,
    /// Last update as a short Indonesian date, for list rows.
    pub updated_at_display: String,
}

impl From<Worksheet> for WorksheetPayload {
    fn from(value: Worksheet) -> Self {
        let status_badge = status_badge(&value.status);
        let amount_display = format_rupiah(value.amount);
        let created_at_display = format_date_long(&value.created_at);
        let updated_at_display = format_date_short(&value.updated_at);
        Self {
            id: *value.id.as_uuid(),
            client_name: value.client_name,
            tax_type: value.tax_type.as_str().to_owned(),
            period: value.period,
            status: value.status.as_str().to_owned(),
            assignee: value.assignee,
            amount: value.amount,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
            status_badge,
            amount_display,
            created_at_display,
            updated_at_display,
        }
    }
}

/// Overview card for one tax type.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummaryPayload {
    pub tax_type: TaxType,
    pub description: String,
    pub count: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// Completed share in `[0, 100]`.
    pub completion_percentage: f64,
}

impl From<TypeSummary> for TypeSummaryPayload {
    fn from(value: TypeSummary) -> Self {
        Self {
            tax_type: value.tax_type,
            description: value.tax_type.description().to_owned(),
            count: value.count,
            completed: value.completed,
            in_progress: value.in_progress,
            pending: value.pending,
            completion_percentage: value.completion_percentage(),
        }
    }
}

/// Sizes of the status tabs over the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartitionCounts {
    pub all: usize,
    pub in_progress: usize,
    pub review: usize,
    pub completed: usize,
}

impl From<&StatusPartitions> for PartitionCounts {
    fn from(value: &StatusPartitions) -> Self {
        Self {
            all: value.view(StatusView::All).len(),
            in_progress: value.view(StatusView::InProgress).len(),
            review: value.view(StatusView::Review).len(),
            completed: value.view(StatusView::Completed).len(),
        }
    }
}

/// Request to list worksheets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWorksheetsRequest {
    pub filter: WorksheetFilter,
}

/// Filtered worksheets plus overview data.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListWorksheetsResponse {
    /// Records passing the filter, newest first.
    pub worksheets: Vec<WorksheetPayload>,
    /// Per-type summaries over every record.
    pub summaries: Vec<TypeSummaryPayload>,
    pub partitions: PartitionCounts,
    /// Number of stored records before filtering.
    pub total: usize,
    /// Why `worksheets` is empty, when it is.
    pub empty_state: Option<EmptyState>,
}

/// Domain use-case port for reading worksheets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorksheetQuery: Send + Sync {
    /// List worksheets matching a filter.
    async fn list_worksheets(
        &self,
        request: ListWorksheetsRequest,
    ) -> Result<ListWorksheetsResponse, Error>;

    /// Fetch one worksheet.
    async fn get_worksheet(&self, id: &WorksheetId) -> Result<WorksheetPayload, Error>;
}
