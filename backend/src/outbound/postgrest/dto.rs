//! Wire shapes for the `worksheets` REST resource.
//!
//! Rows are decoded leniently: unknown `type`/`status` labels survive as
//! [`Recorded::Unrecognised`](crate::domain::Recorded::Unrecognised).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    EnumeratedValue, NewWorksheet, Recorded, TaxType, Worksheet, WorksheetChanges, WorksheetId,
    WorksheetStatus,
};

#[derive(Debug, Deserialize)]
pub(super) struct WorksheetRowDto {
    pub(super) id: Uuid,
    pub(super) client_name: String,
    #[serde(rename = "type")]
    pub(super) tax_type: Recorded<TaxType>,
    pub(super) period: String,
    pub(super) status: Recorded<WorksheetStatus>,
    #[serde(default)]
    pub(super) assignee: Option<String>,
    #[serde(default)]
    pub(super) amount: Option<f64>,
    #[serde(default)]
    pub(super) notes: Option<String>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<WorksheetRowDto> for Worksheet {
    fn from(row: WorksheetRowDto) -> Self {
        Self {
            id: WorksheetId::from_uuid(row.id),
            client_name: row.client_name,
            tax_type: row.tax_type,
            period: row.period,
            status: row.status,
            assignee: row.assignee,
            amount: row.amount,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct InsertWorksheetDto<'a> {
    client_name: &'a str,
    #[serde(rename = "type")]
    tax_type: &'static str,
    period: &'a str,
    status: &'static str,
    assignee: Option<&'a str>,
    amount: Option<f64>,
    notes: Option<&'a str>,
}

impl<'a> From<&'a NewWorksheet> for InsertWorksheetDto<'a> {
    fn from(worksheet: &'a NewWorksheet) -> Self {
        Self {
            client_name: worksheet.client_name(),
            tax_type: worksheet.tax_type().as_str(),
            period: worksheet.period(),
            status: worksheet.status().as_str(),
            assignee: worksheet.assignee(),
            amount: worksheet.amount(),
            notes: worksheet.notes(),
        }
    }
}

/// PATCH body; absent keys leave columns untouched, `null` clears them.
#[derive(Debug, Serialize)]
pub(super) struct WorksheetChangesDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_name: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    tax_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<Option<&'a str>>,
    updated_at: DateTime<Utc>,
}

impl<'a> From<&'a WorksheetChanges> for WorksheetChangesDto<'a> {
    fn from(changes: &'a WorksheetChanges) -> Self {
        Self {
            client_name: changes.client_name(),
            tax_type: changes.tax_type().map(EnumeratedValue::as_str),
            period: changes.period(),
            status: changes.status().map(EnumeratedValue::as_str),
            assignee: changes.assignee(),
            amount: changes.amount(),
            notes: changes.notes(),
            updated_at: changes.updated_at(),
        }
    }
}
