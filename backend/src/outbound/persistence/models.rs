//! Internal Diesel row structs for the `worksheets` table.
//!
//! These never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::worksheets;
use crate::domain::{
    EnumeratedValue, NewWorksheet, Recorded, Worksheet, WorksheetChanges, WorksheetId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = worksheets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorksheetRow {
    pub id: Uuid,
    pub client_name: String,
    pub tax_type: String,
    pub period: String,
    pub status: String,
    pub assignee: Option<String>,
    pub amount: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorksheetRow> for Worksheet {
    fn from(row: WorksheetRow) -> Self {
        Self {
            id: WorksheetId::from_uuid(row.id),
            client_name: row.client_name,
            tax_type: Recorded::parse(row.tax_type),
            period: row.period,
            status: Recorded::parse(row.status),
            assignee: row.assignee,
            amount: row.amount,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert values; `id` and both timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = worksheets)]
pub(crate) struct NewWorksheetRow<'a> {
    pub client_name: &'a str,
    pub tax_type: &'static str,
    pub period: &'a str,
    pub status: &'static str,
    pub assignee: Option<&'a str>,
    pub amount: Option<f64>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a NewWorksheet> for NewWorksheetRow<'a> {
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

/// Partial update. Outer `None` skips a column; `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = worksheets)]
pub(crate) struct WorksheetChangeset<'a> {
    pub client_name: Option<&'a str>,
    pub tax_type: Option<&'static str>,
    pub period: Option<&'a str>,
    pub status: Option<&'static str>,
    pub assignee: Option<Option<&'a str>>,
    pub amount: Option<Option<f64>>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a WorksheetChanges> for WorksheetChangeset<'a> {
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
