//! Port for the worksheet record store.
//!
//! The [`WorksheetRepository`] trait is the only way the domain reaches stored
//! worksheets. Every method is one remote round trip; adapters report failures
//! without retrying and keep no cache of their own.

use async_trait::async_trait;

use crate::domain::{NewWorksheet, Worksheet, WorksheetChanges, WorksheetId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by worksheet store adapters.
    pub enum WorksheetRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "worksheet store connection failed: {message}",
        /// The store rejected the request or returned undecodable data.
        Query { message: String } =>
            "worksheet store query failed: {message}",
        /// No worksheet exists with the given identifier.
        NotFound { id: WorksheetId } =>
            "worksheet {id} not found",
    }
}

impl WorksheetRepositoryError {
    /// Whether the error means the record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Record store contract for worksheets.
///
/// # Ordering
///
/// [`list`](Self::list) returns records newest first by `updated_at`.
///
/// # Missing records
///
/// `find_by_id`, `update` and `delete` fail with
/// [`WorksheetRepositoryError::NotFound`] when no row matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorksheetRepository: Send + Sync {
    /// Fetch every worksheet, most recently updated first.
    async fn list(&self) -> Result<Vec<Worksheet>, WorksheetRepositoryError>;

    /// Fetch one worksheet.
    async fn find_by_id(&self, id: &WorksheetId) -> Result<Worksheet, WorksheetRepositoryError>;

    /// Insert a validated worksheet; the store assigns id and timestamps.
    async fn insert(&self, worksheet: &NewWorksheet) -> Result<Worksheet, WorksheetRepositoryError>;

    /// Apply a partial update and return the stored row.
    async fn update(
        &self,
        id: &WorksheetId,
        changes: &WorksheetChanges,
    ) -> Result<Worksheet, WorksheetRepositoryError>;

    /// Permanently remove a worksheet.
    async fn delete(&self, id: &WorksheetId) -> Result<(), WorksheetRepositoryError>;
}
