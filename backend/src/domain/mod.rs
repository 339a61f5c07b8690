//! Domain primitives, derivations and use cases.
//!
//! Purpose: define the worksheet model, the pure list derivations shared by
//! every view, the ports adapters plug into, and the view controllers that
//! drive them. Nothing here performs I/O directly.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Worksheet and its write types — the stored record and validated inputs.
//! - WorksheetQueryService / WorksheetCommandService — driving port
//!   implementations over a [`ports::WorksheetRepository`].

pub mod error;
pub mod listing;
pub mod ports;
pub mod presentation;
pub mod views;
mod worksheet;
mod worksheet_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::worksheet::{
    EnumeratedValue, NewWorksheet, Recorded, TaxType, UnknownValueError, Worksheet,
    WorksheetChanges, WorksheetDraft, WorksheetId, WorksheetPatch, WorksheetStatus,
    WorksheetValidationError, next_update_time,
};
pub use self::worksheet_service::{WorksheetCommandService, WorksheetQueryService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use worksheets::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("worksheet not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
