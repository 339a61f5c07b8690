//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod view_shell;
mod worksheet_command;
mod worksheet_query;
mod worksheet_repository;

#[cfg(test)]
pub use view_shell::MockViewShell;
pub use view_shell::{Notification, NotificationKind, Route, ViewShell};
#[cfg(test)]
pub use worksheet_command::MockWorksheetCommand;
pub use worksheet_command::{
    CreateWorksheetRequest, UpdateWorksheetRequest, WorksheetCommand, WorksheetEdit,
};
#[cfg(test)]
pub use worksheet_query::MockWorksheetQuery;
pub use worksheet_query::{
    ListWorksheetsRequest, ListWorksheetsResponse, PartitionCounts, TypeSummaryPayload,
    WorksheetPayload, WorksheetQuery,
};
#[cfg(test)]
pub use worksheet_repository::MockWorksheetRepository;
pub use worksheet_repository::{WorksheetRepository, WorksheetRepositoryError};
