//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only depend on
//! the driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{WorksheetCommand, WorksheetQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub worksheets_query: Arc<dyn WorksheetQuery>,
    pub worksheets: Arc<dyn WorksheetCommand>,
}

impl HttpState {
    pub fn new(
        worksheets_query: Arc<dyn WorksheetQuery>,
        worksheets: Arc<dyn WorksheetCommand>,
    ) -> Self {
        Self {
            worksheets_query,
            worksheets,
        }
    }
}
