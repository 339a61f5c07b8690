//! Builds the HTTP port bundle over the selected record store.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use worksheets::domain::ports::WorksheetRepository;
use worksheets::domain::{WorksheetCommandService, WorksheetQueryService};
use worksheets::inbound::http::state::HttpState;
use worksheets::outbound::memory::InMemoryWorksheetRepository;
use worksheets::outbound::persistence::DieselWorksheetRepository;

use super::config::WorksheetStore;

fn services_over<R>(repository: Arc<R>, clock: Arc<dyn Clock>) -> HttpState
where
    R: WorksheetRepository + 'static,
{
    HttpState::new(
        Arc::new(WorksheetQueryService::new(repository.clone())),
        Arc::new(WorksheetCommandService::new(repository, clock)),
    )
}

/// Wire query and command services to the configured store.
pub(crate) fn build_http_state(store: WorksheetStore) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match store {
        WorksheetStore::Diesel(pool) => {
            services_over(Arc::new(DieselWorksheetRepository::new(pool)), clock)
        }
        WorksheetStore::Postgrest(repository) => services_over(Arc::new(repository), clock),
        WorksheetStore::InMemory => services_over(
            Arc::new(InMemoryWorksheetRepository::new(clock.clone())),
            clock,
        ),
    }
}
