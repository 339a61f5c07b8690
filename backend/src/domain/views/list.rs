//! Worksheet list controller.
//!
//! Holds the last fetched records plus the filter inputs. Everything shown
//! (filtered rows, per-type summaries, partitions, empty state) is derived on
//! read so it always reflects the current inputs.

use std::sync::Mutex;

use tracing::{debug, error};

use super::{SubmitOutcome, ViewContext, ViewLifecycle, WorksheetForm, lock, messages};
use crate::domain::listing::{
    EmptyState, StatusFilter, StatusPartitions, TypeFilter, TypeSummary, WorksheetFilter,
    summarize_by_type,
};
use crate::domain::ports::{Notification, Route, WorksheetRepository};
use crate::domain::{Worksheet, WorksheetId};

struct ListState {
    worksheets: Vec<Worksheet>,
    filter: WorksheetFilter,
    loading: bool,
}

/// Controller behind the worksheet list screen.
pub struct WorksheetListView<R> {
    ctx: ViewContext<R>,
    lifecycle: ViewLifecycle,
    state: Mutex<ListState>,
}

impl<R> WorksheetListView<R> {
    /// A view with no records yet; call [`mount`](Self::mount) to fetch.
    pub fn new(ctx: ViewContext<R>) -> Self {
        Self {
            ctx,
            lifecycle: ViewLifecycle::new(),
            state: Mutex::new(ListState {
                worksheets: Vec::new(),
                filter: WorksheetFilter::default(),
                loading: true,
            }),
        }
    }

    /// Lifecycle shared with forms opened from this view.
    pub fn lifecycle(&self) -> &ViewLifecycle {
        &self.lifecycle
    }

    /// Stop applying results of pending store calls.
    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    /// True until the first fetch has finished, successfully or not.
    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Every fetched record, newest first.
    pub fn worksheets(&self) -> Vec<Worksheet> {
        lock(&self.state).worksheets.clone()
    }

    /// Number of fetched records, ignoring the filter.
    pub fn total(&self) -> usize {
        lock(&self.state).worksheets.len()
    }

    pub fn filter(&self) -> WorksheetFilter {
        lock(&self.state).filter.clone()
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        lock(&self.state).filter.status = status;
    }

    pub fn set_type_filter(&self, tax_type: TypeFilter) {
        lock(&self.state).filter.tax_type = tax_type;
    }

    pub fn set_search(&self, search: impl Into<String>) {
        lock(&self.state).filter.search = search.into();
    }

    /// Records passing the current filter.
    pub fn filtered(&self) -> Vec<Worksheet> {
        let state = lock(&self.state);
        state.filter.apply(&state.worksheets)
    }

    /// Per-type progress over all records, not just the filtered ones.
    pub fn summaries(&self) -> Vec<TypeSummary> {
        summarize_by_type(&lock(&self.state).worksheets)
    }

    /// Filtered records split into the status tabs.
    pub fn partitions(&self) -> StatusPartitions {
        StatusPartitions::from_filtered(self.filtered())
    }

    /// Why nothing is listed, if nothing is.
    pub fn empty_state(&self) -> Option<EmptyState> {
        let state = lock(&self.state);
        let filtered = state
            .worksheets
            .iter()
            .filter(|worksheet| state.filter.matches(worksheet))
            .count();
        EmptyState::for_counts(state.worksheets.len(), filtered)
    }

    /// A create form bound to this view's lifecycle.
    pub fn open_create_form(&self) -> WorksheetForm<R> {
        WorksheetForm::create(self.ctx.clone(), self.lifecycle.clone())
    }

    /// Navigate to a worksheet's detail screen.
    pub fn open_detail(&self, id: WorksheetId) {
        if self.lifecycle.is_active() {
            self.ctx.shell.navigate(Route::WorksheetDetail(id));
        }
    }
}

impl<R: WorksheetRepository> WorksheetListView<R> {
    /// Initial fetch.
    pub async fn mount(&self) -> bool {
        self.refresh().await
    }

    /// Refetch every record. Returns whether the fetch was applied.
    ///
    /// On failure the previous records are kept and the user is notified.
    pub async fn refresh(&self) -> bool {
        let result = self.ctx.repository.list().await;
        if !self.lifecycle.is_active() {
            debug!("list view torn down; dropping fetch result");
            return false;
        }
        let mut state = lock(&self.state);
        state.loading = false;
        match result {
            Ok(worksheets) => {
                state.worksheets = worksheets;
                true
            }
            Err(err) => {
                drop(state);
                error!(error = %err, "loading worksheets failed");
                self.ctx.shell.notify(Notification::error(messages::LOAD_FAILED));
                false
            }
        }
    }

    /// Submit a form opened from this view and refetch once it saves.
    pub async fn submit_form(&self, form: &WorksheetForm<R>) -> SubmitOutcome {
        let outcome = form.submit().await;
        if outcome.is_saved() {
            self.refresh().await;
        }
        outcome
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
