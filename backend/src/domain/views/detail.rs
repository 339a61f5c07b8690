//! Worksheet detail controller.

use std::sync::Mutex;

use tracing::{debug, error, warn};

use super::{SubmitOutcome, ViewContext, ViewLifecycle, WorksheetForm, lock, messages};
use crate::domain::ports::{Notification, Route, WorksheetRepository};
use crate::domain::{Worksheet, WorksheetId};

struct DetailState {
    worksheet: Option<Worksheet>,
    loading: bool,
}

/// Controller behind the screen showing one worksheet.
///
/// A failed fetch, including a missing record, sends the user back to the
/// list. Deletion is not optimistic: the record stays shown until the store
/// confirms.
pub struct WorksheetDetailView<R> {
    ctx: ViewContext<R>,
    id: WorksheetId,
    lifecycle: ViewLifecycle,
    state: Mutex<DetailState>,
}

impl<R> WorksheetDetailView<R> {
    pub fn new(ctx: ViewContext<R>, id: WorksheetId) -> Self {
        Self {
            ctx,
            id,
            lifecycle: ViewLifecycle::new(),
            state: Mutex::new(DetailState {
                worksheet: None,
                loading: true,
            }),
        }
    }

    pub fn id(&self) -> WorksheetId {
        self.id
    }

    pub fn lifecycle(&self) -> &ViewLifecycle {
        &self.lifecycle
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// The record as last fetched.
    pub fn worksheet(&self) -> Option<Worksheet> {
        lock(&self.state).worksheet.clone()
    }

    /// An edit form pre-filled with the current record, once loaded.
    pub fn open_edit_form(&self) -> Option<WorksheetForm<R>> {
        let worksheet = self.worksheet()?;
        Some(WorksheetForm::edit(
            self.ctx.clone(),
            self.lifecycle.clone(),
            worksheet,
        ))
    }

    pub fn back_to_list(&self) {
        if self.lifecycle.is_active() {
            self.ctx.shell.navigate(Route::WorksheetList);
        }
    }
}

impl<R: WorksheetRepository> WorksheetDetailView<R> {
    /// Initial fetch.
    pub async fn mount(&self) -> bool {
        self.refresh().await
    }

    /// Refetch the record. Returns whether it was loaded.
    pub async fn refresh(&self) -> bool {
        let result = self.ctx.repository.find_by_id(&self.id).await;
        if !self.lifecycle.is_active() {
            debug!(id = %self.id, "detail view torn down; dropping fetch result");
            return false;
        }
        match result {
            Ok(worksheet) => {
                let mut state = lock(&self.state);
                state.worksheet = Some(worksheet);
                state.loading = false;
                true
            }
            Err(err) => {
                lock(&self.state).loading = false;
                error!(id = %self.id, error = %err, "loading worksheet failed");
                self.ctx.shell.notify(Notification::error(messages::LOAD_FAILED));
                self.ctx.shell.navigate(Route::WorksheetList);
                false
            }
        }
    }

    /// Submit an edit form opened from this view and refetch once it saves.
    pub async fn submit_form(&self, form: &WorksheetForm<R>) -> SubmitOutcome {
        let outcome = form.submit().await;
        if outcome.is_saved() {
            self.refresh().await;
        }
        outcome
    }

    /// Delete the record. Returns whether the store confirmed.
    pub async fn delete(&self) -> bool {
        let result = self.ctx.repository.delete(&self.id).await;
        if !self.lifecycle.is_active() {
            debug!(id = %self.id, "detail view torn down; dropping delete result");
            return false;
        }
        match result {
            Ok(()) => {
                self.ctx.shell.notify(Notification::success(messages::DELETED));
                self.ctx.shell.navigate(Route::WorksheetList);
                true
            }
            Err(err) => {
                warn!(id = %self.id, error = %err, "deleting worksheet failed");
                self.ctx.shell.notify(Notification::error(messages::DELETE_FAILED));
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "detail_tests.rs"]
mod tests;
