//! Framework-agnostic controllers for the worksheet screens.
//!
//! Each controller owns its state behind a mutex and reaches the outside
//! world only through [`WorksheetRepository`](crate::domain::ports::WorksheetRepository)
//! and [`ViewShell`]. Locks are never held across an `.await`. A controller's
//! [`ViewLifecycle`] is shared with the forms it opens; once torn down,
//! results of pending store calls are dropped without touching state or the
//! shell.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mockable::Clock;

use crate::domain::ports::ViewShell;

mod detail;
mod form;
mod list;

pub use detail::WorksheetDetailView;
pub use form::{FieldError, FormField, FormMode, FormValues, SubmitOutcome, WorksheetForm};
pub use list::WorksheetListView;

/// User-facing notification texts.
pub mod messages {
    /// A list or detail fetch failed.
    pub const LOAD_FAILED: &str = "Gagal memuat data lembar kerja";
    /// A worksheet was deleted.
    pub const DELETED: &str = "Lembar kerja berhasil dihapus";
    /// Deleting a worksheet failed.
    pub const DELETE_FAILED: &str = "Gagal menghapus lembar kerja";
    /// A worksheet was created.
    pub const CREATED: &str = "Lembar kerja berhasil dibuat";
    /// A worksheet was updated.
    pub const UPDATED: &str = "Lembar kerja berhasil diperbarui";
    /// Creating or updating a worksheet failed.
    pub const SAVE_FAILED: &str = "Gagal menyimpan lembar kerja";
}

/// Teardown flag shared by a view and the forms it opens.
///
/// # Examples
/// ```
/// use worksheets::domain::views::ViewLifecycle;
///
/// let lifecycle = ViewLifecycle::new();
/// let shared = lifecycle.clone();
/// lifecycle.teardown();
/// assert!(!shared.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct ViewLifecycle(Arc<AtomicBool>);

impl ViewLifecycle {
    /// A live lifecycle.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Mark the view as gone. Idempotent.
    pub fn teardown(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Whether completions should still be applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for ViewLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Collaborators every controller needs.
pub struct ViewContext<R> {
    repository: Arc<R>,
    shell: Arc<dyn ViewShell>,
    clock: Arc<dyn Clock>,
}

impl<R> ViewContext<R> {
    /// Bundle the record store, the host shell and the clock used to stamp edits.
    pub fn new(repository: Arc<R>, shell: Arc<dyn ViewShell>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            shell,
            clock,
        }
    }
}

impl<R> Clone for ViewContext<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            shell: Arc::clone(&self.shell),
            clock: Arc::clone(&self.clock),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests;
