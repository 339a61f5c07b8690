//! Port for the presentation shell hosting the worksheet views.
//!
//! Controllers never render anything themselves. They hand transient
//! notifications and navigation requests to a [`ViewShell`], which the host
//! (a web front end, a terminal UI, a test recorder) implements.

use std::fmt;

use crate::domain::WorksheetId;

/// Tone of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// An action completed.
    Success,
    /// An action failed.
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Tone.
    pub kind: NotificationKind,
    /// User-facing text.
    pub message: String,
}

impl Notification {
    /// A success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// An error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Navigation targets between the worksheet views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The worksheet list.
    WorksheetList,
    /// One worksheet's detail page.
    WorksheetDetail(WorksheetId),
}

impl Route {
    /// Path of the route in the web front end.
    ///
    /// # Examples
    /// ```
    /// use worksheets::domain::ports::Route;
    ///
    /// assert_eq!(Route::WorksheetList.path(), "/worksheets");
    /// ```
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::WorksheetList => "/worksheets".to_owned(),
            Self::WorksheetDetail(id) => format!("/worksheets/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Host services the controllers rely on.
#[cfg_attr(test, mockall::automock)]
pub trait ViewShell: Send + Sync {
    /// Show a transient notification.
    fn notify(&self, notification: Notification);

    /// Move to another view.
    fn navigate(&self, route: Route);
}
