//! Worksheet lifecycle statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EnumeratedValue, UnknownValueError};

/// Lifecycle status of a worksheet.
///
/// Labels are the Indonesian values stored in `worksheets.status`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum WorksheetStatus {
    /// Not started.
    #[default]
    Draft,
    /// Being prepared ("Dalam Proses").
    #[serde(rename = "Dalam Proses")]
    InProgress,
    /// Prepared and waiting for a reviewer ("Menunggu Review").
    #[serde(rename = "Menunggu Review")]
    AwaitingReview,
    /// Filed ("Selesai").
    #[serde(rename = "Selesai")]
    Completed,
}

impl WorksheetStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Draft,
        Self::InProgress,
        Self::AwaitingReview,
        Self::Completed,
    ];

    /// Stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InProgress => "Dalam Proses",
            Self::AwaitingReview => "Menunggu Review",
            Self::Completed => "Selesai",
        }
    }

    /// Whether the worksheet still counts as pending work.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Draft | Self::AwaitingReview)
    }
}

impl EnumeratedValue for WorksheetStatus {
    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for WorksheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorksheetStatus {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| UnknownValueError::status(s))
    }
}
