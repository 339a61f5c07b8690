//! List derivations: filtering, per-type summaries and status partitions.
//!
//! Everything here is a pure function of the fetched records and the current
//! filter inputs, so callers can recompute on every read.

use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    EnumeratedValue, Recorded, TaxType, UnknownValueError, Worksheet, WorksheetStatus,
};

/// Keyword selecting every value in a filter.
pub const SELECT_ALL: &str = "all";

/// A filter over one enumerated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    /// No restriction.
    All,
    /// Only records whose column equals the value.
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: EnumeratedValue + PartialEq> Selection<T> {
    /// Whether a recorded value passes the filter.
    ///
    /// Unrecognised values only pass [`Selection::All`].
    #[must_use]
    pub fn admits(&self, value: &Recorded<T>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value.is(*wanted),
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr<Err = UnknownValueError>,
{
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SELECT_ALL {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Status filter.
pub type StatusFilter = Selection<WorksheetStatus>;
/// Tax type filter.
pub type TypeFilter = Selection<TaxType>;

/// The three independent list criteria.
///
/// # Examples
/// ```
/// use worksheets::domain::listing::{Selection, WorksheetFilter};
/// use worksheets::domain::WorksheetStatus;
///
/// let filter = WorksheetFilter {
///     status: Selection::Only(WorksheetStatus::Completed),
///     search: "maju".to_owned(),
///     ..WorksheetFilter::default()
/// };
/// assert!(!filter.is_unrestricted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorksheetFilter {
    /// Status criterion.
    pub status: StatusFilter,
    /// Tax type criterion.
    pub tax_type: TypeFilter,
    /// Case-insensitive free-text query; empty matches everything.
    pub search: String,
}

impl WorksheetFilter {
    /// Whether the filter lets every record through.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.status == Selection::All && self.tax_type == Selection::All && self.search.is_empty()
    }

    /// Whether a record satisfies all three criteria.
    #[must_use]
    pub fn matches(&self, worksheet: &Worksheet) -> bool {
        self.status.admits(&worksheet.status)
            && self.tax_type.admits(&worksheet.tax_type)
            && matches_search(worksheet, &self.search.to_lowercase())
    }

    /// Records passing the filter, in their original order.
    #[must_use]
    pub fn apply(&self, worksheets: &[Worksheet]) -> Vec<Worksheet> {
        worksheets
            .iter()
            .filter(|worksheet| self.matches(worksheet))
            .cloned()
            .collect()
    }
}

fn matches_search(worksheet: &Worksheet, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        Some(worksheet.client_name.as_str()),
        Some(worksheet.tax_type.as_str()),
        Some(worksheet.period.as_str()),
        worksheet.assignee.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(needle))
}

/// Progress counts for one tax type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    /// Tax type summarised.
    pub tax_type: TaxType,
    /// Worksheets of this type.
    pub count: usize,
    /// Worksheets marked Selesai.
    pub completed: usize,
    /// Worksheets marked Dalam Proses.
    pub in_progress: usize,
    /// Worksheets in Draft or Menunggu Review.
    pub pending: usize,
}

impl TypeSummary {
    /// Share of completed worksheets, in `[0, 100]`; zero when there are none.
    #[must_use]
    pub fn completion_percentage(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.completed as f64 / self.count as f64 * 100.0
    }
}

/// Summaries for every known tax type, in catalogue order.
///
/// Records with an unrecognised type are not counted.
#[must_use]
pub fn summarize_by_type(worksheets: &[Worksheet]) -> Vec<TypeSummary> {
    TaxType::ALL
        .into_iter()
        .map(|tax_type| {
            let mut summary = TypeSummary {
                tax_type,
                count: 0,
                completed: 0,
                in_progress: 0,
                pending: 0,
            };
            for worksheet in worksheets.iter().filter(|w| w.tax_type.is(tax_type)) {
                summary.count += 1;
                match worksheet.status.known() {
                    Some(WorksheetStatus::Completed) => summary.completed += 1,
                    Some(WorksheetStatus::InProgress) => summary.in_progress += 1,
                    Some(status) if status.is_pending() => summary.pending += 1,
                    _ => {}
                }
            }
            summary
        })
        .collect()
}

/// Named display partitions of the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatusView {
    /// Every filtered record.
    All,
    /// Dalam Proses.
    InProgress,
    /// Menunggu Review.
    Review,
    /// Selesai.
    Completed,
}

impl StatusView {
    /// Partitions in tab order.
    pub const ALL: [Self; 4] = [Self::All, Self::InProgress, Self::Review, Self::Completed];

    /// Whether a record belongs to the partition.
    #[must_use]
    pub fn admits(self, worksheet: &Worksheet) -> bool {
        match self {
            Self::All => true,
            Self::InProgress => worksheet.status.is(WorksheetStatus::InProgress),
            Self::Review => worksheet.status.is(WorksheetStatus::AwaitingReview),
            Self::Completed => worksheet.status.is(WorksheetStatus::Completed),
        }
    }
}

/// Filtered records split by status for tabbed display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusPartitions {
    /// Every filtered record.
    pub all: Vec<Worksheet>,
    /// Dalam Proses records.
    pub in_progress: Vec<Worksheet>,
    /// Menunggu Review records.
    pub review: Vec<Worksheet>,
    /// Selesai records.
    pub completed: Vec<Worksheet>,
}

impl StatusPartitions {
    /// Split already-filtered records.
    #[must_use]
    pub fn from_filtered(filtered: Vec<Worksheet>) -> Self {
        let pick = |view: StatusView| -> Vec<Worksheet> {
            filtered
                .iter()
                .filter(|worksheet| view.admits(worksheet))
                .cloned()
                .collect()
        };
        let in_progress = pick(StatusView::InProgress);
        let review = pick(StatusView::Review);
        let completed = pick(StatusView::Completed);
        Self {
            all: filtered,
            in_progress,
            review,
            completed,
        }
    }

    /// Records of one partition.
    #[must_use]
    pub fn view(&self, view: StatusView) -> &[Worksheet] {
        match view {
            StatusView::All => &self.all,
            StatusView::InProgress => &self.in_progress,
            StatusView::Review => &self.review,
            StatusView::Completed => &self.completed,
        }
    }
}

/// Why the filtered list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The store holds no worksheets.
    NoWorksheets,
    /// Worksheets exist but none pass the filter.
    NoMatches,
}

impl EmptyState {
    /// Decide the empty state from the total and filtered sizes.
    #[must_use]
    pub const fn for_counts(total: usize, filtered: usize) -> Option<Self> {
        match (total, filtered) {
            (0, _) => Some(Self::NoWorksheets),
            (_, 0) => Some(Self::NoMatches),
            _ => None,
        }
    }

    /// Message shown in place of the list.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoWorksheets => "Belum ada lembar kerja",
            Self::NoMatches => "Tidak ada data yang sesuai dengan filter",
        }
    }
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
