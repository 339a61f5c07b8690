//! Display helpers shared by every presentation layer.
//!
//! Rendering itself lives outside this crate; these helpers fix the wording
//! and styling decisions so list, detail and API views agree.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Recorded, WorksheetStatus};

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    /// Filled badge.
    Default,
    /// Muted filled badge.
    Secondary,
    /// Border only.
    Outline,
}

/// Colour accent applied on top of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    /// Completed work.
    Green,
    /// Work in progress.
    Blue,
    /// Waiting on a reviewer.
    Yellow,
    /// No accent.
    Plain,
}

/// Badge describing a worksheet status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBadge {
    /// Text shown on the badge; always the recorded label.
    pub label: String,
    /// Visual weight.
    pub variant: BadgeVariant,
    /// Colour accent.
    pub tone: BadgeTone,
}

/// Build the badge for a recorded status.
///
/// Unrecognised labels keep their text but use Draft styling.
///
/// # Examples
/// ```
/// use worksheets::domain::presentation::{status_badge, BadgeVariant};
/// use worksheets::domain::{Recorded, WorksheetStatus};
///
/// let badge = status_badge(&Recorded::<WorksheetStatus>::parse("Arsip"));
/// assert_eq!(badge.label, "Arsip");
/// assert_eq!(badge.variant, BadgeVariant::Outline);
/// ```
#[must_use]
pub fn status_badge(status: &Recorded<WorksheetStatus>) -> StatusBadge {
    let (variant, tone) = match status.known().unwrap_or_default() {
        WorksheetStatus::Completed => (BadgeVariant::Default, BadgeTone::Green),
        WorksheetStatus::InProgress => (BadgeVariant::Secondary, BadgeTone::Blue),
        WorksheetStatus::AwaitingReview => (BadgeVariant::Secondary, BadgeTone::Yellow),
        WorksheetStatus::Draft => (BadgeVariant::Outline, BadgeTone::Plain),
    };
    StatusBadge {
        label: status.as_str().to_owned(),
        variant,
        tone,
    }
}

/// Format an amount as Indonesian rupiah.
///
/// Absent and zero amounts render as `Rp 0`.
///
/// # Examples
/// ```
/// use worksheets::domain::presentation::format_rupiah;
///
/// assert_eq!(format_rupiah(Some(1_250_000.5)), "Rp 1.250.000,50");
/// assert_eq!(format_rupiah(None), "Rp 0");
/// ```
#[must_use]
pub fn format_rupiah(amount: Option<f64>) -> String {
    let Some(value) = amount.filter(|value| *value != 0.0 && value.is_finite()) else {
        return "Rp 0".to_owned();
    };

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}Rp {},{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

const MONTHS_LONG: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

fn month_name(names: &'static [&'static str; 12], month0: u32) -> &'static str {
    usize::try_from(month0)
        .ok()
        .and_then(|index| names.get(index))
        .copied()
        .unwrap_or_default()
}

/// Long date with time, as shown on the detail view.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use worksheets::domain::presentation::format_date_long;
///
/// let at = Utc.with_ymd_and_hms(2025, 6, 12, 14, 30, 0).unwrap();
/// assert_eq!(format_date_long(&at), "12 Juni 2025 pukul 14.30");
/// ```
#[must_use]
pub fn format_date_long<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{} {} {} pukul {:02}.{:02}",
        at.day(),
        month_name(&MONTHS_LONG, at.month0()),
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// Short date, as shown on list rows.
#[must_use]
pub fn format_date_short<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{} {} {}",
        at.day(),
        month_name(&MONTHS_SHORT, at.month0()),
        at.year()
    )
}
