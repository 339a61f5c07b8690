//! Worksheet data model.
//!
//! A worksheet tracks one client's tax preparation for a period. Records read
//! back from the store are kept lenient: status and type labels outside the
//! known sets are preserved as [`Recorded::Unrecognised`] rather than failing
//! the read. Writes only ever carry known values.

mod status;
mod tax_type;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

pub use status::WorksheetStatus;
pub use tax_type::TaxType;

/// Label of an enumerated column did not match any known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownValueError {
    kind: &'static str,
    value: String,
}

impl UnknownValueError {
    fn tax_type(value: &str) -> Self {
        Self {
            kind: "tax type",
            value: value.to_owned(),
        }
    }

    fn status(value: &str) -> Self {
        Self {
            kind: "status",
            value: value.to_owned(),
        }
    }

    /// The rejected label.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// Closed set of labels stored as text.
pub trait EnumeratedValue: Copy + FromStr {
    /// Stored label for the value.
    fn as_str(self) -> &'static str;
}

/// A stored enumerated value that may fall outside the known set.
///
/// # Examples
/// ```
/// use worksheets::domain::{Recorded, WorksheetStatus};
///
/// let known: Recorded<WorksheetStatus> = Recorded::parse("Selesai");
/// assert_eq!(known.known(), Some(WorksheetStatus::Completed));
///
/// let odd: Recorded<WorksheetStatus> = Recorded::parse("Archived");
/// assert_eq!(odd.known(), None);
/// assert_eq!(odd.as_str(), "Archived");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recorded<T> {
    /// One of the enumerated values.
    Known(T),
    /// Any other label, preserved verbatim.
    Unrecognised(String),
}

impl<T: EnumeratedValue> Recorded<T> {
    /// Classify a stored label.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.parse::<T>() {
            Ok(value) => Self::Known(value),
            Err(_) => Self::Unrecognised(raw),
        }
    }

    /// The known value, if any.
    #[must_use]
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unrecognised(_) => None,
        }
    }

    /// The label as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(value) => value.as_str(),
            Self::Unrecognised(raw) => raw.as_str(),
        }
    }

    /// Whether the recorded value is exactly `value`.
    #[must_use]
    pub fn is(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.known() == Some(value)
    }
}

impl<T> From<T> for Recorded<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: EnumeratedValue> fmt::Display for Recorded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: EnumeratedValue> Serialize for Recorded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, T: EnumeratedValue> Deserialize<'de> for Recorded<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::parse)
    }
}

/// Server-assigned worksheet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorksheetId(Uuid);

impl WorksheetId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for WorksheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for WorksheetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A worksheet as held by the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    /// Primary key.
    pub id: WorksheetId,
    /// Client the worksheet is prepared for.
    pub client_name: String,
    /// Tax type; lenient on read.
    pub tax_type: Recorded<TaxType>,
    /// Free-form period label, e.g. "Juni 2025".
    pub period: String,
    /// Lifecycle status; lenient on read.
    pub status: Recorded<WorksheetStatus>,
    /// Person responsible, if assigned.
    pub assignee: Option<String>,
    /// Amount in rupiah.
    pub amount: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation time, set by the store.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// Validation failures for worksheet writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorksheetValidationError {
    /// `client_name` was blank.
    #[error("client name must not be empty")]
    EmptyClientName,
    /// `period` was blank.
    #[error("period must not be empty")]
    EmptyPeriod,
    /// `amount` was NaN or infinite.
    #[error("amount must be a finite number")]
    NonFiniteAmount,
}

impl WorksheetValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyClientName => "clientName",
            Self::EmptyPeriod => "period",
            Self::NonFiniteAmount => "amount",
        }
    }
}

/// Unvalidated input for a new worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorksheetDraft {
    /// Client name; required.
    pub client_name: String,
    /// Tax type.
    pub tax_type: TaxType,
    /// Period label; required.
    pub period: String,
    /// Initial status.
    pub status: WorksheetStatus,
    /// Optional assignee; blank is treated as absent.
    pub assignee: Option<String>,
    /// Optional amount.
    pub amount: Option<f64>,
    /// Optional notes; blank is treated as absent.
    pub notes: Option<String>,
}

fn required_text(
    value: &str,
    error: WorksheetValidationError,
) -> Result<String, WorksheetValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn checked_amount(amount: Option<f64>) -> Result<Option<f64>, WorksheetValidationError> {
    match amount {
        Some(value) if !value.is_finite() => Err(WorksheetValidationError::NonFiniteAmount),
        other => Ok(other),
    }
}

/// Validated worksheet ready for insertion.
///
/// ## Invariants
/// - `client_name` and `period` are trimmed and non-empty.
/// - optional text fields are either absent or non-blank.
/// - `amount`, when present, is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorksheet {
    client_name: String,
    tax_type: TaxType,
    period: String,
    status: WorksheetStatus,
    assignee: Option<String>,
    amount: Option<f64>,
    notes: Option<String>,
}

impl NewWorksheet {
    /// Validate a draft.
    ///
    /// # Examples
    /// ```
    /// use worksheets::domain::{NewWorksheet, TaxType, WorksheetDraft};
    ///
    /// let draft = WorksheetDraft {
    ///     client_name: " PT Maju ".to_owned(),
    ///     tax_type: TaxType::Ppn,
    ///     period: "Juli 2025".to_owned(),
    ///     assignee: Some(String::new()),
    ///     ..WorksheetDraft::default()
    /// };
    /// let worksheet = NewWorksheet::new(draft).expect("valid draft");
    /// assert_eq!(worksheet.client_name(), "PT Maju");
    /// assert_eq!(worksheet.assignee(), None);
    /// ```
    pub fn new(draft: WorksheetDraft) -> Result<Self, WorksheetValidationError> {
        let WorksheetDraft {
            client_name,
            tax_type,
            period,
            status,
            assignee,
            amount,
            notes,
        } = draft;
        Ok(Self {
            client_name: required_text(&client_name, WorksheetValidationError::EmptyClientName)?,
            tax_type,
            period: required_text(&period, WorksheetValidationError::EmptyPeriod)?,
            status,
            assignee: optional_text(assignee),
            amount: checked_amount(amount)?,
            notes: optional_text(notes),
        })
    }

    /// Client name.
    #[must_use]
    pub fn client_name(&self) -> &str {
        self.client_name.as_str()
    }

    /// Tax type.
    #[must_use]
    pub fn tax_type(&self) -> TaxType {
        self.tax_type
    }

    /// Period label.
    #[must_use]
    pub fn period(&self) -> &str {
        self.period.as_str()
    }

    /// Initial status.
    #[must_use]
    pub fn status(&self) -> WorksheetStatus {
        self.status
    }

    /// Assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Amount, if any.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// Notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Unvalidated partial update.
///
/// `None` leaves a column untouched. For nullable columns `Some(None)` clears
/// the value.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetPatch {
    /// Replacement client name.
    pub client_name: Option<String>,
    /// Replacement tax type.
    pub tax_type: Option<TaxType>,
    /// Replacement period.
    pub period: Option<String>,
    /// Replacement status.
    pub status: Option<WorksheetStatus>,
    /// Replacement or cleared assignee.
    pub assignee: Option<Option<String>>,
    /// Replacement or cleared amount.
    pub amount: Option<Option<f64>>,
    /// Replacement or cleared notes.
    pub notes: Option<Option<String>>,
    /// Time of the mutation, written to `updated_at`.
    pub updated_at: DateTime<Utc>,
}

impl WorksheetPatch {
    /// A patch that only touches `updated_at`.
    #[must_use]
    pub const fn touching(updated_at: DateTime<Utc>) -> Self {
        Self {
            client_name: None,
            tax_type: None,
            period: None,
            status: None,
            assignee: None,
            amount: None,
            notes: None,
            updated_at,
        }
    }
}

/// Validated partial update.
///
/// ## Invariants
/// - replacement `client_name`/`period` are trimmed and non-empty.
/// - a blank replacement for an optional text field becomes a clear.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetChanges {
    client_name: Option<String>,
    tax_type: Option<TaxType>,
    period: Option<String>,
    status: Option<WorksheetStatus>,
    assignee: Option<Option<String>>,
    amount: Option<Option<f64>>,
    notes: Option<Option<String>>,
    updated_at: DateTime<Utc>,
}

impl WorksheetChanges {
    /// Validate a patch.
    pub fn new(patch: WorksheetPatch) -> Result<Self, WorksheetValidationError> {
        let WorksheetPatch {
            client_name,
            tax_type,
            period,
            status,
            assignee,
            amount,
            notes,
            updated_at,
        } = patch;
        Ok(Self {
            client_name: client_name
                .map(|value| required_text(&value, WorksheetValidationError::EmptyClientName))
                .transpose()?,
            tax_type,
            period: period
                .map(|value| required_text(&value, WorksheetValidationError::EmptyPeriod))
                .transpose()?,
            status,
            assignee: assignee.map(optional_text),
            amount: amount.map(checked_amount).transpose()?,
            notes: notes.map(optional_text),
            updated_at,
        })
    }

    /// Replacement client name.
    #[must_use]
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    /// Replacement tax type.
    #[must_use]
    pub fn tax_type(&self) -> Option<TaxType> {
        self.tax_type
    }

    /// Replacement period.
    #[must_use]
    pub fn period(&self) -> Option<&str> {
        self.period.as_deref()
    }

    /// Replacement status.
    #[must_use]
    pub fn status(&self) -> Option<WorksheetStatus> {
        self.status
    }

    /// Replacement or cleared assignee.
    #[must_use]
    pub fn assignee(&self) -> Option<Option<&str>> {
        self.assignee.as_ref().map(Option::as_deref)
    }

    /// Replacement or cleared amount.
    #[must_use]
    pub fn amount(&self) -> Option<Option<f64>> {
        self.amount
    }

    /// Replacement or cleared notes.
    #[must_use]
    pub fn notes(&self) -> Option<Option<&str>> {
        self.notes.as_ref().map(Option::as_deref)
    }

    /// Mutation timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Restamp so the mutation lands strictly after `previous`.
    ///
    /// See [`next_update_time`].
    #[must_use]
    pub fn advancing_past(mut self, previous: DateTime<Utc>) -> Self {
        self.updated_at = next_update_time(previous, self.updated_at);
        self
    }

    /// Apply the changes to a stored record.
    ///
    /// Used by adapters that hold records in memory.
    pub fn apply_to(&self, worksheet: &mut Worksheet) {
        if let Some(client_name) = &self.client_name {
            worksheet.client_name.clone_from(client_name);
        }
        if let Some(tax_type) = self.tax_type {
            worksheet.tax_type = tax_type.into();
        }
        if let Some(period) = &self.period {
            worksheet.period.clone_from(period);
        }
        if let Some(status) = self.status {
            worksheet.status = status.into();
        }
        if let Some(assignee) = &self.assignee {
            worksheet.assignee.clone_from(assignee);
        }
        if let Some(amount) = self.amount {
            worksheet.amount = amount;
        }
        if let Some(notes) = &self.notes {
            worksheet.notes.clone_from(notes);
        }
        worksheet.updated_at = self.updated_at;
    }
}

/// Mutation time for an edit of a record last updated at `previous`.
///
/// The result has microsecond precision, matching the store, and is always
/// strictly later than `previous` even when the clock repeats or lags.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use worksheets::domain::next_update_time;
///
/// let previous = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
/// assert_eq!(
///     next_update_time(previous, previous),
///     previous + TimeDelta::microseconds(1)
/// );
/// ```
#[must_use]
pub fn next_update_time(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(6)
        .max((previous + TimeDelta::microseconds(1)).trunc_subsecs(6))
}
