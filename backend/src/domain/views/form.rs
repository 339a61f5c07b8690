//! Create and edit form controller.
//!
//! The form keeps what the user typed as raw text and only turns it into a
//! validated write on submit. In edit mode optional fields the user never
//! touched are left out of the update, so stored nulls survive a save.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::error;

use super::{ViewContext, ViewLifecycle, lock, messages};
use crate::domain::ports::{Notification, WorksheetRepository};
use crate::domain::{
    NewWorksheet, TaxType, Worksheet, WorksheetChanges, WorksheetDraft, WorksheetId,
    WorksheetPatch, WorksheetStatus, WorksheetValidationError, next_update_time,
};

/// What a submission writes.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    /// Insert a new worksheet.
    Create,
    /// Update the given worksheet.
    Edit(Worksheet),
}

/// Editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ClientName,
    TaxType,
    Period,
    Status,
    Assignee,
    Amount,
    Notes,
}

/// Editor contents.
///
/// Nullable columns are shown as empty strings; `amount` is kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub client_name: String,
    pub tax_type: TaxType,
    pub period: String,
    pub status: WorksheetStatus,
    pub assignee: String,
    pub amount: String,
    pub notes: String,
}

impl FormValues {
    /// Editor contents for an existing record.
    ///
    /// Unrecognised stored labels fall back to the defaults (PPh 21, Draft).
    #[must_use]
    pub fn from_worksheet(worksheet: &Worksheet) -> Self {
        Self {
            client_name: worksheet.client_name.clone(),
            tax_type: worksheet.tax_type.known().unwrap_or_default(),
            period: worksheet.period.clone(),
            status: worksheet.status.known().unwrap_or_default(),
            assignee: worksheet.assignee.clone().unwrap_or_default(),
            amount: worksheet
                .amount
                .map(|amount| amount.to_string())
                .unwrap_or_default(),
            notes: worksheet.notes.clone().unwrap_or_default(),
        }
    }
}

/// A field rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

impl FieldError {
    const CLIENT_NAME_REQUIRED: Self = Self {
        field: FormField::ClientName,
        message: "Nama klien wajib diisi",
    };
    const PERIOD_REQUIRED: Self = Self {
        field: FormField::Period,
        message: "Periode wajib diisi",
    };
    const AMOUNT_INVALID: Self = Self {
        field: FormField::Amount,
        message: "Jumlah harus berupa angka",
    };
}

impl From<WorksheetValidationError> for FieldError {
    fn from(value: WorksheetValidationError) -> Self {
        match value {
            WorksheetValidationError::EmptyClientName => Self::CLIENT_NAME_REQUIRED,
            WorksheetValidationError::EmptyPeriod => Self::PERIOD_REQUIRED,
            WorksheetValidationError::NonFiniteAmount => Self::AMOUNT_INVALID,
        }
    }
}

/// Result of [`WorksheetForm::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The store accepted the write; the form is closed.
    Saved(Worksheet),
    /// Validation failed; nothing was sent.
    Invalid(Vec<FieldError>),
    /// The store call failed; the form stays open for a retry.
    Failed,
    /// Another submission is still in flight; nothing was sent.
    Busy,
    /// The form was already closed; nothing was sent.
    Closed,
    /// The owning view was torn down before the store answered.
    Discarded,
}

impl SubmitOutcome {
    /// Whether the worksheet was written.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

struct FormState {
    values: FormValues,
    touched: HashSet<FormField>,
    errors: Vec<FieldError>,
    open: bool,
}

enum StoreCall {
    Insert(NewWorksheet),
    Update(WorksheetId, WorksheetChanges),
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn parse_amount(raw: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        _ => Err(FieldError::AMOUNT_INVALID),
    }
}

/// Form controller for one create or edit session.
pub struct WorksheetForm<R> {
    ctx: ViewContext<R>,
    lifecycle: ViewLifecycle,
    mode: FormMode,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

impl<R> WorksheetForm<R> {
    fn open(ctx: ViewContext<R>, lifecycle: ViewLifecycle, mode: FormMode) -> Self {
        let values = match &mode {
            FormMode::Create => FormValues::default(),
            FormMode::Edit(worksheet) => FormValues::from_worksheet(worksheet),
        };
        Self {
            ctx,
            lifecycle,
            mode,
            state: Mutex::new(FormState {
                values,
                touched: HashSet::new(),
                errors: Vec::new(),
                open: true,
            }),
            submitting: AtomicBool::new(false),
        }
    }

    /// An empty create form (PPh 21, Draft).
    pub fn create(ctx: ViewContext<R>, lifecycle: ViewLifecycle) -> Self {
        Self::open(ctx, lifecycle, FormMode::Create)
    }

    /// An edit form pre-filled from `worksheet`.
    pub fn edit(ctx: ViewContext<R>, lifecycle: ViewLifecycle, worksheet: Worksheet) -> Self {
        Self::open(ctx, lifecycle, FormMode::Edit(worksheet))
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Current editor contents.
    pub fn values(&self) -> FormValues {
        lock(&self.state).values.clone()
    }

    /// Errors from the last rejected submission.
    pub fn errors(&self) -> Vec<FieldError> {
        lock(&self.state).errors.clone()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Whether [`submit`](Self::submit) would reach the store or validation.
    pub fn can_submit(&self) -> bool {
        self.is_open() && !self.is_submitting()
    }

    /// Close without saving.
    pub fn cancel(&self) {
        lock(&self.state).open = false;
    }

    fn set(&self, field: FormField, apply: impl FnOnce(&mut FormValues)) {
        let mut state = lock(&self.state);
        apply(&mut state.values);
        state.touched.insert(field);
    }

    pub fn set_client_name(&self, value: impl Into<String>) {
        let value = value.into();
        self.set(FormField::ClientName, |values| values.client_name = value);
    }

    pub fn set_tax_type(&self, value: TaxType) {
        self.set(FormField::TaxType, |values| values.tax_type = value);
    }

    pub fn set_period(&self, value: impl Into<String>) {
        let value = value.into();
        self.set(FormField::Period, |values| values.period = value);
    }

    pub fn set_status(&self, value: WorksheetStatus) {
        self.set(FormField::Status, |values| values.status = value);
    }

    pub fn set_assignee(&self, value: impl Into<String>) {
        let value = value.into();
        self.set(FormField::Assignee, |values| values.assignee = value);
    }

    /// Set the amount as typed; parsed on submit.
    pub fn set_amount(&self, value: impl Into<String>) {
        let value = value.into();
        self.set(FormField::Amount, |values| values.amount = value);
    }

    pub fn set_notes(&self, value: impl Into<String>) {
        let value = value.into();
        self.set(FormField::Notes, |values| values.notes = value);
    }

    fn build_call(&self) -> Result<StoreCall, Vec<FieldError>> {
        let (values, touched) = {
            let state = lock(&self.state);
            (state.values.clone(), state.touched.clone())
        };

        let mut errors = Vec::new();
        if values.client_name.trim().is_empty() {
            errors.push(FieldError::CLIENT_NAME_REQUIRED);
        }
        if values.period.trim().is_empty() {
            errors.push(FieldError::PERIOD_REQUIRED);
        }
        // An untouched edit never writes the amount, so its stored text is not checked.
        let sends_amount = matches!(self.mode, FormMode::Create)
            || touched.contains(&FormField::Amount);
        let amount = if sends_amount {
            parse_amount(&values.amount).unwrap_or_else(|error| {
                errors.push(error);
                None
            })
        } else {
            None
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let FormValues {
            client_name,
            tax_type,
            period,
            status,
            assignee,
            amount: _,
            notes,
        } = values;

        let call = match &self.mode {
            FormMode::Create => NewWorksheet::new(WorksheetDraft {
                client_name,
                tax_type,
                period,
                status,
                assignee: Some(assignee),
                amount,
                notes: Some(notes),
            })
            .map(StoreCall::Insert),
            FormMode::Edit(original) => {
                let edited = |field| touched.contains(&field);
                WorksheetChanges::new(WorksheetPatch {
                    client_name: Some(client_name),
                    tax_type: edited(FormField::TaxType).then_some(tax_type),
                    period: Some(period),
                    status: edited(FormField::Status).then_some(status),
                    assignee: edited(FormField::Assignee).then_some(Some(assignee)),
                    amount: edited(FormField::Amount).then_some(amount),
                    notes: edited(FormField::Notes).then_some(Some(notes)),
                    updated_at: next_update_time(original.updated_at, self.ctx.clock.utc()),
                })
                .map(|changes| StoreCall::Update(original.id, changes))
            }
        };
        call.map_err(|error| vec![FieldError::from(error)])
    }
}

impl<R: WorksheetRepository> WorksheetForm<R> {
    /// Validate and write the form.
    ///
    /// Success shows a notification and closes the form. Failure shows an
    /// error notification and keeps the values for a retry.
    pub async fn submit(&self) -> SubmitOutcome {
        if !self.is_open() {
            return SubmitOutcome::Closed;
        }
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return SubmitOutcome::Busy;
        }
        let _in_flight = InFlight(&self.submitting);

        let call = match self.build_call() {
            Ok(call) => call,
            Err(errors) => {
                lock(&self.state).errors.clone_from(&errors);
                return SubmitOutcome::Invalid(errors);
            }
        };
        lock(&self.state).errors.clear();

        let (result, saved_message) = match call {
            StoreCall::Insert(worksheet) => (
                self.ctx.repository.insert(&worksheet).await,
                messages::CREATED,
            ),
            StoreCall::Update(id, changes) => (
                self.ctx.repository.update(&id, &changes).await,
                messages::UPDATED,
            ),
        };

        if !self.lifecycle.is_active() {
            return SubmitOutcome::Discarded;
        }
        match result {
            Ok(worksheet) => {
                self.ctx.shell.notify(Notification::success(saved_message));
                lock(&self.state).open = false;
                SubmitOutcome::Saved(worksheet)
            }
            Err(err) => {
                error!(error = %err, "saving worksheet failed");
                self.ctx.shell.notify(Notification::error(messages::SAVE_FAILED));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
