//! Tests for the create/edit form controller.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockWorksheetRepository, NotificationKind, WorksheetRepositoryError};
use crate::outbound::memory::InMemoryWorksheetRepository;
use crate::test_support::{GatedRepository, RecordingShell, SteppingClock, sample_worksheet};

struct Harness {
    shell: Arc<RecordingShell>,
    clock: Arc<SteppingClock>,
}

impl Harness {
    fn context<R>(&self, repository: R) -> ViewContext<R> {
        ViewContext::new(Arc::new(repository), self.shell.clone(), self.clock.clone())
    }

    fn shared_context<R>(&self, repository: Arc<R>) -> ViewContext<R> {
        ViewContext::new(repository, self.shell.clone(), self.clock.clone())
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        shell: Arc::new(RecordingShell::default()),
        clock: Arc::new(SteppingClock::default()),
    }
}

fn fill_required<R>(form: &WorksheetForm<R>) {
    form.set_client_name("PT Maju");
    form.set_period("Juli 2025");
}

#[rstest]
fn create_form_starts_with_defaults(harness: Harness) {
    let form = WorksheetForm::create(
        harness.context(MockWorksheetRepository::new()),
        ViewLifecycle::new(),
    );
    let values = form.values();
    assert_eq!(values.tax_type, TaxType::Pph21);
    assert_eq!(values.status, WorksheetStatus::Draft);
    assert!(values.client_name.is_empty() && values.amount.is_empty());
    assert!(form.can_submit());
}

#[rstest]
#[case::no_client("", "Juli 2025", "", vec![FormField::ClientName])]
#[case::blank_period("PT Maju", "   ", "", vec![FormField::Period])]
#[case::bad_amount("PT Maju", "Juli 2025", "12abc", vec![FormField::Amount])]
#[case::infinite_amount("PT Maju", "Juli 2025", "inf", vec![FormField::Amount])]
#[case::everything("", "", "1.2.3", vec![FormField::ClientName, FormField::Period, FormField::Amount])]
#[tokio::test]
async fn invalid_submissions_never_reach_the_store(
    harness: Harness,
    #[case] client_name: &str,
    #[case] period: &str,
    #[case] amount: &str,
    #[case] expected: Vec<FormField>,
) {
    let mut repo = MockWorksheetRepository::new();
    repo.expect_insert().never();
    let form = WorksheetForm::create(harness.context(repo), ViewLifecycle::new());
    form.set_client_name(client_name);
    form.set_period(period);
    form.set_amount(amount);

    let outcome = form.submit().await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure, got {outcome:?}");
    };
    let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
    assert_eq!(fields, expected);
    assert_eq!(form.errors(), errors);
    assert!(form.is_open());
    assert!(harness.shell.events().is_empty());
}

#[rstest]
#[tokio::test]
async fn create_sends_normalised_draft_and_closes(harness: Harness) {
    let mut repo = MockWorksheetRepository::new();
    repo.expect_insert()
        .withf(|draft| {
            draft.client_name() == "PT Maju"
                && draft.tax_type() == TaxType::Ppn
                && draft.status() == WorksheetStatus::Draft
                && draft.assignee().is_none()
                && draft.amount() == Some(1_250_000.5)
                && draft.notes() == Some("Q3")
        })
        .times(1)
        .return_once(|_| Ok(sample_worksheet("PT Maju", "PPN", "Draft")));
    let form = WorksheetForm::create(harness.context(repo), ViewLifecycle::new());
    form.set_client_name("  PT Maju ");
    form.set_tax_type(TaxType::Ppn);
    form.set_period("Juli 2025");
    form.set_assignee("   ");
    form.set_amount(" 1250000.5 ");
    form.set_notes("Q3");

    let outcome = form.submit().await;

    assert!(outcome.is_saved());
    assert!(!form.is_open());
    assert!(!form.can_submit());
    assert_eq!(
        harness.shell.messages(NotificationKind::Success),
        vec![messages::CREATED]
    );
}

#[rstest]
#[tokio::test]
async fn empty_amount_is_written_as_null(harness: Harness) {
    let mut repo = MockWorksheetRepository::new();
    repo.expect_insert()
        .withf(|draft| draft.amount().is_none())
        .return_once(|_| Ok(sample_worksheet("PT Maju", "PPN", "Draft")));
    let form = WorksheetForm::create(harness.context(repo), ViewLifecycle::new());
    fill_required(&form);
    form.set_amount("");

    assert!(form.submit().await.is_saved());
}

#[rstest]
#[tokio::test]
async fn store_failure_keeps_form_open_for_retry(harness: Harness) {
    let mut repo = MockWorksheetRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(WorksheetRepositoryError::connection("offline")));
    let form = WorksheetForm::create(harness.context(repo), ViewLifecycle::new());
    fill_required(&form);
    form.set_notes("keep me");
    let before = form.values();

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(form.is_open());
    assert!(!form.is_submitting());
    assert!(form.can_submit());
    assert_eq!(form.values(), before);
    assert_eq!(
        harness.shell.messages(NotificationKind::Error),
        vec![messages::SAVE_FAILED]
    );
}

#[rstest]
fn edit_form_falls_back_for_unrecognised_labels(harness: Harness) {
    let mut stored = sample_worksheet("PT Maju", "PBB", "Arsip");
    stored.amount = Some(1_500.25);
    let form = WorksheetForm::edit(
        harness.context(MockWorksheetRepository::new()),
        ViewLifecycle::new(),
        stored,
    );

    let values = form.values();
    assert_eq!(values.tax_type, TaxType::Pph21);
    assert_eq!(values.status, WorksheetStatus::Draft);
    assert_eq!(values.assignee, "");
    assert_eq!(values.amount, "1500.25");
    assert!(matches!(form.mode(), FormMode::Edit(_)));
}

#[rstest]
#[tokio::test]
async fn edit_omits_untouched_optional_fields(harness: Harness) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let id = stored.id;
    let mut repo = MockWorksheetRepository::new();
    repo.expect_update()
        .withf(move |target, changes| {
            *target == id
                && changes.status() == Some(WorksheetStatus::Completed)
                && changes.tax_type().is_none()
                && changes.assignee().is_none()
                && changes.amount().is_none()
                && changes.notes().is_none()
                && changes.client_name() == Some("PT Maju")
        })
        .times(1)
        .return_once(|_, changes| {
            let mut updated = sample_worksheet("PT Maju", "PPN", "Draft");
            changes.apply_to(&mut updated);
            Ok(updated)
        });
    let form = WorksheetForm::edit(harness.context(repo), ViewLifecycle::new(), stored);
    form.set_status(WorksheetStatus::Completed);

    let outcome = form.submit().await;

    assert!(outcome.is_saved());
    assert_eq!(
        harness.shell.messages(NotificationKind::Success),
        vec![messages::UPDATED]
    );
}

#[rstest]
#[tokio::test]
async fn edit_leaves_an_untouched_non_finite_amount_alone(harness: Harness) {
    let mut stored = sample_worksheet("PT Maju", "PPN", "Draft");
    stored.amount = Some(f64::NAN);
    let mut repo = MockWorksheetRepository::new();
    repo.expect_update()
        .withf(|_, changes| {
            changes.amount().is_none() && changes.status() == Some(WorksheetStatus::InProgress)
        })
        .times(1)
        .return_once(|_, _| Ok(sample_worksheet("PT Maju", "PPN", "Dalam Proses")));
    let form = WorksheetForm::edit(harness.context(repo), ViewLifecycle::new(), stored);
    form.set_status(WorksheetStatus::InProgress);

    assert!(form.submit().await.is_saved());
    assert!(form.errors().is_empty());
}

#[rstest]
#[tokio::test]
async fn edit_still_checks_a_touched_amount(harness: Harness) {
    let mut stored = sample_worksheet("PT Maju", "PPN", "Draft");
    stored.amount = Some(f64::NAN);
    let mut repo = MockWorksheetRepository::new();
    repo.expect_update().never();
    let form = WorksheetForm::edit(harness.context(repo), ViewLifecycle::new(), stored);
    form.set_amount("NaN");

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Invalid(vec![FieldError::AMOUNT_INVALID]));
}

#[rstest]
#[tokio::test]
async fn edit_writes_null_for_cleared_optional_fields(harness: Harness) {
    let mut stored = sample_worksheet("PT Maju", "PPN", "Draft");
    stored.assignee = Some("Sari".to_owned());
    stored.amount = Some(10.0);
    let mut repo = MockWorksheetRepository::new();
    repo.expect_update()
        .withf(|_, changes| {
            changes.assignee() == Some(None)
                && changes.amount() == Some(None)
                && changes.notes().is_none()
        })
        .times(1)
        .return_once(|_, _| Ok(sample_worksheet("PT Maju", "PPN", "Draft")));
    let form = WorksheetForm::edit(harness.context(repo), ViewLifecycle::new(), stored);
    form.set_assignee("");
    form.set_amount("  ");

    assert!(form.submit().await.is_saved());
}

#[rstest]
#[case::clock_ahead(TimeDelta::hours(1))]
#[case::clock_same(TimeDelta::zero())]
#[case::clock_behind(TimeDelta::hours(-1))]
#[tokio::test]
async fn edit_always_advances_updated_at(harness: Harness, #[case] clock_offset: TimeDelta) {
    let clock = harness.clock.clone();
    let repo = Arc::new(InMemoryWorksheetRepository::new(clock.clone()));
    let draft = NewWorksheet::new(WorksheetDraft {
        client_name: "PT Maju".to_owned(),
        period: "Juli 2025".to_owned(),
        ..WorksheetDraft::default()
    })
    .expect("valid draft");
    let stored = repo.insert(&draft).await.expect("insert");
    clock.advance(clock_offset);

    let form = WorksheetForm::edit(
        harness.shared_context(repo.clone()),
        ViewLifecycle::new(),
        stored.clone(),
    );
    form.set_notes("revisi");
    let SubmitOutcome::Saved(updated) = form.submit().await else {
        panic!("edit should succeed");
    };

    assert!(updated.updated_at > stored.updated_at);
    assert_eq!(updated.created_at, stored.created_at);
    assert_eq!(updated.notes.as_deref(), Some("revisi"));
}

#[rstest]
#[tokio::test]
async fn second_submit_while_in_flight_is_refused(harness: Harness) {
    let gated = Arc::new(GatedRepository::new(InMemoryWorksheetRepository::new(
        harness.clock.clone(),
    )));
    gated.hold();
    let form = WorksheetForm::create(harness.shared_context(gated.clone()), ViewLifecycle::new());
    fill_required(&form);

    let (first, second) = tokio::join!(form.submit(), async {
        let outcome = form.submit().await;
        assert!(form.is_submitting());
        assert!(!form.can_submit());
        gated.release();
        outcome
    });

    assert!(first.is_saved());
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(gated.calls(), 1);
    assert_eq!(gated.inner().len(), 1);
}

#[rstest]
#[tokio::test]
async fn completion_after_teardown_is_discarded(harness: Harness) {
    let gated = Arc::new(GatedRepository::new(InMemoryWorksheetRepository::new(
        harness.clock.clone(),
    )));
    gated.hold();
    let lifecycle = ViewLifecycle::new();
    let form = WorksheetForm::create(harness.shared_context(gated.clone()), lifecycle.clone());
    fill_required(&form);

    let (outcome, ()) = tokio::join!(form.submit(), async {
        lifecycle.teardown();
        gated.release();
    });

    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert!(harness.shell.events().is_empty());
    assert!(!form.is_submitting());
}

#[rstest]
#[tokio::test]
async fn cancelled_form_does_not_submit(harness: Harness) {
    let mut repo = MockWorksheetRepository::new();
    repo.expect_insert().never();
    let form = WorksheetForm::create(harness.context(repo), ViewLifecycle::new());
    fill_required(&form);
    form.cancel();

    assert_eq!(form.submit().await, SubmitOutcome::Closed);
    assert!(harness.shell.events().is_empty());
}
