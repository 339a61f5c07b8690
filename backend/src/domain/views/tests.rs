//! Scenarios spanning several controllers over one shared store.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::TaxType;
use crate::domain::WorksheetStatus;
use crate::domain::listing::TypeSummary;
use crate::domain::presentation::{BadgeVariant, status_badge};
use crate::outbound::memory::InMemoryWorksheetRepository;
use crate::test_support::{GatedRepository, RecordingShell, SteppingClock, sample_worksheet};

struct Office {
    repo: Arc<InMemoryWorksheetRepository>,
    shell: Arc<RecordingShell>,
    ctx: ViewContext<InMemoryWorksheetRepository>,
}

#[fixture]
fn office() -> Office {
    let clock = Arc::new(SteppingClock::default());
    let repo = Arc::new(InMemoryWorksheetRepository::with_worksheets(
        clock.clone(),
        vec![sample_worksheet("CV Sejahtera", "PPh 21", "Selesai")],
    ));
    let shell = Arc::new(RecordingShell::default());
    let ctx = ViewContext::new(repo.clone(), shell.clone(), clock);
    Office { repo, shell, ctx }
}

fn ppn(summaries: Vec<TypeSummary>) -> TypeSummary {
    summaries
        .into_iter()
        .find(|summary| summary.tax_type == TaxType::Ppn)
        .expect("PPN is catalogued")
}

#[rstest]
fn lifecycle_clones_share_teardown() {
    let lifecycle = ViewLifecycle::default();
    let form_copy = lifecycle.clone();
    assert!(form_copy.is_active());

    lifecycle.teardown();
    lifecycle.teardown();

    assert!(!form_copy.is_active());
}

#[rstest]
#[tokio::test]
async fn created_worksheet_shows_as_draft_in_list(office: Office) {
    let list = WorksheetListView::new(office.ctx.clone());
    list.mount().await;

    let form = list.open_create_form();
    form.set_client_name("PT Maju");
    form.set_tax_type(TaxType::Ppn);
    form.set_period("Juli 2025");
    assert!(list.submit_form(&form).await.is_saved());

    let created = list
        .worksheets()
        .into_iter()
        .find(|worksheet| worksheet.client_name == "PT Maju")
        .expect("new worksheet listed");
    let badge = status_badge(&created.status);
    assert_eq!(badge.label, "Draft");
    assert_eq!(badge.variant, BadgeVariant::Outline);
    assert_eq!(ppn(list.summaries()).pending, 1);
}

#[rstest]
#[tokio::test]
async fn completing_a_draft_moves_it_between_counts(office: Office) {
    let draft = sample_worksheet("PT Maju", "PPN", "Draft");
    let id = draft.id;
    let ctx = ViewContext::new(
        Arc::new(InMemoryWorksheetRepository::with_worksheets(
            office.ctx.clock.clone(),
            vec![draft],
        )),
        office.shell.clone(),
        office.ctx.clock.clone(),
    );
    let list = WorksheetListView::new(ctx.clone());
    list.mount().await;
    let before = ppn(list.summaries());

    let detail = WorksheetDetailView::new(ctx, id);
    detail.mount().await;
    let form = detail.open_edit_form().expect("loaded");
    form.set_status(WorksheetStatus::Completed);
    assert!(detail.submit_form(&form).await.is_saved());
    list.refresh().await;

    let after = ppn(list.summaries());
    assert_eq!(after.completed, before.completed + 1);
    assert_eq!(after.pending + 1, before.pending);
    assert!((after.completion_percentage() - 100.0).abs() < f64::EPSILON);
}

#[rstest]
#[tokio::test]
async fn deleted_worksheet_leaves_the_list(office: Office) {
    let list = WorksheetListView::new(office.ctx.clone());
    list.mount().await;
    let doomed = list.worksheets().remove(0);

    let detail = WorksheetDetailView::new(office.ctx.clone(), doomed.id);
    detail.mount().await;
    assert!(detail.delete().await);
    list.refresh().await;

    assert!(list.worksheets().is_empty());
    assert!(office.repo.is_empty());
}

#[rstest]
#[tokio::test]
async fn form_save_after_list_teardown_is_discarded(office: Office) {
    let gated = Arc::new(GatedRepository::new(InMemoryWorksheetRepository::new(
        office.ctx.clock.clone(),
    )));
    let list = WorksheetListView::new(ViewContext::new(
        gated.clone(),
        office.shell.clone(),
        office.ctx.clock.clone(),
    ));
    list.mount().await;
    let form = list.open_create_form();
    form.set_client_name("PT Maju");
    form.set_period("Juli 2025");
    gated.hold();

    let (outcome, ()) = tokio::join!(list.submit_form(&form), async {
        list.teardown();
        gated.release();
    });

    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert!(list.worksheets().is_empty());
    assert!(office.shell.events().is_empty());
    assert_eq!(gated.inner().len(), 1);
}
