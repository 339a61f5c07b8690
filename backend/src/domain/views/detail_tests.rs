//! Tests for the detail controller.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::WorksheetStatus;
use crate::domain::ports::{MockWorksheetRepository, NotificationKind, WorksheetRepositoryError};
use crate::outbound::memory::InMemoryWorksheetRepository;
use crate::test_support::{
    GatedRepository, RecordingShell, ShellEvent, SteppingClock, sample_worksheet,
};

struct Harness {
    shell: Arc<RecordingShell>,
    clock: Arc<SteppingClock>,
}

impl Harness {
    fn view<R>(&self, repository: Arc<R>, id: WorksheetId) -> WorksheetDetailView<R> {
        WorksheetDetailView::new(
            ViewContext::new(repository, self.shell.clone(), self.clock.clone()),
            id,
        )
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        shell: Arc::new(RecordingShell::default()),
        clock: Arc::new(SteppingClock::default()),
    }
}

#[rstest]
#[tokio::test]
async fn mount_loads_the_record(harness: Harness) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let repo = Arc::new(InMemoryWorksheetRepository::with_worksheets(
        harness.clock.clone(),
        vec![stored.clone()],
    ));
    let view = harness.view(repo, stored.id);

    assert!(view.mount().await);

    assert!(!view.is_loading());
    assert_eq!(view.worksheet(), Some(stored));
    assert!(harness.shell.events().is_empty());
}

#[rstest]
#[case::missing(WorksheetRepositoryError::not_found(WorksheetId::random()))]
#[case::offline(WorksheetRepositoryError::connection("offline"))]
#[tokio::test]
async fn failed_mount_returns_to_list(harness: Harness, #[case] failure: WorksheetRepositoryError) {
    let mut repo = MockWorksheetRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Err(failure));
    let view = harness.view(Arc::new(repo), WorksheetId::random());

    assert!(!view.mount().await);

    assert_eq!(view.worksheet(), None);
    assert!(view.open_edit_form().is_none());
    assert_eq!(
        harness.shell.events(),
        vec![
            ShellEvent::Notified(Notification::error(messages::LOAD_FAILED)),
            ShellEvent::Navigated(Route::WorksheetList),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn delete_success_notifies_and_navigates(harness: Harness) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let repo = Arc::new(InMemoryWorksheetRepository::with_worksheets(
        harness.clock.clone(),
        vec![stored.clone()],
    ));
    let view = harness.view(repo.clone(), stored.id);
    view.mount().await;

    assert!(view.delete().await);

    assert!(repo.is_empty());
    assert_eq!(
        harness.shell.events(),
        vec![
            ShellEvent::Notified(Notification::success(messages::DELETED)),
            ShellEvent::Navigated(Route::WorksheetList),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn delete_failure_keeps_record_and_stays(harness: Harness) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let repo = Arc::new(GatedRepository::new(
        InMemoryWorksheetRepository::with_worksheets(harness.clock.clone(), vec![stored.clone()]),
    ));
    let view = harness.view(repo.clone(), stored.id);
    view.mount().await;

    repo.fail_next(WorksheetRepositoryError::connection("offline"));
    assert!(!view.delete().await);

    assert_eq!(view.worksheet(), Some(stored));
    assert_eq!(repo.inner().len(), 1);
    assert_eq!(
        harness.shell.messages(NotificationKind::Error),
        vec![messages::DELETE_FAILED]
    );
    assert!(harness.shell.routes().is_empty());
}

#[rstest]
#[tokio::test]
async fn saved_edit_refetches_record(harness: Harness) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let repo = Arc::new(InMemoryWorksheetRepository::with_worksheets(
        harness.clock.clone(),
        vec![stored.clone()],
    ));
    let view = harness.view(repo, stored.id);
    view.mount().await;

    let form = view.open_edit_form().expect("record loaded");
    form.set_status(WorksheetStatus::Completed);
    let outcome = view.submit_form(&form).await;

    assert!(outcome.is_saved());
    let current = view.worksheet().expect("still loaded");
    assert!(current.status.is(WorksheetStatus::Completed));
    assert!(current.updated_at > stored.updated_at);
}

#[rstest]
fn back_to_list_navigates(harness: Harness) {
    let view = harness.view(Arc::new(MockWorksheetRepository::new()), WorksheetId::random());

    view.back_to_list();

    assert_eq!(harness.shell.routes(), vec![Route::WorksheetList]);
}

#[rstest]
#[case::loaded(None)]
#[case::missing(Some(WorksheetRepositoryError::not_found(WorksheetId::random())))]
#[case::offline(Some(WorksheetRepositoryError::connection("offline")))]
#[tokio::test]
async fn mount_completing_after_teardown_is_silent(
    harness: Harness,
    #[case] failure: Option<WorksheetRepositoryError>,
) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let repo = Arc::new(GatedRepository::new(
        InMemoryWorksheetRepository::with_worksheets(harness.clock.clone(), vec![stored.clone()]),
    ));
    if let Some(error) = failure {
        repo.fail_next(error);
    }
    let view = harness.view(repo.clone(), stored.id);
    repo.hold();

    let (loaded, ()) = tokio::join!(view.mount(), async {
        view.teardown();
        repo.release();
    });

    assert!(!loaded);
    assert!(harness.shell.events().is_empty());
    assert_eq!(view.worksheet(), None);
    assert!(view.is_loading());
}

#[rstest]
#[tokio::test]
async fn refresh_completing_after_teardown_keeps_the_last_record(harness: Harness) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let repo = Arc::new(GatedRepository::new(
        InMemoryWorksheetRepository::with_worksheets(harness.clock.clone(), vec![stored.clone()]),
    ));
    let view = harness.view(repo.clone(), stored.id);
    assert!(view.mount().await);
    repo.fail_next(WorksheetRepositoryError::connection("offline"));
    repo.hold();

    let (refreshed, ()) = tokio::join!(view.refresh(), async {
        view.teardown();
        repo.release();
    });

    assert!(!refreshed);
    assert!(harness.shell.events().is_empty());
    assert_eq!(view.worksheet(), Some(stored));
}

#[rstest]
#[tokio::test]
async fn delete_completing_after_teardown_is_silent(harness: Harness) {
    let stored = sample_worksheet("PT Maju", "PPN", "Draft");
    let repo = Arc::new(GatedRepository::new(
        InMemoryWorksheetRepository::with_worksheets(harness.clock.clone(), vec![stored.clone()]),
    ));
    let view = harness.view(repo.clone(), stored.id);
    view.mount().await;
    repo.hold();

    let (deleted, ()) = tokio::join!(view.delete(), async {
        view.teardown();
        repo.release();
    });

    assert!(!deleted);
    assert!(harness.shell.events().is_empty());
    assert_eq!(view.worksheet(), Some(stored));
}
