//! Test utilities for the worksheets crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use tokio::sync::Notify;

use crate::domain::ports::{
    Notification, NotificationKind, Route, ViewShell, WorksheetRepository,
    WorksheetRepositoryError,
};
use crate::domain::{
    NewWorksheet, Recorded, Worksheet, WorksheetChanges, WorksheetId,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Instant used as the creation time of sample worksheets.
///
/// # Panics
/// Never; the date is a valid constant.
#[must_use]
pub fn sample_time() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).single() {
        Some(at) => at,
        None => panic!("sample time is valid"),
    }
}

/// A stored worksheet with the given labels and a fresh id.
///
/// Labels go through [`Recorded::parse`], so unknown values are allowed.
#[must_use]
pub fn sample_worksheet(client_name: &str, tax_type: &str, status: &str) -> Worksheet {
    Worksheet {
        id: WorksheetId::random(),
        client_name: client_name.to_owned(),
        tax_type: Recorded::parse(tax_type),
        period: "Juli 2025".to_owned(),
        status: Recorded::parse(status),
        assignee: None,
        amount: None,
        notes: None,
        created_at: sample_time(),
        updated_at: sample_time(),
    }
}

/// Clock whose time only moves when told to.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    /// Start the clock at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward (or back, for negative deltas).
    pub fn advance(&self, delta: TimeDelta) {
        *lock(&self.0) += delta;
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: DateTime<Utc>) {
        *lock(&self.0) = now;
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new(sample_time())
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// One call made against a [`RecordingShell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// `notify` was called.
    Notified(Notification),
    /// `navigate` was called.
    Navigated(Route),
}

/// View shell that remembers every call in order.
#[derive(Debug, Default)]
pub struct RecordingShell(Mutex<Vec<ShellEvent>>);

impl RecordingShell {
    /// Every call so far.
    #[must_use]
    pub fn events(&self) -> Vec<ShellEvent> {
        lock(&self.0).clone()
    }

    /// Messages of notifications with the given tone.
    #[must_use]
    pub fn messages(&self, kind: NotificationKind) -> Vec<String> {
        lock(&self.0)
            .iter()
            .filter_map(|event| match event {
                ShellEvent::Notified(notification) if notification.kind == kind => {
                    Some(notification.message.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Routes navigated to.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        lock(&self.0)
            .iter()
            .filter_map(|event| match event {
                ShellEvent::Navigated(route) => Some(*route),
                ShellEvent::Notified(_) => None,
            })
            .collect()
    }
}

impl ViewShell for RecordingShell {
    fn notify(&self, notification: Notification) {
        lock(&self.0).push(ShellEvent::Notified(notification));
    }

    fn navigate(&self, route: Route) {
        lock(&self.0).push(ShellEvent::Navigated(route));
    }
}

/// Repository wrapper that parks calls until released.
///
/// While [`hold`](Self::hold) is in effect each call waits for one
/// [`release`](Self::release) before reaching the inner repository. Queued
/// failures set with [`fail_next`](Self::fail_next) replace the inner result.
pub struct GatedRepository<R> {
    inner: R,
    holding: AtomicBool,
    gate: Notify,
    calls: AtomicUsize,
    failures: Mutex<VecDeque<WorksheetRepositoryError>>,
}

impl<R> GatedRepository<R> {
    /// Wrap a repository; calls pass straight through until [`hold`](Self::hold).
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            holding: AtomicBool::new(false),
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Park subsequent calls until released.
    pub fn hold(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    /// Let one parked (or the next) call proceed.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// Make the next call fail with `error` instead of reaching the inner store.
    pub fn fail_next(&self, error: WorksheetRepositoryError) {
        lock(&self.failures).push_back(error);
    }

    /// Number of calls started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The wrapped repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn enter(&self) -> Result<(), WorksheetRepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.holding.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        lock(&self.failures).pop_front().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl<R: WorksheetRepository> WorksheetRepository for GatedRepository<R> {
    async fn list(&self) -> Result<Vec<Worksheet>, WorksheetRepositoryError> {
        self.enter().await?;
        self.inner.list().await
    }

    async fn find_by_id(&self, id: &WorksheetId) -> Result<Worksheet, WorksheetRepositoryError> {
        self.enter().await?;
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, worksheet: &NewWorksheet) -> Result<Worksheet, WorksheetRepositoryError> {
        self.enter().await?;
        self.inner.insert(worksheet).await
    }

    async fn update(
        &self,
        id: &WorksheetId,
        changes: &WorksheetChanges,
    ) -> Result<Worksheet, WorksheetRepositoryError> {
        self.enter().await?;
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &WorksheetId) -> Result<(), WorksheetRepositoryError> {
        self.enter().await?;
        self.inner.delete(id).await
    }
}
