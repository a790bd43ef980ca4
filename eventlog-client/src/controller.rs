//! Controllers behind the "new event" and "edit event" dialogs.
//!
//! A controller owns its backend and notifier, validates the form, runs the
//! network calls and reports the outcome. It never submits twice at once:
//! a submit arriving while another is in flight returns
//! [`SubmitOutcome::Busy`] without doing anything.

use std::sync::atomic::{AtomicBool, Ordering};

use eventlog_core::event::{Event, EventId};
use eventlog_core::form::{EditEventForm, EventForm};
use eventlog_core::photo::PhotoRules;
use eventlog_core::protocol::PostEventRequest;
use eventlog_core::validation::Violations;
use tracing::{debug, warn};

use crate::backend::EventsBackend;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};
use crate::saga::{SaveError, UploadSaga};

pub const EDIT_SAVED: &str = "イベント編集完了";
pub const EDIT_FAILED: &str = "イベントの編集に失敗しました。";
pub const CREATE_SAVED: &str = "イベント登録完了";
pub const CREATE_FAILED: &str = "イベントの登録に失敗しました。";

/// Result of one `submit` call.
#[derive(Debug)]
pub enum SubmitOutcome<T, E> {
    Saved(T),
    /// Field errors; nothing was sent.
    Rejected(Violations),
    Failed(E),
    /// A previous submit is still running.
    Busy,
}

impl<T, E> SubmitOutcome<T, E> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

type AfterSave = Box<dyn Fn() + Send + Sync>;

/// Holds the loading flag for the duration of a submit.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct EditEventController<B, N> {
    backend: B,
    notifier: N,
    after_save: AfterSave,
    event_id: EventId,
    photo_rules: PhotoRules,
    loading: AtomicBool,
    open: AtomicBool,
}

impl<B: EventsBackend, N: Notifier> EditEventController<B, N> {
    /// `after_save` runs once per successful save, typically to refresh whatever
    /// listing shows the event.
    pub fn new(
        backend: B,
        notifier: N,
        event_id: EventId,
        after_save: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        EditEventController {
            backend,
            notifier,
            after_save: Box::new(after_save),
            event_id,
            photo_rules: PhotoRules::default(),
            loading: AtomicBool::new(false),
            open: AtomicBool::new(true),
        }
    }

    pub fn with_photo_rules(mut self, rules: PhotoRules) -> Self {
        self.photo_rules = rules;
        self
    }

    pub async fn submit(&self, form: &EditEventForm) -> SubmitOutcome<(), SaveError> {
        let Some(_loading) = LoadingGuard::acquire(&self.loading) else {
            debug!(event_id = %self.event_id, "submit ignored, save in progress");
            return SubmitOutcome::Busy;
        };

        let edit = match form.validate_with(&self.photo_rules) {
            Ok(edit) => edit,
            Err(violations) => return SubmitOutcome::Rejected(violations),
        };

        let mut saga = UploadSaga::new(&self.backend);
        match saga.run(&self.event_id, edit).await {
            Ok(()) => {
                (self.after_save)();
                self.notifier.notify(Notification::success(EDIT_SAVED));
                self.open.store(false, Ordering::Release);
                SubmitOutcome::Saved(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(EDIT_FAILED));
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Close without saving.
    pub fn cancel(&self) {
        self.open.store(false, Ordering::Release);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

pub struct NewEventController<B, N> {
    backend: B,
    notifier: N,
    after_save: AfterSave,
    loading: AtomicBool,
    open: AtomicBool,
}

impl<B: EventsBackend, N: Notifier> NewEventController<B, N> {
    pub fn new(backend: B, notifier: N, after_save: impl Fn() + Send + Sync + 'static) -> Self {
        NewEventController {
            backend,
            notifier,
            after_save: Box::new(after_save),
            loading: AtomicBool::new(false),
            open: AtomicBool::new(true),
        }
    }

    pub async fn submit(&self, form: &EventForm) -> SubmitOutcome<Event, ClientError> {
        let Some(_loading) = LoadingGuard::acquire(&self.loading) else {
            debug!("submit ignored, create in progress");
            return SubmitOutcome::Busy;
        };

        let values = match form.validate() {
            Ok(values) => values,
            Err(violations) => return SubmitOutcome::Rejected(violations),
        };

        match self.backend.create_event(&PostEventRequest::from(&values)).await {
            Ok(event) => {
                debug!(event_id = %event.id, "event created");
                (self.after_save)();
                self.notifier.notify(Notification::success(CREATE_SAVED));
                self.open.store(false, Ordering::Release);
                SubmitOutcome::Saved(event)
            }
            Err(e) => {
                warn!(error = %e, "event create failed");
                self.notifier.notify(Notification::error(CREATE_FAILED));
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.open.store(false, Ordering::Release);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
