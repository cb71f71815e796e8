//! Submission controller.
//!
//! Owns the single `FormState`, the validation pipeline, both notification
//! channels and the injected record store. Every call runs to completion;
//! there is no shared state and no locking.
//!
//! Per submit the controller ends in one of:
//!   * `Accepted`      record persisted, success channel open, form reset
//!   * `Rejected`      error channel open with the first failing rule's text,
//!                     form untouched
//!   * `StorageFailed` record passed validation but the write failed; error
//!                     channel open, form untouched

use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{StoreError, ValidationError};
use crate::form::{Field, FormRecord, FormState};
use crate::gate::FormView;
use crate::notify::{ChannelKind, DismissReason, NotificationSettings, Notifications};
use crate::pipeline::ValidationPipeline;
use crate::store::{self, DEFAULT_STORAGE_KEY, RecordStore};
use crate::validators;

pub const SUCCESS_MESSAGE: &str = "Formulaire envoyé avec succès";
pub const STORAGE_FAILURE_MESSAGE: &str = "Impossible d'enregistrer le formulaire.";

/// Tunables of the form, usually read from the front end's config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    pub storage_key: String,
    /// Reject blank fields with `EmptyField` before running the rules.
    pub require_all_fields: bool,
    pub notification: NotificationSettings,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            require_all_fields: true,
            notification: NotificationSettings::default(),
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Accepted(FormRecord),
    Rejected(ValidationError),
    StorageFailed(StoreError),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    /// Text that was put in a notification channel for this outcome.
    pub fn message(&self) -> String {
        match self {
            SubmitOutcome::Accepted(_) => SUCCESS_MESSAGE.to_string(),
            SubmitOutcome::Rejected(err) => err.to_string(),
            SubmitOutcome::StorageFailed(_) => STORAGE_FAILURE_MESSAGE.to_string(),
        }
    }
}

pub struct SubmissionController {
    state: FormState,
    pipeline: ValidationPipeline,
    notifications: Notifications,
    store: Box<dyn RecordStore>,
    storage_key: String,
    /// Pins the year used by the age rule; `None` reads the local clock.
    fixed_year: Option<i32>,
}

impl SubmissionController {
    pub fn new(store: Box<dyn RecordStore>, settings: &FormSettings) -> Self {
        Self {
            state: FormState::new(),
            pipeline: ValidationPipeline::standard(settings.require_all_fields),
            notifications: Notifications::new(&settings.notification),
            store,
            storage_key: settings.storage_key.clone(),
            fixed_year: None,
        }
    }

    pub fn with_current_year(mut self, year: i32) -> Self {
        self.fixed_year = Some(year);
        self
    }

    pub fn current_year(&self) -> i32 {
        self.fixed_year.unwrap_or_else(validators::current_year)
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        self.state.edit(field, value);
    }

    /// Gate and display views of the current state.
    pub fn view(&self) -> FormView {
        FormView::derive(&self.state, self.current_year())
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.view().submit_disabled
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        self.submit_at(Instant::now())
    }

    /// Handle one submit event. The gate is not consulted: a submit fired
    /// while the control is disabled still runs the pipeline.
    pub fn submit_at(&mut self, now: Instant) -> SubmitOutcome {
        let year = self.current_year();
        if let Err(err) = self.pipeline.run(self.state.record(), year) {
            debug!(code = err.code(), "submission rejected");
            self.notifications.open(ChannelKind::Error, err.to_string(), now);
            return SubmitOutcome::Rejected(err);
        }

        let record = self.state.record().clone();
        if let Err(err) = store::save_record(self.store.as_mut(), &self.storage_key, &record) {
            warn!(error = %err, key = %self.storage_key, "failed to persist record");
            self.notifications
                .open(ChannelKind::Error, STORAGE_FAILURE_MESSAGE, now);
            return SubmitOutcome::StorageFailed(err);
        }

        info!(key = %self.storage_key, "submission accepted");
        self.notifications
            .open(ChannelKind::Success, SUCCESS_MESSAGE, now);
        self.state.reset();
        SubmitOutcome::Accepted(record)
    }

    pub fn dismiss(&mut self, kind: ChannelKind, reason: DismissReason) -> bool {
        self.notifications.dismiss(kind, reason)
    }

    /// Expire notification deadlines; returns the channels that closed.
    pub fn poll(&mut self, now: Instant) -> Vec<ChannelKind> {
        self.notifications.poll(now)
    }

    /// Unmount: pending auto-hides are cancelled and the form state is
    /// discarded. The store is handed back to the caller.
    pub fn teardown(mut self) -> Box<dyn RecordStore> {
        self.notifications.teardown();
        self.store
    }
}
