//! Editing sessions and the host callback contract.
//!
//! A form's draft is owned exclusively by one [`FormSession`]. Every action goes through the
//! form's reducer; each change is reported to the host straight away, and the host decides
//! what (if anything) to persist. The session never merges with, or reads back from, the
//! host's own copy.
//!
//! Callbacks:
//! - `on_change(field, draft)` after every edit that changed the draft
//! - `on_save(draft)` once per explicit save, only when there are unsaved changes
//! - `on_close()` on dismissal, whether or not the draft was saved

use crate::FormResult;
use serde::Serialize;
use std::fmt::Debug;

/// A form draft with a typed reducer.
pub trait Form {
    /// Edit actions accepted by the reducer.
    type Action: Debug;
    /// Names the part of the draft an action changed.
    type Field: Copy + Debug;

    /// Apply `action` to the draft.
    ///
    /// Returns `Ok(Some(field))` if the draft changed, `Ok(None)` for accepted actions that
    /// leave the draft as it was (duplicate tags, tab switches, unknown entry ids).
    ///
    /// # Errors
    ///
    /// Returns a [`crate::FormError`] for actions that do not apply to this draft.
    fn apply(&mut self, action: Self::Action) -> FormResult<Option<Self::Field>>;
}

/// Receiver of a session's callbacks.
pub trait FormHost<F: Form> {
    fn on_change(&mut self, field: F::Field, draft: &F);
    fn on_save(&mut self, draft: &F);
    fn on_close(&mut self);
}

/// Exclusive owner of one form draft.
#[derive(Debug)]
pub struct FormSession<F: Form, H: FormHost<F>> {
    draft: F,
    host: H,
    unsaved: bool,
}

impl<F: Form, H: FormHost<F>> FormSession<F, H> {
    pub fn new(draft: F, host: H) -> Self {
        Self {
            draft,
            host,
            unsaved: false,
        }
    }

    /// Apply one action and notify the host if the draft changed.
    ///
    /// Returns whether the draft changed. A rejected action leaves the draft and the
    /// unsaved flag untouched.
    pub fn dispatch(&mut self, action: F::Action) -> FormResult<bool> {
        tracing::debug!(?action, "dispatch");
        match self.draft.apply(action) {
            Ok(Some(field)) => {
                self.unsaved = true;
                self.host.on_change(field, &self.draft);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                tracing::warn!("action rejected: {err}");
                Err(err)
            }
        }
    }

    /// Hand the draft to the host if there is anything to save.
    ///
    /// Returns `false` without calling the host when there are no unsaved changes.
    pub fn save(&mut self) -> bool {
        if !self.unsaved {
            tracing::debug!("save skipped: no unsaved changes");
            return false;
        }
        self.host.on_save(&self.draft);
        self.unsaved = false;
        true
    }

    /// Dismiss the form, returning the draft and the host.
    ///
    /// Unsaved changes are not guarded against; they are simply returned with the draft.
    pub fn close(mut self) -> (F, H) {
        if self.unsaved {
            tracing::debug!("closing with unsaved changes");
        }
        self.host.on_close();
        (self.draft, self.host)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn draft(&self) -> &F {
        &self.draft
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

/// Host that logs every callback and keeps nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingHost;

impl<F: Form + Serialize> FormHost<F> for TracingHost {
    fn on_change(&mut self, field: F::Field, _draft: &F) {
        tracing::debug!(?field, "form changed");
    }

    fn on_save(&mut self, draft: &F) {
        match serde_json::to_string(draft) {
            Ok(snapshot) => tracing::info!(%snapshot, "form saved"),
            Err(e) => tracing::warn!("form saved but snapshot could not be serialized: {e}"),
        }
    }

    fn on_close(&mut self) {
        tracing::info!("form closed");
    }
}

/// One recorded callback.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent<Fld, Snap> {
    Changed(Fld),
    Saved(Snap),
    Closed,
}

/// Host that records every callback with a snapshot of saved drafts.
#[derive(Debug)]
pub struct RecordingHost<F: Form + Clone> {
    events: Vec<HostEvent<F::Field, F>>,
}

impl<F: Form + Clone> Default for RecordingHost<F> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<F: Form + Clone> RecordingHost<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[HostEvent<F::Field, F>] {
        &self.events
    }

    /// Fields reported through `on_change`, in order.
    pub fn changed_fields(&self) -> Vec<F::Field> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Changed(field) => Some(*field),
                _ => None,
            })
            .collect()
    }

    /// Drafts handed over through `on_save`, in order.
    pub fn saved(&self) -> Vec<&F> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Saved(draft) => Some(draft),
                _ => None,
            })
            .collect()
    }

    pub fn was_closed(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, HostEvent::Closed))
    }
}

impl<F: Form + Clone> FormHost<F> for RecordingHost<F> {
    fn on_change(&mut self, field: F::Field, _draft: &F) {
        self.events.push(HostEvent::Changed(field));
    }

    fn on_save(&mut self, draft: &F) {
        self.events.push(HostEvent::Saved(draft.clone()));
    }

    fn on_close(&mut self) {
        self.events.push(HostEvent::Closed);
    }
}
