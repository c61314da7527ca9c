//! Events and their dispatch lifecycle.
//!
//! An event is live when constructed. The bus that first attributes a
//! source to it during `fire` owns it and kills it once its handlers
//! have run; buses that fire it again from inside a handler only borrow
//! it and put the previous source back. A dead event refuses every read
//! until [`Event::revive`] is called, which lets hot event kinds reuse a
//! single instance across dispatches.

use crate::error::{BusError, Result};
use crate::registry::EventType;
use crate::types::Source;
use std::cell::{Cell, RefCell};
use std::fmt;

/// Liveness flag and current source of an event.
///
/// Embedded in every event value. Interior mutability lets a shared
/// `&event` be fired re-entrantly.
pub struct EventState {
    live: Cell<bool>,
    source: RefCell<Option<Source>>,
}

impl EventState {
    pub fn new() -> Self {
        Self {
            live: Cell::new(true),
            source: RefCell::new(None),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Make the event live again and clear its source.
    pub fn revive(&self) {
        self.live.set(true);
        self.source.replace(None);
    }

    pub(crate) fn kill(&self) {
        self.live.set(false);
    }

    /// Current source without a liveness check.
    pub(crate) fn raw_source(&self) -> Option<Source> {
        self.source.borrow().clone()
    }

    /// Install a new source, returning the previous one.
    pub(crate) fn replace_source(&self, source: Option<Source>) -> Option<Source> {
        self.source.replace(source)
    }
}

impl Default for EventState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventState")
            .field("live", &self.live.get())
            .field("has_source", &self.source.borrow().is_some())
            .finish()
    }
}

/// A notification that can be fired through an [`EventBus`](crate::EventBus).
///
/// Implementors pick the handler interface via `Handler` and decide in
/// [`dispatch`](Event::dispatch) which handler method gets called.
///
/// Payload accessors should go through [`checked`](Event::checked) so
/// reads of a dead event fail instead of returning stale data.
pub trait Event {
    /// Handler interface, usually a trait object.
    type Handler: ?Sized + 'static;

    /// The kind singleton of this event.
    fn associated_type(&self) -> &EventType<Self::Handler>;

    /// Deliver this event to one handler.
    fn dispatch(&self, handler: &Self::Handler) -> Result<()>;

    /// Embedded lifecycle state.
    fn state(&self) -> &EventState;

    fn is_live(&self) -> bool {
        self.state().is_live()
    }

    /// Fail with [`BusError::DeadNotification`] if the event is dead.
    fn assert_live(&self) -> Result<()> {
        if self.state().is_live() {
            Ok(())
        } else {
            Err(BusError::DeadNotification {
                kind: self.associated_type().name(),
            })
        }
    }

    /// Gate a payload read on liveness.
    fn checked<'a, T: ?Sized>(&self, value: &'a T) -> Result<&'a T> {
        self.assert_live()?;
        Ok(value)
    }

    /// Source attributed by the bus currently dispatching this event.
    fn source(&self) -> Result<Option<Source>> {
        self.assert_live()?;
        Ok(self.state().raw_source())
    }

    /// Bring a dead event back for reuse.
    fn revive(&self) {
        self.state().revive();
    }

    /// One-line description for logs.
    fn to_debug_string(&self) -> String {
        format!("event: {}:", self.associated_type().name())
    }
}
