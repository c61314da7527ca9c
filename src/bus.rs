//! Dispatch bus tying the handler store to event sources.

use crate::error::{BusError, Result};
use crate::event::Event;
use crate::handlers::{Handler, HandlerStore};
use crate::registry::EventType;
use crate::types::{BusStats, EventKey, Representation, Source};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// How `fire` walks the handler list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Copy the handler list before the first call. Handlers added or
    /// removed during the pass take effect on the next `fire`.
    #[default]
    Snapshot,
    /// Walk by index up to the count taken before the first call.
    ///
    /// Additions are deferred as with `Snapshot`, but a removal shifts
    /// later handlers down, so one may be skipped or a handler run twice
    /// in the same pass. Indices beyond the shrunken list are skipped.
    Indexed,
}

/// Bus configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Handler iteration strategy.
    /// Default: `Snapshot`
    pub dispatch: DispatchMode,

    /// Call handlers last-registered first.
    /// Default: false
    pub reverse_order: bool,
}

impl BusConfig {
    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

struct BusInner {
    store: RefCell<HandlerStore>,
    source: Source,
    config: BusConfig,
}

/// Synchronous, re-entrant event bus.
///
/// Handlers are keyed by [`EventType`] and called in registration order.
/// The bus attributes its own source to every event it fires. Handlers
/// may register, remove and fire (on this or any other bus) while being
/// dispatched.
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl EventBus {
    /// Create a bus that stamps `source` on the events it fires.
    pub fn new(source: Source) -> Self {
        Self::with_config(source, BusConfig::default())
    }

    pub fn with_config(source: Source, config: BusConfig) -> Self {
        Self {
            inner: Rc::new(BusInner {
                store: RefCell::new(HandlerStore::new()),
                source,
                config,
            }),
        }
    }

    pub fn source(&self) -> &Source {
        &self.inner.source
    }

    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }

    // --- Registration ---

    /// Register a handler. The same handler may be registered more than
    /// once and is then called once per registration.
    pub fn register<H: ?Sized + 'static>(
        &self,
        ty: &EventType<H>,
        handler: Rc<H>,
    ) -> Result<HandlerRegistration> {
        let key = ty.key();
        self.inner
            .store
            .borrow_mut()
            .add(key, Handler::new(Rc::clone(&handler)))?;
        trace!(kind = ty.name(), handlers = self.count(ty), "registered handler");

        Ok(HandlerRegistration {
            bus: Rc::downgrade(&self.inner),
            key,
            kind: ty.name(),
            remove: Box::new(move |store: &mut HandlerStore| store.remove(key, &handler)),
        })
    }

    /// Remove one registration of `handler`.
    pub fn remove_handler<H: ?Sized + 'static>(
        &self,
        ty: &EventType<H>,
        handler: &Rc<H>,
    ) -> Result<()> {
        // Bound first so the store borrow ends before the handler drops.
        let removed = self.inner.store.borrow_mut().remove(ty.key(), handler)?;
        drop(removed);
        debug!(kind = ty.name(), handlers = self.count(ty), "removed handler");
        Ok(())
    }

    /// Remove every handler of a kind.
    pub fn clear_handlers<H: ?Sized + 'static>(&self, ty: &EventType<H>) -> Result<()> {
        let removed = self.inner.store.borrow_mut().clear(ty.key())?;
        debug!(kind = ty.name(), handlers = removed.len(), "cleared handlers");
        drop(removed);
        Ok(())
    }

    // --- Queries ---

    /// Handler at `index` in registration order.
    pub fn get_handler<H: ?Sized + 'static>(
        &self,
        ty: &EventType<H>,
        index: usize,
    ) -> Result<Rc<H>> {
        let store = self.inner.store.borrow();
        let handler = store.get(ty.key(), index)?;
        handler
            .downcast::<H>()
            .cloned()
            .ok_or_else(|| BusError::IndexOutOfRange {
                kind: ty.name(),
                index,
                count: store.count(ty.key()),
            })
    }

    pub fn count<H: ?Sized>(&self, ty: &EventType<H>) -> usize {
        self.inner.store.borrow().count(ty.key())
    }

    /// Whether anyone listens. Lets producers skip building events.
    pub fn is_handled<H: ?Sized>(&self, ty: &EventType<H>) -> bool {
        self.count(ty) > 0
    }

    pub fn representation<H: ?Sized>(&self, ty: &EventType<H>) -> Option<Representation> {
        self.inner.store.borrow().representation(ty.key())
    }

    pub fn stats(&self) -> BusStats {
        self.inner.store.borrow().stats()
    }

    // --- Dispatch ---

    /// Deliver `event` to every handler of its kind.
    ///
    /// If the event carried no source on entry, this bus owns it and
    /// kills it once all handlers ran. Otherwise this is a nested fire
    /// and the previous source is restored. Either way this happens
    /// before a handler error is returned; the handlers after the
    /// failing one are not called.
    pub fn fire<E: Event>(&self, event: &E) -> Result<()> {
        event.assert_live()?;

        let ty = event.associated_type();
        let state = event.state();
        let old_source = state.replace_source(Some(Rc::clone(&self.inner.source)));
        let owning = old_source.is_none();

        trace!(
            kind = ty.name(),
            handlers = self.count(ty),
            owning,
            "firing event"
        );

        let outcome = match self.inner.config.dispatch {
            DispatchMode::Snapshot => self.dispatch_snapshot(event, ty.key()),
            DispatchMode::Indexed => self.dispatch_indexed(event, ty.key()),
        };

        if owning {
            state.kill();
        } else {
            state.replace_source(old_source);
        }

        outcome
    }

    fn dispatch_snapshot<E: Event>(&self, event: &E, key: EventKey) -> Result<()> {
        let mut handlers = self.inner.store.borrow().snapshot::<E::Handler>(key);
        if self.inner.config.reverse_order {
            handlers.reverse();
        }

        for handler in &handlers {
            event.dispatch(&**handler)?;
        }
        Ok(())
    }

    fn dispatch_indexed<E: Event>(&self, event: &E, key: EventKey) -> Result<()> {
        let count = self.inner.store.borrow().count(key);

        for i in 0..count {
            let index = if self.inner.config.reverse_order {
                count - 1 - i
            } else {
                i
            };

            // The borrow must end before the handler runs.
            let handler = {
                let store = self.inner.store.borrow();
                if index >= store.count(key) {
                    continue;
                }
                let handler = store.get(key, index)?;
                handler.downcast::<E::Handler>().cloned()
            };

            if let Some(handler) = handler {
                event.dispatch(&*handler)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("config", &self.inner.config)
            .field("store", &self.inner.store)
            .finish()
    }
}

type RemoveFn = Box<dyn Fn(&mut HandlerStore) -> Result<Handler>>;

/// Token returned by [`EventBus::register`].
///
/// Dropping it keeps the handler registered.
pub struct HandlerRegistration {
    bus: Weak<BusInner>,
    key: EventKey,
    kind: &'static str,
    remove: RemoveFn,
}

impl HandlerRegistration {
    /// Remove the handler from the bus it was registered on.
    pub fn unregister(self) -> Result<()> {
        let bus = self.bus.upgrade().ok_or(BusError::BusReleased)?;
        let removed = (self.remove)(&mut *bus.store.borrow_mut())?;
        drop(removed);
        debug!(kind = self.kind, "unregistered handler");
        Ok(())
    }

    pub fn key(&self) -> EventKey {
        self.key
    }
}

impl fmt::Debug for HandlerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistration")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .finish()
    }
}
