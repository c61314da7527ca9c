//! Adaptive per-kind handler storage.
//!
//! Each event kind gets one slot per bus. A slot starts out as a small
//! fixed array of inline handlers and is promoted, once and for good, to
//! a growable list when it outgrows that array or when a handler is
//! removed or cleared. Most kinds only ever see a couple of handlers, so
//! the inline form avoids a list allocation per kind.

mod slot;
mod store;

pub use store::HandlerStore;

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Default inline capacity of a handler slot.
pub const INLINE_CAPACITY: usize = 5;

/// Type-erased handler reference.
///
/// Wraps an `Rc<H>` for any handler interface `H`. Identity is pointer
/// identity of the wrapped `Rc`.
pub struct Handler(Box<dyn Any>);

impl Handler {
    pub fn new<H: ?Sized + 'static>(handler: Rc<H>) -> Self {
        Handler(Box::new(handler))
    }

    /// Recover the typed handler, if it was registered as `Rc<H>`.
    pub fn downcast<H: ?Sized + 'static>(&self) -> Option<&Rc<H>> {
        self.0.downcast_ref::<Rc<H>>()
    }

    /// Whether this wraps the very same handler as `other`.
    pub fn is<H: ?Sized + 'static>(&self, other: &Rc<H>) -> bool {
        self.downcast::<H>()
            .is_some_and(|mine| Rc::ptr_eq(mine, other))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}
