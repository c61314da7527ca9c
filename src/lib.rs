//! # Signal Bus
//!
//! An in-process, type-indexed event bus. Producers and consumers
//! exchange typed events without holding references to each other.
//!
//! ## Core Concepts
//!
//! - **Event types**: one [`EventType`] singleton per kind, holding a
//!   dense key from the type registry
//! - **Handler store**: per-kind handler lists kept inline for the usual
//!   handful of handlers and promoted to a growable list past that
//! - **Bus**: register, remove, query and fire, re-entrant from inside
//!   handlers
//! - **Lifecycle**: events die when their owning dispatch ends and can
//!   be revived for reuse
//!
//! Everything is single-threaded and synchronous.
//!
//! ## Example
//!
//! ```
//! use signalbus::{Event, EventBus, EventState, EventType, Result};
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::sync::LazyLock;
//!
//! trait ResizeHandler {
//!     fn on_resize(&self, width: u32);
//! }
//!
//! static RESIZE: LazyLock<EventType<dyn ResizeHandler>> =
//!     LazyLock::new(|| EventType::new("resize"));
//!
//! struct Resize {
//!     width: u32,
//!     state: EventState,
//! }
//!
//! impl Event for Resize {
//!     type Handler = dyn ResizeHandler;
//!
//!     fn associated_type(&self) -> &EventType<dyn ResizeHandler> {
//!         &RESIZE
//!     }
//!
//!     fn dispatch(&self, handler: &dyn ResizeHandler) -> Result<()> {
//!         handler.on_resize(*self.checked(&self.width)?);
//!         Ok(())
//!     }
//!
//!     fn state(&self) -> &EventState {
//!         &self.state
//!     }
//! }
//!
//! struct Layout(Cell<u32>);
//!
//! impl ResizeHandler for Layout {
//!     fn on_resize(&self, width: u32) {
//!         self.0.set(width);
//!     }
//! }
//!
//! let bus = EventBus::new(Rc::new("window"));
//! let layout = Rc::new(Layout(Cell::new(0)));
//! let registration = bus.register(&*RESIZE, layout.clone() as Rc<dyn ResizeHandler>)?;
//!
//! let event = Resize { width: 640, state: EventState::new() };
//! bus.fire(&event)?;
//! assert_eq!(layout.0.get(), 640);
//! assert!(!event.is_live());
//!
//! // Reuse the same instance.
//! event.revive();
//! bus.fire(&event)?;
//!
//! registration.unregister()?;
//! assert!(!bus.is_handled(&*RESIZE));
//! # Ok::<(), signalbus::BusError>(())
//! ```

pub mod bus;
pub mod error;
pub mod event;
pub mod handlers;
pub mod registry;
pub mod types;

// Re-exports
pub use bus::{BusConfig, DispatchMode, EventBus, HandlerRegistration};
pub use error::{BusError, Result};
pub use event::{Event, EventState};
pub use handlers::{Handler, HandlerStore, INLINE_CAPACITY};
pub use registry::{EventType, HOUSEKEEPING_SLOTS};
pub use types::*;
