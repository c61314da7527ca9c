//! Type registry handing out dense, permanent keys to event kinds.

use crate::handlers::INLINE_CAPACITY;
use crate::types::EventKey;
use parking_lot::{const_mutex, Mutex};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Slots reserved per kind on top of its handler capacity (count and
/// representation).
pub const HOUSEKEEPING_SLOTS: usize = 2;

/// Process-wide registry used by [`EventType::new`].
static GLOBAL_REGISTRY: Mutex<TypeRegistry> = const_mutex(TypeRegistry::new());

/// Registered event kind.
#[derive(Clone, Debug)]
struct KindInfo {
    name: &'static str,
    key: EventKey,
}

/// Allocator of event keys.
///
/// Keys are never released. Each allocation reserves `capacity + 2`
/// contiguous slots, so offsets are strictly increasing. Only the global
/// instance mints keys for [`EventType`]; private instances exist for
/// unit tests.
#[derive(Debug)]
pub(crate) struct TypeRegistry {
    kinds: Vec<KindInfo>,
    next_offset: usize,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub(crate) const fn new() -> Self {
        Self {
            kinds: Vec::new(),
            next_offset: 0,
        }
    }

    /// Allocate a key for a new kind with the given inline capacity.
    ///
    /// Capacities above [`INLINE_CAPACITY`] are clamped.
    pub(crate) fn allocate(&mut self, name: &'static str, capacity: usize) -> EventKey {
        if capacity > INLINE_CAPACITY {
            debug!(
                kind = name,
                requested = capacity,
                capacity = INLINE_CAPACITY,
                "clamped inline capacity"
            );
        }
        let capacity = capacity.min(INLINE_CAPACITY);
        let index = self.kinds.len();
        let offset = self.next_offset;
        self.next_offset += capacity + HOUSEKEEPING_SLOTS;

        let key = EventKey::new(index as u32, offset as u32, capacity as u16);
        self.kinds.push(KindInfo { name, key });

        debug!(kind = name, index, offset, capacity, "allocated event key");
        key
    }

    /// Name of the kind a key was allocated for.
    pub(crate) fn kind_name(&self, key: EventKey) -> Option<&'static str> {
        self.kinds
            .get(key.index())
            .filter(|info| info.key == key)
            .map(|info| info.name)
    }

    /// Number of kinds allocated so far.
    pub(crate) fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    /// Total slots reserved so far.
    pub(crate) fn reserved_slots(&self) -> usize {
        self.next_offset
    }
}

/// Allocate a key from the process-wide registry.
pub fn allocate(name: &'static str, capacity: usize) -> EventKey {
    GLOBAL_REGISTRY.lock().allocate(name, capacity)
}

/// Look up a kind name in the process-wide registry.
pub fn kind_name(key: EventKey) -> Option<&'static str> {
    GLOBAL_REGISTRY.lock().kind_name(key)
}

/// Number of kinds in the process-wide registry.
pub fn kind_count() -> usize {
    GLOBAL_REGISTRY.lock().kind_count()
}

/// Slots reserved so far by the process-wide registry.
pub fn reserved_slots() -> usize {
    GLOBAL_REGISTRY.lock().reserved_slots()
}

/// Singleton identifier of one event kind.
///
/// `H` is the handler interface events of this kind are delivered to,
/// usually a trait object such as `dyn ClickHandler`. Construct one per
/// kind and share it; every construction consumes a fresh key.
///
/// ```ignore
/// static CLICK: LazyLock<EventType<dyn ClickHandler>> =
///     LazyLock::new(|| EventType::new("click"));
/// ```
pub struct EventType<H: ?Sized> {
    key: EventKey,
    name: &'static str,
    _handler: PhantomData<fn(&H)>,
}

impl<H: ?Sized> EventType<H> {
    /// Allocate a new kind with the default inline capacity.
    pub fn new(name: &'static str) -> Self {
        Self::with_capacity(name, INLINE_CAPACITY)
    }

    /// Allocate a new kind with a custom inline capacity.
    ///
    /// Capacities above [`INLINE_CAPACITY`] are clamped to it, so such a
    /// kind reserves `INLINE_CAPACITY + HOUSEKEEPING_SLOTS` slots. A kind
    /// with capacity 0 promotes on its first registration.
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            key: allocate(name, capacity),
            name,
            _handler: PhantomData,
        }
    }

    pub fn key(&self) -> EventKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<H: ?Sized> fmt::Debug for EventType<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventType({}, {:?})", self.name, self.key)
    }
}

impl<H: ?Sized> PartialEq for EventType<H> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<H: ?Sized> Eq for EventType<H> {}
