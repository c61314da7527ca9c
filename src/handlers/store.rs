//! Handler table indexed by event key.

use super::slot::HandlerSlot;
use super::Handler;
use crate::error::{BusError, Result};
use crate::registry;
use crate::types::{BusStats, EventKey, Representation, SlotStats};
use std::rc::Rc;
use tracing::debug;

/// Label used when a key was not minted by the global registry.
const UNKNOWN_KIND: &str = "<unknown>";

fn kind_label(key: EventKey) -> &'static str {
    registry::kind_name(key).unwrap_or(UNKNOWN_KIND)
}

/// Ordered handlers for every event kind a bus has seen.
///
/// The key's dense index is the position in the slot table. Slots are
/// created lazily on first `add`.
#[derive(Debug, Default)]
pub struct HandlerStore {
    slots: Vec<Option<(EventKey, HandlerSlot)>>,
}

impl HandlerStore {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Slot owned by `key`. A slot created for a different key at the
    /// same index reads as absent.
    fn slot(&self, key: EventKey) -> Option<&HandlerSlot> {
        self.slots
            .get(key.index())
            .and_then(Option::as_ref)
            .filter(|(owner, _)| *owner == key)
            .map(|(_, slot)| slot)
    }

    fn slot_mut(&mut self, key: EventKey) -> Result<&mut HandlerSlot> {
        let index = key.index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        let (owner, slot) =
            self.slots[index].get_or_insert_with(|| (key, HandlerSlot::new(key.capacity())));
        if *owner != key {
            return Err(BusError::KeyConflict {
                kind: kind_label(key),
                key,
            });
        }
        Ok(slot)
    }

    /// Append a handler to the end of the kind's list.
    pub fn add(&mut self, key: EventKey, handler: Handler) -> Result<()> {
        let slot = self.slot_mut(key)?;
        if slot.push(handler) {
            debug!(
                kind = kind_label(key),
                handlers = slot.len(),
                "promoted handler slot to overflow"
            );
        }
        Ok(())
    }

    /// Handler at `index` in registration order.
    pub fn get(&self, key: EventKey, index: usize) -> Result<&Handler> {
        self.slot(key)
            .and_then(|slot| slot.get(index))
            .ok_or_else(|| BusError::IndexOutOfRange {
                kind: kind_label(key),
                index,
                count: self.count(key),
            })
    }

    /// Number of handlers; 0 for a kind never used on this store.
    pub fn count(&self, key: EventKey) -> usize {
        self.slot(key).map_or(0, HandlerSlot::len)
    }

    /// Remove one occurrence of `handler` and hand it back.
    ///
    /// The slot is promoted to the overflow list even when the handler
    /// turns out to be missing.
    pub fn remove<H: ?Sized + 'static>(
        &mut self,
        key: EventKey,
        handler: &Rc<H>,
    ) -> Result<Handler> {
        self.slot_mut(key)?
            .remove_first(|h| h.is(handler))
            .ok_or_else(|| BusError::UnregisteredHandler {
                kind: kind_label(key),
            })
    }

    /// Take every handler of the kind out, in registration order.
    pub fn clear(&mut self, key: EventKey) -> Result<Vec<Handler>> {
        Ok(self.slot_mut(key)?.clear())
    }

    /// Active representation, or `None` for an untouched kind.
    pub fn representation(&self, key: EventKey) -> Option<Representation> {
        self.slot(key).map(HandlerSlot::representation)
    }

    /// Ordered copy of the kind's handlers.
    ///
    /// Handlers registered under a different interface than `H` are
    /// skipped.
    pub fn snapshot<H: ?Sized + 'static>(&self, key: EventKey) -> Vec<Rc<H>> {
        self.slot(key)
            .map(|slot| {
                slot.iter()
                    .filter_map(|h| h.downcast::<H>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn stats(&self) -> BusStats {
        let mut stats = BusStats::default();

        for (key, slot) in self.slots.iter().flatten() {
            stats.total_handlers += slot.len();
            if slot.representation() == Representation::Overflow {
                stats.overflow_slots += 1;
            }
            stats.slots.push(SlotStats {
                kind: kind_label(*key).to_string(),
                key: key.index(),
                handlers: slot.len(),
                representation: slot.representation(),
            });
        }

        stats
    }
}
