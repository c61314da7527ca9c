//! Core types shared by the registry, handler store and bus.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Object attributed as the origin of an event during a dispatch.
pub type Source = Rc<dyn Any>;

/// Dense, permanent key of an event kind.
///
/// Only the type registry mints keys. `index` addresses a slot in a
/// bus's handler table; `offset` is the start of the block reserved for
/// the kind and grows by `capacity + 2` with every allocation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    index: u32,
    offset: u32,
    capacity: u16,
}

impl EventKey {
    pub(crate) fn new(index: u32, offset: u32, capacity: u16) -> Self {
        Self {
            index,
            offset,
            capacity,
        }
    }

    /// Position of this kind in allocation order.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Start of the reserved block.
    pub fn offset(self) -> usize {
        self.offset as usize
    }

    /// Inline handler capacity reserved for the kind.
    pub fn capacity(self) -> usize {
        self.capacity as usize
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventKey({}@{})", self.index, self.offset)
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// Physical layout of a handler slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Fixed-capacity inline slots.
    Inline,
    /// Growable list. Never reverts to `Inline`.
    Overflow,
}

/// Per-kind handler statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStats {
    pub kind: String,
    pub key: usize,
    pub handlers: usize,
    pub representation: Representation,
}

/// Snapshot of a bus's handler table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusStats {
    /// Slots that have ever been touched, in key order.
    pub slots: Vec<SlotStats>,
    /// Total handlers across all kinds.
    pub total_handlers: usize,
    /// Slots promoted to the overflow list.
    pub overflow_slots: usize,
}

impl BusStats {
    /// Render as pretty JSON for diagnostics.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_json_parses_back() {
        let stats = BusStats {
            slots: vec![SlotStats {
                kind: "resize".to_string(),
                key: 3,
                handlers: 6,
                representation: Representation::Overflow,
            }],
            total_handlers: 6,
            overflow_slots: 1,
        };

        let json = stats.to_json().unwrap();
        assert!(json.contains("\"overflow\""));
        assert_eq!(serde_json::from_str::<BusStats>(&json).unwrap(), stats);
    }

    #[test]
    fn test_key_debug_shows_index_and_offset() {
        let key = EventKey::new(2, 14, 5);
        assert_eq!(format!("{:?}", key), "EventKey(2@14)");
    }
}
