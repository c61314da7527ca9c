//! A single kind's handler list in one of its two representations.

use super::{Handler, INLINE_CAPACITY};
use crate::types::Representation;

/// Ordered handlers of one kind.
#[derive(Debug)]
pub(crate) enum HandlerSlot {
    /// Up to `capacity` handlers held in place; `len` are occupied.
    Inline {
        handlers: [Option<Handler>; INLINE_CAPACITY],
        len: usize,
        capacity: usize,
    },
    /// Growable list. A slot never leaves this state.
    Overflow(Vec<Handler>),
}

impl HandlerSlot {
    pub(crate) fn new(capacity: usize) -> Self {
        HandlerSlot::Inline {
            handlers: Default::default(),
            len: 0,
            capacity: capacity.min(INLINE_CAPACITY),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            HandlerSlot::Inline { len, .. } => *len,
            HandlerSlot::Overflow(list) => list.len(),
        }
    }

    pub(crate) fn representation(&self) -> Representation {
        match self {
            HandlerSlot::Inline { .. } => Representation::Inline,
            HandlerSlot::Overflow(_) => Representation::Overflow,
        }
    }

    /// Switch to the overflow list, keeping order. Returns whether the
    /// slot was inline before the call.
    pub(crate) fn promote(&mut self) -> bool {
        let HandlerSlot::Inline { handlers, len, .. } = self else {
            return false;
        };

        let mut list = Vec::with_capacity(*len + 1);
        list.extend(handlers.iter_mut().take(*len).filter_map(Option::take));
        *self = HandlerSlot::Overflow(list);
        true
    }

    /// Append a handler. Returns whether this promoted the slot.
    pub(crate) fn push(&mut self, handler: Handler) -> bool {
        if let HandlerSlot::Inline {
            handlers,
            len,
            capacity,
        } = self
        {
            if *len < *capacity {
                handlers[*len] = Some(handler);
                *len += 1;
                return false;
            }
        }

        let promoted = self.promote();
        if let HandlerSlot::Overflow(list) = self {
            list.push(handler);
        }
        promoted
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Handler> {
        match self {
            HandlerSlot::Inline { handlers, len, .. } if index < *len => handlers[index].as_ref(),
            HandlerSlot::Inline { .. } => None,
            HandlerSlot::Overflow(list) => list.get(index),
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Handler> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Remove the first handler matching `is_target`, shifting later
    /// entries down. Promotes unconditionally.
    pub(crate) fn remove_first(&mut self, is_target: impl Fn(&Handler) -> bool) -> Option<Handler> {
        self.promote();
        let HandlerSlot::Overflow(list) = self else {
            return None;
        };

        let position = list.iter().position(is_target)?;
        Some(list.remove(position))
    }

    /// Take all handlers out, leaving an empty overflow list. Promotes
    /// unconditionally.
    pub(crate) fn clear(&mut self) -> Vec<Handler> {
        self.promote();
        match self {
            HandlerSlot::Overflow(list) => std::mem::take(list),
            HandlerSlot::Inline { .. } => Vec::new(),
        }
    }
}
