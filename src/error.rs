//! Error types for the event bus.

use crate::types::EventKey;
use thiserror::Error;

/// Main error type for bus operations.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("Handler index {index} out of range for {kind} (count is {count})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    #[error("Handler is not registered for {kind}")]
    UnregisteredHandler { kind: &'static str },

    #[error("Event {kind} is dead; revive it before reuse")]
    DeadNotification { kind: &'static str },

    #[error("Key {key:?} for {kind} collides with a slot held by another kind")]
    KeyConflict { kind: &'static str, key: EventKey },

    #[error("Event bus has been released")]
    BusReleased,

    #[error("Handler failed: {0}")]
    Handler(String),

    #[error("Invalid bus configuration: {0}")]
    Config(String),
}

impl BusError {
    /// Wrap an arbitrary handler failure.
    pub fn handler(e: impl std::fmt::Display) -> Self {
        BusError::Handler(e.to_string())
    }
}

impl From<serde_json::Error> for BusError {
    fn from(e: serde_json::Error) -> Self {
        BusError::Config(e.to_string())
    }
}

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;
