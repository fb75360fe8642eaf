//! Per-update output buffers.
//!
//! The queue clears and refills [`Outputs`] on every update; hosts drain it
//! after the call instead of registering callbacks into the engine.

use serde::{Deserialize, Serialize};

use crate::ids::EntryHandle;

/// A user-data event that fired during the last update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredEvent {
    /// The queue entry whose motion carried the event.
    pub handle: EntryHandle,
    pub value: String,
}

/// Everything the queue produced during one update call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    pub fired: Vec<FiredEvent>,
    /// Entries that finished and were removed this update.
    pub finished: Vec<EntryHandle>,
}

impl Outputs {
    pub fn clear(&mut self) {
        self.fired.clear();
        self.finished.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty() && self.finished.is_empty()
    }
}

/// Optional push-style consumer for fired events, invoked in addition to the
/// polled buffer. Receives only event data, never engine state.
pub type EventSink = Box<dyn FnMut(&FiredEvent) + Send>;
