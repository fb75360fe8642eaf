//! Interned parameter identifiers and handle allocation.
//!
//! Parameter and part names are interned through an [`IdManager`]: the same
//! string always yields the same [`ParameterId`] for the manager's lifetime,
//! so id comparison is a cheap integer compare. Queue entry handles come from
//! a monotonic allocator and are never reused after an entry is reaped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Interned identifier for a model parameter or part.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ParameterId(pub u32);

/// Opaque identity token for one queue entry. Unique per playback instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EntryHandle(pub u32);

/// String interner mapping names to stable [`ParameterId`]s.
#[derive(Default, Debug)]
pub struct IdManager {
    by_name: HashMap<String, ParameterId>,
    names: Vec<String>,
}

impl IdManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning the existing id if already seen.
    pub fn id(&mut self, name: &str) -> ParameterId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = ParameterId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up an id without interning.
    pub fn get(&self, name: &str) -> Option<ParameterId> {
        self.by_name.get(name).copied()
    }

    /// The name a given id was interned from.
    pub fn name(&self, id: ParameterId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Monotonic allocator for [`EntryHandle`]s.
#[derive(Default, Debug)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> EntryHandle {
        let handle = EntryHandle(self.next);
        self.next = self.next.wrapping_add(1);
        handle
    }
}
