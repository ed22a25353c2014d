// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Trace building state

use super::event::Event;

/// Number of distinct hardware ids
pub const HW_IDS: usize = 1 << 6;

/// Maximum number of events generated for a single token
///
/// A token generates at most a cycle event and two retirements for the flush,
/// a cycle event, issue, label and stage event for the issue and a stage event
/// for the completion.
pub const MAX_EVENTS: usize = 8;

/// Maximum number of operations completing within a single token
const MAX_PENDING: usize = 2;

/// Trace building state
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Absolute cycle reconstructed so far
    pub cycle: u64,

    /// Next trace id to allocate
    pub next_id: u64,

    /// Operations awaiting completion
    pub in_flight: InFlight,

    /// Completed operations not yet retired
    pub pending: Pending,

    /// Number of tokens processed
    pub tokens: usize,
}

impl State {
    /// Allocate a fresh trace id
    pub fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Table mapping hardware ids to trace ids of in-flight operations
#[derive(Clone, Debug)]
pub struct InFlight {
    slots: [Option<u64>; HW_IDS],
}

impl InFlight {
    /// Retrieve the trace id currently holding the given hardware id
    pub fn get(&self, hw_id: u8) -> Option<u64> {
        self.slots.get(usize::from(hw_id)).copied().flatten()
    }

    /// Record the trace id now holding the given hardware id
    ///
    /// Returns the trace id previously holding it, if any.
    pub fn insert(&mut self, hw_id: u8, trace_id: u64) -> Option<u64> {
        self.slots
            .get_mut(usize::from(hw_id))
            .and_then(|s| s.replace(trace_id))
    }

    /// Release the given hardware id, returning the trace id holding it
    pub fn remove(&mut self, hw_id: u8) -> Option<u64> {
        self.slots.get_mut(usize::from(hw_id)).and_then(Option::take)
    }

    /// Iterate over all (hardware id, trace id) pairs in hardware id order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0u8..)
            .zip(self.slots.iter())
            .filter_map(|(hw, t)| t.map(|t| (hw, t)))
    }

    /// Retrieve the number of operations in flight
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self {
            slots: [None; HW_IDS],
        }
    }
}

/// Insertion ordered set of trace ids pending retirement
#[derive(Clone, Debug, Default)]
pub struct Pending {
    ids: [u64; MAX_PENDING],
    len: usize,
}

impl Pending {
    /// Add a trace id
    ///
    /// The set is flushed before every token and a token completes at most
    /// [`MAX_PENDING`] operations.
    pub fn push(&mut self, id: u64) {
        debug_assert!(self.len < MAX_PENDING, "Too many pending retirements");
        if let Some(slot) = self.ids.get_mut(self.len) {
            *slot = id;
            self.len += 1;
        }
    }

    /// Retrieve the pending trace ids in insertion order
    pub fn as_slice(&self) -> &[u64] {
        &self.ids[..self.len]
    }

    /// Remove all ids
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Queue of events generated for a single token
#[derive(Clone, Debug, Default)]
pub struct Queue {
    events: [Option<Event>; MAX_EVENTS],
    head: usize,
    tail: usize,
}

impl Queue {
    /// Add an event to the back of the queue
    pub fn push(&mut self, event: Event) {
        debug_assert!(self.tail < MAX_EVENTS, "Event queue overflow");
        if let Some(slot) = self.events.get_mut(self.tail) {
            *slot = Some(event);
            self.tail += 1;
        }
    }

    /// Remove the event at the front of the queue
    pub fn pop(&mut self) -> Option<Event> {
        let event = self.events.get_mut(self.head)?.take()?;
        self.head += 1;
        if self.head == self.tail {
            self.head = 0;
            self.tail = 0;
        }
        Some(event)
    }

    /// Retrieve the number of queued events
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }
}
