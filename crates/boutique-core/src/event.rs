//! Typed event system with pre-allocated ring buffers.
//!
//! Wave sessions emit events as side effects of ticks and player actions.
//! Each event kind has its own [`EventBuffer`] ring buffer with a
//! configurable capacity; the embedding layer reads the buffers after each
//! advance (for cue routing) and then flushes them with [`EventBus::deliver`],
//! which also forwards every buffered event to registered passive listeners.
//!
//! # Suppression
//!
//! Event kinds can be suppressed via [`EventBus::suppress`], which prevents
//! any allocation or recording for that kind. Suppressed events have zero cost.

use crate::fixed::Ticks;
use crate::id::{CustomerId, ItemId};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A wave event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A wave began with this roster size.
    WaveStarted {
        wave_number: u32,
        customer_count: usize,
        tick: Ticks,
    },
    /// A customer agreed to wait while the player crafts their order.
    MakeToOrderStarted {
        customer: CustomerId,
        tick: Ticks,
    },
    /// A crafted item came back while the ordering customer was still waiting.
    ItemDelivered {
        customer: CustomerId,
        item: ItemId,
        tick: Ticks,
    },
    /// A crafted item came back after the ordering customer had already left.
    DeliveryMissed {
        customer: CustomerId,
        item: ItemId,
        tick: Ticks,
    },
    /// A customer ran out of patience and left without a sale attempt.
    CustomerWalkedOut {
        customer: CustomerId,
        waiting_for_order: bool,
        tick: Ticks,
    },
    /// A sale attempt resolved, successfully or not.
    SaleCompleted {
        customer: CustomerId,
        item: ItemId,
        coins: u32,
        success: bool,
        tick: Ticks,
    },
    /// The wave finished (timer ran out or every customer was served).
    WaveEnded {
        wave_number: u32,
        total_earned: u32,
        items_sold: u32,
        tick: Ticks,
    },
}

/// Discriminant tag for event types, used for suppression and buffer lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    WaveStarted,
    MakeToOrderStarted,
    ItemDelivered,
    DeliveryMissed,
    CustomerWalkedOut,
    SaleCompleted,
    WaveEnded,
}

/// Total number of event kinds.
const EVENT_KIND_COUNT: usize = 7;

impl Event {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::WaveStarted { .. } => EventKind::WaveStarted,
            Event::MakeToOrderStarted { .. } => EventKind::MakeToOrderStarted,
            Event::ItemDelivered { .. } => EventKind::ItemDelivered,
            Event::DeliveryMissed { .. } => EventKind::DeliveryMissed,
            Event::CustomerWalkedOut { .. } => EventKind::CustomerWalkedOut,
            Event::SaleCompleted { .. } => EventKind::SaleCompleted,
            Event::WaveEnded { .. } => EventKind::WaveEnded,
        }
    }

    /// The tick the event occurred at.
    pub fn tick(&self) -> Ticks {
        match *self {
            Event::WaveStarted { tick, .. }
            | Event::MakeToOrderStarted { tick, .. }
            | Event::ItemDelivered { tick, .. }
            | Event::DeliveryMissed { tick, .. }
            | Event::CustomerWalkedOut { tick, .. }
            | Event::SaleCompleted { tick, .. }
            | Event::WaveEnded { tick, .. } => tick,
        }
    }
}

impl EventKind {
    /// All kinds, in buffer-index order.
    pub const ALL: [EventKind; EVENT_KIND_COUNT] = [
        EventKind::WaveStarted,
        EventKind::MakeToOrderStarted,
        EventKind::ItemDelivered,
        EventKind::DeliveryMissed,
        EventKind::CustomerWalkedOut,
        EventKind::SaleCompleted,
        EventKind::WaveEnded,
    ];

    /// Convert to usize index for array lookups.
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer — pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// A pre-allocated ring buffer for events. Fixed capacity; when full, the
/// oldest events are dropped.
#[derive(Debug)]
pub struct EventBuffer {
    /// Pre-allocated storage.
    events: Vec<Option<Event>>,
    /// Write position (wraps around).
    head: usize,
    /// Number of events currently stored (may be less than capacity).
    len: usize,
    /// Total events ever written (including dropped).
    total_written: u64,
}

impl EventBuffer {
    /// Create a new ring buffer with the given capacity.
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
        }
    }

    /// Push an event into the ring buffer. If full, the oldest event is dropped.
    pub fn push(&mut self, event: Event) {
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        self.total_written += 1;
    }

    /// The total capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    /// Number of events currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total events written since creation (including dropped).
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Number of events that were dropped because the buffer was full.
    pub fn dropped_count(&self) -> u64 {
        self.total_written.saturating_sub(self.capacity() as u64)
    }

    /// Iterate over events in order from oldest to newest.
    pub fn iter(&self) -> EventBufferIter<'_> {
        let start = if self.len < self.capacity() {
            0
        } else {
            // head points to the next write position, which is the oldest entry
            self.head
        };
        EventBufferIter {
            buffer: self,
            index: start,
            remaining: self.len,
        }
    }

    /// Clear all events from the buffer.
    pub fn clear(&mut self) {
        for slot in &mut self.events {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}

/// Iterator over events in an [`EventBuffer`], from oldest to newest.
pub struct EventBufferIter<'a> {
    buffer: &'a EventBuffer,
    index: usize,
    remaining: usize,
}

impl<'a> Iterator for EventBufferIter<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let event = self.buffer.events[self.index].as_ref();
        self.index = (self.index + 1) % self.buffer.capacity();
        self.remaining -= 1;
        event
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for EventBufferIter<'_> {}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

const fn empty_listener_array() -> [Vec<PassiveListener>; EVENT_KIND_COUNT] {
    // Cannot use Default in const context, so we build it manually.
    [
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
    ]
}

/// The central event bus. Holds one ring buffer per event kind, passive
/// listener lists, and suppression flags.
pub struct EventBus {
    /// One ring buffer per event kind. Allocated lazily on first emit.
    buffers: [Option<EventBuffer>; EVENT_KIND_COUNT],

    /// Suppressed event kinds. Suppressed events are never buffered.
    suppressed: [bool; EVENT_KIND_COUNT],

    /// Passive listeners indexed by event kind.
    listeners: [Vec<PassiveListener>; EVENT_KIND_COUNT],

    /// Default buffer capacity for new event buffers.
    default_capacity: usize,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("buffers", &self.buffers)
            .field("suppressed", &self.suppressed)
            .field("default_capacity", &self.default_capacity)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create a new event bus with the given default buffer capacity per kind.
    pub fn new(default_capacity: usize) -> Self {
        Self {
            buffers: Default::default(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: empty_listener_array(),
            default_capacity,
        }
    }

    /// Suppress an event kind. Suppressed events are never allocated or buffered.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        // Drop the buffer if it exists -- zero allocation for suppressed events.
        self.buffers[kind.index()] = None;
    }

    /// Check if an event kind is suppressed.
    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Emit an event. Stores it in the appropriate ring buffer. No-ops if
    /// the event kind is suppressed.
    pub fn emit(&mut self, event: Event) {
        let kind = event.kind();
        let idx = kind.index();

        if self.suppressed[idx] {
            return;
        }

        // Lazily allocate buffer on first emit.
        if self.buffers[idx].is_none() {
            self.buffers[idx] = Some(EventBuffer::new(self.default_capacity));
        }

        self.buffers[idx].as_mut().unwrap().push(event);
    }

    /// Register a passive listener for an event kind. Listeners are called
    /// in registration order during delivery.
    pub fn on_passive(&mut self, kind: EventKind, listener: PassiveListener) {
        self.listeners[kind.index()].push(listener);
    }

    /// Deliver all buffered events to listeners and clear the buffers.
    ///
    /// For each event kind with buffered events, iterate oldest-to-newest
    /// and call every listener in registration order, then clear the buffer.
    /// Kinds are flushed in [`EventKind::ALL`] order.
    pub fn deliver(&mut self) {
        for idx in 0..EVENT_KIND_COUNT {
            if self.suppressed[idx] {
                continue;
            }

            let Some(buffer) = self.buffers[idx].as_ref() else {
                continue;
            };

            if buffer.is_empty() {
                continue;
            }

            // Collect events into a temporary Vec to avoid borrow conflicts
            // between the buffer and listeners.
            let events: Vec<Event> = buffer.iter().cloned().collect();

            for listener in &mut self.listeners[idx] {
                for event in &events {
                    listener(event);
                }
            }

            if let Some(buffer) = self.buffers[idx].as_mut() {
                buffer.clear();
            }
        }
    }

    /// Get the event buffer for a specific event kind (read-only).
    pub fn buffer(&self, kind: EventKind) -> Option<&EventBuffer> {
        self.buffers[kind.index()].as_ref()
    }

    /// Get the count of events currently buffered for a kind.
    pub fn buffered_count(&self, kind: EventKind) -> usize {
        self.buffers[kind.index()]
            .as_ref()
            .map(|b| b.len())
            .unwrap_or(0)
    }

    /// Get the total events ever emitted for a kind (including dropped).
    pub fn total_emitted(&self, kind: EventKind) -> u64 {
        self.buffers[kind.index()]
            .as_ref()
            .map(|b| b.total_written())
            .unwrap_or(0)
    }

    /// Clear all buffers. Does not remove listeners or suppression settings.
    pub fn clear_all(&mut self) {
        for buffer in &mut self.buffers {
            if let Some(b) = buffer.as_mut() {
                b.clear();
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
