//! Kitchen event log with a bounded backlog.
//!
//! Timed transitions (completion, burn, cleaning, repair, washing) and forced
//! ones (breakdowns, disruptions) are recorded as [`KitchenEvent`]s. The host
//! drains the log after each scheduler advance to drive audio and UI.
//!
//! # Suppression
//!
//! Event kinds can be suppressed via [`EventLog::suppress`]; suppressed
//! events are never recorded.

use crate::disruption::DisruptionKind;
use crate::id::*;
use crate::time::Millis;
use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A kitchen event. All events carry the timestamp at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitchenEvent {
    // -- Processing --
    ProcessingStarted {
        appliance: ApplianceId,
        output: ItemId,
        count: u32,
        duration: Millis,
        at: Millis,
    },
    ProcessingCompleted {
        appliance: ApplianceId,
        output: ItemId,
        count: u32,
        at: Millis,
    },
    OutputBurned {
        appliance: ApplianceId,
        at: Millis,
    },

    // -- Maintenance --
    CleaningStarted {
        appliance: ApplianceId,
        at: Millis,
    },
    CleaningFinished {
        appliance: ApplianceId,
        at: Millis,
    },
    TrashEmptied {
        appliance: ApplianceId,
        discarded: u32,
        at: Millis,
    },
    ApplianceBroken {
        appliance: ApplianceId,
        at: Millis,
    },
    RepairStarted {
        appliance: ApplianceId,
        cost: u32,
        at: Millis,
    },
    RepairFinished {
        appliance: ApplianceId,
        at: Millis,
    },

    // -- Disruptions --
    DisruptionTriggered {
        appliance: ApplianceId,
        kind: DisruptionKind,
        at: Millis,
    },
    DisruptionResolved {
        appliance: ApplianceId,
        kind: DisruptionKind,
        at: Millis,
    },

    // -- Front of house --
    PlateWashed {
        plate: usize,
        at: Millis,
    },
    DishServed {
        dish: ItemId,
        customer: usize,
        price: u32,
        at: Millis,
    },
}

/// Which kind of transition an event reports. Keys suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ProcessingStarted,
    ProcessingCompleted,
    OutputBurned,
    CleaningStarted,
    CleaningFinished,
    TrashEmptied,
    ApplianceBroken,
    RepairStarted,
    RepairFinished,
    DisruptionTriggered,
    DisruptionResolved,
    PlateWashed,
    DishServed,
}

/// Total number of event kinds.
const EVENT_KIND_COUNT: usize = 13;

impl KitchenEvent {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            KitchenEvent::ProcessingStarted { .. } => EventKind::ProcessingStarted,
            KitchenEvent::ProcessingCompleted { .. } => EventKind::ProcessingCompleted,
            KitchenEvent::OutputBurned { .. } => EventKind::OutputBurned,
            KitchenEvent::CleaningStarted { .. } => EventKind::CleaningStarted,
            KitchenEvent::CleaningFinished { .. } => EventKind::CleaningFinished,
            KitchenEvent::TrashEmptied { .. } => EventKind::TrashEmptied,
            KitchenEvent::ApplianceBroken { .. } => EventKind::ApplianceBroken,
            KitchenEvent::RepairStarted { .. } => EventKind::RepairStarted,
            KitchenEvent::RepairFinished { .. } => EventKind::RepairFinished,
            KitchenEvent::DisruptionTriggered { .. } => EventKind::DisruptionTriggered,
            KitchenEvent::DisruptionResolved { .. } => EventKind::DisruptionResolved,
            KitchenEvent::PlateWashed { .. } => EventKind::PlateWashed,
            KitchenEvent::DishServed { .. } => EventKind::DishServed,
        }
    }

    /// The appliance this event concerns, if any.
    pub fn appliance(&self) -> Option<&ApplianceId> {
        match self {
            KitchenEvent::ProcessingStarted { appliance, .. }
            | KitchenEvent::ProcessingCompleted { appliance, .. }
            | KitchenEvent::OutputBurned { appliance, .. }
            | KitchenEvent::CleaningStarted { appliance, .. }
            | KitchenEvent::CleaningFinished { appliance, .. }
            | KitchenEvent::TrashEmptied { appliance, .. }
            | KitchenEvent::ApplianceBroken { appliance, .. }
            | KitchenEvent::RepairStarted { appliance, .. }
            | KitchenEvent::RepairFinished { appliance, .. }
            | KitchenEvent::DisruptionTriggered { appliance, .. }
            | KitchenEvent::DisruptionResolved { appliance, .. } => Some(appliance),
            KitchenEvent::PlateWashed { .. } | KitchenEvent::DishServed { .. } => None,
        }
    }
}

impl EventKind {
    /// Slot in the suppression table.
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer
// ---------------------------------------------------------------------------

/// Bounded backlog of kitchen events awaiting the host. A service that goes
/// undrained keeps only the most recent `capacity` events; older ones are
/// counted and discarded.
#[derive(Debug)]
pub struct EventBuffer {
    backlog: VecDeque<KitchenEvent>,
    capacity: usize,
    discarded: u64,
}

impl EventBuffer {
    /// Room for at least one event.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            backlog: VecDeque::with_capacity(capacity),
            capacity,
            discarded: 0,
        }
    }

    pub fn push(&mut self, event: KitchenEvent) {
        if self.backlog.len() == self.capacity {
            self.backlog.pop_front();
            self.discarded += 1;
        }
        self.backlog.push_back(event);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.backlog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backlog.is_empty()
    }

    /// Events lost to an undrained backlog since the kitchen opened.
    pub fn dropped_count(&self) -> u64 {
        self.discarded
    }

    /// Pending events, earliest transition first.
    pub fn iter(&self) -> impl Iterator<Item = &KitchenEvent> {
        self.backlog.iter()
    }

    /// Hand every pending event to the host.
    pub fn drain(&mut self) -> Vec<KitchenEvent> {
        self.backlog.drain(..).collect()
    }
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// The kitchen's event log: a bounded backlog plus per-kind suppression.
#[derive(Debug)]
pub struct EventLog {
    buffer: EventBuffer,
    suppressed: [bool; EVENT_KIND_COUNT],
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: EventBuffer::new(capacity),
            suppressed: [false; EVENT_KIND_COUNT],
        }
    }

    pub fn record(&mut self, event: KitchenEvent) {
        if self.suppressed[event.kind().index()] {
            return;
        }
        tracing::trace!(?event, "kitchen event");
        self.buffer.push(event);
    }

    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
    }

    pub fn unsuppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = false;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &KitchenEvent> {
        self.buffer.iter()
    }

    pub fn drain(&mut self) -> Vec<KitchenEvent> {
        self.buffer.drain()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn dropped_count(&self) -> u64 {
        self.buffer.dropped_count()
    }
}
