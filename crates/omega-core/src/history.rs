//! Bounded, chronological log of per-step events.

use std::collections::VecDeque;

use omega_types::{EventRecord, Metrics};

/// FIFO event log of fixed capacity.
///
/// Insertion order is chronological order. Once the log holds more than
/// `max_events` records, the oldest are dropped first.
#[derive(Debug, Clone, PartialEq)]
pub struct EventHistory {
    /// Maximum number of retained records.
    max_events: usize,
    /// Retained records, oldest at the front.
    events: VecDeque<EventRecord>,
}

impl EventHistory {
    /// Create an empty history holding at most `max_events` records.
    pub fn new(max_events: usize) -> Self {
        Self {
            max_events,
            events: VecDeque::with_capacity(max_events.saturating_add(1)),
        }
    }

    /// Record one step.
    ///
    /// Appends a record built from `t` and the scalar fields of `metrics`,
    /// trims the log to capacity, and hands `state` back unchanged together
    /// with the one record produced by this call.
    pub fn tick(&mut self, t: u64, state: Vec<f64>, metrics: &Metrics) -> (Vec<f64>, Vec<EventRecord>) {
        let event = EventRecord {
            step_index: t,
            coherence: metrics.coherence,
            max_abs: metrics.max_abs,
            variance: metrics.variance,
        };
        self.events.push_back(event);
        while self.events.len() > self.max_events {
            self.events.pop_front();
        }
        (state, vec![event])
    }

    /// Copy of the full log, oldest first.
    pub fn get_events(&self) -> Vec<EventRecord> {
        self.events.iter().copied().collect()
    }

    /// Most recent record, if any.
    pub fn latest(&self) -> Option<&EventRecord> {
        self.events.back()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no records are retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Configured capacity.
    pub const fn max_events(&self) -> usize {
        self.max_events
    }
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new(500)
    }
}
