use crate::core::BodyHandle;
use std::collections::VecDeque;

/// Types of body events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEventType {
    /// A body has been added to the world
    Added,

    /// A body has been removed from the world
    Removed,
}

/// An event related to a single body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyEvent {
    /// The type of body event
    pub event_type: BodyEventType,

    /// The body that the event refers to
    pub body: BodyHandle,
}

/// Two overlapping bodies were replaced by one
#[derive(Debug, Clone, PartialEq)]
pub struct MergeEvent {
    /// The body whose evaluation found the overlap
    pub body_a: BodyHandle,

    /// The overlapping partner
    pub body_b: BodyHandle,

    /// The replacement body
    pub product: BodyHandle,

    /// Mass of the replacement body
    pub mass: f64,
}

/// A queue of events produced by the most recent step or reset
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Merge events
    merge_events: VecDeque<MergeEvent>,

    /// Body events
    body_events: VecDeque<BodyEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self {
            merge_events: VecDeque::new(),
            body_events: VecDeque::new(),
        }
    }

    /// Adds a merge event to the queue
    pub fn add_merge_event(&mut self, event: MergeEvent) {
        self.merge_events.push_back(event);
    }

    /// Adds a body event to the queue
    pub fn add_body_event(&mut self, event: BodyEvent) {
        self.body_events.push_back(event);
    }

    /// Gets the next merge event from the queue
    pub fn next_merge_event(&mut self) -> Option<MergeEvent> {
        self.merge_events.pop_front()
    }

    /// Gets the next body event from the queue
    pub fn next_body_event(&mut self) -> Option<BodyEvent> {
        self.body_events.pop_front()
    }

    /// Returns the number of queued merge events
    pub fn merge_count(&self) -> usize {
        self.merge_events.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.merge_events.is_empty() && self.body_events.is_empty()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.merge_events.clear();
        self.body_events.clear();
    }

    /// Iterates over the queued merge events
    pub fn merge_events(&self) -> impl Iterator<Item = &MergeEvent> {
        self.merge_events.iter()
    }

    /// Gets all body events of a specific type
    pub fn get_body_events_of_type(&self, event_type: BodyEventType) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }
}
