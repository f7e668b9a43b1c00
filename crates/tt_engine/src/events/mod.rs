//! Event queues for notifications produced during a tick
//!
//! Systems push events while they run; game code drains them after the
//! frame. Events are delivered in the order they were sent.

use crate::ecs::EntityId;

/// Raised when `entity` starts colliding with `other`
///
/// Only the rising edge is reported: an overlapping pair produces one event
/// per participant until the two separate again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionEvent {
    /// The collidable entity that detected the collision
    pub entity: EntityId,
    /// The entity it collided with
    pub other: EntityId,
    /// Simulation tick the collision started on
    pub tick: u64,
}

/// FIFO queue of events of one type
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    queue: Vec<T>,
}

impl<T> EventQueue<T> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queue an event
    pub fn send(&mut self, event: T) {
        self.queue.push(event);
    }

    /// Take all queued events, oldest first
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.queue)
    }

    /// Peek at the queued events
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no events are queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
