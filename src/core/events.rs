use crate::collision::Side;
use crate::core::BodyHandle;
use crate::math::Vector;
use std::collections::VecDeque;

/// Types of collision events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventType {
    /// A pair was found overlapping, before any resolution
    PreCollision,

    /// Resolution moved the target
    PostCollision,

    /// The pair started touching this step
    CollisionStart,

    /// The pair stopped touching this step
    CollisionEnd,
}

/// A collision event delivered to one participant.
///
/// Every contact produces one event per participant, each seeing the other
/// body as `other`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// The type of collision event
    pub event_type: CollisionEventType,

    /// The body receiving the event
    pub target: BodyHandle,

    /// The other body in the collision
    pub other: BodyHandle,

    /// Side of `target` that was hit (`Side::None` for start/end)
    pub side: Side,

    /// Intersection vector as seen by `target` (zero for start/end)
    pub intersection: Vector,
}

impl CollisionEvent {
    pub fn new(event_type: CollisionEventType, target: BodyHandle, other: BodyHandle, side: Side, intersection: Vector) -> Self {
        Self {
            event_type,
            target,
            other,
            side,
            intersection,
        }
    }

    /// Lifecycle event (start/end) with no geometry attached
    pub fn lifecycle(event_type: CollisionEventType, target: BodyHandle, other: BodyHandle) -> Self {
        Self::new(event_type, target, other, Side::None, Vector::ZERO)
    }
}

/// Types of body events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEventType {
    /// A body has been added to the world
    Added,

    /// A body has been removed from the world
    Removed,

    /// A body left the world bounds and is no longer tracked by the broad phase
    Untracked,
}

/// An event related to a single body
#[derive(Debug, Clone)]
pub struct BodyEvent {
    /// The type of body event
    pub event_type: BodyEventType,

    /// The body that the event refers to
    pub body: BodyHandle,
}

/// A queue of physics events
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Collision events
    collision_events: VecDeque<CollisionEvent>,

    /// Body events
    body_events: VecDeque<BodyEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self {
            collision_events: VecDeque::new(),
            body_events: VecDeque::new(),
        }
    }

    /// Adds a collision event to the queue
    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push_back(event);
    }

    /// Adds a body event to the queue
    pub fn add_body_event(&mut self, event: BodyEvent) {
        self.body_events.push_back(event);
    }

    /// Gets the next collision event from the queue
    pub fn next_collision_event(&mut self) -> Option<CollisionEvent> {
        self.collision_events.pop_front()
    }

    /// Gets the next body event from the queue
    pub fn next_body_event(&mut self) -> Option<BodyEvent> {
        self.body_events.pop_front()
    }

    /// Returns whether there are any collision events in the queue
    pub fn has_collision_events(&self) -> bool {
        !self.collision_events.is_empty()
    }

    /// Returns whether there are any body events in the queue
    pub fn has_body_events(&self) -> bool {
        !self.body_events.is_empty()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.body_events.is_empty()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.body_events.clear();
    }

    /// All queued collision events in emission order
    pub fn collision_events(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.collision_events.iter()
    }

    /// Gets all collision events of a specific type
    pub fn get_collision_events_of_type(&self, event_type: CollisionEventType) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all body events of a specific type
    pub fn get_body_events_of_type(&self, event_type: BodyEventType) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all collision events delivered to a specific body
    pub fn get_collision_events_for_body(&self, body: BodyHandle) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.target == body)
            .collect()
    }

    /// Gets all body events for a specific body
    pub fn get_body_events_for_body(&self, body: BodyHandle) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.body == body)
            .collect()
    }
}
