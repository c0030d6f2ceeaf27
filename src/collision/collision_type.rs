#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// How a collider takes part in collision detection and response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum CollisionType {
    /// Never generates pairs or events
    #[default]
    PreventCollision,

    /// Generates contacts and events, but is never moved by resolution
    Passive,

    /// Generates contacts and events and is pushed out of overlaps
    Active,

    /// Immovable; pushes Active colliders but never moves itself
    Fixed,
}

impl CollisionType {
    /// Returns true if collision response may move a collider of this type
    #[inline]
    pub fn receives_response(self) -> bool {
        self == CollisionType::Active
    }
}
