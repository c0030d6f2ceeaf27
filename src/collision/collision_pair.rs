use crate::bodies::Body;
use crate::collision::{CollisionContact, CollisionType};
use crate::core::BodyHandle;

/// Order-independent identity of two bodies tested together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId {
    /// The lower handle
    pub body_a: BodyHandle,

    /// The higher handle
    pub body_b: BodyHandle,
}

impl PairId {
    /// Creates a new pair id; `(a, b)` and `(b, a)` give the same id
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        if body_a.0 <= body_b.0 {
            Self { body_a, body_b }
        } else {
            Self { body_a: body_b, body_b: body_a }
        }
    }

    /// Checks if this pair contains the specified body
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Returns the other body in the pair
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Two bodies being tested together this step, and the contact between
/// them once the narrow phase has run
#[derive(Debug, Clone)]
pub struct Pair {
    id: PairId,

    /// Narrow-phase result, `None` until computed or when not touching
    pub collision: Option<CollisionContact>,
}

impl Pair {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            id: PairId::new(body_a, body_b),
            collision: None,
        }
    }

    /// Identity shared by `(a, b)` and `(b, a)`
    pub fn calculate_pair_hash(body_a: BodyHandle, body_b: BodyHandle) -> PairId {
        PairId::new(body_a, body_b)
    }

    pub fn id(&self) -> PairId {
        self.id
    }

    pub fn body_a(&self) -> BodyHandle {
        self.id.body_a
    }

    pub fn body_b(&self) -> BodyHandle {
        self.id.body_b
    }

    /// Whether two bodies may generate a contact at all.
    ///
    /// Rejects self pairs, excluded groups, two fixed colliders, colliders
    /// that prevent collision and killed bodies.
    pub fn can_collide(handle_a: BodyHandle, a: &Body, handle_b: BodyHandle, b: &Body) -> bool {
        if handle_a == handle_b {
            return false;
        }
        if !a.is_active() || !b.is_active() {
            return false;
        }

        let collider_a = a.get_collider();
        let collider_b = b.get_collider();

        let type_a = collider_a.get_collision_type();
        let type_b = collider_b.get_collision_type();

        if type_a == CollisionType::PreventCollision || type_b == CollisionType::PreventCollision {
            return false;
        }
        if type_a == CollisionType::Fixed && type_b == CollisionType::Fixed {
            return false;
        }

        collider_a.get_group().can_collide(collider_b.get_group())
    }
}
