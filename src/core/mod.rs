pub mod world;
pub mod config;
pub mod storage;
pub mod events;

pub use self::world::PhysicsWorld;
pub use self::config::{ResolutionStrategy, SimulationConfig};
pub use self::storage::{BodyStorage, Storage};
pub use self::events::{BodyEvent, BodyEventType, CollisionEvent, CollisionEventType, EventQueue};

/// A unique identifier for a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    /// Raw numeric id, stable for the lifetime of the body
    pub fn id(&self) -> u32 {
        self.0
    }
}
