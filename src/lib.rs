pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;

/// Re-export common types for easier usage
pub use crate::core::{BodyHandle, PhysicsWorld, ResolutionStrategy, SimulationConfig};
pub use crate::core::{CollisionEvent, CollisionEventType, EventQueue};
pub use crate::bodies::{Body, Collider, ColliderBuilder, Material};
pub use crate::collision::{BoundingBox, CollisionGroup, CollisionType, Side};
pub use crate::shapes::{Shape, ShapeKind};
pub use crate::math::Vector;

/// Error types for the collision engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Collider has no shape")]
        MissingShape,

        #[error("Cannot create more than {0} collision groups")]
        TooManyGroups(u32),

        #[error("Collision group already exists: {0}")]
        DuplicateGroup(String),

        #[error("Invalid geometry: {0}")]
        InvalidGeometry(String),
    }
}

/// Result type for collision engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
