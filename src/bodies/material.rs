#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Surface properties used by the rigid body resolution strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Material {
    /// Coefficient of friction, 0-1
    pub friction: f32,

    /// Coefficient of restitution, 0-1
    pub bounciness: f32,
}

impl Material {
    /// Creates a new material with the specified properties
    pub fn new(friction: f32, bounciness: f32) -> Self {
        Self { friction, bounciness }
    }

    /// Low friction, moderate bounce
    pub fn ice() -> Self {
        Self::new(0.05, 0.4)
    }

    /// High friction, high bounce
    pub fn rubber() -> Self {
        Self::new(0.8, 0.7)
    }

    /// Medium friction, little bounce
    pub fn wood() -> Self {
        Self::new(0.5, 0.2)
    }

    /// Loses no speed along the normal
    pub fn perfectly_elastic() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Combined material of two touching colliders: the lower of each coefficient
    pub fn combine(&self, other: &Material) -> Material {
        Material::new(self.friction.min(other.friction), self.bounciness.min(other.bounciness))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(0.99, 0.2)
    }
}
