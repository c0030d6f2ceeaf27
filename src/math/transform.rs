use crate::math::Vector;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Position, rotation and scale of a body in world space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position in world space
    pub position: Vector,

    /// Rotation in radians
    pub rotation: f32,

    /// Scale along each axis
    pub scale: Vector,
}

impl Transform {
    /// Creates a new transform with the given position, rotation, and scale
    #[inline]
    pub fn new(position: Vector, rotation: f32, scale: Vector) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Creates a new identity transform (no translation, no rotation, unit scale)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector::ZERO,
            rotation: 0.0,
            scale: Vector::ONE,
        }
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Creates a new transform from a position and rotation
    #[inline]
    pub fn from_position_rotation(position: Vector, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            scale: Vector::ONE,
        }
    }

    /// Scales, rotates, then translates a local point into world space
    #[inline]
    pub fn apply(&self, local: Vector) -> Vector {
        local.scale_by(&self.scale).rotate(self.rotation) + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
