#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A 1D interval produced by projecting a shape onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    #[inline]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if the two intervals share a region of positive length
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max > other.min && other.max > self.min
    }

    /// Shortest distance `other` has to move along the axis to stop
    /// overlapping, or zero when disjoint.
    ///
    /// When one interval contains the other this is the smaller of the two
    /// push-out distances, not the length of the inner interval.
    #[inline]
    pub fn overlap(&self, other: &Self) -> f32 {
        if self.overlaps(other) {
            (self.max - other.min).min(other.max - self.min)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn center(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.max - self.min
    }
}
