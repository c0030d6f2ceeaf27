use crate::collision::Side;
use crate::math::{Ray, Vector};
use crate::shapes::Shape;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Tolerance used when deciding whether one box fully contains another
const CONTAINMENT_TOLERANCE: f32 = 1.0e-4;

/// Axis-aligned bounding box in screen space (top < bottom)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    /// Creates a box from raw edges; keeping `left <= right` and
    /// `top <= bottom` is up to the caller
    #[inline]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// A box spanning (almost) the entire representable plane
    pub fn everything() -> Self {
        Self::new(-f32::MAX, -f32::MAX, f32::MAX, f32::MAX)
    }

    /// Creates the tightest box around a set of points
    pub fn from_points(points: &[Vector]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut bb = Self::new(first.x, first.y, first.x, first.y);
        for point in rest {
            bb.left = bb.left.min(point.x);
            bb.top = bb.top.min(point.y);
            bb.right = bb.right.max(point.x);
            bb.bottom = bb.bottom.max(point.y);
        }

        Some(bb)
    }

    /// Creates a box of the given size, positioned so that `anchor`
    /// (in unit coordinates of the box) sits on `pos`
    pub fn from_dimension(width: f32, height: f32, anchor: Vector, pos: Vector) -> Self {
        Self::new(
            -width * anchor.x + pos.x,
            -height * anchor.y + pos.y,
            width - width * anchor.x + pos.x,
            height - height * anchor.y + pos.y,
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn dimensions(&self) -> Vector {
        Vector::new(self.width(), self.height())
    }

    #[inline]
    pub fn center(&self) -> Vector {
        Vector::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    #[inline]
    pub fn translate(&self, pos: Vector) -> Self {
        Self::new(self.left + pos.x, self.top + pos.y, self.right + pos.x, self.bottom + pos.y)
    }

    /// Rotates the corners about `anchor` and returns the axis-aligned box around them
    pub fn rotate(&self, angle: f32, anchor: Vector) -> Self {
        let points: Vec<Vector> = self
            .points()
            .iter()
            .map(|p| p.rotate_about(angle, anchor))
            .collect();
        Self::from_points(&points).unwrap_or(*self)
    }

    /// Translates by `point` then scales each edge
    pub fn scale(&self, scale: Vector, point: Vector) -> Self {
        let shifted = self.translate(point);
        Self::new(
            shifted.left * scale.x,
            shifted.top * scale.y,
            shifted.right * scale.x,
            shifted.bottom * scale.y,
        )
    }

    /// Grows the box by `margin` on every side
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(self.left - margin, self.top - margin, self.right + margin, self.bottom + margin)
    }

    #[inline]
    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width() + self.height())
    }

    /// Corners in clockwise screen order starting top-left
    pub fn points(&self) -> [Vector; 4] {
        [
            Vector::new(self.left, self.top),
            Vector::new(self.right, self.top),
            Vector::new(self.right, self.bottom),
            Vector::new(self.left, self.bottom),
        ]
    }

    /// Creates a polygon shape with this box's corners
    pub fn to_polygon(&self) -> Shape {
        Shape::polygon_unchecked(self.points().to_vec(), false, Vector::ZERO)
    }

    /// Returns true if the point lies inside or on the edge of the box
    #[inline]
    pub fn contains_point(&self, point: Vector) -> bool {
        self.left <= point.x && self.top <= point.y && self.bottom >= point.y && self.right >= point.x
    }

    /// Returns true if `other` lies strictly inside this box
    #[inline]
    pub fn contains_box(&self, other: &Self) -> bool {
        self.left < other.left && self.top < other.top && other.bottom < self.bottom && other.right < self.right
    }

    /// Returns true if `other` lies inside this box, edges allowed to touch within `tolerance`
    #[inline]
    fn encloses(&self, other: &Self, tolerance: f32) -> bool {
        self.left <= other.left + tolerance
            && self.top <= other.top + tolerance
            && other.right <= self.right + tolerance
            && other.bottom <= self.bottom + tolerance
    }

    /// Smallest box containing both boxes
    pub fn combine(&self, other: &Self) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Returns true if the boxes overlap or touch
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left <= other.right && self.right >= other.left && self.top <= other.bottom && self.bottom >= other.top
    }

    /// Minimum translation that moves this box out of `other`, pointing
    /// from `other` toward this box. `None` when the boxes do not overlap.
    ///
    /// Resolves along x only when the x overlap is strictly smaller.
    pub fn intersect(&self, other: &Self) -> Option<Vector> {
        let total = self.combine(other);
        let contained = self.encloses(other, CONTAINMENT_TOLERANCE) || other.encloses(self, CONTAINMENT_TOLERANCE);

        if contained {
            return Some(self.containment_overlap(other));
        }

        if total.width() < other.width() + self.width() && total.height() < other.height() + self.height() {
            let overlap_x = if self.right >= other.left && self.right <= other.right {
                other.left - self.right
            } else {
                other.right - self.left
            };

            let overlap_y = if self.top <= other.bottom && self.top >= other.top {
                other.bottom - self.top
            } else {
                other.top - self.bottom
            };

            return Some(Self::least_axis(overlap_x, overlap_y));
        }

        None
    }

    /// Overlap when one box sits entirely inside the other: per axis, push
    /// out through whichever pair of edges is nearer
    fn containment_overlap(&self, other: &Self) -> Vector {
        let overlap_x = if self.width() - other.width() >= 0.0 {
            if self.right - other.right <= other.left - self.left {
                other.left - self.right
            } else {
                other.right - self.left
            }
        } else if other.right - self.right <= self.left - other.left {
            self.left - other.right
        } else {
            self.right - other.left
        };

        let overlap_y = if self.height() - other.height() >= 0.0 {
            if self.bottom - other.bottom <= other.top - self.top {
                other.top - self.bottom
            } else {
                other.bottom - self.top
            }
        } else if other.bottom - self.bottom <= self.top - other.top {
            self.top - other.bottom
        } else {
            self.bottom - other.top
        };

        Self::least_axis(overlap_x, overlap_y)
    }

    #[inline]
    fn least_axis(overlap_x: f32, overlap_y: f32) -> Vector {
        if overlap_x.abs() < overlap_y.abs() {
            Vector::new(overlap_x, 0.0)
        } else {
            Vector::new(0.0, overlap_y)
        }
    }

    /// Side of this box that `other` hit
    pub fn intersect_with_side(&self, other: &Self) -> Side {
        Self::side_from_intersection(self.intersect(other))
    }

    /// Maps an intersection vector to the side of the first box it came from
    pub fn side_from_intersection(intersection: Option<Vector>) -> Side {
        match intersection {
            None => Side::None,
            Some(v) if v.x.abs() > v.y.abs() => {
                if v.x < 0.0 {
                    Side::Right
                } else {
                    Side::Left
                }
            }
            Some(v) => {
                if v.y < 0.0 {
                    Side::Bottom
                } else {
                    Side::Top
                }
            }
        }
    }

    /// Slab test returning `(t_min, t_max)` along the ray
    fn slab(&self, ray: &Ray) -> (f32, f32) {
        // Axis-parallel rays get a huge reciprocal instead of a division by zero
        let x_inv = if ray.direction.x == 0.0 { f32::MAX } else { 1.0 / ray.direction.x };
        let y_inv = if ray.direction.y == 0.0 { f32::MAX } else { 1.0 / ray.direction.y };

        let tx1 = (self.left - ray.origin.x) * x_inv;
        let tx2 = (self.right - ray.origin.x) * x_inv;

        let mut t_min = tx1.min(tx2);
        let mut t_max = tx1.max(tx2);

        let ty1 = (self.top - ray.origin.y) * y_inv;
        let ty2 = (self.bottom - ray.origin.y) * y_inv;

        t_min = t_min.max(ty1.min(ty2));
        t_max = t_max.min(ty1.max(ty2));

        (t_min, t_max)
    }

    /// Returns true if the ray hits the box before `far_clip`
    pub fn ray_cast(&self, ray: &Ray, far_clip: f32) -> bool {
        let (t_min, t_max) = self.slab(ray);
        t_max >= t_min.max(0.0) && t_min < far_clip
    }

    /// Entry time of the ray into the box, or `-1.0` when it misses
    pub fn ray_cast_time(&self, ray: &Ray, far_clip: f32) -> f32 {
        let (t_min, t_max) = self.slab(ray);
        if t_max >= t_min.max(0.0) && t_min < far_clip {
            t_min
        } else {
            -1.0
        }
    }
}
