mod circle;
mod polygon;
mod edge;
mod collide;
mod closest_line;

pub use self::circle::Circle;
pub use self::polygon::{ConvexPolygon, ClosestFace};
pub use self::edge::Edge;
pub use self::collide::ShapeContact;
pub use self::closest_line::closest_line;

use crate::collision::BoundingBox;
use crate::error::PhysicsError;
use crate::math::{Line, Projection, Ray, Transform, Vector};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// The concrete kind of a shape, used for pairwise dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Polygon,
    Edge,
}

/// Collision geometry attached to a collider.
///
/// Every variant caches its world-space geometry together with the body
/// transform version it was built from; `sync` rebuilds only when that
/// version moves on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Shape {
    Circle(Circle),
    Polygon(ConvexPolygon),
    Edge(Edge),
}

impl Shape {
    /// Circle of `radius` centered at `offset` from the body
    pub fn circle(radius: f32, offset: Vector) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(PhysicsError::InvalidGeometry(format!("circle radius {}", radius)));
        }
        if !offset.is_valid() {
            return Err(PhysicsError::InvalidGeometry(format!("circle offset {}", offset)));
        }
        Ok(Shape::Circle(Circle::new(radius, offset)))
    }

    /// Convex polygon from local points. Clockwise input is reversed so the
    /// stored winding is always counter-clockwise.
    pub fn polygon(points: Vec<Vector>, clockwise_winding: bool, offset: Vector) -> Result<Self> {
        if points.len() < 3 {
            return Err(PhysicsError::InvalidGeometry(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        if !offset.is_valid() || points.iter().any(|p| !p.is_valid()) {
            return Err(PhysicsError::InvalidGeometry("polygon has non-finite points".to_string()));
        }
        Ok(Self::polygon_unchecked(points, clockwise_winding, offset))
    }

    pub(crate) fn polygon_unchecked(points: Vec<Vector>, clockwise_winding: bool, offset: Vector) -> Self {
        Shape::Polygon(ConvexPolygon::new(points, clockwise_winding, offset))
    }

    /// Axis-aligned box of the given size, `anchor` in unit coordinates
    pub fn box_shape(width: f32, height: f32, anchor: Vector, offset: Vector) -> Self {
        let points = BoundingBox::from_dimension(width, height, anchor, Vector::ZERO).points();
        Self::polygon_unchecked(points.to_vec(), false, offset)
    }

    /// Edge between two local points
    pub fn edge(begin: Vector, end: Vector) -> Self {
        Shape::Edge(Edge::new(begin, end))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Edge(_) => ShapeKind::Edge,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&ConvexPolygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Shape::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn get_offset(&self) -> Vector {
        match self {
            Shape::Circle(c) => c.get_offset(),
            Shape::Polygon(p) => p.get_offset(),
            Shape::Edge(e) => e.get_offset(),
        }
    }

    pub fn set_offset(&mut self, offset: Vector) {
        match self {
            Shape::Circle(c) => c.set_offset(offset),
            Shape::Polygon(p) => p.set_offset(offset),
            Shape::Edge(e) => e.set_offset(offset),
        }
    }

    /// Transform the cached geometry was last built from
    pub fn transform(&self) -> Transform {
        match self {
            Shape::Circle(c) => c.transform(),
            Shape::Polygon(p) => p.transform(),
            Shape::Edge(e) => e.transform(),
        }
    }

    fn stamp(&self) -> Option<u64> {
        match self {
            Shape::Circle(c) => c.stamp(),
            Shape::Polygon(p) => p.stamp(),
            Shape::Edge(e) => e.stamp(),
        }
    }

    fn set_stamp(&mut self, stamp: Option<u64>) {
        match self {
            Shape::Circle(c) => c.set_stamp(stamp),
            Shape::Polygon(p) => p.set_stamp(stamp),
            Shape::Edge(e) => e.set_stamp(stamp),
        }
    }

    /// Unconditionally rebuilds world geometry from `transform`
    pub fn recalc(&mut self, transform: &Transform) {
        match self {
            Shape::Circle(c) => c.recalc(transform),
            Shape::Polygon(p) => p.recalc(transform),
            Shape::Edge(e) => e.recalc(transform),
        }
    }

    /// Rebuilds world geometry only if `version` differs from the cached
    /// stamp. Returns true when a rebuild happened.
    pub fn sync(&mut self, transform: &Transform, version: u64) -> bool {
        if self.stamp() == Some(version) {
            return false;
        }
        self.recalc(transform);
        self.set_stamp(Some(version));
        true
    }

    /// Forgets the cached stamp so the next `sync` rebuilds
    pub fn invalidate(&mut self) {
        self.set_stamp(None);
    }

    /// World-space center
    pub fn center(&self) -> Vector {
        match self {
            Shape::Circle(c) => c.center(),
            Shape::Polygon(p) => p.center(),
            Shape::Edge(e) => e.center(),
        }
    }

    /// World-space bounding box
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Shape::Circle(c) => c.bounds(),
            Shape::Polygon(p) => p.bounds(),
            Shape::Edge(e) => e.bounds(),
        }
    }

    /// Bounding box relative to the owning body
    pub fn local_bounds(&self) -> BoundingBox {
        match self {
            Shape::Circle(c) => c.local_bounds(),
            Shape::Polygon(p) => p.local_bounds(),
            Shape::Edge(e) => e.local_bounds(),
        }
    }

    pub fn contains(&self, point: Vector) -> bool {
        match self {
            Shape::Circle(c) => c.contains(point),
            Shape::Polygon(p) => p.contains(point),
            Shape::Edge(e) => e.contains(point),
        }
    }

    pub fn furthest_point(&self, direction: Vector) -> Vector {
        match self {
            Shape::Circle(c) => c.furthest_point(direction),
            Shape::Polygon(p) => p.furthest_point(direction),
            Shape::Edge(e) => e.furthest_point(direction),
        }
    }

    pub fn project(&self, axis: Vector) -> Projection {
        match self {
            Shape::Circle(c) => c.project(axis),
            Shape::Polygon(p) => p.project(axis),
            Shape::Edge(e) => e.project(axis),
        }
    }

    /// Candidate separating axes. Circles have none of their own.
    pub fn axes(&self) -> Option<Vec<Vector>> {
        match self {
            Shape::Circle(_) => None,
            Shape::Polygon(p) => Some(p.axes().to_vec()),
            Shape::Edge(e) => Some(e.axes().to_vec()),
        }
    }

    pub fn inertia(&self, mass: f32) -> f32 {
        match self {
            Shape::Circle(c) => c.inertia(mass),
            Shape::Polygon(p) => p.inertia(mass),
            Shape::Edge(e) => e.inertia(mass),
        }
    }

    /// Nearest world-space hit of `ray` no further than `max`
    pub fn ray_cast(&self, ray: &Ray, max: f32) -> Option<Vector> {
        match self {
            Shape::Circle(c) => c.ray_cast(ray, max),
            Shape::Polygon(p) => p.ray_cast(ray, max),
            Shape::Edge(e) => e.ray_cast(ray, max),
        }
    }

    /// Narrow-phase test. The contact's mtv and normal point away from `self`.
    pub fn collide(&self, other: &Shape) -> Option<ShapeContact> {
        collide::collide(self, other)
    }

    /// Shortest segment from this shape to `other`
    pub fn closest_line_between(&self, other: &Shape) -> Option<Line> {
        closest_line::closest_line_between(self, other)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<ConvexPolygon> for Shape {
    fn from(polygon: ConvexPolygon) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<Edge> for Shape {
    fn from(edge: Edge) -> Self {
        Shape::Edge(edge)
    }
}
