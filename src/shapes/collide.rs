use super::polygon::min_overlap_axis;
use super::{Circle, ConvexPolygon, Edge, Shape};
use crate::math::Vector;

/// Thickness of the polygon an edge is extruded into for SAT
const EDGE_EXTRUSION: f32 = 10.0;

/// Result of a successful narrow-phase test between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeContact {
    /// Minimum translation vector, pointing away from the first shape
    pub mtv: Vector,

    /// World-space contact point
    pub point: Vector,

    /// Unit contact normal, pointing away from the first shape
    pub normal: Vector,
}

impl ShapeContact {
    /// Same contact seen from the other shape
    pub fn flip(self) -> Self {
        Self {
            mtv: -self.mtv,
            point: self.point,
            normal: -self.normal,
        }
    }
}

/// Pairwise dispatch over shape kinds. Reversed orders reuse the forward
/// test and flip the result.
pub(super) fn collide(a: &Shape, b: &Shape) -> Option<ShapeContact> {
    match (a, b) {
        (Shape::Circle(a), Shape::Circle(b)) => circle_circle(a, b),
        (Shape::Circle(c), Shape::Polygon(p)) => circle_polygon(c, p),
        (Shape::Polygon(p), Shape::Circle(c)) => circle_polygon(c, p).map(ShapeContact::flip),
        (Shape::Circle(c), Shape::Edge(e)) => circle_edge(c, e),
        (Shape::Edge(e), Shape::Circle(c)) => circle_edge(c, e).map(ShapeContact::flip),
        (Shape::Polygon(a), Shape::Polygon(b)) => polygon_polygon(a, b),
        (Shape::Polygon(p), Shape::Edge(e)) => polygon_edge(p, e),
        (Shape::Edge(e), Shape::Polygon(p)) => polygon_edge(p, e).map(ShapeContact::flip),
        // Edges are one-sided boundaries and never collide with each other
        (Shape::Edge(_), Shape::Edge(_)) => None,
    }
}

/// Flips `axis` so it points along `direction`
#[inline]
fn orient(axis: Vector, direction: Vector) -> Vector {
    if axis.dot(&direction) < 0.0 {
        -axis
    } else {
        axis
    }
}

fn circle_circle(a: &Circle, b: &Circle) -> Option<ShapeContact> {
    let radius = a.get_radius() + b.get_radius();
    let between = b.center() - a.center();
    let distance = between.length();

    if distance > radius {
        return None;
    }

    let axis = if !between.is_zero() {
        between.normalize()
    } else if a.get_radius() < b.get_radius() {
        Vector::UP
    } else {
        // Identical concentric circles land here in both call orders
        Vector::DOWN
    };
    let overlap = radius - distance;
    let point = a.center() + axis * (a.get_radius() - overlap / 2.0);

    Some(ShapeContact {
        mtv: axis * overlap,
        point,
        normal: axis,
    })
}

/// SAT between a circle and a polygon. The circle adds one axis, from the
/// polygon's nearest vertex to the circle center.
fn circle_separating_axis(circle: &Circle, polygon: &ConvexPolygon) -> Option<Vector> {
    let center = circle.center();
    let circle_axis = polygon
        .closest_vertex(center)
        .map(|vertex| (center - vertex).normalize());

    let axes = polygon.axes().iter().copied().chain(circle_axis);
    min_overlap_axis(axes, |axis| (circle.project(axis), polygon.project(axis)))
}

fn circle_polygon(circle: &Circle, polygon: &ConvexPolygon) -> Option<ShapeContact> {
    let min_axis = circle_separating_axis(circle, polygon)?;

    let polygon_point = polygon.furthest_point(-min_axis);
    let circle_point = circle.furthest_point(min_axis);

    let point = match (circle.contains(polygon_point), polygon.contains(circle_point)) {
        (true, true) => polygon_point.average(&circle_point),
        (true, false) => polygon_point,
        (false, true) => circle_point,
        (false, false) => return None,
    };

    Some(ShapeContact {
        mtv: min_axis,
        point,
        normal: min_axis.normalize(),
    })
}

fn circle_edge(circle: &Circle, edge: &Edge) -> Option<ShapeContact> {
    let center = circle.center();
    let begin = edge.world_begin();
    let end = edge.world_end();
    let e = end - begin;
    let radius_sq = circle.get_radius() * circle.get_radius();

    let u = e.dot(&(end - center));
    let v = e.dot(&(center - begin));

    // Past either end the nearest feature is the endpoint itself
    let endpoint = if v <= 0.0 {
        Some(begin)
    } else if u <= 0.0 {
        Some(end)
    } else {
        None
    };

    if let Some(endpoint) = endpoint {
        let d = endpoint - center;
        let dd = d.length_squared();
        if dd > radius_sq {
            return None;
        }
        let normal = d.normalize();
        return Some(ShapeContact {
            mtv: normal * (circle.get_radius() - dd.sqrt()),
            point: endpoint,
            normal,
        });
    }

    let den = e.dot(&e);
    let point_on_edge = (begin * u + end * v) / den;
    let d = center - point_on_edge;
    let dd = d.length_squared();
    if dd > radius_sq {
        return None;
    }

    let n = orient(e.perpendicular(), center - begin).normalize();
    let mtv = n * (circle.get_radius() - dd.sqrt()).abs();

    Some(ShapeContact {
        mtv: -mtv,
        point: point_on_edge,
        normal: -n,
    })
}

fn polygon_polygon(a: &ConvexPolygon, b: &ConvexPolygon) -> Option<ShapeContact> {
    if !a.bounds().overlaps(&b.bounds()) {
        return None;
    }

    let mtv = a.test_separating_axis_theorem(b)?;

    let point_a = a.furthest_point(mtv);
    let point_b = b.furthest_point(-mtv);

    let point = match (b.contains(point_a), a.contains(point_b)) {
        (true, true) => point_a.average(&point_b),
        (true, false) => point_a,
        _ => point_b,
    };

    Some(ShapeContact {
        mtv,
        point,
        normal: mtv.normalize(),
    })
}

/// The edge is extruded away from the polygon into a thin box and tested with SAT
fn polygon_edge(polygon: &ConvexPolygon, edge: &Edge) -> Option<ShapeContact> {
    let begin = edge.world_begin();
    let end = edge.world_end();
    let normal = orient((end - begin).normal(), edge.center() - polygon.centroid());
    let thickness = normal * EDGE_EXTRUSION;

    let slab = ConvexPolygon::from_world_points(vec![begin, end, end + thickness, begin + thickness]);

    let min_axis = polygon.test_separating_axis_theorem(&slab)?;

    Some(ShapeContact {
        mtv: min_axis,
        point: polygon.furthest_point(min_axis),
        normal: min_axis.normalize(),
    })
}
