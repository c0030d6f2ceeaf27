use super::{Circle, ConvexPolygon, Edge, Shape};
use crate::math::{clamp, Line, Ray, Vector};

/// Below this the two segments are treated as parallel
const PARALLEL_TOLERANCE: f32 = 0.01;

/// Nudge past a ray-cast hit so the closest face lookup lands on the hit side
const FACE_NUDGE: f32 = 0.1;

/// Shortest segment between the segments `p0 + s*u` and `q0 + t*v`, with
/// `s` and `t` in `[0, 1]`. The result runs from the first segment to the second.
pub fn closest_line(p0: Vector, u: Vector, q0: Vector, v: Vector) -> Line {
    let w = p0 - q0;
    let a = u.dot(&u);
    let b = u.dot(&v);
    let c = v.dot(&v);
    let d = u.dot(&w);
    let e = v.dot(&w);

    let denom = a * c - b * b;
    let mut s_denom = denom;
    let mut t_denom = denom;

    if denom <= PARALLEL_TOLERANCE {
        // Parallel: project p0 onto the second segment
        let tc = if c > 0.0 { clamp(e / c, 0.0, 1.0) } else { 0.0 };
        return Line::new(p0, q0 + v * tc);
    }

    let mut sn = b * e - c * d;
    let mut tn;
    if sn < 0.0 {
        sn = 0.0;
        tn = e;
        t_denom = c;
    } else if sn > s_denom {
        sn = s_denom;
        tn = e + b;
        t_denom = c;
    } else {
        tn = a * e - b * d;
    }

    if tn < 0.0 {
        tn = 0.0;
        if -d < 0.0 {
            sn = 0.0;
        } else if -d > a {
            sn = s_denom;
        } else {
            sn = -d;
            s_denom = a;
        }
    } else if tn > t_denom {
        tn = t_denom;
        if -d + b < 0.0 {
            sn = 0.0;
        } else if -d + b > a {
            sn = s_denom;
        } else {
            sn = -d + b;
            s_denom = a;
        }
    }

    let sc = if s_denom.abs() > 0.0 { sn / s_denom } else { 0.0 };
    let tc = if t_denom.abs() > 0.0 { tn / t_denom } else { 0.0 };

    Line::new(p0 + u * sc, q0 + v * tc)
}

pub(super) fn closest_line_between(a: &Shape, b: &Shape) -> Option<Line> {
    match (a, b) {
        (Shape::Circle(a), Shape::Circle(b)) => circle_circle(a, b),
        (Shape::Circle(c), Shape::Polygon(p)) => polygon_circle(p, c).map(|l| l.flip()),
        (Shape::Polygon(p), Shape::Circle(c)) => polygon_circle(p, c),
        (Shape::Circle(c), Shape::Edge(e)) => circle_edge(c, e),
        (Shape::Edge(e), Shape::Circle(c)) => circle_edge(c, e).map(|l| l.flip()),
        (Shape::Polygon(a), Shape::Polygon(b)) => polygon_polygon(a, b),
        (Shape::Polygon(p), Shape::Edge(e)) => polygon_edge(p, e),
        (Shape::Edge(e), Shape::Polygon(p)) => polygon_edge(p, e).map(|l| l.flip()),
        (Shape::Edge(a), Shape::Edge(b)) => Some(edge_edge(a, b)),
    }
}

/// Point on `polygon`'s boundary facing `target`, nudged slightly outward
fn boundary_point_toward(polygon: &ConvexPolygon, target: Vector) -> Option<Vector> {
    let origin = polygon.centroid();
    let direction = target - origin;
    if direction.is_zero() {
        return None;
    }
    let ray = Ray::new(origin, direction);
    let hit = polygon.ray_cast(&ray, f32::MAX)?;
    Some(hit + ray.direction * FACE_NUDGE)
}

/// Closest point to `point` on the segment `line`
fn clamp_to_segment(line: &Line, point: Vector) -> Vector {
    let edge = line.edge();
    let len_sq = edge.length_squared();
    if len_sq <= 0.0 {
        return line.begin;
    }
    let t = clamp((point - line.begin).dot(&edge) / len_sq, 0.0, 1.0);
    line.begin + edge * t
}

fn polygon_polygon(a: &ConvexPolygon, b: &ConvexPolygon) -> Option<Line> {
    let point_a = boundary_point_toward(a, b.centroid())?;
    let point_b = boundary_point_toward(b, a.centroid())?;

    let side_a = a.closest_face(point_a)?.face;
    let side_b = b.closest_face(point_b)?.face;

    Some(closest_line(side_a.begin, side_a.edge(), side_b.begin, side_b.edge()))
}

fn polygon_edge(polygon: &ConvexPolygon, edge: &Edge) -> Option<Line> {
    let edge_line = edge.as_line();
    let toward = clamp_to_segment(&edge_line, polygon.centroid());
    let point = boundary_point_toward(polygon, toward)?;
    let side = polygon.closest_face(point)?.face;

    Some(closest_line(side.begin, side.edge(), edge_line.begin, edge_line.edge()))
}

fn polygon_circle(polygon: &ConvexPolygon, circle: &Circle) -> Option<Line> {
    let center = circle.center();
    let point = boundary_point_toward(polygon, center)?;
    let side = polygon.closest_face(point)?.face;

    let on_polygon = clamp_to_segment(&side, center);
    let on_circle = circle.furthest_point(on_polygon - center);

    Some(Line::new(on_polygon, on_circle))
}

fn circle_circle(a: &Circle, b: &Circle) -> Option<Line> {
    let between = b.center() - a.center();
    if between.is_zero() {
        return None;
    }
    let direction = between.normalize();
    Some(Line::new(
        a.center() + direction * a.get_radius(),
        b.center() - direction * b.get_radius(),
    ))
}

fn circle_edge(circle: &Circle, edge: &Edge) -> Option<Line> {
    let center = circle.center();
    let on_edge = clamp_to_segment(&edge.as_line(), center);
    let toward = on_edge - center;
    if toward.is_zero() {
        return None;
    }
    Some(Line::new(circle.furthest_point(toward), on_edge))
}

fn edge_edge(a: &Edge, b: &Edge) -> Line {
    let a = a.as_line();
    let b = b.as_line();
    closest_line(a.begin, a.edge(), b.begin, b.edge())
}
