use crate::collision::BoundingBox;
use crate::math::{Line, Projection, Ray, Transform, Vector};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// The face of a polygon closest to some point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestFace {
    /// Face normal scaled by the distance to the point
    pub distance: Vector,

    /// The face itself
    pub face: Line,
}

/// A convex polygon collision shape.
///
/// Points are local to the owning body and wound counter-clockwise.
/// World-space points, sides and axes are cached and rebuilt on `recalc`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ConvexPolygon {
    points: Vec<Vector>,
    offset: Vector,
    transform: Transform,
    transformed_points: Vec<Vector>,
    sides: Vec<Line>,
    axes: Vec<Vector>,
    stamp: Option<u64>,
}

impl ConvexPolygon {
    /// Creates a polygon; clockwise input is reversed
    pub fn new(points: Vec<Vector>, clockwise_winding: bool, offset: Vector) -> Self {
        let mut points = points;
        if clockwise_winding {
            points.reverse();
        }

        let mut polygon = Self {
            points,
            offset,
            transform: Transform::identity(),
            transformed_points: Vec::new(),
            sides: Vec::new(),
            axes: Vec::new(),
            stamp: None,
        };
        polygon.recalc(&Transform::identity());
        polygon
    }

    /// Creates a polygon whose local points already are world points
    pub(crate) fn from_world_points(points: Vec<Vector>) -> Self {
        Self::new(points, false, Vector::ZERO)
    }

    /// Local points
    pub fn get_points(&self) -> &[Vector] {
        &self.points
    }

    pub fn get_offset(&self) -> Vector {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vector) {
        self.offset = offset;
        let transform = self.transform;
        self.recalc(&transform);
    }

    pub(crate) fn transform(&self) -> Transform {
        self.transform
    }

    pub(crate) fn stamp(&self) -> Option<u64> {
        self.stamp
    }

    pub(crate) fn set_stamp(&mut self, stamp: Option<u64>) {
        self.stamp = stamp;
    }

    /// Rebuilds world points, sides and axes from `transform`
    pub fn recalc(&mut self, transform: &Transform) {
        self.transform = *transform;
        let offset = self.offset;

        self.transformed_points.clear();
        self.transformed_points
            .extend(self.points.iter().map(|p| transform.apply(*p) + offset));

        let points = &self.transformed_points;
        let len = points.len();

        self.sides.clear();
        self.sides
            .extend((0..len).map(|i| Line::new(points[i], points[(i + len - 1) % len])));

        self.axes.clear();
        self.axes
            .extend((0..len).map(|i| (points[i] - points[(i + 1) % len]).normal()));
    }

    /// World-space points
    pub fn transformed_points(&self) -> &[Vector] {
        &self.transformed_points
    }

    /// World-space sides; side `i` runs from point `i` back to point `i - 1`
    pub fn sides(&self) -> &[Line] {
        &self.sides
    }

    /// Edge normals used as separating axes
    pub fn axes(&self) -> &[Vector] {
        &self.axes
    }

    /// The body position plus offset
    pub fn center(&self) -> Vector {
        self.transform.position + self.offset
    }

    /// Average of the world points
    pub fn centroid(&self) -> Vector {
        if self.transformed_points.is_empty() {
            return self.center();
        }
        let sum = self
            .transformed_points
            .iter()
            .fold(Vector::ZERO, |acc, p| acc + *p);
        sum / self.transformed_points.len() as f32
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.transformed_points).unwrap_or_else(|| {
            let c = self.center();
            BoundingBox::new(c.x, c.y, c.x, c.y)
        })
    }

    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
            .unwrap_or_default()
            .translate(self.offset)
    }

    /// Point containment by casting a ray to the right and counting crossings
    pub fn contains(&self, point: Vector) -> bool {
        let test_ray = Ray::new(point, Vector::RIGHT);
        let crossings = self
            .sides
            .iter()
            .filter(|side| test_ray.intersect(side) >= 0.0)
            .count();

        crossings % 2 == 1
    }

    /// Vertex furthest along `direction`
    pub fn furthest_point(&self, direction: Vector) -> Vector {
        let mut furthest = self.center();
        let mut max_distance = f32::MIN;
        for point in &self.transformed_points {
            let distance = direction.dot(point);
            if distance > max_distance {
                max_distance = distance;
                furthest = *point;
            }
        }
        furthest
    }

    /// Vertex nearest to `point`
    pub fn closest_vertex(&self, point: Vector) -> Option<Vector> {
        self.transformed_points.iter().copied().min_by(|a, b| {
            a.distance_squared(&point)
                .total_cmp(&b.distance_squared(&point))
        })
    }

    /// Face whose supporting line is nearest to `point`
    pub fn closest_face(&self, point: Vector) -> Option<ClosestFace> {
        let mut best: Option<(usize, f32)> = None;
        for (i, side) in self.sides.iter().enumerate() {
            let distance = side.distance_to_point(point);
            if best.map_or(true, |(_, min)| distance < min) {
                best = Some((i, distance));
            }
        }

        best.map(|(i, distance)| ClosestFace {
            distance: self.sides[i].normal() * distance,
            face: self.sides[i],
        })
    }

    pub fn project(&self, axis: Vector) -> Projection {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for point in &self.transformed_points {
            let scalar = point.dot(&axis);
            min = min.min(scalar);
            max = max.max(scalar);
        }
        Projection::new(min, max)
    }

    /// Area moment of inertia about the local origin
    pub fn inertia(&self, mass: f32) -> f32 {
        let len = self.points.len();
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for i in 0..len {
            let a = self.points[i];
            let b = self.points[(i + 1) % len];
            let cross = b.cross(&a);
            numerator += cross * (a.dot(&a) + a.dot(&b) + b.dot(&b));
            denominator += cross;
        }
        (mass / 6.0) * (numerator / denominator)
    }

    /// Nearest hit of the ray on any side within `max`
    pub fn ray_cast(&self, ray: &Ray, max: f32) -> Option<Vector> {
        let mut min_time = f32::MAX;
        let mut found = false;
        for side in &self.sides {
            let time = ray.intersect(side);
            if time >= 0.0 && time < min_time && time <= max {
                min_time = time;
                found = true;
            }
        }

        if found {
            let hit = ray.point_at(min_time);
            if hit.is_valid() {
                return Some(hit);
            }
        }
        None
    }

    /// Separating axis test against another polygon.
    ///
    /// Returns the minimum translation vector, pointing from this polygon
    /// toward `other`, or `None` when an axis separates the two. Ties keep
    /// the first axis found, this polygon's axes before `other`'s.
    pub fn test_separating_axis_theorem(&self, other: &ConvexPolygon) -> Option<Vector> {
        let axes = self.axes.iter().chain(other.axes.iter());
        min_overlap_axis(axes.copied(), |axis| (self.project(axis), other.project(axis)))
    }
}

/// Walks candidate axes, bailing out on the first separating one.
///
/// The returned vector points from the first projection toward the second,
/// so moving the second shape by it separates the pair.
pub(crate) fn min_overlap_axis<I, F>(axes: I, mut project: F) -> Option<Vector>
where
    I: Iterator<Item = Vector>,
    F: FnMut(Vector) -> (Projection, Projection),
{
    let mut min_overlap = f32::MAX;
    let mut best: Option<(Vector, Projection, Projection)> = None;

    for axis in axes {
        if !axis.is_valid() || axis.is_zero() {
            continue;
        }
        let (a, b) = project(axis);
        let overlap = a.overlap(&b);
        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            best = Some((axis, a, b));
        }
    }

    best.map(|(axis, a, b)| push_direction(axis.normalize(), &a, &b) * min_overlap)
}

/// Direction the second interval leaves the first along `axis`.
///
/// `Projection::overlap` picks the shorter way out, which is the side the
/// second interval's center lies on. Intervals sharing a center fall back
/// to their lengths so that swapping the shapes flips the result.
fn push_direction(axis: Vector, a: &Projection, b: &Projection) -> Vector {
    let offset = b.center() - a.center();
    if offset > 0.0 {
        return axis;
    }
    if offset < 0.0 {
        return -axis;
    }

    let axis = if axis.x < 0.0 || (axis.x == 0.0 && axis.y < 0.0) { -axis } else { axis };
    if a.length() < b.length() {
        -axis
    } else {
        axis
    }
}
