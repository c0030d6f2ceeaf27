use planar_collide::error::PhysicsError;
use planar_collide::math::{Line, Ray, Transform, Vector};
use planar_collide::shapes::{closest_line, Circle, Edge};
use planar_collide::{BoundingBox, Shape, ShapeKind};
use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

fn circle_at(radius: f32, pos: Vector) -> Shape {
    let mut shape = Shape::circle(radius, Vector::ZERO).unwrap();
    shape.recalc(&Transform::from_position(pos));
    shape
}

fn box_at(width: f32, height: f32, pos: Vector) -> Shape {
    let mut shape = Shape::box_shape(width, height, Vector::HALF, Vector::ZERO);
    shape.recalc(&Transform::from_position(pos));
    shape
}

#[test]
fn test_shape_constructors_validate_input() {
    assert!(matches!(
        Shape::circle(-1.0, Vector::ZERO),
        Err(PhysicsError::InvalidGeometry(_))
    ));
    assert!(matches!(
        Shape::circle(f32::NAN, Vector::ZERO),
        Err(PhysicsError::InvalidGeometry(_))
    ));

    let two_points = vec![Vector::ZERO, Vector::new(1.0, 0.0)];
    assert!(matches!(
        Shape::polygon(two_points, false, Vector::ZERO),
        Err(PhysicsError::InvalidGeometry(_))
    ));

    let bad_point = vec![Vector::ZERO, Vector::new(1.0, 0.0), Vector::new(f32::INFINITY, 1.0)];
    assert!(Shape::polygon(bad_point, false, Vector::ZERO).is_err());

    let triangle = Shape::polygon(
        vec![Vector::ZERO, Vector::new(1.0, 0.0), Vector::new(0.0, 1.0)],
        false,
        Vector::ZERO,
    )
    .unwrap();
    assert_eq!(triangle.kind(), ShapeKind::Polygon);
    assert!(triangle.as_circle().is_none());
}

#[test]
fn test_clockwise_polygon_is_reversed() {
    let points = vec![Vector::new(0.0, 0.0), Vector::new(0.0, 1.0), Vector::new(1.0, 0.0)];
    let shape = Shape::polygon(points.clone(), true, Vector::ZERO).unwrap();

    let mut reversed = points;
    reversed.reverse();
    assert_eq!(shape.as_polygon().unwrap().get_points(), reversed.as_slice());
}

#[test]
fn test_polygon_world_geometry() {
    let shape = box_at(10.0, 10.0, Vector::new(10.0, 10.0));

    assert_eq!(shape.bounds(), BoundingBox::new(5.0, 5.0, 15.0, 15.0));
    assert_eq!(shape.local_bounds(), BoundingBox::new(-5.0, -5.0, 5.0, 5.0));
    assert_eq!(shape.center(), Vector::new(10.0, 10.0));

    assert!(shape.contains(Vector::new(10.0, 10.0)));
    assert!(shape.contains(Vector::new(14.0, 6.0)));
    assert!(!shape.contains(Vector::new(20.0, 10.0)));

    let furthest = shape.furthest_point(Vector::new(1.0, 1.0));
    assert_eq!(furthest, Vector::new(15.0, 15.0));

    let projection = shape.project(Vector::RIGHT);
    assert_relative_eq!(projection.min, 5.0);
    assert_relative_eq!(projection.max, 15.0);

    let polygon = shape.as_polygon().unwrap();
    assert_eq!(polygon.sides().len(), 4);
    assert_eq!(polygon.axes().len(), 4);
    for axis in polygon.axes() {
        assert_relative_eq!(axis.length(), 1.0);
    }
}

#[test]
fn test_polygon_rotation_and_offset() {
    let mut shape = Shape::box_shape(4.0, 2.0, Vector::HALF, Vector::new(1.0, 0.0));
    shape.recalc(&Transform::new(Vector::new(10.0, 0.0), PI / 2.0, Vector::ONE));

    // A 4x2 box turned a quarter turn becomes 2x4
    let bounds = shape.bounds();
    assert_relative_eq!(bounds.width(), 2.0, epsilon = 1e-4);
    assert_relative_eq!(bounds.height(), 4.0, epsilon = 1e-4);
    assert_relative_eq!(bounds.center().x, 11.0, epsilon = 1e-4);
}

#[test]
fn test_polygon_closest_features() {
    let shape = box_at(10.0, 10.0, Vector::ZERO);
    let polygon = shape.as_polygon().unwrap();

    let vertex = polygon.closest_vertex(Vector::new(7.0, 6.0)).unwrap();
    assert_eq!(vertex, Vector::new(5.0, 5.0));

    let face = polygon.closest_face(Vector::new(8.0, 0.0)).unwrap();
    assert_relative_eq!(face.distance.length(), 3.0);
    assert_relative_eq!(face.face.begin.x, 5.0);
    assert_relative_eq!(face.face.end.x, 5.0);
}

#[test]
fn test_sync_only_rebuilds_on_new_version() {
    let mut shape = Shape::box_shape(2.0, 2.0, Vector::HALF, Vector::ZERO);
    let transform = Transform::from_position(Vector::new(3.0, 4.0));

    assert!(shape.sync(&transform, 1));
    let first = shape.as_polygon().unwrap().transformed_points().to_vec();

    // Same version, a different transform is ignored
    let moved = Transform::from_position(Vector::new(100.0, 100.0));
    assert!(!shape.sync(&moved, 1));
    assert_eq!(shape.as_polygon().unwrap().transformed_points(), first.as_slice());

    assert!(shape.sync(&moved, 2));
    assert_eq!(shape.center(), Vector::new(100.0, 100.0));

    shape.invalidate();
    assert!(shape.sync(&moved, 2));
}

#[test]
fn test_recalc_is_idempotent() {
    let mut shape = Shape::polygon(
        vec![Vector::new(0.0, 0.0), Vector::new(4.0, 0.0), Vector::new(2.0, 3.0)],
        false,
        Vector::new(1.0, 1.0),
    )
    .unwrap();
    let transform = Transform::new(Vector::new(5.0, -2.0), 0.7, Vector::new(2.0, 1.5));

    shape.recalc(&transform);
    let once = shape.as_polygon().unwrap().transformed_points().to_vec();
    shape.recalc(&transform);
    let twice = shape.as_polygon().unwrap().transformed_points().to_vec();

    assert_eq!(once, twice);
    assert_eq!(shape.transform(), transform);
}

#[test]
fn test_circle_offset_follows_position_only() {
    let mut shape = Shape::circle(1.0, Vector::new(2.0, 0.0)).unwrap();
    shape.recalc(&Transform::new(Vector::new(10.0, 0.0), PI / 2.0, Vector::ONE));
    assert_eq!(shape.center(), Vector::new(12.0, 0.0));
    assert_eq!(shape.bounds(), BoundingBox::new(11.0, -1.0, 13.0, 1.0));
}

#[test]
fn test_edge_ignores_scale() {
    let mut edge = Edge::new(Vector::ZERO, Vector::new(10.0, 0.0));
    edge.recalc(&Transform::new(Vector::new(1.0, 1.0), 0.0, Vector::new(2.0, 2.0)));
    assert_eq!(edge.world_end(), Vector::new(11.0, 1.0));
    assert_relative_eq!(edge.length(), 10.0);
    assert!(!edge.contains(edge.center()));
}

#[test]
fn test_inertia() {
    let circle = Circle::new(2.0, Vector::ZERO);
    assert_relative_eq!(circle.inertia(10.0), 20.0);

    let square = Shape::box_shape(10.0, 10.0, Vector::HALF, Vector::ZERO);
    assert_relative_eq!(square.inertia(12.0), 200.0, epsilon = 1e-3);

    let rod = Shape::edge(Vector::new(-5.0, 0.0), Vector::new(5.0, 0.0));
    assert_relative_eq!(rod.inertia(2.0), 50.0);
}

#[test]
fn test_ray_cast_circle_hits_near_side() {
    let circle = circle_at(2.0, Vector::ZERO);
    let ray = Ray::new(Vector::new(-5.0, 0.0), Vector::RIGHT);

    let hit = circle.ray_cast(&ray, f32::MAX).unwrap();
    assert_relative_eq!(hit.x, -2.0, epsilon = 1e-5);
    assert_relative_eq!(hit.y, 0.0, epsilon = 1e-5);

    // Not far enough to reach the surface
    assert!(circle.ray_cast(&ray, 2.0).is_none());

    let miss = Ray::new(Vector::new(-5.0, 3.0), Vector::RIGHT);
    assert!(circle.ray_cast(&miss, f32::MAX).is_none());
}

#[test]
fn test_ray_cast_polygon_and_edge() {
    let square = box_at(4.0, 4.0, Vector::ZERO);
    let ray = Ray::new(Vector::new(-10.0, 0.0), Vector::RIGHT);
    let hit = square.ray_cast(&ray, f32::MAX).unwrap();
    assert_relative_eq!(hit.x, -2.0, epsilon = 1e-5);

    let edge = Shape::edge(Vector::new(0.0, -5.0), Vector::new(0.0, 5.0));
    let ray = Ray::new(Vector::new(-5.0, 0.0), Vector::RIGHT);
    let hit = edge.ray_cast(&ray, f32::MAX).unwrap();
    assert_relative_eq!(hit.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(hit.y, 0.0, epsilon = 1e-5);

    assert!(edge.ray_cast(&ray, 4.0).is_none());
}

#[test]
fn test_circle_circle_contact() {
    let a = circle_at(5.0, Vector::ZERO);
    let b = circle_at(5.0, Vector::new(8.0, 0.0));

    let contact = a.collide(&b).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(2.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(contact.normal, Vector::new(1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(contact.point, Vector::new(4.0, 0.0), epsilon = 1e-5);

    let reversed = b.collide(&a).unwrap();
    assert_relative_eq!(reversed.mtv, Vector::new(-2.0, 0.0), epsilon = 1e-5);

    let far = circle_at(5.0, Vector::new(20.0, 0.0));
    assert!(a.collide(&far).is_none());
}

#[test]
fn test_circles_touching_at_boundary_have_no_depth() {
    let a = circle_at(3.0, Vector::ZERO);
    let b = circle_at(2.0, Vector::new(5.0, 0.0));

    match a.collide(&b) {
        Some(contact) => assert_relative_eq!(contact.mtv.length(), 0.0, epsilon = 1e-5),
        None => {}
    }
}

#[test]
fn test_concentric_circles_use_fallback_axis() {
    let a = circle_at(2.0, Vector::new(1.0, 1.0));
    let b = circle_at(3.0, Vector::new(1.0, 1.0));

    let contact = a.collide(&b).unwrap();
    assert_eq!(contact.normal, Vector::UP);
    assert_relative_eq!(contact.mtv.length(), 5.0);

    // Swapping the circles flips the fallback axis
    let reversed = b.collide(&a).unwrap();
    assert_eq!(reversed.normal, Vector::DOWN);
    assert_relative_eq!(reversed.mtv, -contact.mtv);
}

#[test]
fn test_concentric_polygons_flip_with_order() {
    let outer = box_at(10.0, 10.0, Vector::new(3.0, 3.0));
    let inner = box_at(2.0, 4.0, Vector::new(3.0, 3.0));

    let contact = outer.collide(&inner).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(6.0, 0.0), epsilon = 1e-5);

    let reversed = inner.collide(&outer).unwrap();
    assert_relative_eq!(reversed.mtv, Vector::new(-6.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(reversed.normal, -contact.normal, epsilon = 1e-5);
}

#[test]
fn test_contained_polygon_mtv_separates() {
    let outer = box_at(10.0, 10.0, Vector::ZERO);
    let inner_pos = Vector::new(1.0, 0.5);
    let inner = box_at(2.0, 2.0, inner_pos);

    // Shorter way out is through the right face, not the inner box's width
    let contact = outer.collide(&inner).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(5.0, 0.0), epsilon = 1e-5);

    let moved = box_at(2.0, 2.0, inner_pos + contact.mtv * 1.001);
    assert!(outer.collide(&moved).is_none());

    let reversed = inner.collide(&outer).unwrap();
    assert_relative_eq!(reversed.mtv, Vector::new(-5.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_contained_circle_mtv_separates() {
    let circle_pos = Vector::new(2.0, 0.0);
    let circle = circle_at(1.0, circle_pos);
    let square = box_at(20.0, 20.0, Vector::ZERO);

    // The mtv points from the circle toward the box, so the circle leaves along -mtv
    let contact = circle.collide(&square).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(-9.0, 0.0), epsilon = 1e-4);

    let moved = circle_at(1.0, circle_pos - contact.mtv * 1.001);
    assert!(moved.collide(&square).is_none());
}

#[test]
fn test_circle_polygon_contact() {
    let circle = circle_at(2.0, Vector::ZERO);
    let square = box_at(10.0, 10.0, Vector::new(6.0, 0.0));

    let contact = circle.collide(&square).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(contact.normal, Vector::new(1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(contact.point, Vector::new(2.0, 0.0), epsilon = 1e-5);

    let reversed = square.collide(&circle).unwrap();
    assert_relative_eq!(reversed.normal, Vector::new(-1.0, 0.0), epsilon = 1e-5);

    let away = box_at(10.0, 10.0, Vector::new(20.0, 0.0));
    assert!(circle.collide(&away).is_none());
}

#[test]
fn test_circle_edge_contact() {
    let circle = circle_at(2.0, Vector::new(5.0, 1.0));
    let edge = Shape::edge(Vector::ZERO, Vector::new(10.0, 0.0));

    let contact = circle.collide(&edge).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(0.0, -1.0), epsilon = 1e-5);
    assert_relative_eq!(contact.normal, Vector::new(0.0, -1.0), epsilon = 1e-5);
    assert_relative_eq!(contact.point, Vector::new(5.0, 0.0), epsilon = 1e-5);

    let reversed = edge.collide(&circle).unwrap();
    assert_relative_eq!(reversed.normal, Vector::new(0.0, 1.0), epsilon = 1e-5);

    // Past the end of the edge the endpoint is the contact
    let beyond = circle_at(2.0, Vector::new(11.0, 0.0));
    let contact = beyond.collide(&edge).unwrap();
    assert_eq!(contact.point, Vector::new(10.0, 0.0));

    let clear = circle_at(2.0, Vector::new(5.0, 3.0));
    assert!(clear.collide(&edge).is_none());
}

#[test]
fn test_polygon_polygon_contact() {
    let a = box_at(10.0, 10.0, Vector::ZERO);
    let b = box_at(10.0, 10.0, Vector::new(9.0, 0.0));

    let contact = a.collide(&b).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(contact.normal, Vector::new(1.0, 0.0), epsilon = 1e-5);

    let reversed = b.collide(&a).unwrap();
    assert_relative_eq!(reversed.mtv, Vector::new(-1.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_polygons_with_disjoint_bounds_do_not_collide() {
    let a = box_at(10.0, 10.0, Vector::ZERO);
    let b = box_at(10.0, 10.0, Vector::new(30.0, 30.0));
    assert!(a.collide(&b).is_none());
    assert!(a.as_polygon().unwrap().test_separating_axis_theorem(b.as_polygon().unwrap()).is_none());
}

#[test]
fn test_rotated_polygons_separated_by_own_axis() {
    // Bounds overlap but a diamond axis separates them
    let mut diamond = Shape::box_shape(10.0, 10.0, Vector::HALF, Vector::ZERO);
    diamond.recalc(&Transform::new(Vector::ZERO, PI / 4.0, Vector::ONE));
    let corner = box_at(2.0, 2.0, Vector::new(6.0, 6.0));

    assert!(diamond.bounds().overlaps(&corner.bounds()));
    assert!(diamond.collide(&corner).is_none());
}

#[test]
fn test_polygon_edge_contact() {
    let square = box_at(10.0, 10.0, Vector::ZERO);
    let edge = Shape::edge(Vector::new(-20.0, 4.0), Vector::new(20.0, 4.0));

    let contact = square.collide(&edge).unwrap();
    assert_relative_eq!(contact.mtv, Vector::new(0.0, 1.0), epsilon = 1e-4);
    assert_relative_eq!(contact.normal, Vector::new(0.0, 1.0), epsilon = 1e-4);

    let reversed = edge.collide(&square).unwrap();
    assert_relative_eq!(reversed.normal, Vector::new(0.0, -1.0), epsilon = 1e-4);

    let below = Shape::edge(Vector::new(-20.0, 8.0), Vector::new(20.0, 8.0));
    assert!(square.collide(&below).is_none());
}

#[test]
fn test_edges_never_collide() {
    let a = Shape::edge(Vector::ZERO, Vector::new(10.0, 0.0));
    let b = Shape::edge(Vector::new(0.0, 5.0), Vector::new(10.0, 5.0));
    assert!(a.collide(&b).is_none());

    let crossing = Shape::edge(Vector::new(5.0, -5.0), Vector::new(5.0, 5.0));
    assert!(a.collide(&crossing).is_none());
}

#[test]
fn test_contact_normals_are_antisymmetric() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let a = circle_at(rng.gen_range(1.0..5.0), Vector::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)));
        let b = circle_at(rng.gen_range(1.0..5.0), Vector::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)));

        let ab = a.collide(&b);
        let ba = b.collide(&a);
        assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            assert_relative_eq!(ab.normal, -ba.normal, epsilon = 1e-4);
            assert_relative_eq!(ab.mtv.length(), ba.mtv.length(), epsilon = 1e-4);
        }
    }

    for _ in 0..200 {
        let a = box_at(
            rng.gen_range(2.0..10.0),
            rng.gen_range(2.0..10.0),
            Vector::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0)),
        );
        let b = box_at(
            rng.gen_range(2.0..10.0),
            rng.gen_range(2.0..10.0),
            Vector::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0)),
        );

        let ab = a.collide(&b);
        let ba = b.collide(&a);
        assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            assert_relative_eq!(ab.normal, -ba.normal, epsilon = 1e-4);
            assert_relative_eq!(ab.mtv.length(), ba.mtv.length(), epsilon = 1e-4);
        }
    }
}

#[test]
fn test_closest_line_between_segments() {
    let line = closest_line(Vector::ZERO, Vector::new(10.0, 0.0), Vector::new(5.0, 5.0), Vector::new(0.0, 5.0));
    assert_relative_eq!(line.begin, Vector::new(5.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(line.end, Vector::new(5.0, 5.0), epsilon = 1e-5);

    // Parallel segments fall back to projecting the first start point
    let parallel = closest_line(Vector::ZERO, Vector::new(10.0, 0.0), Vector::new(0.0, 5.0), Vector::new(10.0, 0.0));
    assert_relative_eq!(parallel.length(), 5.0, epsilon = 1e-5);
}

#[test]
fn test_closest_line_between_shapes() {
    let a = circle_at(1.0, Vector::ZERO);
    let b = circle_at(2.0, Vector::new(10.0, 0.0));
    let line = a.closest_line_between(&b).unwrap();
    assert_relative_eq!(line.begin, Vector::new(1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(line.end, Vector::new(8.0, 0.0), epsilon = 1e-5);

    let circle = circle_at(1.0, Vector::new(5.0, 5.0));
    let edge = Shape::edge(Vector::ZERO, Vector::new(10.0, 0.0));
    let line = circle.closest_line_between(&edge).unwrap();
    assert_eq!(line, Line::new(Vector::new(5.0, 4.0), Vector::new(5.0, 0.0)));

    let flipped = edge.closest_line_between(&circle).unwrap();
    assert_eq!(flipped, line.flip());

    let left = box_at(2.0, 2.0, Vector::ZERO);
    let right = box_at(2.0, 2.0, Vector::new(10.0, 0.0));
    let line = left.closest_line_between(&right).unwrap();
    assert_relative_eq!(line.length(), 8.0, epsilon = 1e-3);

    let upper = Shape::edge(Vector::new(0.0, 5.0), Vector::new(10.0, 5.0));
    let line = edge.closest_line_between(&upper).unwrap();
    assert_relative_eq!(line.length(), 5.0, epsilon = 1e-5);
}
