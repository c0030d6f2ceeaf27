use planar_collide::core::BodyEventType;
use planar_collide::error::PhysicsError;
use planar_collide::{
    Body, BodyHandle, BoundingBox, Collider, CollisionEventType, CollisionType, EventQueue, PhysicsWorld,
    ResolutionStrategy, Shape, SimulationConfig, Vector,
};
use approx::assert_relative_eq;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn circle(radius: f32, pos: Vector, collision_type: CollisionType) -> Body {
    let shape = Shape::circle(radius, Vector::ZERO).unwrap();
    Body::new(pos, Collider::new(shape, collision_type))
}

fn square(size: f32, pos: Vector, collision_type: CollisionType) -> Body {
    let shape = Shape::box_shape(size, size, Vector::HALF, Vector::ZERO);
    Body::new(pos, Collider::new(shape, collision_type))
}

fn count(events: &EventQueue, event_type: CollisionEventType) -> usize {
    events.get_collision_events_of_type(event_type).len()
}

fn count_for(events: &EventQueue, event_type: CollisionEventType, body: BodyHandle) -> usize {
    events
        .get_collision_events_for_body(body)
        .iter()
        .filter(|e| e.event_type == event_type)
        .count()
}

#[test]
fn test_world_creation() {
    let world = PhysicsWorld::new();
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.get_time(), 0.0);
    assert_eq!(world.get_config().resolution_strategy, ResolutionStrategy::Box);
    assert_eq!(world.get_config().collision_passes, 5);
}

#[test]
fn test_add_and_remove_bodies() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(circle(1.0, Vector::ZERO, CollisionType::Active));
    let b = world.add_body(circle(1.0, Vector::new(10.0, 0.0), CollisionType::Fixed));
    assert_eq!(world.body_count(), 2);
    assert_ne!(a, b);
    assert!(world.broad_phase().tree().contains(a));

    let added = world.get_events().get_body_events_of_type(BodyEventType::Added);
    assert_eq!(added.len(), 2);

    let removed = world.remove_body(a).unwrap();
    assert_eq!(removed.get_pos(), Vector::ZERO);
    assert_eq!(world.body_count(), 1);
    assert!(!world.broad_phase().tree().contains(a));
    assert!(matches!(world.get_body(a), Err(PhysicsError::ResourceNotFound(_))));
    assert!(world.remove_body(a).is_err());

    let events = world.get_events().get_body_events_for_body(a);
    assert_eq!(events.last().map(|e| e.event_type), Some(BodyEventType::Removed));
}

#[test]
fn test_default_mass_comes_from_config() {
    let config = SimulationConfig {
        default_mass: 3.0,
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config);

    let plain = world.add_body(circle(1.0, Vector::ZERO, CollisionType::Active));

    let mut heavy = circle(1.0, Vector::new(50.0, 0.0), CollisionType::Active);
    heavy.get_collider_mut().set_mass(20.0);
    let heavy = world.add_body(heavy);

    assert_eq!(world.get_body(plain).unwrap().get_collider().get_mass(), 3.0);
    assert_eq!(world.get_body(heavy).unwrap().get_collider().get_mass(), 20.0);
}

#[test]
fn test_body_integration() {
    let mut body = circle(1.0, Vector::ZERO, CollisionType::Active);
    body.set_vel(Vector::new(10.0, 0.0));
    body.set_acc(Vector::new(0.0, 10.0));

    let version = body.transform_version();
    body.integrate(1000.0, Vector::ZERO);

    assert_relative_eq!(body.get_vel(), Vector::new(10.0, 10.0));
    assert_relative_eq!(body.get_pos(), Vector::new(10.0, 15.0));
    assert!(body.transform_version() > version);
    assert_eq!(body.get_collider().center(), body.get_pos());

    // Global acceleration skips anything that isn't Active
    let mut fixed = circle(1.0, Vector::ZERO, CollisionType::Fixed);
    fixed.integrate(1000.0, Vector::new(0.0, 100.0));
    assert_eq!(fixed.get_vel(), Vector::ZERO);
    assert_eq!(fixed.get_pos(), Vector::ZERO);
}

#[test]
fn test_body_transform_changes_refresh_geometry() {
    let mut body = square(2.0, Vector::ZERO, CollisionType::Active);
    assert_eq!(body.bounds(), BoundingBox::new(-1.0, -1.0, 1.0, 1.0));

    body.set_pos(Vector::new(10.0, 0.0));
    assert_eq!(body.bounds(), BoundingBox::new(9.0, -1.0, 11.0, 1.0));

    body.set_scale(Vector::new(2.0, 2.0));
    assert_relative_eq!(body.bounds().width(), 4.0);

    body.add_mtv(Vector::new(1.0, 0.0));
    body.add_mtv(Vector::new(1.0, 0.0));
    assert_eq!(body.get_total_mtv(), Vector::new(2.0, 0.0));
    body.apply_mtv();
    assert_eq!(body.get_pos(), Vector::new(12.0, 0.0));
    assert_eq!(body.get_total_mtv(), Vector::ZERO);

    body.use_circle_collider(3.0, Vector::ZERO).unwrap();
    assert_eq!(body.bounds(), BoundingBox::new(9.0, -3.0, 15.0, 3.0));
    assert!(body.use_circle_collider(-3.0, Vector::ZERO).is_err());
}

#[test]
fn test_bouncing_circle_reverses_velocity() {
    let mut world = PhysicsWorld::with_config(SimulationConfig::rigid_body());

    let mut moving = circle(5.0, Vector::ZERO, CollisionType::Active);
    moving.set_vel(Vector::new(50.0, 0.0));
    moving.get_collider_mut().set_bounciness(1.0);
    let moving = world.add_body(moving);

    let mut wall = circle(5.0, Vector::new(12.0, 0.0), CollisionType::Fixed);
    wall.get_collider_mut().set_bounciness(1.0);
    let wall = world.add_body(wall);

    // After integrating, the centers are 7 apart: 3 px of overlap
    let events = world.step(100.0);

    assert_eq!(count(events, CollisionEventType::PreCollision), 2);
    assert_eq!(count_for(events, CollisionEventType::PostCollision, moving), 1);
    assert_eq!(count_for(events, CollisionEventType::PostCollision, wall), 0);
    assert_eq!(count(events, CollisionEventType::CollisionStart), 2);

    let pre = events
        .get_collision_events_for_body(moving)
        .into_iter()
        .find(|e| e.event_type == CollisionEventType::PreCollision)
        .unwrap();
    assert_eq!(pre.other, wall);
    assert_relative_eq!(pre.intersection.length(), 3.0, epsilon = 1e-3);

    let body = world.get_body(moving).unwrap();
    assert_relative_eq!(body.get_vel().x, -50.0, epsilon = 1e-3);
    assert_relative_eq!(body.get_vel().y, 0.0, epsilon = 1e-3);
    assert_relative_eq!(body.get_pos().x, 2.0, epsilon = 1e-2);

    let wall_body = world.get_body(wall).unwrap();
    assert_eq!(wall_body.get_pos(), Vector::new(12.0, 0.0));
    assert_eq!(wall_body.get_vel(), Vector::ZERO);

    assert_eq!(world.get_stats().collisions, 1);
    assert_relative_eq!(world.get_time(), 100.0);
}

#[test]
fn test_box_strategy_splits_correction_between_active_bodies() {
    let mut world = PhysicsWorld::new();
    let a = world.add_body(square(10.0, Vector::ZERO, CollisionType::Active));
    let b = world.add_body(square(10.0, Vector::new(9.0, 0.0), CollisionType::Active));

    let events = world.step(16.0);
    assert_eq!(count(events, CollisionEventType::PreCollision), 2);
    assert_eq!(count(events, CollisionEventType::PostCollision), 2);
    assert_eq!(count(events, CollisionEventType::CollisionStart), 2);

    let post = events
        .get_collision_events_for_body(a)
        .into_iter()
        .find(|e| e.event_type == CollisionEventType::PostCollision)
        .unwrap();
    assert_eq!(post.other, b);

    assert_relative_eq!(world.get_body(a).unwrap().get_pos().x, -0.5, epsilon = 1e-4);
    assert_relative_eq!(world.get_body(b).unwrap().get_pos().x, 9.5, epsilon = 1e-4);
}

#[test]
fn test_box_strategy_fixed_pushes_active_fully() {
    let mut world = PhysicsWorld::new();
    let mut ball = square(10.0, Vector::new(0.0, -4.0), CollisionType::Active);
    ball.set_vel(Vector::new(0.0, 20.0));
    let ball = world.add_body(ball);
    let floor = world.add_body(square(10.0, Vector::new(0.0, 5.0), CollisionType::Fixed));

    world.step(16.0);

    let body = world.get_body(ball).unwrap();
    assert!(body.get_pos().y <= -5.0 + 1e-3);
    // Velocity into the floor is cancelled
    assert!(body.get_vel().y.abs() < 1e-3);
    assert_eq!(world.get_body(floor).unwrap().get_pos(), Vector::new(0.0, 5.0));
}

#[test]
fn test_box_strategy_pushes_contained_body_out_in_one_step() {
    let mut world = PhysicsWorld::new();
    let crate_body = world.add_body(square(4.0, Vector::new(3.0, 2.0), CollisionType::Active));
    world.add_body(square(40.0, Vector::ZERO, CollisionType::Fixed));

    world.step(16.0);

    let pos = world.get_body(crate_body).unwrap().get_pos();
    assert_relative_eq!(pos, Vector::new(22.0, 2.0), epsilon = 1e-3);
}

#[test]
fn test_passive_bodies_report_but_are_not_resolved() {
    let mut world = PhysicsWorld::new();
    let sensor = world.add_body(circle(5.0, Vector::ZERO, CollisionType::Passive));
    let ball = world.add_body(circle(5.0, Vector::new(6.0, 0.0), CollisionType::Active));

    let events = world.step(16.0);
    assert_eq!(count(events, CollisionEventType::PreCollision), 2);
    assert_eq!(count(events, CollisionEventType::PostCollision), 0);
    assert_eq!(count_for(events, CollisionEventType::CollisionStart, sensor), 1);
    assert_eq!(count_for(events, CollisionEventType::CollisionStart, ball), 1);

    assert_eq!(world.get_body(ball).unwrap().get_pos(), Vector::new(6.0, 0.0));
    assert_eq!(world.get_body(sensor).unwrap().get_pos(), Vector::ZERO);
}

#[test]
fn test_prevent_collision_and_fixed_pairs_are_ignored() {
    let mut world = PhysicsWorld::new();
    world.add_body(circle(5.0, Vector::ZERO, CollisionType::Fixed));
    world.add_body(circle(5.0, Vector::new(1.0, 0.0), CollisionType::Fixed));
    world.add_body(circle(5.0, Vector::new(2.0, 0.0), CollisionType::PreventCollision));

    let events = world.step(16.0);
    assert!(!events.has_collision_events());
    assert_eq!(world.get_stats().pairs, 0);
}

#[test]
fn test_collision_start_and_end_fire_once() {
    init_logger();
    let config = SimulationConfig {
        acc: Vector::new(100.0, 0.0),
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config);
    let a = world.add_body(circle(5.0, Vector::ZERO, CollisionType::Active));
    let b = world.add_body(circle(5.0, Vector::new(8.0, 0.0), CollisionType::Fixed));

    let events = world.step(16.0);
    assert_eq!(count_for(events, CollisionEventType::CollisionStart, a), 1);
    assert_eq!(count_for(events, CollisionEventType::CollisionStart, b), 1);
    assert_eq!(count(events, CollisionEventType::CollisionEnd), 0);

    // Acceleration keeps pressing the circles together
    for _ in 0..3 {
        let events = world.step(16.0);
        assert_eq!(count(events, CollisionEventType::CollisionStart), 0);
        assert_eq!(count(events, CollisionEventType::CollisionEnd), 0);
        assert!(count(events, CollisionEventType::PreCollision) > 0);
    }

    world.get_config_mut().acc = Vector::ZERO;
    world.get_body_mut(a).unwrap().set_vel(Vector::new(-500.0, 0.0));

    let events = world.step(16.0);
    assert_eq!(count_for(events, CollisionEventType::CollisionEnd, a), 1);
    assert_eq!(count_for(events, CollisionEventType::CollisionEnd, b), 1);

    let events = world.step(16.0);
    assert!(!events.has_collision_events());
}

#[test]
fn test_killed_body_ends_its_collisions() {
    let mut world = PhysicsWorld::new();
    let a = world.add_body(circle(5.0, Vector::ZERO, CollisionType::Passive));
    let b = world.add_body(circle(5.0, Vector::new(6.0, 0.0), CollisionType::Passive));

    let events = world.step(16.0);
    assert_eq!(count(events, CollisionEventType::CollisionStart), 2);

    world.kill_body(a).unwrap();
    assert!(!world.get_body(a).unwrap().is_active());

    let events = world.step(16.0);
    assert_eq!(count_for(events, CollisionEventType::CollisionEnd, a), 1);
    assert_eq!(count_for(events, CollisionEventType::CollisionEnd, b), 1);
    assert_eq!(count(events, CollisionEventType::PreCollision), 0);

    world.remove_body(b).unwrap();
    assert!(world.kill_body(b).is_err());
}

#[test]
fn test_removed_body_ends_silently() {
    let mut world = PhysicsWorld::new();
    let a = world.add_body(circle(5.0, Vector::ZERO, CollisionType::Passive));
    world.add_body(circle(5.0, Vector::new(6.0, 0.0), CollisionType::Passive));

    world.step(16.0);
    assert_eq!(world.broad_phase().last_frame_pairs().count(), 1);

    world.remove_body(a).unwrap();
    assert_eq!(world.broad_phase().last_frame_pairs().count(), 0);

    let events = world.step(16.0);
    assert_eq!(count(events, CollisionEventType::CollisionEnd), 0);
}

#[test]
fn test_fast_body_does_not_tunnel() {
    init_logger();
    let config = SimulationConfig {
        collision_passes: 1,
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config);

    let mut bullet = circle(1.0, Vector::ZERO, CollisionType::Active);
    bullet.set_vel(Vector::new(1000.0, 0.0));
    let bullet = world.add_body(bullet);

    let wall_shape = Shape::box_shape(2.0, 100.0, Vector::HALF, Vector::ZERO);
    let wall = world.add_body(Body::new(Vector::new(50.0, 0.0), Collider::fixed(wall_shape)));

    let events = world.step(100.0);
    assert_eq!(count_for(events, CollisionEventType::CollisionStart, wall), 1);

    let stats = world.get_stats();
    assert_eq!(stats.fast_bodies, 1);
    assert_eq!(stats.fast_body_collisions, 1);

    let body = world.get_body(bullet).unwrap();
    assert!(body.get_pos().x < 49.0);
    assert!(body.get_pos().x > 40.0);
    assert!(body.get_vel().x.abs() < 1e-3);
}

#[test]
fn test_fast_body_check_can_be_disabled() {
    let config = SimulationConfig {
        collision_passes: 1,
        check_for_fast_bodies: false,
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config);

    let mut bullet = circle(1.0, Vector::ZERO, CollisionType::Active);
    bullet.set_vel(Vector::new(1000.0, 0.0));
    let bullet = world.add_body(bullet);
    let wall_shape = Shape::box_shape(2.0, 100.0, Vector::HALF, Vector::ZERO);
    world.add_body(Body::new(Vector::new(50.0, 0.0), Collider::fixed(wall_shape)));

    world.step(100.0);
    assert_relative_eq!(world.get_body(bullet).unwrap().get_pos().x, 100.0, epsilon = 1e-3);
}

#[test]
fn test_bodies_leaving_world_bounds_are_untracked() {
    init_logger();
    let config = SimulationConfig {
        world_bounds: BoundingBox::new(-100.0, -100.0, 100.0, 100.0),
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config);

    let mut runaway = circle(1.0, Vector::new(90.0, 0.0), CollisionType::Active);
    runaway.set_vel(Vector::new(1000.0, 0.0));
    let runaway = world.add_body(runaway);

    let events = world.step(100.0);
    let untracked = events.get_body_events_of_type(BodyEventType::Untracked);
    assert_eq!(untracked.len(), 1);
    assert_eq!(untracked[0].body, runaway);

    assert!(!world.broad_phase().tree().contains(runaway));
    // Still simulated, just no longer collides
    assert_eq!(world.body_count(), 1);
}

#[test]
fn test_disabled_world_does_not_step() {
    let config = SimulationConfig {
        enabled: false,
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config);
    let mut body = circle(1.0, Vector::ZERO, CollisionType::Active);
    body.set_vel(Vector::new(10.0, 0.0));
    let handle = world.add_body(body);

    let events = world.step(16.0);
    assert!(events.is_empty());
    assert_eq!(world.get_body(handle).unwrap().get_pos(), Vector::ZERO);
}

#[test]
fn test_debug_draw_follows_flags() {
    let mut world = PhysicsWorld::new();
    world.add_body(circle(5.0, Vector::ZERO, CollisionType::Passive));
    world.add_body(circle(5.0, Vector::new(6.0, 0.0), CollisionType::Passive));

    world.step(16.0);
    let draw = world.debug_draw();
    assert!(draw.tree_bounds.is_empty());
    assert!(draw.contact_points.is_empty());

    {
        let config = world.get_config_mut();
        config.broadphase_debug = true;
        config.show_contacts = true;
        config.show_collision_normals = true;
    }
    world.step(16.0);

    let draw = world.debug_draw();
    assert_eq!(draw.tree_bounds.len(), 3);
    assert_eq!(draw.contact_points.len(), 1);
    assert_eq!(draw.collision_normals.len(), 1);
    assert_eq!(world.broad_phase().debug_contacts().len(), 1);
}

#[test]
fn test_resolution_strategy_can_change() {
    let mut world = PhysicsWorld::new();
    world.set_resolution_strategy(ResolutionStrategy::RigidBody);
    assert_eq!(world.get_config().resolution_strategy, ResolutionStrategy::RigidBody);
}
