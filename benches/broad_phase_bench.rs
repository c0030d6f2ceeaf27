use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use planar_collide::{Body, Collider, PhysicsWorld, Shape, SimulationConfig, Vector};
use rand::{rngs::StdRng, Rng, SeedableRng};

// Scatter circles and boxes over a square field, all drifting around
fn populate(world: &mut PhysicsWorld, count: usize) {
    let mut rng = StdRng::seed_from_u64(1);
    let field = (count as f32).sqrt() * 20.0;

    for i in 0..count {
        let pos = Vector::new(rng.gen_range(0.0..field), rng.gen_range(0.0..field));
        let shape = if i % 2 == 0 {
            Shape::box_shape(8.0, 8.0, Vector::HALF, Vector::ZERO)
        } else {
            Shape::polygon(
                vec![Vector::new(-4.0, -4.0), Vector::new(4.0, -4.0), Vector::new(0.0, 4.0)],
                false,
                Vector::ZERO,
            )
            .unwrap()
        };

        let mut body = Body::new(pos, Collider::active(shape));
        body.set_vel(Vector::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)));
        world.add_body(body);
    }

    // Walls around the field
    let walls = [
        (Vector::new(field / 2.0, -5.0), Vector::new(field + 20.0, 10.0)),
        (Vector::new(field / 2.0, field + 5.0), Vector::new(field + 20.0, 10.0)),
        (Vector::new(-5.0, field / 2.0), Vector::new(10.0, field + 20.0)),
        (Vector::new(field + 5.0, field / 2.0), Vector::new(10.0, field + 20.0)),
    ];
    for (pos, size) in walls {
        let shape = Shape::box_shape(size.x, size.y, Vector::HALF, Vector::ZERO);
        world.add_body(Body::new(pos, Collider::fixed(shape)));
    }
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for count in [100, 500, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            let mut world = PhysicsWorld::with_config(SimulationConfig::default());
            populate(&mut world, n);
            b.iter(|| {
                world.step(black_box(16.0));
            });
        });
    }

    group.finish();
}

fn bench_rigid_body_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step_rigid_body");

    for count in [100, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            let mut world = PhysicsWorld::with_config(SimulationConfig::rigid_body());
            populate(&mut world, n);
            b.iter(|| {
                world.step(black_box(16.0));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_rigid_body_step);
criterion_main!(benches);
