use crate::bodies::Body;
use crate::collision::{CollisionType, Side};
use crate::core::events::{CollisionEvent, CollisionEventType};
use crate::core::{BodyHandle, EventQueue, ResolutionStrategy, SimulationConfig};
use crate::math::Vector;
use crate::shapes::ShapeContact;

/// A contact between two bodies produced by the narrow phase.
///
/// `mtv` and `normal` point away from `body_a`. Contacts live for a single
/// pass: they are resolved once and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionContact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,

    /// Minimum translation vector separating the two shapes
    pub mtv: Vector,

    /// World-space contact point
    pub point: Vector,

    /// Unit contact normal
    pub normal: Vector,
}

impl CollisionContact {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, contact: ShapeContact) -> Self {
        Self {
            body_a,
            body_b,
            mtv: contact.mtv,
            point: contact.point,
            normal: contact.normal,
        }
    }

    /// Side of `body_a` that was hit
    pub fn side(&self) -> Side {
        Side::from_direction(self.mtv)
    }

    /// Applies the configured resolution strategy. `a` and `b` must be the
    /// bodies behind `body_a` and `body_b`.
    pub fn resolve(
        &self,
        strategy: ResolutionStrategy,
        a: &mut Body,
        b: &mut Body,
        config: &SimulationConfig,
        events: &mut EventQueue,
    ) {
        match strategy {
            ResolutionStrategy::Box => self.resolve_box_collision(a, b, events),
            ResolutionStrategy::RigidBody => self.resolve_rigid_body_collision(a, b, config, events),
        }
    }

    fn emit_pre_collision(&self, events: &mut EventQueue) {
        let side = self.side();
        events.add_collision_event(CollisionEvent::new(
            CollisionEventType::PreCollision,
            self.body_a,
            self.body_b,
            side,
            -self.mtv,
        ));
        events.add_collision_event(CollisionEvent::new(
            CollisionEventType::PreCollision,
            self.body_b,
            self.body_a,
            side.opposite(),
            self.mtv,
        ));
    }

    fn resolve_box_collision(&self, a: &mut Body, b: &mut Body, events: &mut EventQueue) {
        self.emit_pre_collision(events);

        let type_a = a.get_collision_type();
        let type_b = b.get_collision_type();
        apply_box_impulse(self.body_a, a, type_b, self.body_b, -self.mtv, events);
        apply_box_impulse(self.body_b, b, type_a, self.body_a, self.mtv, events);
    }

    fn resolve_rigid_body_collision(&self, a: &mut Body, b: &mut Body, config: &SimulationConfig, events: &mut EventQueue) {
        self.emit_pre_collision(events);

        let type_a = a.get_collision_type();
        let type_b = b.get_collision_type();
        if type_a == CollisionType::Passive || type_b == CollisionType::Passive {
            return;
        }

        let collider_a = a.get_collider();
        let collider_b = b.get_collider();

        let inv_mass_a = collider_a.get_inverse_mass();
        let inv_mass_b = collider_b.get_inverse_mass();
        let inv_moi_a = collider_a.get_inverse_inertia();
        let inv_moi_b = collider_b.get_inverse_inertia();

        let material = collider_a.get_material().combine(&collider_b.get_material());
        let restitution = material.bounciness;
        let friction = material.friction;

        let normal = self.normal.normalize();
        let tangent = normal.normal();

        let ra = self.point - collider_a.center();
        let rb = self.point - collider_b.center();

        let rv = b.get_vel() + rb.cross_scalar(-b.get_rx()) - (a.get_vel() - ra.cross_scalar(a.get_rx()));
        let rv_normal = rv.dot(&normal);
        let rv_tangent = rv.dot(&tangent);
        let ra_tangent = ra.dot(&tangent);
        let ra_normal = ra.dot(&normal);
        let rb_tangent = rb.dot(&tangent);
        let rb_normal = rb.dot(&normal);

        // Already separating
        if rv_normal > 0.0 {
            return;
        }

        let denominator = inv_mass_a
            + inv_mass_b
            + inv_moi_a * ra_tangent * ra_tangent
            + inv_moi_b * rb_tangent * rb_tangent;
        if denominator <= 0.0 {
            return;
        }
        let impulse = -((1.0 + restitution) * rv_normal) / denominator;

        let rotate = config.allow_rigid_body_rotation;
        let move_a = type_a.receives_response();
        let move_b = type_b.receives_response();

        if move_b {
            b.set_vel(b.get_vel() + normal * (impulse * inv_mass_b));
            if rotate {
                b.set_rx(b.get_rx() - impulse * inv_moi_b * -rb.cross(&normal));
            }
        }
        if move_a {
            a.set_vel(a.get_vel() - normal * (impulse * inv_mass_a));
            if rotate {
                a.set_rx(a.get_rx() + impulse * inv_moi_a * -ra.cross(&normal));
            }
        }

        match (move_a, move_b) {
            (false, _) => b.add_mtv(self.mtv),
            (true, false) => a.add_mtv(-self.mtv),
            (true, true) => {
                b.add_mtv(self.mtv * 0.5);
                a.add_mtv(self.mtv * -0.5);
            }
        }

        if friction != 0.0 && rv_tangent != 0.0 {
            let t = (rv - normal * rv.dot(&normal)).normalize();
            let friction_denominator = inv_mass_a
                + inv_mass_b
                + ra_normal * ra_normal * inv_moi_a
                + rb_normal * rb_normal * inv_moi_b;

            if friction_denominator > 0.0 {
                let jt = rv.dot(&t) / friction_denominator;

                // Coulomb: static friction up to the normal impulse, kinetic past it
                let friction_impulse = if jt.abs() <= impulse * friction {
                    -(t * jt)
                } else {
                    t * (-impulse * friction)
                };

                if move_b {
                    b.set_vel(b.get_vel() + friction_impulse * inv_mass_b);
                    if rotate {
                        b.set_rx(b.get_rx() + friction_impulse.dot(&t) * inv_moi_b * rb.cross(&t));
                    }
                }
                if move_a {
                    a.set_vel(a.get_vel() - friction_impulse * inv_mass_a);
                    if rotate {
                        a.set_rx(a.get_rx() - friction_impulse.dot(&t) * inv_moi_a * ra.cross(&t));
                    }
                }
            }
        }

        let side = self.side();
        if move_a {
            events.add_collision_event(CollisionEvent::new(
                CollisionEventType::PostCollision,
                self.body_a,
                self.body_b,
                side,
                -self.mtv,
            ));
        }
        if move_b {
            events.add_collision_event(CollisionEvent::new(
                CollisionEventType::PostCollision,
                self.body_b,
                self.body_a,
                side.opposite(),
                self.mtv,
            ));
        }
    }
}

/// Pushes `target` out along `correction` and cancels the part of its
/// velocity heading back into `other`. Only Active targets against
/// non-Passive colliders move; two Active colliders split the correction.
fn apply_box_impulse(
    target: BodyHandle,
    body: &mut Body,
    other_type: CollisionType,
    other: BodyHandle,
    correction: Vector,
    events: &mut EventQueue,
) {
    if !body.get_collision_type().receives_response() || other_type == CollisionType::Passive {
        return;
    }

    let correction = if other_type == CollisionType::Active {
        correction * 0.5
    } else {
        correction
    };

    body.set_pos(body.get_pos() + correction);

    let direction = correction.normalize();
    let vel = body.get_vel();
    if direction.dot(&vel) < 0.0 {
        let adjustment = direction * direction.dot(&-vel);
        body.set_vel(vel + adjustment);
    }

    events.add_collision_event(CollisionEvent::new(
        CollisionEventType::PostCollision,
        target,
        other,
        Side::from_direction(-correction),
        correction,
    ));
}
