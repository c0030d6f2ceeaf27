use crate::bodies::Collider;
use crate::collision::{BoundingBox, CollisionType};
use crate::math::{Transform, Vector};
use crate::shapes::Shape;
use crate::Result;

/// Weight of the previous value in the smoothed motion measure
const MOTION_BIAS: f32 = 0.9;

/// Kinematic state of a simulated object plus its single collider.
///
/// Every mutation of position, rotation or scale bumps the transform
/// version, which is what the collider's shape compares against to decide
/// whether its cached world geometry is stale.
#[derive(Debug, Clone)]
pub struct Body {
    pos: Vector,
    old_pos: Vector,
    vel: Vector,
    old_vel: Vector,
    acc: Vector,
    old_acc: Vector,

    /// Rotation in radians
    rotation: f32,
    old_rotation: f32,

    /// Angular velocity in radians per second
    rx: f32,

    scale: Vector,
    old_scale: Vector,

    /// Scale rate per second along x
    sx: f32,

    /// Scale rate per second along y
    sy: f32,

    torque: f32,

    /// Smoothed squared speed, linear plus angular
    motion: f32,

    collider: Collider,

    /// Pending position correction from this pass's contacts
    total_mtv: Vector,

    active: bool,

    transform_version: u64,
}

impl Body {
    /// Creates a body at `pos` owning `collider`
    pub fn new(pos: Vector, collider: Collider) -> Self {
        let mut body = Self {
            pos,
            old_pos: pos,
            vel: Vector::ZERO,
            old_vel: Vector::ZERO,
            acc: Vector::ZERO,
            old_acc: Vector::ZERO,
            rotation: 0.0,
            old_rotation: 0.0,
            rx: 0.0,
            scale: Vector::ONE,
            old_scale: Vector::ONE,
            sx: 0.0,
            sy: 0.0,
            torque: 0.0,
            motion: 0.0,
            collider,
            total_mtv: Vector::ZERO,
            active: true,
            transform_version: 0,
        };
        body.collider.get_shape_mut().invalidate();
        body.sync_geometry();
        body
    }

    /// Current transform
    pub fn transform(&self) -> Transform {
        Transform::new(self.pos, self.rotation, self.scale)
    }

    /// Monotonic counter bumped whenever position, rotation or scale change
    pub fn transform_version(&self) -> u64 {
        self.transform_version
    }

    fn touch_transform(&mut self) {
        self.transform_version += 1;
        self.sync_geometry();
    }

    /// Brings the collider's cached world geometry up to date
    pub fn sync_geometry(&mut self) -> bool {
        let transform = self.transform();
        let version = self.transform_version;
        self.collider.get_shape_mut().sync(&transform, version)
    }

    pub fn get_pos(&self) -> Vector {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Vector) {
        self.pos = pos;
        self.touch_transform();
    }

    pub fn get_old_pos(&self) -> Vector {
        self.old_pos
    }

    pub fn get_vel(&self) -> Vector {
        self.vel
    }

    pub fn set_vel(&mut self, vel: Vector) {
        self.vel = vel;
    }

    pub fn get_old_vel(&self) -> Vector {
        self.old_vel
    }

    pub fn get_acc(&self) -> Vector {
        self.acc
    }

    pub fn set_acc(&mut self, acc: Vector) {
        self.acc = acc;
    }

    pub fn get_old_acc(&self) -> Vector {
        self.old_acc
    }

    pub fn get_rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.touch_transform();
    }

    pub fn get_old_rotation(&self) -> f32 {
        self.old_rotation
    }

    pub fn get_rx(&self) -> f32 {
        self.rx
    }

    pub fn set_rx(&mut self, rx: f32) {
        self.rx = rx;
    }

    pub fn get_scale(&self) -> Vector {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vector) {
        self.scale = scale;
        self.touch_transform();
    }

    pub fn get_old_scale(&self) -> Vector {
        self.old_scale
    }

    pub fn get_sx(&self) -> f32 {
        self.sx
    }

    pub fn set_sx(&mut self, sx: f32) {
        self.sx = sx;
    }

    pub fn get_sy(&self) -> f32 {
        self.sy
    }

    pub fn set_sy(&mut self, sy: f32) {
        self.sy = sy;
    }

    pub fn get_torque(&self) -> f32 {
        self.torque
    }

    pub fn set_torque(&mut self, torque: f32) {
        self.torque = torque;
    }

    pub fn get_motion(&self) -> f32 {
        self.motion
    }

    pub fn get_collider(&self) -> &Collider {
        &self.collider
    }

    /// Mutable access to the collider. Shape swaps through
    /// `Collider::set_shape` stay in place until the next sync.
    pub fn get_collider_mut(&mut self) -> &mut Collider {
        &mut self.collider
    }

    /// Replaces the collider, placing its shape at this body's transform
    pub fn set_collider(&mut self, collider: Collider) {
        self.collider = collider;
        self.collider.get_shape_mut().invalidate();
        self.sync_geometry();
    }

    pub fn get_collision_type(&self) -> CollisionType {
        self.collider.get_collision_type()
    }

    /// World-space bounds of the collider
    pub fn bounds(&self) -> BoundingBox {
        self.collider.bounds()
    }

    /// World-space center of the collider
    pub fn center(&self) -> Vector {
        self.collider.center()
    }

    /// Killed bodies stop taking part in collision
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn kill(&mut self) {
        self.active = false;
    }

    /// Brings a killed body back
    pub fn revive(&mut self) {
        self.active = true;
    }

    /// Snapshots the current kinematic state into the `old_*` fields
    pub fn capture_old_transform(&mut self) {
        self.old_vel = self.vel;
        self.old_pos = self.pos;
        self.old_acc = self.acc;
        self.old_scale = self.scale;
        self.old_rotation = self.rotation;
    }

    /// Advances the body by `delta_ms` milliseconds with semi-implicit Euler.
    ///
    /// `global_acc` only applies to Active colliders.
    pub fn integrate(&mut self, delta_ms: f32, global_acc: Vector) {
        let seconds = delta_ms / 1000.0;

        let total_acc = if self.collider.get_collision_type() == CollisionType::Active {
            self.acc + global_acc
        } else {
            self.acc
        };

        self.vel += total_acc * seconds;
        self.pos += self.vel * seconds + total_acc * 0.5 * seconds * seconds;

        let inertia = self.collider.get_inertia();
        if inertia > 0.0 && inertia.is_finite() {
            self.rx += self.torque / inertia * seconds;
        }
        self.rotation += self.rx * seconds;

        self.scale.x += self.sx * seconds;
        self.scale.y += self.sy * seconds;

        let current_motion = self.vel.length_squared() + self.rx * self.rx;
        self.motion = MOTION_BIAS * self.motion + (1.0 - MOTION_BIAS) * current_motion;

        self.touch_transform();
    }

    /// Queues a position correction, applied by `apply_mtv`
    pub fn add_mtv(&mut self, mtv: Vector) {
        self.total_mtv += mtv;
    }

    /// Pending position correction
    pub fn get_total_mtv(&self) -> Vector {
        self.total_mtv
    }

    /// Moves the body by the queued correction and clears it
    pub fn apply_mtv(&mut self) {
        if self.total_mtv.is_zero() {
            self.total_mtv = Vector::ZERO;
            return;
        }
        self.pos += self.total_mtv;
        self.total_mtv = Vector::ZERO;
        self.touch_transform();
    }

    /// Sets the collider shape to a box
    pub fn use_box_collider(&mut self, width: f32, height: f32, anchor: Vector, offset: Vector) -> &Shape {
        self.replace_shape(Shape::box_shape(width, height, anchor, offset))
    }

    /// Sets the collider shape to a counter-clockwise convex polygon
    pub fn use_polygon_collider(&mut self, points: Vec<Vector>, offset: Vector) -> Result<&Shape> {
        let shape = Shape::polygon(points, false, offset)?;
        Ok(self.replace_shape(shape))
    }

    /// Sets the collider shape to a circle
    pub fn use_circle_collider(&mut self, radius: f32, offset: Vector) -> Result<&Shape> {
        let shape = Shape::circle(radius, offset)?;
        Ok(self.replace_shape(shape))
    }

    /// Sets the collider shape to an edge
    pub fn use_edge_collider(&mut self, begin: Vector, end: Vector) -> &Shape {
        self.replace_shape(Shape::edge(begin, end))
    }

    fn replace_shape(&mut self, shape: Shape) -> &Shape {
        self.collider.set_shape(shape);
        self.sync_geometry();
        self.collider.get_shape()
    }
}
