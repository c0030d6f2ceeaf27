use crate::bodies::Material;
use crate::collision::{BoundingBox, CollisionGroup, CollisionType};
use crate::error::PhysicsError;
use crate::math::Vector;
use crate::shapes::{Shape, ShapeContact};
use crate::Result;

/// Mass of a collider nobody gave a mass to
pub const DEFAULT_MASS: f32 = 10.0;

/// Inertia used when shape inertia is turned off
pub const DEFAULT_INERTIA: f32 = 1000.0;

/// A collision shape plus the physical properties used to respond to contacts
#[derive(Debug, Clone)]
pub struct Collider {
    /// The collision geometry
    shape: Shape,

    /// Which pairs generate contacts and who gets moved
    collision_type: CollisionType,

    /// Group used for pair filtering
    group: CollisionGroup,

    mass: f32,

    /// Set once a mass is given explicitly, so world defaults don't override it
    mass_overridden: bool,

    inertia: Option<f32>,

    use_shape_inertia: bool,

    material: Material,
}

impl Collider {
    /// Creates a collider with default material
    pub fn new(shape: Shape, collision_type: CollisionType) -> Self {
        Self {
            shape,
            collision_type,
            group: CollisionGroup::all(),
            mass: DEFAULT_MASS,
            mass_overridden: false,
            inertia: None,
            use_shape_inertia: true,
            material: Material::default(),
        }
    }

    /// A collider that receives full collision response
    pub fn active(shape: Shape) -> Self {
        Self::new(shape, CollisionType::Active)
    }

    /// A collider that never moves from collision response
    pub fn fixed(shape: Shape) -> Self {
        Self::new(shape, CollisionType::Fixed)
    }

    /// A collider that only reports collisions
    pub fn passive(shape: Shape) -> Self {
        Self::new(shape, CollisionType::Passive)
    }

    pub fn builder() -> ColliderBuilder {
        ColliderBuilder::new()
    }

    pub fn get_shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn get_shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// Replaces the shape, keeping it positioned where the old one was
    pub fn set_shape(&mut self, shape: Shape) {
        let transform = self.shape.transform();
        self.shape = shape;
        self.shape.recalc(&transform);
        self.shape.invalidate();
    }

    pub fn get_collision_type(&self) -> CollisionType {
        self.collision_type
    }

    pub fn set_collision_type(&mut self, collision_type: CollisionType) {
        self.collision_type = collision_type;
    }

    pub fn get_group(&self) -> &CollisionGroup {
        &self.group
    }

    pub fn set_group(&mut self, group: CollisionGroup) {
        self.group = group;
    }

    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.mass_overridden = true;
    }

    pub(crate) fn apply_default_mass(&mut self, mass: f32) {
        if !self.mass_overridden {
            self.mass = mass;
        }
    }

    /// Inverse mass, zero for fixed colliders
    pub fn get_inverse_mass(&self) -> f32 {
        if self.collision_type == CollisionType::Fixed || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Explicit inertia if set, otherwise the shape's moment (or a flat
    /// default when shape inertia is turned off)
    pub fn get_inertia(&self) -> f32 {
        match self.inertia {
            Some(inertia) => inertia,
            None if self.use_shape_inertia => self.shape.inertia(self.mass),
            None => DEFAULT_INERTIA,
        }
    }

    pub fn set_inertia(&mut self, inertia: f32) {
        self.inertia = Some(inertia);
    }

    /// Drops an explicit inertia so the default applies again
    pub fn clear_inertia(&mut self) {
        self.inertia = None;
    }

    /// Inverse inertia, zero for fixed colliders
    pub fn get_inverse_inertia(&self) -> f32 {
        let inertia = self.get_inertia();
        if self.collision_type == CollisionType::Fixed || inertia <= 0.0 || !inertia.is_finite() {
            0.0
        } else {
            1.0 / inertia
        }
    }

    pub fn get_use_shape_inertia(&self) -> bool {
        self.use_shape_inertia
    }

    pub fn set_use_shape_inertia(&mut self, use_shape_inertia: bool) {
        self.use_shape_inertia = use_shape_inertia;
    }

    pub fn get_material(&self) -> Material {
        self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn get_friction(&self) -> f32 {
        self.material.friction
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.material.friction = friction;
    }

    pub fn get_bounciness(&self) -> f32 {
        self.material.bounciness
    }

    pub fn set_bounciness(&mut self, bounciness: f32) {
        self.material.bounciness = bounciness;
    }

    /// World-space bounds of the shape
    pub fn bounds(&self) -> BoundingBox {
        self.shape.bounds()
    }

    pub fn local_bounds(&self) -> BoundingBox {
        self.shape.local_bounds()
    }

    pub fn center(&self) -> Vector {
        self.shape.center()
    }

    /// Narrow-phase test against another collider
    pub fn collide(&self, other: &Collider) -> Option<ShapeContact> {
        self.shape.collide(&other.shape)
    }

    /// Returns true if the two colliders currently overlap
    pub fn touching(&self, other: &Collider) -> bool {
        self.collide(other).is_some()
    }
}

/// Builder for colliders
#[derive(Debug, Clone, Default)]
pub struct ColliderBuilder {
    shape: Option<Shape>,
    collision_type: CollisionType,
    group: Option<CollisionGroup>,
    mass: Option<f32>,
    inertia: Option<f32>,
    use_shape_inertia: Option<bool>,
    material: Material,
}

impl ColliderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn collision_type(mut self, collision_type: CollisionType) -> Self {
        self.collision_type = collision_type;
        self
    }

    pub fn group(mut self, group: CollisionGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn inertia(mut self, inertia: f32) -> Self {
        self.inertia = Some(inertia);
        self
    }

    pub fn use_shape_inertia(mut self, use_shape_inertia: bool) -> Self {
        self.use_shape_inertia = Some(use_shape_inertia);
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.material.friction = friction;
        self
    }

    pub fn bounciness(mut self, bounciness: f32) -> Self {
        self.material.bounciness = bounciness;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Builds the collider; a shape is required
    pub fn build(self) -> Result<Collider> {
        let shape = self.shape.ok_or(PhysicsError::MissingShape)?;

        if let Some(mass) = self.mass {
            if !mass.is_finite() || mass < 0.0 {
                return Err(PhysicsError::InvalidParameter(format!("collider mass {}", mass)));
            }
        }

        let mut collider = Collider::new(shape, self.collision_type);
        collider.material = self.material;
        if let Some(group) = self.group {
            collider.group = group;
        }
        if let Some(mass) = self.mass {
            collider.set_mass(mass);
        }
        collider.inertia = self.inertia;
        if let Some(use_shape_inertia) = self.use_shape_inertia {
            collider.use_shape_inertia = use_shape_inertia;
        }
        Ok(collider)
    }
}
