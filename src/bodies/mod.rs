mod body;
mod collider;
mod material;

pub use self::body::Body;
pub use self::collider::{Collider, ColliderBuilder, DEFAULT_INERTIA, DEFAULT_MASS};
pub use self::material::Material;
