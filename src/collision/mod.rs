mod bounding_box;
mod side;
mod collision_type;
mod collision_filter;
mod collision_pair;
mod contact;
mod dynamic_tree;
mod broad_phase;

pub use self::bounding_box::BoundingBox;
pub use self::side::Side;
pub use self::collision_type::CollisionType;
pub use self::collision_filter::{CollisionBits, CollisionGroup, CollisionGroupManager};
pub use self::collision_pair::{Pair, PairId};
pub use self::contact::CollisionContact;
pub use self::dynamic_tree::{DynamicTree, NodeId, TreeNode};
pub use self::broad_phase::{BroadPhase, DebugDraw, DynamicTreeBroadPhase, FrameStats};
