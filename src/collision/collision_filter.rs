use bitflags::bitflags;
use std::collections::HashMap;
use crate::error::PhysicsError;
use crate::Result;

bitflags! {
    /// Category bits for collision filtering
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionBits: u32 {
        /// No categories
        const NONE = 0x0000_0000;

        /// All categories
        const ALL  = 0xFFFF_FFFF;
    }
}

/// A named collision group.
///
/// Two groups collide when each one's category intersects the other's mask.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollisionGroup {
    name: String,
    category: CollisionBits,
    mask: CollisionBits,
}

impl CollisionGroup {
    /// Creates a group from raw bits
    pub fn new(name: impl Into<String>, category: CollisionBits, mask: CollisionBits) -> Self {
        Self {
            name: name.into(),
            category,
            mask,
        }
    }

    /// The group that collides with everything
    pub fn all() -> Self {
        Self::new("Collide with all groups", CollisionBits::ALL, CollisionBits::ALL)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> CollisionBits {
        self.category
    }

    pub fn mask(&self) -> CollisionBits {
        self.mask
    }

    /// Returns whether colliders in these two groups may collide
    pub fn can_collide(&self, other: &CollisionGroup) -> bool {
        self.category.intersects(other.mask) && other.category.intersects(self.mask)
    }
}

impl Default for CollisionGroup {
    fn default() -> Self {
        Self::all()
    }
}

/// Hands out up to 32 named groups, one category bit each
#[derive(Debug)]
pub struct CollisionGroupManager {
    groups: HashMap<String, CollisionGroup>,
    current_bit: u32,
    count: u32,
}

impl CollisionGroupManager {
    /// Maximum number of groups, one per bit of the category mask
    pub const MAX_GROUPS: u32 = 32;

    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            current_bit: 1,
            count: 0,
        }
    }

    /// Creates a new group. Without an explicit mask the group collides with
    /// every group except itself.
    pub fn create(&mut self, name: &str, mask: Option<CollisionBits>) -> Result<CollisionGroup> {
        if self.count >= Self::MAX_GROUPS {
            return Err(PhysicsError::TooManyGroups(Self::MAX_GROUPS));
        }
        if self.groups.contains_key(name) {
            return Err(PhysicsError::DuplicateGroup(name.to_string()));
        }

        let category = CollisionBits::from_bits_retain(self.current_bit);
        let mask = mask.unwrap_or(!category);
        let group = CollisionGroup::new(name, category, mask);

        self.current_bit = self.current_bit.wrapping_shl(1);
        self.count += 1;
        self.groups.insert(name.to_string(), group.clone());

        Ok(group)
    }

    /// All groups created so far
    pub fn groups(&self) -> impl Iterator<Item = &CollisionGroup> {
        self.groups.values()
    }

    pub fn group_by_name(&self, name: &str) -> Option<&CollisionGroup> {
        self.groups.get(name)
    }

    /// Forgets every group and starts handing out bits from the first again
    pub fn reset(&mut self) {
        self.groups.clear();
        self.current_bit = 1;
        self.count = 0;
    }
}

impl Default for CollisionGroupManager {
    fn default() -> Self {
        Self::new()
    }
}
