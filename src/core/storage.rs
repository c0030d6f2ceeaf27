use std::collections::BTreeMap;
use crate::core::BodyHandle;
use crate::error::PhysicsError;
use crate::Result;

/// Generic storage trait for physics objects
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool;

    /// Clears all items from the storage
    fn clear(&mut self);

    /// Returns all live handles in ascending order
    fn handles(&self) -> Vec<H>;

    /// Returns an iterator over all items
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;

    /// Returns a mutable iterator over all items
    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a;
}

/// Keyed storage for bodies.
///
/// Handles are never reused, so a removed body's handle stays dangling
/// instead of silently pointing at a newer body. Iteration follows handle
/// order, which keeps pair generation deterministic.
#[derive(Debug)]
pub struct BodyStorage<T> {
    items: BTreeMap<BodyHandle, T>,
    next_id: u32,
}

impl<T> BodyStorage<T> {
    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Borrows two distinct bodies mutably at once.
    ///
    /// Returns `None` if the handles are equal or either body is missing.
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut T, &mut T)> {
        if a == b {
            return None;
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let mut range = self.items.range_mut(low..=high);
        let (&first_handle, first) = range.next()?;
        let (&last_handle, last) = range.next_back()?;
        if first_handle != low || last_handle != high {
            return None;
        }

        if a < b {
            Some((first, last))
        } else {
            Some((last, first))
        }
    }

    /// Returns true if `handle` refers to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.items.contains_key(&handle)
    }
}

impl<T> Storage<T, BodyHandle> for BodyStorage<T> {
    fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            // Handle 0 is never issued
            next_id: 1,
        }
    }

    fn add(&mut self, item: T) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.items.insert(handle, item);
        handle
    }

    fn get(&self, handle: BodyHandle) -> Option<&T> {
        self.items.get(&handle)
    }

    fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        self.items.get_mut(&handle)
    }

    fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        self.items.remove(&handle)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn handles(&self) -> Vec<BodyHandle> {
        self.items.keys().copied().collect()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (BodyHandle, &'a T)> + 'a where T: 'a {
        self.items.iter().map(|(handle, item)| (*handle, item))
    }

    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (BodyHandle, &'a mut T)> + 'a where T: 'a {
        self.items.iter_mut().map(|(handle, item)| (*handle, item))
    }
}

impl<T> Default for BodyStorage<T> {
    fn default() -> Self {
        <Self as Storage<T, BodyHandle>>::new()
    }
}
