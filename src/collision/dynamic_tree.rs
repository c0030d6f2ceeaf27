use std::collections::HashMap;

use crate::collision::BoundingBox;
use crate::core::{BodyHandle, SimulationConfig};
use crate::math::{Ray, Vector};

/// Margin added around a leaf when a body is first tracked
const TRACK_MARGIN: f32 = 2.0;

/// Velocity is scaled by this many milliseconds worth of motion when a leaf is stretched
const VELOCITY_LOOKAHEAD_MS: f32 = 32.0;

/// Index of a node in the tree's arena
pub type NodeId = usize;

/// A node in the dynamic tree. Leaves carry a body, internal nodes always
/// have two children.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Fattened bounds of the subtree
    pub bounds: BoundingBox,

    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,

    /// Leaves are 0, freed nodes are -1
    height: i32,

    body: Option<BodyHandle>,
}

impl TreeNode {
    fn new(bounds: BoundingBox, parent: Option<NodeId>) -> Self {
        Self {
            bounds,
            parent,
            left: None,
            right: None,
            height: 0,
            body: None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

/// Dynamic bounding volume tree over body bounds.
///
/// Leaves hold fattened boxes so small motions don't cause re-insertion.
/// Insertion descends by a perimeter cost heuristic and the tree is kept
/// balanced with AVL-style rotations on the walk back up.
#[derive(Debug, Default)]
pub struct DynamicTree {
    nodes: Vec<TreeNode>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    leaves: HashMap<BodyHandle, NodeId>,
}

impl DynamicTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked bodies
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.leaves.contains_key(&body)
    }

    /// Fattened bounds stored for a tracked body
    pub fn leaf_bounds(&self, body: BodyHandle) -> Option<BoundingBox> {
        self.leaves.get(&body).map(|&id| self.nodes[id].bounds)
    }

    /// Height of the tree, 0 when empty or a single leaf
    pub fn height(&self) -> i32 {
        self.root.map_or(0, |root| self.nodes[root].height)
    }

    /// Live nodes, for debug drawing
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|node| node.height >= 0)
    }

    fn allocate(&mut self, node: TreeNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.parent = None;
        node.left = None;
        node.right = None;
        node.body = None;
        node.height = -1;
        self.free.push(id);
    }

    /// Starts tracking `body` with the given world bounds
    pub fn track(&mut self, body: BodyHandle, bounds: BoundingBox) {
        if self.leaves.contains_key(&body) {
            log::warn!("body {:?} is already tracked by the dynamic tree", body);
            return;
        }

        let mut node = TreeNode::new(bounds.expand(TRACK_MARGIN), None);
        node.body = Some(body);
        let id = self.allocate(node);
        self.leaves.insert(body, id);
        self.insert(id);
    }

    /// Stops tracking `body`. Returns false if it wasn't tracked.
    pub fn untrack(&mut self, body: BodyHandle) -> bool {
        match self.leaves.remove(&body) {
            Some(id) => {
                self.remove(id);
                self.release(id);
                true
            }
            None => false,
        }
    }

    /// Refits the leaf of `body` to `bounds`.
    ///
    /// Nothing happens while the bounds stay inside the fattened leaf.
    /// Otherwise the leaf is re-inserted, padded and stretched along
    /// `vel`. Bodies outside the world bounds are untracked. Returns true
    /// when the tree changed.
    pub fn update(&mut self, body: BodyHandle, bounds: BoundingBox, vel: Vector, config: &SimulationConfig) -> bool {
        let Some(&id) = self.leaves.get(&body) else {
            return false;
        };

        if !config.world_bounds.contains_box(&bounds) {
            log::warn!("body {:?} left the world bounds and is no longer tracked", body);
            self.untrack(body);
            return true;
        }

        if self.nodes[id].bounds.contains_box(&bounds) {
            return false;
        }

        self.remove(id);

        let mut fat = bounds.expand(config.bounds_padding);
        let stretch = vel * (VELOCITY_LOOKAHEAD_MS / 1000.0) * config.dynamic_tree_velocity_multiplier;
        if stretch.x < 0.0 {
            fat.left += stretch.x;
        } else {
            fat.right += stretch.x;
        }
        if stretch.y < 0.0 {
            fat.top += stretch.y;
        } else {
            fat.bottom += stretch.y;
        }

        self.nodes[id].bounds = fat;
        self.insert(id);
        true
    }

    fn insert(&mut self, leaf: NodeId) {
        let Some(root) = self.root else {
            self.root = Some(leaf);
            self.nodes[leaf].parent = None;
            return;
        };

        let leaf_bounds = self.nodes[leaf].bounds;

        // Descend to the cheapest sibling
        let mut current = root;
        while let (Some(left), Some(right)) = (self.nodes[current].left, self.nodes[current].right) {
            let area = self.nodes[current].bounds.perimeter();
            let combined_area = self.nodes[current].bounds.combine(&leaf_bounds).perimeter();

            let cost = 2.0 * combined_area;
            let inheritance_cost = 2.0 * (combined_area - area);

            let left_cost = self.descend_cost(left, &leaf_bounds) + inheritance_cost;
            let right_cost = self.descend_cost(right, &leaf_bounds) + inheritance_cost;

            if cost < left_cost && cost < right_cost {
                break;
            }
            current = if left_cost < right_cost { left } else { right };
        }

        let sibling = current;
        let old_parent = self.nodes[sibling].parent;

        let mut parent_node = TreeNode::new(leaf_bounds.combine(&self.nodes[sibling].bounds), old_parent);
        parent_node.height = self.nodes[sibling].height + 1;
        parent_node.left = Some(sibling);
        parent_node.right = Some(leaf);
        let new_parent = self.allocate(parent_node);

        match old_parent {
            Some(old) => {
                if self.nodes[old].left == Some(sibling) {
                    self.nodes[old].left = Some(new_parent);
                } else {
                    self.nodes[old].right = Some(new_parent);
                }
            }
            None => self.root = Some(new_parent),
        }
        self.nodes[sibling].parent = Some(new_parent);
        self.nodes[leaf].parent = Some(new_parent);

        self.refit_from(self.nodes[leaf].parent);
    }

    fn descend_cost(&self, child: NodeId, leaf_bounds: &BoundingBox) -> f32 {
        let node = &self.nodes[child];
        let combined = leaf_bounds.combine(&node.bounds).perimeter();
        if node.is_leaf() {
            combined
        } else {
            combined - node.bounds.perimeter()
        }
    }

    fn remove(&mut self, leaf: NodeId) {
        if self.root == Some(leaf) {
            self.root = None;
            return;
        }

        let Some(parent) = self.nodes[leaf].parent else {
            return;
        };
        let grand_parent = self.nodes[parent].parent;
        let sibling = if self.nodes[parent].left == Some(leaf) {
            self.nodes[parent].right
        } else {
            self.nodes[parent].left
        };
        let Some(sibling) = sibling else {
            return;
        };

        match grand_parent {
            Some(grand) => {
                if self.nodes[grand].left == Some(parent) {
                    self.nodes[grand].left = Some(sibling);
                } else {
                    self.nodes[grand].right = Some(sibling);
                }
                self.nodes[sibling].parent = Some(grand);
                self.release(parent);
                self.refit_from(Some(grand));
            }
            None => {
                self.root = Some(sibling);
                self.nodes[sibling].parent = None;
                self.release(parent);
            }
        }
        self.nodes[leaf].parent = None;
    }

    /// Balances and recomputes bounds and heights from `start` up to the root
    fn refit_from(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let id = self.balance(id);
            if let (Some(left), Some(right)) = (self.nodes[id].left, self.nodes[id].right) {
                self.nodes[id].height = 1 + self.nodes[left].height.max(self.nodes[right].height);
                self.nodes[id].bounds = self.nodes[left].bounds.combine(&self.nodes[right].bounds);
            }
            current = self.nodes[id].parent;
        }
    }

    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            Some(p) => {
                if self.nodes[p].left == Some(old) {
                    self.nodes[p].left = Some(new);
                } else {
                    self.nodes[p].right = Some(new);
                }
            }
            None => self.root = Some(new),
        }
    }

    /// Rotates `a` if its children's heights differ by more than one.
    /// Returns the node now sitting where `a` was.
    fn balance(&mut self, a: NodeId) -> NodeId {
        if self.nodes[a].is_leaf() || self.nodes[a].height < 2 {
            return a;
        }
        let (Some(b), Some(c)) = (self.nodes[a].left, self.nodes[a].right) else {
            return a;
        };

        let balance = self.nodes[c].height - self.nodes[b].height;

        if balance > 1 {
            // Rotate c up
            let (Some(f), Some(g)) = (self.nodes[c].left, self.nodes[c].right) else {
                return a;
            };
            log::trace!("dynamic tree: rotating node {} above {}", c, a);

            let a_parent = self.nodes[a].parent;
            self.nodes[c].left = Some(a);
            self.nodes[c].parent = a_parent;
            self.nodes[a].parent = Some(c);
            self.replace_child(a_parent, a, c);

            let (keep, moved) = if self.nodes[f].height > self.nodes[g].height { (f, g) } else { (g, f) };
            self.nodes[c].right = Some(keep);
            self.nodes[a].right = Some(moved);
            self.nodes[moved].parent = Some(a);

            self.nodes[a].bounds = self.nodes[b].bounds.combine(&self.nodes[moved].bounds);
            self.nodes[c].bounds = self.nodes[a].bounds.combine(&self.nodes[keep].bounds);
            self.nodes[a].height = 1 + self.nodes[b].height.max(self.nodes[moved].height);
            self.nodes[c].height = 1 + self.nodes[a].height.max(self.nodes[keep].height);
            return c;
        }

        if balance < -1 {
            // Rotate b up
            let (Some(d), Some(e)) = (self.nodes[b].left, self.nodes[b].right) else {
                return a;
            };
            log::trace!("dynamic tree: rotating node {} above {}", b, a);

            let a_parent = self.nodes[a].parent;
            self.nodes[b].left = Some(a);
            self.nodes[b].parent = a_parent;
            self.nodes[a].parent = Some(b);
            self.replace_child(a_parent, a, b);

            let (keep, moved) = if self.nodes[d].height > self.nodes[e].height { (d, e) } else { (e, d) };
            self.nodes[b].right = Some(keep);
            self.nodes[a].left = Some(moved);
            self.nodes[moved].parent = Some(a);

            self.nodes[a].bounds = self.nodes[c].bounds.combine(&self.nodes[moved].bounds);
            self.nodes[b].bounds = self.nodes[a].bounds.combine(&self.nodes[keep].bounds);
            self.nodes[a].height = 1 + self.nodes[c].height.max(self.nodes[moved].height);
            self.nodes[b].height = 1 + self.nodes[a].height.max(self.nodes[keep].height);
            return b;
        }

        a
    }

    /// Visits every tracked body other than `exclude` whose fattened leaf
    /// overlaps `bounds`. A visitor returning true stops the query.
    pub fn query<F>(&self, exclude: Option<BodyHandle>, bounds: &BoundingBox, mut visitor: F)
    where
        F: FnMut(BodyHandle) -> bool,
    {
        self.traverse(|node| node.bounds.overlaps(bounds), |body| {
            if Some(body) == exclude {
                false
            } else {
                visitor(body)
            }
        });
    }

    /// Visits every tracked body whose fattened leaf the ray enters within
    /// `max`. A visitor returning true stops the query.
    pub fn ray_cast_query<F>(&self, ray: &Ray, max: f32, visitor: F)
    where
        F: FnMut(BodyHandle) -> bool,
    {
        self.traverse(|node| node.bounds.ray_cast(ray, max), visitor);
    }

    fn traverse<P, F>(&self, mut hits: P, mut visitor: F)
    where
        P: FnMut(&TreeNode) -> bool,
        F: FnMut(BodyHandle) -> bool,
    {
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !hits(node) {
                continue;
            }
            match (node.left, node.right) {
                (Some(left), Some(right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                _ => {
                    if let Some(body) = node.body {
                        if visitor(body) {
                            return;
                        }
                    }
                }
            }
        }
    }
}
