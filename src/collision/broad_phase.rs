use std::collections::{BTreeSet, HashSet};

use crate::bodies::Body;
use crate::collision::{BoundingBox, CollisionContact, CollisionType, DynamicTree, Pair, PairId};
use crate::core::events::{CollisionEvent, CollisionEventType};
use crate::core::storage::Storage;
use crate::core::{BodyHandle, BodyStorage, EventQueue, SimulationConfig};
use crate::math::{Line, Ray, Vector};

/// Length of the normal segments handed out for debug drawing
const DEBUG_NORMAL_LENGTH: f32 = 30.0;

/// Per-step collision counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Candidate pairs produced by the broad phase
    pub pairs: usize,

    /// Pairs the narrow phase confirmed as touching
    pub collisions: usize,

    /// Bodies that were ray-swept for tunneling
    pub fast_bodies: usize,

    /// Sweeps that hit something and snapped a body back
    pub fast_body_collisions: usize,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds another pass's counters onto these
    pub fn accumulate(&mut self, other: &FrameStats) {
        self.pairs += other.pairs;
        self.collisions += other.collisions;
        self.fast_bodies += other.fast_bodies;
        self.fast_body_collisions += other.fast_body_collisions;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Geometry collected for an external debug renderer
#[derive(Debug, Clone, Default)]
pub struct DebugDraw {
    /// Every live dynamic tree node
    pub tree_bounds: Vec<BoundingBox>,

    /// Contact points from the last narrow phase
    pub contact_points: Vec<Vector>,

    /// Contact normals from the last narrow phase, starting at the contact point
    pub collision_normals: Vec<Line>,
}

/// Trait for broad-phase collision detection algorithms
pub trait BroadPhase {
    /// Starts tracking a body
    fn track(&mut self, handle: BodyHandle, body: &Body);

    /// Stops tracking a body
    fn untrack(&mut self, handle: BodyHandle);

    /// Refits tracked bodies; returns how many changed the spatial index
    fn update(&mut self, bodies: &BodyStorage<Body>, config: &SimulationConfig) -> usize;

    /// Produces deduplicated candidate pairs, sweeping fast bodies
    fn broadphase(
        &mut self,
        bodies: &mut BodyStorage<Body>,
        delta_ms: f32,
        config: &SimulationConfig,
        stats: &mut FrameStats,
    ) -> Vec<Pair>;

    /// Keeps the pairs whose shapes actually touch
    fn narrowphase(
        &mut self,
        pairs: Vec<Pair>,
        bodies: &BodyStorage<Body>,
        config: &SimulationConfig,
        stats: &mut FrameStats,
    ) -> Vec<Pair>;

    /// Resolves every contact and returns the pairs that may still collide
    fn resolve(
        &mut self,
        pairs: Vec<Pair>,
        bodies: &mut BodyStorage<Body>,
        delta_ms: f32,
        config: &SimulationConfig,
        events: &mut EventQueue,
    ) -> Vec<Pair>;

    /// Emits start/end events by diffing against the previous call
    fn run_collision_start_end(&mut self, pairs: &[Pair], events: &mut EventQueue);
}

/// Broad phase backed by a dynamic bounding volume tree
#[derive(Debug, Default)]
pub struct DynamicTreeBroadPhase {
    tree: DynamicTree,

    /// Pairs that survived resolution last time start/end ran
    last_frame_pairs: BTreeSet<PairId>,

    /// Contacts from the last narrow phase, kept only when debugging
    debug_contacts: Vec<CollisionContact>,

    /// Bodies dropped from the tree for leaving the world bounds
    evicted: Vec<BodyHandle>,
}

impl DynamicTreeBroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying spatial index
    pub fn tree(&self) -> &DynamicTree {
        &self.tree
    }

    /// Pairs that were touching at the end of the last step
    pub fn last_frame_pairs(&self) -> impl Iterator<Item = &PairId> {
        self.last_frame_pairs.iter()
    }

    /// Contacts recorded by the last narrow phase (debug flags only)
    pub fn debug_contacts(&self) -> &[CollisionContact] {
        &self.debug_contacts
    }

    /// Takes the bodies evicted from the tree since the last call
    pub fn drain_evicted(&mut self) -> Vec<BodyHandle> {
        std::mem::take(&mut self.evicted)
    }

    /// Forgets lifecycle state involving `handle` without emitting end events
    pub fn forget(&mut self, handle: BodyHandle) {
        self.last_frame_pairs.retain(|id| !id.contains(handle));
    }

    /// Collects debug geometry according to the debug flags
    pub fn debug_draw(&self, config: &SimulationConfig) -> DebugDraw {
        let mut draw = DebugDraw::default();

        if config.broadphase_debug {
            draw.tree_bounds = self.tree.nodes().map(|node| node.bounds).collect();
        }
        if config.show_contacts {
            draw.contact_points = self.debug_contacts.iter().map(|c| c.point).collect();
        }
        if config.show_collision_normals {
            draw.collision_normals = self
                .debug_contacts
                .iter()
                .map(|c| Line::new(c.point, c.point + c.normal * DEBUG_NORMAL_LENGTH))
                .collect();
        }
        draw
    }

    /// Rejects pairs already produced this pass and pairs that can't collide
    fn should_generate_pair(
        seen: &HashSet<PairId>,
        handle_a: BodyHandle,
        handle_b: BodyHandle,
        bodies: &BodyStorage<Body>,
    ) -> bool {
        if seen.contains(&Pair::calculate_pair_hash(handle_a, handle_b)) {
            return false;
        }
        match (bodies.get(handle_a), bodies.get(handle_b)) {
            (Some(a), Some(b)) => Pair::can_collide(handle_a, a, handle_b, b),
            _ => false,
        }
    }

    /// Ray-sweeps an Active body along its velocity and snaps it onto the
    /// nearest surface it would have passed through. Returns the body hit.
    fn sweep_fast_body(
        &self,
        handle: BodyHandle,
        bodies: &mut BodyStorage<Body>,
        seconds: f32,
        config: &SimulationConfig,
        stats: &mut FrameStats,
    ) -> Option<BodyHandle> {
        let body = bodies.get(handle)?;
        if body.get_collision_type() != CollisionType::Active {
            return None;
        }

        let vel = body.get_vel();
        let update_distance = vel.length() * seconds + body.get_acc().length() * 0.5 * seconds * seconds;

        let bounds = body.bounds();
        let min_dimension = bounds.width().min(bounds.height());
        if !config.disable_minimum_speed_for_fast_body && update_distance <= min_dimension / 2.0 {
            return None;
        }

        stats.fast_bodies += 1;
        if vel.is_zero() {
            return None;
        }

        let epsilon = config.surface_epsilon;
        let update_vec = body.get_pos() - body.get_old_pos();
        let furthest_point = body.get_collider().get_shape().furthest_point(vel);
        let origin = furthest_point - update_vec;

        // Start a little behind the leading point in case it already rests on a surface
        let ray = Ray::new(origin, vel).advanced(-2.0 * epsilon);

        let mut min_body = None;
        let mut min_translate = Vector::new(f32::INFINITY, f32::INFINITY);

        self.tree.ray_cast_query(&ray, update_distance + epsilon * 2.0, |other| {
            if other == handle {
                return false;
            }
            let Some(other_body) = bodies.get(other) else {
                return false;
            };
            if !Pair::can_collide(handle, body, other, other_body) {
                return false;
            }
            let hit = other_body
                .get_collider()
                .get_shape()
                .ray_cast(&ray, update_distance + epsilon * 10.0);
            if let Some(point) = hit {
                let translate = point - origin;
                if translate.length() < min_translate.length() {
                    min_translate = translate;
                    min_body = Some(other);
                }
            }
            false
        });

        let other = min_body?;
        if !min_translate.is_valid() {
            return None;
        }

        let shift = body.get_pos() - furthest_point;
        let snapped = origin + shift + min_translate + ray.direction * (2.0 * epsilon);
        if !snapped.is_valid() {
            return None;
        }

        let body = bodies.get_mut(handle)?;
        body.set_pos(snapped);
        stats.fast_body_collisions += 1;
        Some(other)
    }
}

impl BroadPhase for DynamicTreeBroadPhase {
    fn track(&mut self, handle: BodyHandle, body: &Body) {
        self.tree.track(handle, body.bounds());
    }

    fn untrack(&mut self, handle: BodyHandle) {
        if !self.tree.untrack(handle) {
            log::warn!("tried to untrack body {:?} which is not tracked", handle);
        }
    }

    fn update(&mut self, bodies: &BodyStorage<Body>, config: &SimulationConfig) -> usize {
        let mut updated = 0;
        for (handle, body) in bodies.iter() {
            if !self.tree.contains(handle) {
                continue;
            }
            if self.tree.update(handle, body.bounds(), body.get_vel(), config) {
                updated += 1;
                if !self.tree.contains(handle) {
                    self.evicted.push(handle);
                }
            }
        }
        updated
    }

    fn broadphase(
        &mut self,
        bodies: &mut BodyStorage<Body>,
        delta_ms: f32,
        config: &SimulationConfig,
        stats: &mut FrameStats,
    ) -> Vec<Pair> {
        let seconds = delta_ms / 1000.0;

        let candidates: Vec<BodyHandle> = bodies
            .iter()
            .filter(|(handle, body)| {
                body.is_active()
                    && body.get_collision_type() != CollisionType::PreventCollision
                    && self.tree.contains(*handle)
            })
            .map(|(handle, _)| handle)
            .collect();

        let mut seen: HashSet<PairId> = HashSet::new();
        let mut pairs: Vec<Pair> = Vec::new();

        {
            let bodies: &BodyStorage<Body> = bodies;
            for &handle in &candidates {
                let Some(body) = bodies.get(handle) else {
                    continue;
                };
                let bounds = body.bounds();
                self.tree.query(Some(handle), &bounds, |other| {
                    if Self::should_generate_pair(&seen, handle, other, bodies) {
                        let pair = Pair::new(handle, other);
                        seen.insert(pair.id());
                        pairs.push(pair);
                    }
                    false
                });
            }
        }
        stats.pairs += pairs.len();

        if config.check_for_fast_bodies {
            for &handle in &candidates {
                if let Some(other) = self.sweep_fast_body(handle, bodies, seconds, config, stats) {
                    let pair = Pair::new(handle, other);
                    if seen.insert(pair.id()) {
                        pairs.push(pair);
                    }
                }
            }
        }

        log::debug!(
            "broadphase: {} candidates, {} pairs, {} fast bodies",
            candidates.len(),
            pairs.len(),
            stats.fast_bodies
        );
        pairs
    }

    fn narrowphase(
        &mut self,
        pairs: Vec<Pair>,
        bodies: &BodyStorage<Body>,
        config: &SimulationConfig,
        stats: &mut FrameStats,
    ) -> Vec<Pair> {
        let contacts: Vec<Pair> = pairs
            .into_iter()
            .filter_map(|mut pair| {
                let a = bodies.get(pair.body_a())?;
                let b = bodies.get(pair.body_b())?;
                let contact = a.get_collider().collide(b.get_collider())?;
                pair.collision = Some(CollisionContact::new(pair.body_a(), pair.body_b(), contact));
                Some(pair)
            })
            .collect();

        stats.collisions += contacts.len();

        if config.show_contacts || config.show_collision_normals {
            self.debug_contacts = contacts.iter().filter_map(|pair| pair.collision).collect();
        } else {
            self.debug_contacts.clear();
        }

        log::debug!("narrowphase: {} contacts", contacts.len());
        contacts
    }

    fn resolve(
        &mut self,
        pairs: Vec<Pair>,
        bodies: &mut BodyStorage<Body>,
        delta_ms: f32,
        config: &SimulationConfig,
        events: &mut EventQueue,
    ) -> Vec<Pair> {
        let shift = delta_ms * config.collision_shift;

        for pair in &pairs {
            let Some(contact) = pair.collision else {
                continue;
            };
            let Some((a, b)) = bodies.get_pair_mut(contact.body_a, contact.body_b) else {
                continue;
            };

            contact.resolve(config.resolution_strategy, a, b, config, events);

            a.apply_mtv();
            b.apply_mtv();

            // Small extra integration to settle residual penetration
            a.integrate(shift, config.acc);
            b.integrate(shift, config.acc);
        }

        pairs
            .into_iter()
            .filter(|pair| match (bodies.get(pair.body_a()), bodies.get(pair.body_b())) {
                (Some(a), Some(b)) => Pair::can_collide(pair.body_a(), a, pair.body_b(), b),
                _ => false,
            })
            .collect()
    }

    fn run_collision_start_end(&mut self, pairs: &[Pair], events: &mut EventQueue) {
        let current: BTreeSet<PairId> = pairs.iter().map(Pair::id).collect();

        for id in current.difference(&self.last_frame_pairs) {
            events.add_collision_event(CollisionEvent::lifecycle(CollisionEventType::CollisionStart, id.body_a, id.body_b));
            events.add_collision_event(CollisionEvent::lifecycle(CollisionEventType::CollisionStart, id.body_b, id.body_a));
        }

        for id in self.last_frame_pairs.difference(&current) {
            events.add_collision_event(CollisionEvent::lifecycle(CollisionEventType::CollisionEnd, id.body_a, id.body_b));
            events.add_collision_event(CollisionEvent::lifecycle(CollisionEventType::CollisionEnd, id.body_b, id.body_a));
        }

        self.last_frame_pairs = current;
    }
}
