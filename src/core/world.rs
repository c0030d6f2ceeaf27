use std::collections::HashSet;

use crate::bodies::Body;
use crate::collision::{BroadPhase, DebugDraw, DynamicTreeBroadPhase, FrameStats, Pair, PairId};
use crate::core::events::BodyEventType;
use crate::core::storage::Storage;
use crate::core::{BodyEvent, BodyHandle, BodyStorage, EventQueue, ResolutionStrategy, SimulationConfig};
use crate::error::PhysicsError;
use crate::Result;

/// Owns every body, the broad phase and the configuration, and runs the
/// per-step collision pipeline
#[derive(Debug)]
pub struct PhysicsWorld {
    /// All bodies in the world
    bodies: BodyStorage<Body>,

    /// Spatial index plus pair lifecycle state
    broad_phase: DynamicTreeBroadPhase,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// Events produced by the last step (and body changes since)
    events: EventQueue,

    /// Counters from the last step
    stats: FrameStats,

    /// Total simulated time in milliseconds
    time: f32,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new physics world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            broad_phase: DynamicTreeBroadPhase::new(),
            config,
            events: EventQueue::new(),
            stats: FrameStats::default(),
            time: 0.0,
        }
    }

    /// Returns the total simulated time in milliseconds
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns a mutable reference to the simulation configuration
    pub fn get_config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    pub fn set_resolution_strategy(&mut self, strategy: ResolutionStrategy) {
        self.config.resolution_strategy = strategy;
    }

    /// Adds a body to the world and starts tracking it
    pub fn add_body(&mut self, mut body: Body) -> BodyHandle {
        body.get_collider_mut().apply_default_mass(self.config.default_mass);

        let handle = self.bodies.add(body);
        if let Some(body) = self.bodies.get(handle) {
            self.broad_phase.track(handle, body);
        }

        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Added,
            body: handle,
        });

        handle
    }

    /// Removes a body from the world. No collision end events are emitted
    /// for pairs it was part of.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))?;

        if self.broad_phase.tree().contains(handle) {
            self.broad_phase.untrack(handle);
        }
        self.broad_phase.forget(handle);

        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Removed,
            body: handle,
        });

        Ok(body)
    }

    /// Marks a body as killed. It stays in the world but stops colliding,
    /// so its current contacts end on the next step.
    pub fn kill_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.bodies.get_body_mut(handle)?.kill();
        Ok(())
    }

    /// Gets a reference to a body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_body_mut(handle)
    }

    /// All bodies in handle order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Events from the last step
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Counters from the last step
    pub fn get_stats(&self) -> FrameStats {
        self.stats
    }

    pub fn broad_phase(&self) -> &DynamicTreeBroadPhase {
        &self.broad_phase
    }

    /// Debug geometry according to the configured debug flags
    pub fn debug_draw(&self) -> DebugDraw {
        self.broad_phase.debug_draw(&self.config)
    }

    /// Advances the simulation by `delta_ms` milliseconds and returns the
    /// events it produced
    pub fn step(&mut self, delta_ms: f32) -> &EventQueue {
        self.events.clear();
        self.stats.reset();

        if !self.config.enabled {
            return &self.events;
        }

        for (_, body) in self.bodies.iter_mut() {
            if !body.is_active() {
                continue;
            }
            body.capture_old_transform();
            body.integrate(delta_ms, self.config.acc);
        }

        let passes = self.config.collision_passes.max(1);
        let pass_delta = delta_ms / passes as f32;

        let mut survivors: Vec<Pair> = Vec::new();
        let mut seen: HashSet<PairId> = HashSet::new();

        for _ in 0..passes {
            let updated = self.broad_phase.update(&self.bodies, &self.config);
            for handle in self.broad_phase.drain_evicted() {
                self.events.add_body_event(BodyEvent {
                    event_type: BodyEventType::Untracked,
                    body: handle,
                });
            }

            let mut pass_stats = FrameStats::default();
            let pairs = self
                .broad_phase
                .broadphase(&mut self.bodies, pass_delta, &self.config, &mut pass_stats);
            let pairs = self
                .broad_phase
                .narrowphase(pairs, &self.bodies, &self.config, &mut pass_stats);
            let pairs = self
                .broad_phase
                .resolve(pairs, &mut self.bodies, pass_delta, &self.config, &mut self.events);

            log::debug!(
                "collision pass: {} tree updates, {} pairs, {} contacts, {} survivors",
                updated,
                pass_stats.pairs,
                pass_stats.collisions,
                pairs.len()
            );

            self.stats.accumulate(&pass_stats);
            for pair in pairs {
                if seen.insert(pair.id()) {
                    survivors.push(pair);
                }
            }
        }

        self.broad_phase.run_collision_start_end(&survivors, &mut self.events);
        self.time += delta_ms;

        &self.events
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
