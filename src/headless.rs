//! In-process stand-ins for the external collaborators, used by the CLI
//! runner and by tests. None of them render, poll a device or run a physics
//! engine; they only record what the simulation asked for.

use std::collections::{HashMap, VecDeque};

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ecs::SystemContext;
use crate::services::{
    ColliderHandle, Input, InputState, Physics, Placement, Presentation, TemplateId, TimeSource,
    ViewHandle,
};

/// Reports the same elapsed time every tick.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeStep(pub f32);

impl TimeSource for FixedTimeStep {
    fn delta(&mut self) -> f32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct LiveView {
    pub template: TemplateId,
    pub placement: Placement,
}

#[derive(Debug, Default)]
pub struct RecordingPresentation {
    next_view: u64,
    live: HashMap<ViewHandle, LiveView>,
    instantiated: u64,
    destroyed: Vec<ViewHandle>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self, view: ViewHandle) -> bool {
        self.live.contains_key(&view)
    }

    pub fn view(&self, view: ViewHandle) -> Option<&LiveView> {
        self.live.get(&view)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn instantiated(&self) -> u64 {
        self.instantiated
    }

    /// Every destroy request received, in order, including repeats.
    pub fn destroyed(&self) -> &[ViewHandle] {
        &self.destroyed
    }

    pub fn destroy_count(&self, view: ViewHandle) -> usize {
        self.destroyed.iter().filter(|v| **v == view).count()
    }
}

impl Presentation for RecordingPresentation {
    fn instantiate(&mut self, template: &TemplateId, placement: Placement) -> ViewHandle {
        let view = ViewHandle(self.next_view);
        self.next_view += 1;
        self.instantiated += 1;
        self.live.insert(
            view,
            LiveView {
                template: template.clone(),
                placement,
            },
        );
        view
    }

    fn place(&mut self, view: ViewHandle, placement: Placement) {
        if let Some(live) = self.live.get_mut(&view) {
            live.placement = placement;
        }
    }

    fn destroy(&mut self, view: ViewHandle) {
        if self.live.remove(&view).is_none() {
            log::warn!("destroy requested for unknown view {view:?}");
        }
        self.destroyed.push(view);
    }
}

/// Colliders are spheres; two spheres overlap when their centers are no
/// further apart than the sum of their radii.
#[derive(Debug, Default)]
pub struct SphereOverlapPhysics {
    next_collider: u64,
    spheres: Vec<(ColliderHandle, Vec3, f32)>,
}

impl SphereOverlapPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl Physics for SphereOverlapPhysics {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<ColliderHandle> {
        self.spheres
            .iter()
            .filter(|(_, other, other_radius)| center.distance(*other) <= radius + other_radius)
            .map(|(handle, _, _)| *handle)
            .collect()
    }

    fn add_sphere(&mut self, center: Vec3, radius: f32) -> ColliderHandle {
        let handle = ColliderHandle(self.next_collider);
        self.next_collider += 1;
        self.spheres.push((handle, center, radius));
        handle
    }

    fn remove(&mut self, collider: ColliderHandle) {
        self.spheres.retain(|(handle, _, _)| *handle != collider);
    }
}

/// Replays a fixed sequence of input frames, then reports `idle`.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputState>,
    idle: InputState,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputState>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            idle: InputState::default(),
        }
    }

    pub fn with_idle(mut self, idle: InputState) -> Self {
        self.idle = idle;
        self
    }
}

impl Input for ScriptedInput {
    fn sample(&mut self, _tick: u64) -> InputState {
        self.frames.pop_front().unwrap_or(self.idle)
    }
}

/// A seeded random walk on the stick plus random fire presses.
pub struct RandomInput {
    rng: ChaCha8Rng,
    fire_probability: f64,
    jitter: f32,
    axes: Vec2,
}

impl RandomInput {
    /// Non-finite parameters are treated as zero; the probability is clamped
    /// to [0, 1].
    pub fn new(seed: u64, fire_probability: f64, jitter: f32) -> Self {
        let fire_probability = if fire_probability.is_finite() {
            fire_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let jitter = if jitter.is_finite() { jitter.abs() } else { 0.0 };
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            fire_probability,
            jitter,
            axes: Vec2::ZERO,
        }
    }
}

impl Input for RandomInput {
    fn sample(&mut self, _tick: u64) -> InputState {
        let fire_pressed = self.rng.gen_bool(self.fire_probability);
        if self.jitter > 0.0 {
            let nudge = Vec2::new(
                self.rng.gen_range(-self.jitter..=self.jitter),
                self.rng.gen_range(-self.jitter..=self.jitter),
            );
            self.axes = (self.axes + nudge).clamp(Vec2::NEG_ONE, Vec2::ONE);
        }
        InputState {
            axes: self.axes,
            fire_pressed,
        }
    }
}

/// Owns one of each recording collaborator and lends them out as a
/// [`SystemContext`].
#[derive(Debug, Default)]
pub struct Harness {
    pub presentation: RecordingPresentation,
    pub physics: SphereOverlapPhysics,
    pub input: InputState,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&mut self, tick: u64, dt: f32) -> SystemContext<'_> {
        SystemContext {
            tick,
            dt,
            input: self.input,
            physics: &mut self.physics,
            presentation: &mut self.presentation,
        }
    }
}
