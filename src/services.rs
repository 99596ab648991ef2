//! Collaborators the runtime talks to but never looks inside: the time
//! source, the physics overlap query, the presentation layer and the input
//! device. Handles are opaque tokens minted by those collaborators.

use glam::{Quat, Vec2, Vec3};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ViewHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColliderHandle(pub u64);

/// Names a presentation template (a prefab, in engine terms).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Placement {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Supplies the elapsed time for the tick about to run.
pub trait TimeSource {
    fn delta(&mut self) -> f32;
}

pub trait Physics {
    /// Every collider intersecting the sphere, in no particular order.
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<ColliderHandle>;
    fn add_sphere(&mut self, center: Vec3, radius: f32) -> ColliderHandle;
    fn remove(&mut self, collider: ColliderHandle);
}

pub trait Presentation {
    fn instantiate(&mut self, template: &TemplateId, placement: Placement) -> ViewHandle;
    fn place(&mut self, view: ViewHandle, placement: Placement);
    fn destroy(&mut self, view: ViewHandle);
}

/// Input state sampled once per tick by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Horizontal (x) and vertical (y) axes in [-1, 1].
    pub axes: Vec2,
    pub fire_pressed: bool,
}

pub trait Input {
    fn sample(&mut self, tick: u64) -> InputState;
}
