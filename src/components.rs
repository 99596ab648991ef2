use glam::{Quat, Vec3};

use crate::ecs::Component;
use crate::services::{ColliderHandle, Placement, TemplateId, ViewHandle};

#[derive(Debug, Clone, Copy, Default)]
pub struct TagPlayer;

#[derive(Debug, Clone, Copy, Default)]
pub struct TagBullet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BulletOwner {
    #[default]
    Hero,
    Enemy,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TagBulletOwner {
    pub owner: BulletOwner,
}

/// Simulated placement, optionally mirrored onto a view.
#[derive(Debug, Clone, Copy)]
pub struct Translation {
    pub position: Vec3,
    pub rotation: Quat,
    pub view: Option<ViewHandle>,
}

impl Default for Translation {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            view: None,
        }
    }
}

impl Translation {
    pub fn placement(&self) -> Placement {
        Placement {
            position: self.position,
            rotation: self.rotation,
        }
    }

    /// Local +Z rotated into world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveComponent {
    pub direction: Vec3,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LifeTimeComponent {
    pub remaining: f32,
    pub view: Option<ViewHandle>,
}

/// Shape of the bullets a spawner fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletParams {
    pub speed: f32,
    pub lifetime: f32,
    pub radius: f32,
}

impl Default for BulletParams {
    fn default() -> Self {
        Self {
            speed: 15.0,
            lifetime: 3.0,
            radius: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BulletSpawnComponent {
    pub template: TemplateId,
    pub owner: BulletOwner,
    pub bullet: BulletParams,
    /// Spawn requests not yet honored.
    pub to_spawn: u32,
}

/// Cooldown between two honored spawn requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulletSpawnRateComponent {
    pub spawn_rate: f32,
    pub current_delay: f32,
}

#[derive(Debug, Clone, Default)]
pub struct CollideComponent {
    pub radius: f32,
    /// Colliders overlapping this entity as of the last collision query.
    pub collisions: Vec<ColliderHandle>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollideableComponent {
    pub collider: Option<ColliderHandle>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KillableComponent {
    pub view: Option<ViewHandle>,
}

impl Component for TagPlayer {}
impl Component for TagBullet {}
impl Component for TagBulletOwner {}
impl Component for Translation {}
impl Component for MoveComponent {}
impl Component for LifeTimeComponent {}
impl Component for BulletSpawnComponent {}
impl Component for BulletSpawnRateComponent {}
impl Component for CollideComponent {}
impl Component for CollideableComponent {}
impl Component for KillableComponent {}
