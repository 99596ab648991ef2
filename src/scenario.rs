use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec3;
use serde::Deserialize;

use crate::{
    components::BulletParams,
    ecs::{EntityId, Registry, RegistryError},
    headless::RandomInput,
    prefabs::{self, PlayerPrefab},
    services::{Physics, Placement, Presentation, TemplateId},
};

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_ticks() -> u64 {
    600
}

fn default_player_speed() -> f32 {
    5.0
}

fn default_player_template() -> String {
    "player".into()
}

fn default_bullet_template() -> String {
    "bullet".into()
}

fn default_bullet_speed() -> f32 {
    15.0
}

fn default_bullet_lifetime() -> f32 {
    3.0
}

fn default_bullet_radius() -> f32 {
    1.0
}

fn default_enemy_template() -> String {
    "enemy".into()
}

fn default_enemy_radius() -> f32 {
    0.5
}

fn default_fire_probability() -> f64 {
    0.05
}

fn default_jitter() -> f32 {
    0.1
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    if !(value.is_finite() && value >= 0.0) {
        bail!("{field} must be a finite, non-negative number, got {value}");
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    /// Seconds per tick.
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub enemies: Vec<EnemyConfig>,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    #[serde(default)]
    pub fire_cooldown: f32,
    #[serde(default = "default_player_template")]
    pub template: String,
    #[serde(default)]
    pub bullet: BulletConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            speed: default_player_speed(),
            fire_cooldown: 0.0,
            template: default_player_template(),
            bullet: BulletConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulletConfig {
    #[serde(default = "default_bullet_template")]
    pub template: String,
    #[serde(default = "default_bullet_speed")]
    pub speed: f32,
    #[serde(default = "default_bullet_lifetime")]
    pub lifetime: f32,
    #[serde(default = "default_bullet_radius")]
    pub radius: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            template: default_bullet_template(),
            speed: default_bullet_speed(),
            lifetime: default_bullet_lifetime(),
            radius: default_bullet_radius(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemyConfig {
    pub position: [f32; 3],
    #[serde(default = "default_enemy_radius")]
    pub radius: f32,
    #[serde(default = "default_enemy_template")]
    pub template: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_fire_probability")]
    pub fire_probability: f64,
    #[serde(default = "default_jitter")]
    pub jitter: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            fire_probability: default_fire_probability(),
            jitter: default_jitter(),
        }
    }
}

/// Entities created by [`Scenario::populate`].
#[derive(Debug, Clone)]
pub struct Roster {
    pub player: EntityId,
    pub enemies: Vec<EntityId>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Scenario::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            bail!("dt must be a positive number of seconds, got {}", self.dt);
        }
        if !(0.0..=1.0).contains(&self.input.fire_probability) {
            bail!(
                "input.fire_probability must lie in [0, 1], got {}",
                self.input.fire_probability
            );
        }
        non_negative("input.jitter", self.input.jitter)?;
        non_negative("player.speed", self.player.speed)?;
        non_negative("player.fire_cooldown", self.player.fire_cooldown)?;
        if let Some(axis) = self.player.position.iter().find(|v| !v.is_finite()) {
            bail!("player.position must be finite, got {axis}");
        }
        let bullet = &self.player.bullet;
        non_negative("player.bullet.speed", bullet.speed)?;
        non_negative("player.bullet.lifetime", bullet.lifetime)?;
        non_negative("player.bullet.radius", bullet.radius)?;
        for (index, enemy) in self.enemies.iter().enumerate() {
            non_negative(&format!("enemies[{index}].radius"), enemy.radius)?;
            if enemy.position.iter().any(|v| !v.is_finite()) {
                bail!("enemies[{index}].position must be finite");
            }
        }
        Ok(())
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or_else(default_ticks)
    }

    pub fn player_prefab(&self) -> PlayerPrefab {
        let bullet = &self.player.bullet;
        PlayerPrefab {
            speed: self.player.speed,
            bullet_template: TemplateId::new(bullet.template.clone()),
            bullet: BulletParams {
                speed: bullet.speed,
                lifetime: bullet.lifetime,
                radius: bullet.radius,
            },
            fire_cooldown: self.player.fire_cooldown,
        }
    }

    pub fn random_input(&self, seed: u64) -> RandomInput {
        RandomInput::new(seed, self.input.fire_probability, self.input.jitter)
    }

    /// Adds the player and every enemy to `registry`, minting their views
    /// and colliders on the way.
    pub fn populate(
        &self,
        registry: &mut Registry,
        presentation: &mut dyn Presentation,
        physics: &mut dyn Physics,
    ) -> Result<Roster, RegistryError> {
        let placement = Placement::at(Vec3::from_array(self.player.position));
        let view = presentation.instantiate(&TemplateId::new(self.player.template.clone()), placement);
        let player = registry.spawn(prefabs::player(view, placement, &self.player_prefab()))?;

        let mut enemies = Vec::with_capacity(self.enemies.len());
        for enemy in &self.enemies {
            let placement = Placement::at(Vec3::from_array(enemy.position));
            let view = presentation.instantiate(&TemplateId::new(enemy.template.clone()), placement);
            let collider = physics.add_sphere(placement.position, enemy.radius);
            enemies.push(registry.spawn(prefabs::enemy(view, placement, collider))?);
        }
        log::debug!(
            "scenario '{}' populated: player {player}, {} enemies",
            self.name,
            enemies.len()
        );
        Ok(Roster { player, enemies })
    }
}
