//! Initial component sets for the entity kinds of the game.

use crate::components::{
    BulletOwner, BulletParams, BulletSpawnComponent, BulletSpawnRateComponent, CollideComponent,
    CollideableComponent, KillableComponent, LifeTimeComponent, MoveComponent, TagBullet,
    TagBulletOwner, TagPlayer, Translation,
};
use crate::ecs::Components;
use crate::services::{ColliderHandle, Placement, TemplateId, ViewHandle};

#[derive(Debug, Clone)]
pub struct PlayerPrefab {
    pub speed: f32,
    pub bullet_template: TemplateId,
    pub bullet: BulletParams,
    /// Seconds between two shots; zero fires on every request.
    pub fire_cooldown: f32,
}

impl Default for PlayerPrefab {
    fn default() -> Self {
        Self {
            speed: 5.0,
            bullet_template: TemplateId::new("bullet"),
            bullet: BulletParams::default(),
            fire_cooldown: 0.0,
        }
    }
}

pub fn player(view: ViewHandle, placement: Placement, prefab: &PlayerPrefab) -> Components {
    let mut components = Components::new()
        .with(TagPlayer)
        .with(Translation {
            position: placement.position,
            rotation: placement.rotation,
            view: Some(view),
        })
        .with(MoveComponent {
            speed: prefab.speed,
            ..Default::default()
        })
        .with(BulletSpawnComponent {
            template: prefab.bullet_template.clone(),
            owner: BulletOwner::Hero,
            bullet: prefab.bullet,
            to_spawn: 0,
        })
        .with(TagBulletOwner {
            owner: BulletOwner::Hero,
        });
    if prefab.fire_cooldown > 0.0 {
        components.define::<BulletSpawnRateComponent>().spawn_rate = prefab.fire_cooldown;
    }
    components
}

pub fn enemy(view: ViewHandle, placement: Placement, collider: ColliderHandle) -> Components {
    Components::new()
        .with(Translation {
            position: placement.position,
            rotation: placement.rotation,
            view: Some(view),
        })
        .with(CollideableComponent {
            collider: Some(collider),
        })
        .with(KillableComponent { view: Some(view) })
}

pub fn bullet(
    view: ViewHandle,
    placement: Placement,
    owner: BulletOwner,
    params: BulletParams,
) -> Components {
    let translation = Translation {
        position: placement.position,
        rotation: placement.rotation,
        view: Some(view),
    };
    Components::new()
        .with(TagBullet)
        .with(MoveComponent {
            direction: translation.forward(),
            speed: params.speed,
        })
        .with(translation)
        .with(LifeTimeComponent {
            remaining: params.lifetime,
            view: Some(view),
        })
        .with(KillableComponent { view: Some(view) })
        .with(TagBulletOwner { owner })
        .with(CollideComponent {
            radius: params.radius,
            collisions: Vec::new(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn bullet_flies_along_spawner_forward() {
        let placement = Placement {
            position: Vec3::ONE,
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        };
        let bullet = bullet(ViewHandle(3), placement, BulletOwner::Hero, BulletParams::default());

        let movement = bullet.get::<MoveComponent>().unwrap();
        assert!(movement.direction.abs_diff_eq(Vec3::X, 1e-5));
        assert_eq!(movement.speed, 15.0);
        assert_eq!(bullet.get::<LifeTimeComponent>().unwrap().remaining, 3.0);
        assert_eq!(bullet.get::<KillableComponent>().unwrap().view, Some(ViewHandle(3)));
        assert!(bullet.has::<TagBullet>());
    }

    #[test]
    fn player_cooldown_is_optional() {
        let plain = player(ViewHandle(0), Placement::at(Vec3::ZERO), &PlayerPrefab::default());
        assert!(!plain.has::<BulletSpawnRateComponent>());

        let throttled = player(
            ViewHandle(0),
            Placement::at(Vec3::ZERO),
            &PlayerPrefab {
                fire_cooldown: 0.25,
                ..Default::default()
            },
        );
        let rate = throttled.get::<BulletSpawnRateComponent>().unwrap();
        assert_eq!(rate.spawn_rate, 0.25);
        assert_eq!(rate.current_delay, 0.0);
    }
}
