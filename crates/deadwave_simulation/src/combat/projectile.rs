//! Projectile flight + impact detection
//!
//! Lifecycle: спавн при выстреле → прямолинейный полёт (velocity
//! интеграция) → первый overlap с Hurtbox ИЛИ истечение lifetime →
//! despawn. Максимум ОДНА доставка урона на projectile: событие
//! ProjectileHit пишется в том же тике, в котором entity деспавнится.

use bevy::prelude::*;

use crate::combat::weapon::Weapon;
use crate::components::{Health, Hurtbox};
use crate::logger::log;

/// Максимальное время жизни пули (секунды) — bound на ресурсы,
/// если попадания так и не случилось
pub const PROJECTILE_LIFETIME: f32 = 5.0;

/// Радиус пули для overlap-проверки (метры)
pub const PROJECTILE_RADIUS: f32 = 0.05;

/// Пуля в полёте
///
/// Держит non-owning ссылку на оружие: урон читается из Weapon
/// В МОМЕНТ попадания (damage attribution), а не фиксируется при спавне.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    /// Оружие, из которого выпущена
    pub weapon: Entity,
    /// Кто держал оружие при выстреле (исключается из целей)
    pub wielder: Option<Entity>,
    /// Оставшееся время жизни (секунды)
    pub lifetime: f32,
}

/// Event: пуля попала в цель
#[derive(Event, Debug, Clone)]
pub struct ProjectileHit {
    /// Оружие-источник (для damage attribution)
    pub weapon: Entity,
    /// Кто стрелял (для kill credit / score)
    pub shooter: Option<Entity>,
    /// В кого попали
    pub target: Entity,
}

/// System: тик lifetime, despawn по таймауту
pub fn tick_projectile_lifetimes(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile) in projectiles.iter_mut() {
        projectile.lifetime -= delta;

        if projectile.lifetime <= 0.0 {
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.despawn();
            }
            log(&format!("Projectile {:?} expired without contact", entity));
        }
    }
}

/// System: impact detection (sphere overlap против Hurtbox)
///
/// Первый контакт: среди перекрытых целей берём ближайшую, пишем ровно
/// один ProjectileHit и деспавним пулю. Мёртвые цели (Health 0) пулю
/// по-прежнему останавливают, но урон по ним заморожен в damage-слое.
pub fn detect_projectile_impacts(
    mut commands: Commands,
    projectiles: Query<(Entity, &Transform, &Projectile)>,
    targets: Query<(Entity, &Transform, &Hurtbox), With<Health>>,
    weapons: Query<(), With<Weapon>>,
    mut hits: EventWriter<ProjectileHit>,
) {
    for (projectile_entity, projectile_transform, projectile) in projectiles.iter() {
        let mut closest: Option<(Entity, f32)> = None;

        for (target, target_transform, hurtbox) in targets.iter() {
            // Свой стрелок и само оружие — не цели
            if Some(target) == projectile.wielder || target == projectile.weapon {
                continue;
            }

            let distance = projectile_transform
                .translation
                .distance(target_transform.translation);

            if distance <= hurtbox.radius + PROJECTILE_RADIUS {
                match closest {
                    Some((_, best)) if best <= distance => {}
                    _ => closest = Some((target, distance)),
                }
            }
        }

        let Some((target, _)) = closest else {
            continue;
        };

        // Оружие могло исчезнуть, пока пуля летела — тогда попадание
        // без attribution не доставляется
        if weapons.get(projectile.weapon).is_err() {
            if let Ok(mut entity_commands) = commands.get_entity(projectile_entity) {
                entity_commands.despawn();
            }
            continue;
        }

        hits.write(ProjectileHit {
            weapon: projectile.weapon,
            shooter: projectile.wielder,
            target,
        });

        if let Ok(mut entity_commands) = commands.get_entity(projectile_entity) {
            entity_commands.despawn();
        }

        log(&format!(
            "Projectile {:?} hit {:?} (weapon {:?})",
            projectile_entity, target, projectile.weapon
        ));
    }
}
