//! Damage pipeline — единственное место, где мутируется Health
//!
//! Источники (projectile hit, zombie strike, environmental hazard) пишут
//! события; apply_damage применяет их в фиксированном порядке внутри тика.
//! Смерть — ровно один переход: тик, уронивший current до 0, пишет один
//! EntityDied и вешает маркер Dead; после этого hit points заморожены.

use bevy::prelude::*;

use crate::ai::MeleeStrike;
use crate::combat::projectile::ProjectileHit;
use crate::combat::weapon::Weapon;
use crate::components::Health;
use crate::logger::{log_info, log_warning};
use crate::session::hazard::HazardPulse;

/// Откуда пришёл урон
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Projectile,
    Melee,
    Hazard,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для HUD, звуков, эффектов.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: u32,
    pub source: DamageSource,
    pub target_died: bool,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health == 0)
///
/// Деспавн не автоматический — трупы убирает DespawnAfter.
#[derive(Component, Debug)]
pub struct Dead;

/// Компонент-маркер: деспавн entity через указанное время
#[derive(Component, Debug)]
pub struct DespawnAfter {
    /// Оставшееся время (секунды)
    pub remaining: f32,
}

/// System: применение урона из всех источников
///
/// Порядок внутри тика фиксирован: projectile → melee → hazard.
/// Урон пули читается из Weapon в момент применения (attribution).
pub fn apply_damage(
    mut commands: Commands,
    mut projectile_hits: EventReader<ProjectileHit>,
    mut melee_strikes: EventReader<MeleeStrike>,
    mut hazard_pulses: EventReader<HazardPulse>,
    weapons: Query<&Weapon>,
    mut targets: Query<&mut Health>,
    mut dealt: EventWriter<DamageDealt>,
    mut died: EventWriter<EntityDied>,
) {
    let mut pending: Vec<(Entity, u32, DamageSource, Option<Entity>)> = Vec::new();

    for hit in projectile_hits.read() {
        let Ok(weapon) = weapons.get(hit.weapon) else {
            log_warning(&format!("ProjectileHit from missing weapon {:?}", hit.weapon));
            continue;
        };
        pending.push((hit.target, weapon.damage, DamageSource::Projectile, hit.shooter));
    }

    for strike in melee_strikes.read() {
        pending.push((
            strike.target,
            strike.damage,
            DamageSource::Melee,
            Some(strike.attacker),
        ));
    }

    for pulse in hazard_pulses.read() {
        pending.push((pulse.target, pulse.amount, DamageSource::Hazard, None));
    }

    for (target, amount, source, attacker) in pending {
        let Ok(mut health) = targets.get_mut(target) else {
            log_warning(&format!("Damage for entity {:?} without Health", target));
            continue;
        };

        // Мёртвые заморожены: ни мутации, ни повторного death-сигнала
        if !health.is_alive() {
            continue;
        }

        health.take_damage(amount);
        let target_died = !health.is_alive();

        dealt.write(DamageDealt {
            attacker,
            target,
            amount,
            source,
            target_died,
        });

        if target_died {
            died.write(EntityDied {
                entity: target,
                killer: attacker,
            });

            if let Ok(mut entity_commands) = commands.get_entity(target) {
                entity_commands.insert(Dead);
            }

            log_info(&format!(
                "Entity {:?} killed by {:?} ({:?})",
                target, attacker, source
            ));
        }
    }
}

/// System: уборка трупов по таймауту
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut despawn) in query.iter_mut() {
        despawn.remaining -= delta;

        if despawn.remaining <= 0.0 {
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.despawn();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_dealt_event() {
        let event = DamageDealt {
            attacker: None,
            target: Entity::from_raw(1),
            amount: 15,
            source: DamageSource::Hazard,
            target_died: false,
        };

        assert_eq!(event.amount, 15);
        assert!(!event.target_died);
    }

    #[test]
    fn test_entity_died_event() {
        let event = EntityDied {
            entity: Entity::from_raw(1),
            killer: Some(Entity::from_raw(2)),
        };

        assert!(event.killer.is_some());
    }
}
