//! Combat module — оружие, боезапас, пули, урон
//!
//! ECS ответственность:
//! - Game state: Weapon FSM, Magazine, Health мутации
//! - Combat rules: dry fire / empty-weapon-only reload / frozen-after-death
//! - Events: TriggerPulled/Released, ReloadIntent, WeaponFired,
//!   ProjectileHit, DamageDealt, EntityDied
//!
//! Порядок выполнения (FixedUpdate, через SimulationSet):
//! 1. Weapons — trigger/reload input → выстрел, отдача
//! 2. Projectiles — интеграция движения, impact detection, lifetime
//! 3. Damage — применение урона, death transition, уборка трупов

use bevy::prelude::*;

pub mod damage;
pub mod magazine;
pub mod projectile;
pub mod weapon;

// Re-export основных типов
pub use damage::{
    apply_damage, despawn_after_timeout, DamageDealt, DamageSource, Dead, DespawnAfter,
    EntityDied,
};
pub use magazine::Magazine;
pub use projectile::{
    detect_projectile_impacts, tick_projectile_lifetimes, Projectile, ProjectileHit,
    PROJECTILE_LIFETIME, PROJECTILE_RADIUS,
};
pub use weapon::{
    dampen_weapon_recoil, process_reload_intents, process_trigger_pulls,
    process_trigger_releases, HeldBy, ReloadIntent, TriggerPulled, TriggerReleased, Weapon,
    WeaponFired, WeaponState,
};

use crate::components::integrate_kinematic_bodies;
use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat события и системы в FixedUpdate.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<TriggerPulled>()
            .add_event::<TriggerReleased>()
            .add_event::<ReloadIntent>()
            .add_event::<WeaponFired>()
            .add_event::<ProjectileHit>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Input → выстрел/перезарядка
        app.add_systems(
            FixedUpdate,
            (
                process_trigger_pulls,
                process_trigger_releases,
                process_reload_intents,
                dampen_weapon_recoil,
            )
                .chain()
                .in_set(SimulationSet::Weapons),
        );

        // Полёт пуль и контакты
        app.add_systems(
            FixedUpdate,
            (
                integrate_kinematic_bodies,
                detect_projectile_impacts,
                tick_projectile_lifetimes,
            )
                .chain()
                .in_set(SimulationSet::Projectiles),
        );

        // Урон и смерть
        app.add_systems(
            FixedUpdate,
            (apply_damage, despawn_after_timeout)
                .chain()
                .in_set(SimulationSet::Damage),
        );
    }
}
