//! DEADWAVE Simulation Core
//!
//! Headless ECS-симуляция combat resource loop'а wave-survival шутера
//! на Bevy 0.16: health/damage, пистолет с магазинами, зомби-AI,
//! supply drops, отсчёт матча, environmental hazard.
//!
//! Архитектура:
//! - ECS = единственный слой: game state, combat rules, таймеры, events
//! - Рендер/аудио/VR input — внешние коллабораторы (входят событиями,
//!   выходят read-only display значениями в HudDisplay)
//! - Один fixed тик (60Hz) = один проход всех систем в фиксированном
//!   порядке (SimulationSet), никакой параллельной мутации

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod hud;
pub mod logger;
pub mod session;
pub mod supply;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_zombie, AIPlugin, EnemyConfig, EnemyMelee, EnemySpawner, EnemyState, EnemyTarget,
    MeleeStrike,
};
pub use combat::{
    CombatPlugin, DamageDealt, DamageSource, Dead, DespawnAfter, EntityDied, HeldBy, Magazine,
    Projectile, ProjectileHit, ReloadIntent, TriggerPulled, TriggerReleased, Weapon, WeaponFired,
    WeaponState,
};
pub use components::*;
pub use hud::{HudDisplay, HudPlugin};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger};
pub use session::{
    spawn_player, CountdownFinished, CountdownState, EnvironmentalHazard, GameState, HazardPulse,
    MatchCountdown, PlayerLoadout, PlayerScore, SafeZoneEntered, SafeZoneExited, SessionPlugin,
    MATCH_SECONDS,
};
pub use supply::{spawn_supply_drop, SupplyChannel, SupplyDrop, SupplyDropCollected, SupplyPlugin};

/// Seed по умолчанию (если сессия не задала свой)
pub const DEFAULT_SEED: u64 = 42;

/// Порядок доменов внутри одного fixed тика
///
/// Полный chain — межсистемных ambiguity нет, порядок применения
/// состояния воспроизводим тик-в-тик.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Отсчёт матча, hazard-таймеры
    Timers,
    /// Спавн зомби
    Spawning,
    /// Zombie FSM + удары
    Ai,
    /// Trigger/reload input → выстрел
    Weapons,
    /// Интеграция движения, полёт пуль, контакты
    Projectiles,
    /// Применение урона, death transition
    Damage,
    /// Подписки, подбор drop'ов, replenish
    Supply,
    /// Исходы сессии, счёт
    Session,
    /// HUD-зеркало
    Display,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Детерминистичный RNG — только если сессия не задала свой seed
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Timers,
                SimulationSet::Spawning,
                SimulationSet::Ai,
                SimulationSet::Weapons,
                SimulationSet::Projectiles,
                SimulationSet::Damage,
                SimulationSet::Supply,
                SimulationSet::Session,
                SimulationSet::Display,
            )
                .chain(),
        );

        // Подсистемы
        app.add_plugins((SessionPlugin, AIPlugin, CombatPlugin, SupplyPlugin, HudPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Прогоняет ровно `ticks` fixed-тиков симуляции
///
/// Время продвигается вручную (advance_by + run_schedule), а не через
/// app.update(): headless-прогон не должен зависеть от wall-clock хоста —
/// одинаковый seed обязан давать одинаковый мир тик-в-тик.
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();

    for _ in 0..ticks {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(timestep);
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// Snapshot мира для сравнения детерминизма
///
/// Собирает компоненты типа T в детерминированный байтовый формат
/// (сортировка по Entity ID, сериализация через Debug).
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
