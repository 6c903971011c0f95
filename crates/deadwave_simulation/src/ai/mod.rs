//! Zombie AI — двухфазный конечный автомат Chase → Strike
//!
//! Навигации и анимации нет (вне scope): прямолинейное сближение по XZ
//! с целью, удар с cooldown'ом в радиусе атаки. Урон идёт через общий
//! damage pipeline (MeleeStrike → combat::damage), смерть — через
//! стандартный Dead/EntityDied переход; труп оставляет supply drop.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod spawner;

pub use spawner::{spawn_enemies, EnemySpawner};

use crate::combat::{Dead, DespawnAfter, EntityDied};
use crate::components::{Health, Hurtbox, KinematicBody};
use crate::logger::log;
use crate::supply::spawn_supply_drop;
use crate::SimulationSet;

/// Время, которое труп лежит до деспавна (секунды)
pub const CORPSE_TIMEOUT: f32 = 3.0;

/// Высота центра тела зомби над землёй (метры) — Transform держит центр,
/// spawn-позиции задаются по земле
pub const ZOMBIE_BODY_HEIGHT: f32 = 1.0;

/// Радиус тела зомби для попаданий (метры)
pub const ZOMBIE_HURTBOX_RADIUS: f32 = 1.0;

/// AI FSM состояния зомби
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum EnemyState {
    /// Сближаемся с целью
    #[default]
    Chase,
    /// Цель в радиусе — бьём по cooldown'у
    Strike,
}

/// Параметры движения зомби
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EnemyConfig {
    /// Скорость сближения (м/с)
    pub move_speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self { move_speed: 3.0 }
    }
}

/// Контактная атака зомби (cooldown-таймер внутри, как у weapon stats)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyMelee {
    /// Урон одного удара
    pub damage: u32,
    /// Радиус атаки (метры)
    pub range: f32,
    /// Cooldown между ударами (секунды)
    pub cooldown: f32,
    /// Текущий cooldown timer (уменьшается до 0)
    pub cooldown_timer: f32,
}

impl Default for EnemyMelee {
    fn default() -> Self {
        Self::zombie()
    }
}

impl EnemyMelee {
    pub fn zombie() -> Self {
        Self {
            damage: 20,
            range: 3.0,
            cooldown: 1.5,
            cooldown_timer: 0.0,
        }
    }

    pub fn can_strike(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.cooldown;
    }
}

/// Цель зомби (типизированная ссылка, задаётся при спавне)
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyTarget(pub Entity);

/// Event: контактный удар зомби → damage pipeline
#[derive(Event, Debug, Clone)]
pub struct MeleeStrike {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Helper: заспавнить зомби на земле в точке с заданной целью
pub fn spawn_zombie(commands: &mut Commands, position: Vec3, target: Entity) -> Entity {
    commands
        .spawn((
            EnemyState::default(),
            EnemyConfig::default(),
            EnemyMelee::zombie(),
            EnemyTarget(target),
            Health::new(100),
            Hurtbox {
                radius: ZOMBIE_HURTBOX_RADIUS,
            },
            KinematicBody::default(),
            Transform::from_translation(position + Vec3::Y * ZOMBIE_BODY_HEIGHT),
        ))
        .id()
}

/// System: FSM transitions + сближение
///
/// Дистанция считается по XZ (высота цели игнорируется, как и в
/// исходном преследовании). Мёртвые зомби исключены маркером Dead.
pub fn enemy_fsm_transitions(
    mut enemies: Query<
        (
            &EnemyTarget,
            &Transform,
            &mut EnemyState,
            &EnemyConfig,
            &EnemyMelee,
            &mut KinematicBody,
        ),
        Without<Dead>,
    >,
    targets: Query<&Transform, Without<EnemyState>>,
) {
    for (target, transform, mut state, config, melee, mut body) in enemies.iter_mut() {
        let Ok(target_transform) = targets.get(target.0) else {
            body.velocity = Vec3::ZERO;
            continue;
        };

        let mut to_target = target_transform.translation - transform.translation;
        to_target.y = 0.0;

        let distance = to_target.length();

        if distance <= melee.range {
            *state = EnemyState::Strike;
            body.velocity = Vec3::ZERO;
        } else {
            *state = EnemyState::Chase;
            body.velocity = if distance > f32::EPSILON {
                to_target / distance * config.move_speed
            } else {
                Vec3::ZERO
            };
        }
    }
}

/// System: удары по cooldown'у в состоянии Strike
pub fn enemy_strikes(
    mut enemies: Query<(Entity, &EnemyTarget, &EnemyState, &mut EnemyMelee), Without<Dead>>,
    time: Res<Time<Fixed>>,
    mut strikes: EventWriter<MeleeStrike>,
) {
    let delta = time.delta_secs();

    for (entity, target, state, mut melee) in enemies.iter_mut() {
        if melee.cooldown_timer > 0.0 {
            melee.cooldown_timer = (melee.cooldown_timer - delta).max(0.0);
        }

        if *state != EnemyState::Strike || !melee.can_strike() {
            continue;
        }

        strikes.write(MeleeStrike {
            attacker: entity,
            target: target.0,
            damage: melee.damage,
        });
        melee.start_cooldown();

        log(&format!("Zombie {:?} strikes {:?}", entity, target.0));
    }
}

/// System: смерть зомби → остановка AI, supply drop, уборка трупа
pub fn disable_enemies_on_death(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    mut enemies: Query<(&Transform, &mut KinematicBody), With<EnemyState>>,
) {
    for death in deaths.read() {
        let Ok((transform, mut body)) = enemies.get_mut(death.entity) else {
            continue;
        };

        body.velocity = Vec3::ZERO;

        let drop = spawn_supply_drop(&mut commands, transform.translation);

        if let Ok(mut entity_commands) = commands.get_entity(death.entity) {
            entity_commands.remove::<EnemyState>();
            entity_commands.insert(DespawnAfter {
                remaining: CORPSE_TIMEOUT,
            });
        }

        log(&format!(
            "Zombie {:?} died, dropped supply {:?}",
            death.entity, drop
        ));
    }
}

/// AI Plugin — зомби FSM + spawner
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MeleeStrike>();

        app.add_systems(
            FixedUpdate,
            spawn_enemies.in_set(SimulationSet::Spawning),
        );

        app.add_systems(
            FixedUpdate,
            (enemy_fsm_transitions, enemy_strikes)
                .chain()
                .in_set(SimulationSet::Ai),
        );

        // Реакция на смерть — после damage, в том же тике
        app.add_systems(
            FixedUpdate,
            disable_enemies_on_death.in_set(SimulationSet::Session),
        );
    }
}
