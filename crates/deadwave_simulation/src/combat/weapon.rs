//! Weapon state machine + trigger/reload input events
//!
//! Архитектура:
//! - ECS: Weapon state (Idle/Firing), Magazine, recoil — game state
//! - Input слой (VR trigger, клавиша reload) представлен ТОЛЬКО событиями
//!   TriggerPulled/TriggerReleased/ReloadIntent — симуляция не знает,
//!   откуда они пришли
//! - Single-shot семантика: повторные pull в состоянии Firing отбрасываются,
//!   поэтому за тик оружие обрабатывает максимум один выстрел

use bevy::prelude::*;

use crate::combat::magazine::Magazine;
use crate::combat::projectile::{Projectile, PROJECTILE_LIFETIME};
use crate::components::KinematicBody;
use crate::logger::{log, log_warning};
use crate::session::GameState;

/// Состояние спускового крючка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum WeaponState {
    /// Готово к выстрелу
    #[default]
    Idle,
    /// Крючок зажат (выстрел уже произведён, ждём отпускания)
    Firing,
}

/// Оружие (пистолет). Magazine добавляется автоматически через Required Components.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Magazine)]
pub struct Weapon {
    /// Урон за попадание
    pub damage: u32,
    /// Начальная скорость пули (м/с)
    pub muzzle_velocity: f32,
    /// Импульс отдачи (м/с, назад вдоль ствола)
    pub recoil_impulse: f32,
    /// FSM: Idle / Firing
    pub state: WeaponState,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::pistol()
    }
}

impl Weapon {
    /// Стартовый пистолет
    pub fn pistol() -> Self {
        Self {
            damage: 10,
            muzzle_velocity: 40.0,
            recoil_impulse: 0.8,
            state: WeaponState::Idle,
        }
    }
}

/// Кто держит оружие (типизированная ссылка вместо runtime-поиска по иерархии)
#[derive(Component, Debug, Clone, Copy)]
pub struct HeldBy(pub Entity);

/// Event: спусковой крючок нажат (XR activate)
#[derive(Event, Debug, Clone)]
pub struct TriggerPulled {
    pub weapon: Entity,
}

/// Event: спусковой крючок отпущен (XR deactivate)
#[derive(Event, Debug, Clone)]
pub struct TriggerReleased {
    pub weapon: Entity,
}

/// Event: запрос перезарядки (клавиша R / кнопка контроллера)
#[derive(Event, Debug, Clone)]
pub struct ReloadIntent {
    pub weapon: Entity,
}

/// Event: выстрел произведён (для HUD/аудио коллабораторов)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub weapon: Entity,
    pub projectile: Entity,
}

/// System: обработка нажатий крючка → выстрел
///
/// Idle + патроны есть → спавним projectile вдоль ствола, тратим патрон,
/// применяем отдачу, переходим в Firing. Пустой магазин — запрос молча
/// отбрасывается (это не ошибка, состояние не меняется).
pub fn process_trigger_pulls(
    mut commands: Commands,
    mut pulls: EventReader<TriggerPulled>,
    mut weapons: Query<(
        &mut Weapon,
        &mut Magazine,
        &Transform,
        Option<&HeldBy>,
        Option<&mut KinematicBody>,
    )>,
    mut fired: EventWriter<WeaponFired>,
    game_state: Res<GameState>,
) {
    for pull in pulls.read() {
        // Терминальное состояние сессии — input игнорируется
        if !game_state.is_running() {
            continue;
        }

        let Ok((mut weapon, mut magazine, transform, held_by, body)) =
            weapons.get_mut(pull.weapon)
        else {
            log_warning(&format!("TriggerPulled for non-weapon entity {:?}", pull.weapon));
            continue;
        };

        // Повторный pull при зажатом крючке — отбрасываем (single-shot)
        if weapon.state != WeaponState::Idle {
            continue;
        }

        // Сухой щелчок: no-op, остаёмся в Idle
        if !magazine.fire() {
            log(&format!("Weapon {:?}: dry fire (magazine empty)", pull.weapon));
            continue;
        }

        weapon.state = WeaponState::Firing;

        let direction = *transform.forward();
        let projectile = commands
            .spawn((
                Projectile {
                    weapon: pull.weapon,
                    wielder: held_by.map(|held| held.0),
                    lifetime: PROJECTILE_LIFETIME,
                },
                Transform::from_translation(transform.translation)
                    .looking_to(direction, Vec3::Y),
                KinematicBody {
                    velocity: direction * weapon.muzzle_velocity,
                },
            ))
            .id();

        // Отдача: импульс назад вдоль ствола на тело оружия
        if let Some(mut body) = body {
            body.velocity -= direction * weapon.recoil_impulse;
        }

        fired.write(WeaponFired {
            weapon: pull.weapon,
            projectile,
        });

        log(&format!(
            "Weapon {:?} fired projectile {:?} ({} rounds left)",
            pull.weapon, projectile, magazine.rounds_loaded
        ));
    }
}

/// Затухание отдачи (доля скорости, гасимая за секунду × rate)
pub const RECOIL_DAMPING: f32 = 8.0;

/// System: гашение скорости отдачи (оружие держат в руке)
pub fn dampen_weapon_recoil(
    mut weapons: Query<&mut KinematicBody, With<Weapon>>,
    time: Res<Time<Fixed>>,
) {
    let factor = (1.0 - RECOIL_DAMPING * time.delta_secs()).max(0.0);

    for mut body in weapons.iter_mut() {
        body.velocity *= factor;
    }
}

/// System: отпускание крючка → обратно в Idle
pub fn process_trigger_releases(
    mut releases: EventReader<TriggerReleased>,
    mut weapons: Query<&mut Weapon>,
) {
    for release in releases.read() {
        if let Ok(mut weapon) = weapons.get_mut(release.weapon) {
            weapon.state = WeaponState::Idle;
        }
    }
}

/// System: обработка запросов перезарядки
///
/// Политика empty-weapon-only живёт в Magazine::reload — здесь только
/// маршрутизация intent → магазин. Повторный intent в том же тике
/// идемпотентен (после успешной перезарядки магазин уже не пустой).
pub fn process_reload_intents(
    mut intents: EventReader<ReloadIntent>,
    mut magazines: Query<&mut Magazine, With<Weapon>>,
    game_state: Res<GameState>,
) {
    for intent in intents.read() {
        if !game_state.is_running() {
            continue;
        }

        let Ok(mut magazine) = magazines.get_mut(intent.weapon) else {
            log_warning(&format!("ReloadIntent for non-weapon entity {:?}", intent.weapon));
            continue;
        };

        if magazine.reload() {
            log(&format!(
                "Weapon {:?} reloaded ({} magazines left)",
                intent.weapon, magazine.magazines_held
            ));
        } else {
            log(&format!(
                "Weapon {:?}: reload refused ({} rounds, {} magazines)",
                intent.weapon, magazine.rounds_loaded, magazine.magazines_held
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pistol_defaults() {
        let weapon = Weapon::pistol();
        assert_eq!(weapon.damage, 10);
        assert_eq!(weapon.state, WeaponState::Idle);
    }

    #[test]
    fn test_trigger_events_carry_weapon() {
        let weapon = Entity::from_raw(7);
        let pull = TriggerPulled { weapon };
        let release = TriggerReleased { weapon };

        assert_eq!(pull.weapon, release.weapon);
    }
}
