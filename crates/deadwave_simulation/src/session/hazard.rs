//! Environmental hazard — повторяющийся таймер урона с safe-zone гейтом
//!
//! Каждое истечение интервала — ровно ОДНО применение фиксированного
//! урона к привязанному актору, затем таймер перезапускается. Пока актор
//! в safe zone, таймер сброшен и стоит. Кумулятивный счётчик импульсов
//! переживает повторные входы в зону (таймер сбрасывается, счётчик нет).

use bevy::prelude::*;

use crate::logger::log;
use crate::session::GameState;

/// Интервал между импульсами урона (секунды)
pub const HAZARD_INTERVAL: f32 = 5.0;

/// Hazard-таймер, привязанный к damageable entity, на которой висит
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnvironmentalHazard {
    /// Интервал перезапуска (секунды)
    pub interval: f32,
    /// Оставшееся время до импульса
    pub remaining: f32,
    /// Урон одного импульса
    pub pulse_damage: u32,
    /// Актор сейчас в safe zone (таймер стоит)
    pub in_safe_zone: bool,
    /// Кумулятивно выданных импульсов за сессию
    pub total_pulses: u32,
}

impl Default for EnvironmentalHazard {
    fn default() -> Self {
        Self::new(HAZARD_INTERVAL, 1)
    }
}

impl EnvironmentalHazard {
    pub fn new(interval: f32, pulse_damage: u32) -> Self {
        Self {
            interval,
            remaining: interval,
            pulse_damage,
            in_safe_zone: false,
            total_pulses: 0,
        }
    }

    /// Вход в safe zone: таймер сброшен и остановлен
    pub fn enter_safe_zone(&mut self) {
        self.in_safe_zone = true;
        self.remaining = self.interval;
    }

    /// Выход из safe zone: отсчёт стартует заново с полного интервала
    pub fn exit_safe_zone(&mut self) {
        self.in_safe_zone = false;
        self.remaining = self.interval;
    }
}

/// Event: актор пересёк границу safe zone (вход)
#[derive(Event, Debug, Clone)]
pub struct SafeZoneEntered {
    pub entity: Entity,
}

/// Event: актор пересёк границу safe zone (выход)
#[derive(Event, Debug, Clone)]
pub struct SafeZoneExited {
    pub entity: Entity,
}

/// Event: hazard-импульс → damage pipeline
#[derive(Event, Debug, Clone)]
pub struct HazardPulse {
    pub target: Entity,
    pub amount: u32,
}

/// System: переключение safe-zone гейта по событиям границы
pub fn apply_safe_zone_transitions(
    mut entered: EventReader<SafeZoneEntered>,
    mut exited: EventReader<SafeZoneExited>,
    mut hazards: Query<&mut EnvironmentalHazard>,
) {
    for event in entered.read() {
        if let Ok(mut hazard) = hazards.get_mut(event.entity) {
            hazard.enter_safe_zone();
            log(&format!("Entity {:?} entered safe zone", event.entity));
        }
    }

    for event in exited.read() {
        if let Ok(mut hazard) = hazards.get_mut(event.entity) {
            hazard.exit_safe_zone();
            log(&format!("Entity {:?} left safe zone", event.entity));
        }
    }
}

/// System: тик hazard-таймеров
pub fn tick_environmental_hazards(
    mut hazards: Query<(Entity, &mut EnvironmentalHazard)>,
    time: Res<Time<Fixed>>,
    game_state: Res<GameState>,
    mut pulses: EventWriter<HazardPulse>,
) {
    if !game_state.is_running() {
        return;
    }

    let delta = time.delta_secs();

    for (entity, mut hazard) in hazards.iter_mut() {
        if hazard.in_safe_zone {
            continue;
        }

        hazard.remaining -= delta;

        if hazard.remaining <= 0.0 {
            pulses.write(HazardPulse {
                target: entity,
                amount: hazard.pulse_damage,
            });

            hazard.total_pulses += 1;
            hazard.remaining = hazard.interval;

            log(&format!(
                "Hazard pulse #{} against {:?}",
                hazard.total_pulses, entity
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_zone_resets_timer() {
        let mut hazard = EnvironmentalHazard::new(5.0, 1);
        hazard.remaining = 1.5;

        hazard.enter_safe_zone();
        assert!(hazard.in_safe_zone);
        assert_eq!(hazard.remaining, 5.0);

        hazard.exit_safe_zone();
        assert!(!hazard.in_safe_zone);
        assert_eq!(hazard.remaining, 5.0);
    }

    #[test]
    fn test_total_pulses_survive_reentry() {
        let mut hazard = EnvironmentalHazard::new(5.0, 1);
        hazard.total_pulses = 3;

        hazard.enter_safe_zone();
        hazard.exit_safe_zone();

        assert_eq!(hazard.total_pulses, 3); // Счётчик не сбрасывается
    }
}
