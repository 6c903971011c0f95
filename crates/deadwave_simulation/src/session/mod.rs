//! Session module — жизненный цикл матча: game state, счёт, таймеры
//!
//! GameState: Running → Won (отсчёт дожит до конца) или Running → Lost
//! (игрок умер). Терминальные состояния поглощающие; презентационный
//! коллаборатор читает их через HUD banner. При Lost боезапас игрока
//! обнуляется, weapon/reload input дальше игнорируется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod countdown;
pub mod hazard;

// Re-export основных типов
pub use countdown::{
    tick_match_countdown, CountdownFinished, CountdownState, MatchCountdown, MATCH_SECONDS,
};
pub use hazard::{
    apply_safe_zone_transitions, tick_environmental_hazards, EnvironmentalHazard, HazardPulse,
    SafeZoneEntered, SafeZoneExited, HAZARD_INTERVAL,
};

use crate::ai::EnemyMelee;
use crate::combat::{EntityDied, HeldBy, Magazine, Weapon};
use crate::components::{Health, Hurtbox, KinematicBody, Player};
use crate::logger::log_info;
use crate::SimulationSet;

/// Очки за убитого зомби
pub const KILL_AWARD: u32 = 10;

/// Состояние сессии (поглощающие терминальные состояния)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Running,
    /// Отсчёт матча дожит до конца
    Won,
    /// Игрок умер
    Lost,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        matches!(self, GameState::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }
}

/// Счёт игрока (неотрицательность — по построению, u32)
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerScore {
    pub value: u32,
}

impl PlayerScore {
    /// Pass-through для внешних коллабораторов
    pub fn update_score(&mut self, value: u32) {
        self.value = value;
    }

    pub fn award(&mut self, points: u32) {
        self.value += points;
    }
}

/// Результат spawn_player: игрок + его пистолет
#[derive(Debug, Clone, Copy)]
pub struct PlayerLoadout {
    pub player: Entity,
    pub weapon: Entity,
}

/// Helper: заспавнить игрока со стартовым пистолетом и hazard-таймером
///
/// Все коллабораторы связываются типизированными ссылками на этапе
/// конструирования (HeldBy, hazard на самом актора) — runtime-поиска нет.
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> PlayerLoadout {
    let player = commands
        .spawn((
            Player,
            Health::new(100),
            Hurtbox::default(),
            KinematicBody::default(),
            EnvironmentalHazard::default(),
            Transform::from_translation(position),
        ))
        .id();

    let weapon = commands
        .spawn((
            Weapon::pistol(),
            HeldBy(player),
            KinematicBody::default(),
            Transform::from_translation(position + Vec3::new(0.3, 1.2, 0.0)),
        ))
        .id();

    PlayerLoadout { player, weapon }
}

/// System: смерть игрока → Lost + обнуление боезапаса
pub fn handle_player_death(
    mut deaths: EventReader<EntityDied>,
    players: Query<(), With<Player>>,
    mut weapons: Query<(&HeldBy, &mut Magazine), With<Weapon>>,
    mut game_state: ResMut<GameState>,
) {
    for death in deaths.read() {
        if players.get(death.entity).is_err() {
            continue;
        }

        if !game_state.is_running() {
            continue;
        }

        *game_state = GameState::Lost;

        for (held_by, mut magazine) in weapons.iter_mut() {
            if held_by.0 == death.entity {
                magazine.empty();
            }
        }

        log_info("Player died — session lost");
    }
}

/// System: отсчёт дожит до конца → Won
///
/// Идёт после handle_player_death: если игрок умер в тот же тик,
/// Lost уже терминален и победа не засчитывается.
pub fn handle_countdown_finished(
    mut finished: EventReader<CountdownFinished>,
    mut game_state: ResMut<GameState>,
) {
    for _event in finished.read() {
        if game_state.is_running() {
            *game_state = GameState::Won;
            log_info("Countdown survived — session won");
        }
    }
}

/// System: очки за убитых зомби
pub fn award_kill_score(
    mut deaths: EventReader<EntityDied>,
    enemies: Query<(), With<EnemyMelee>>,
    mut score: ResMut<PlayerScore>,
) {
    for death in deaths.read() {
        if enemies.get(death.entity).is_ok() {
            score.award(KILL_AWARD);
        }
    }
}

/// Session Plugin — game state, счёт, таймеры матча
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameState>()
            .init_resource::<PlayerScore>()
            .init_resource::<MatchCountdown>();

        app.add_event::<CountdownFinished>()
            .add_event::<SafeZoneEntered>()
            .add_event::<SafeZoneExited>()
            .add_event::<HazardPulse>();

        // Таймеры — в начале тика (импульсы/finished уходят в этот же тик)
        app.add_systems(
            FixedUpdate,
            (
                tick_match_countdown,
                apply_safe_zone_transitions,
                tick_environmental_hazards,
            )
                .chain()
                .in_set(SimulationSet::Timers),
        );

        // Реакции на исходы — после damage
        app.add_systems(
            FixedUpdate,
            (
                handle_player_death,
                handle_countdown_finished,
                award_kill_score,
            )
                .chain()
                .in_set(SimulationSet::Session),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_state_default_running() {
        let state = GameState::default();
        assert!(state.is_running());
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_score_update_and_award() {
        let mut score = PlayerScore::default();
        score.award(KILL_AWARD);
        score.award(KILL_AWARD);
        assert_eq!(score.value, 20);

        score.update_score(5); // Pass-through перекрывает
        assert_eq!(score.value, 5);
    }
}
