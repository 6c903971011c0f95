//! HUD mirror — read-only display строки для презентационного слоя
//!
//! Симуляция владеет только зеркалом (HudDisplay resource): строки
//! обновляются change-detection системами на каждом мутирующем вызове
//! нижележащих компонентов. Рендер/шрифты/панели — снаружи.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{HeldBy, Magazine, Weapon};
use crate::components::{Health, Player};
use crate::session::{GameState, MatchCountdown, PlayerScore};
use crate::SimulationSet;

/// Зеркало HUD (snapshot-friendly: serde для детерминизм-тестов)
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudDisplay {
    /// "7/10"
    pub ammo: String,
    /// "4/5"
    pub magazines: String,
    /// "80/100"
    pub health: String,
    /// "Score: 30"
    pub score: String,
    /// "120" … "1", затем "GO!"
    pub countdown: String,
    /// "" | "You won!" | "You died!"
    pub banner: String,
}

/// System: патроны/магазины игрока
pub fn refresh_ammo_display(
    weapons: Query<(&Magazine, &HeldBy), (With<Weapon>, Changed<Magazine>)>,
    players: Query<(), With<Player>>,
    mut hud: ResMut<HudDisplay>,
) {
    for (magazine, held_by) in weapons.iter() {
        if players.get(held_by.0).is_err() {
            continue;
        }

        let ammo = magazine.rounds_display();
        let magazines = magazine.magazines_display();

        if hud.ammo != ammo {
            hud.ammo = ammo;
        }
        if hud.magazines != magazines {
            hud.magazines = magazines;
        }
    }
}

/// System: здоровье игрока
pub fn refresh_health_display(
    players: Query<&Health, (With<Player>, Changed<Health>)>,
    mut hud: ResMut<HudDisplay>,
) {
    for health in players.iter() {
        let text = format!("{}/{}", health.current, health.max);
        if hud.health != text {
            hud.health = text;
        }
    }
}

/// System: счёт
pub fn refresh_score_display(score: Res<PlayerScore>, mut hud: ResMut<HudDisplay>) {
    if !score.is_changed() {
        return;
    }

    let text = format!("Score: {}", score.value);
    if hud.score != text {
        hud.score = text;
    }
}

/// System: отсчёт матча ("GO!" после завершения)
pub fn refresh_countdown_display(countdown: Res<MatchCountdown>, mut hud: ResMut<HudDisplay>) {
    if !countdown.is_changed() {
        return;
    }

    let text = match countdown.remaining() {
        Some(remaining) => remaining.to_string(),
        None => "GO!".to_string(),
    };

    if hud.countdown != text {
        hud.countdown = text;
    }
}

/// System: терминальный баннер
pub fn refresh_banner(game_state: Res<GameState>, mut hud: ResMut<HudDisplay>) {
    if !game_state.is_changed() {
        return;
    }

    let text = match *game_state {
        GameState::Running => "",
        GameState::Won => "You won!",
        GameState::Lost => "You died!",
    };

    if hud.banner != text {
        hud.banner = text.to_string();
    }
}

/// HUD Plugin — display-зеркало в конце тика
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudDisplay>();

        app.add_systems(
            FixedUpdate,
            (
                refresh_ammo_display,
                refresh_health_display,
                refresh_score_display,
                refresh_countdown_display,
                refresh_banner,
            )
                .chain()
                .in_set(SimulationSet::Display),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_default_empty() {
        let hud = HudDisplay::default();
        assert!(hud.ammo.is_empty());
        assert!(hud.banner.is_empty());
    }
}
