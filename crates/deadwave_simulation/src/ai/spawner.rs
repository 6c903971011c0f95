//! Enemy spawner — волна зомби в прямоугольной области
//!
//! Seeded RNG (DeterministicRng) — одинаковый seed даёт одинаковые
//! позиции и моменты спавна. Terrain-высоты нет (вне scope): спавн на
//! плоскости y = 0.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::spawn_zombie;
use crate::components::Player;
use crate::logger::log;
use crate::session::GameState;
use crate::DeterministicRng;

/// Spawner: до max_enemies зомби, интервал 0.5–1.0 сек
#[derive(Component, Debug, Clone, Reflect)]
pub struct EnemySpawner {
    /// Границы области спавна (локально к Transform спавнера, XZ)
    pub area_min: Vec2,
    pub area_max: Vec2,
    /// Лимит волны
    pub max_enemies: u32,
    /// Уже заспавнено
    pub spawned: u32,
    /// Секунды до следующего спавна
    pub next_spawn: f32,
}

impl EnemySpawner {
    pub fn new(area_min: Vec2, area_max: Vec2, max_enemies: u32) -> Self {
        Self {
            area_min,
            area_max,
            max_enemies,
            spawned: 0,
            next_spawn: 0.0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.spawned >= self.max_enemies
    }
}

/// System: спавн зомби по таймеру
pub fn spawn_enemies(
    mut commands: Commands,
    mut spawners: Query<(&Transform, &mut EnemySpawner)>,
    players: Query<Entity, With<Player>>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    game_state: Res<GameState>,
) {
    if !game_state.is_running() {
        return;
    }

    // Зомби целятся в первого игрока (сессия одиночная)
    let Some(target) = players.iter().next() else {
        return;
    };

    let delta = time.delta_secs();

    for (transform, mut spawner) in spawners.iter_mut() {
        if spawner.is_exhausted() {
            continue;
        }

        spawner.next_spawn -= delta;
        if spawner.next_spawn > 0.0 {
            continue;
        }

        let x = rng.rng.gen_range(spawner.area_min.x..=spawner.area_max.x);
        let z = rng.rng.gen_range(spawner.area_min.y..=spawner.area_max.y);
        let position = transform.translation + Vec3::new(x, 0.0, z);

        let zombie = spawn_zombie(&mut commands, position, target);

        spawner.spawned += 1;
        spawner.next_spawn = rng.rng.gen_range(0.5..1.0);

        log(&format!(
            "Spawner: zombie {:?} at {:?} ({}/{})",
            zombie, position, spawner.spawned, spawner.max_enemies
        ));
    }
}
