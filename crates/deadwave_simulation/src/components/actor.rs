//! Базовые компоненты акторов: Health, Hurtbox, KinematicBody, Player

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Здоровье актора (игрок, зомби)
///
/// Инвариант: 0 ≤ current ≤ max; current == 0 ⇔ актор мертв.
/// Мутация ТОЛЬКО через damage pipeline (combat::damage) — системы не
/// трогают current напрямую, поэтому death transition срабатывает ровно
/// один раз.
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Урон u32 — "отрицательный урон" непредставим, клампить нечего
    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Player marker (ровно один на сессию)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Радиус попадания для overlap-проверок (projectile impact, supply pickup)
///
/// Tactical physics слоя нет — симуляция владеет минимальной
/// sphere-overlap моделью сама.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    /// Радиус (метры)
    pub radius: f32,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Кинематическое тело: velocity интегрируем сами в Transform
///
/// Headless-режим: никакого физического движка, прямая интеграция
/// velocity → translation на каждом fixed тике.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    pub velocity: Vec3,
}

/// Система интеграции velocity → Transform (FixedUpdate)
pub fn integrate_kinematic_bodies(
    mut query: Query<(&KinematicBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += body.velocity * delta;
    }
}
