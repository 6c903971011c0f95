//! Magazine state machine — патроны и запасные магазины оружия
//!
//! Все операции синхронные и тотальные: "отказ" (сухой щелчок, нет
//! запасных магазинов, replenish на капе) — это no-op с bool результатом,
//! не ошибка.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Боезапас оружия: патроны в магазине + запасные магазины
///
/// Инварианты: 0 ≤ rounds_loaded ≤ max_rounds,
///             0 ≤ magazines_held ≤ max_magazines.
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Magazine {
    /// Патроны в текущем магазине
    pub rounds_loaded: u32,
    /// Запасные магазины
    pub magazines_held: u32,
    /// Ёмкость магазина
    pub max_rounds: u32,
    /// Кап запасных магазинов
    pub max_magazines: u32,
}

impl Default for Magazine {
    fn default() -> Self {
        Self::new(10, 5) // Pistol: 10 патронов, 5 магазинов
    }
}

impl Magazine {
    /// Создать полный боезапас
    pub fn new(max_rounds: u32, max_magazines: u32) -> Self {
        Self {
            rounds_loaded: max_rounds,
            magazines_held: max_magazines,
            max_rounds,
            max_magazines,
        }
    }

    /// Потратить один патрон. false = сухой щелчок (магазин пуст), без эффекта.
    pub fn fire(&mut self) -> bool {
        if self.rounds_loaded == 0 {
            return false;
        }

        self.rounds_loaded -= 1;
        true
    }

    /// Перезарядка: только ПУСТОЕ оружие и только при наличии запасного магазина.
    ///
    /// Перезарядка с патронами в магазине блокируется (политика
    /// empty-weapon-only). false = no-op.
    pub fn reload(&mut self) -> bool {
        if self.rounds_loaded != 0 || self.magazines_held == 0 {
            return false;
        }

        self.rounds_loaded = self.max_rounds;
        self.magazines_held -= 1;
        true
    }

    /// Supply drop: +1 запасной магазин, кап max_magazines (no-op на капе)
    pub fn replenish(&mut self) {
        if self.magazines_held < self.max_magazines {
            self.magazines_held += 1;
        }
    }

    /// Обнулить патроны (вызывается session-слоем при смерти игрока)
    pub fn empty(&mut self) {
        self.rounds_loaded = 0;
    }

    /// Display строка "7/10" (read-only side channel для HUD)
    pub fn rounds_display(&self) -> String {
        format!("{}/{}", self.rounds_loaded, self.max_rounds)
    }

    /// Display строка "4/5"
    pub fn magazines_display(&self) -> String {
        format!("{}/{}", self.magazines_held, self.max_magazines)
    }
}
