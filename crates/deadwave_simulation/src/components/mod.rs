//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Health, Hurtbox, KinematicBody, Player)
//!
//! Combat/supply/session компоненты живут в своих доменных модулях
//! (combat::Magazine, combat::Weapon, supply::SupplyDrop, ...) —
//! рядом с системами, которые ими владеют.

pub mod actor;

// Re-exports для удобного импорта
pub use actor::*;
