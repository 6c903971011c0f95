//! Supply drops — broadcast-канал пополнения магазинов
//!
//! Архитектура (вместо глобального event-хаба):
//! - SupplyChannel — ЯВНО инжектированный resource с упорядоченным
//!   реестром подписчиков; никакого ambient static state
//! - Оружие подписывается при активации (Added<Weapon>) и отписывается
//!   при деактивации (RemovedComponents<Weapon>) — подписки не текут
//!   между циклами активации
//! - Publish = событие SupplyDropCollected; диспетчер синхронно, в
//!   порядке подписки, вызывает Magazine::replenish у всех ТЕКУЩИХ
//!   подписчиков внутри того же тика. Ноль подписчиков — безопасный no-op.
//!   Буферизации для опоздавших нет.

use bevy::prelude::*;

use crate::combat::{Magazine, Weapon};
use crate::components::Player;
use crate::logger::log;
use crate::SimulationSet;

/// Реестр подписчиков supply-канала (порядок = порядок подписки)
#[derive(Resource, Debug, Default)]
pub struct SupplyChannel {
    subscribers: Vec<Entity>,
}

impl SupplyChannel {
    /// Подписать оружие (повторная подписка — no-op)
    pub fn subscribe(&mut self, weapon: Entity) {
        if !self.subscribers.contains(&weapon) {
            self.subscribers.push(weapon);
        }
    }

    /// Отписать оружие (отсутствующий подписчик — no-op)
    pub fn unsubscribe(&mut self, weapon: Entity) {
        self.subscribers.retain(|entity| *entity != weapon);
    }

    /// Текущие подписчики в порядке подписки
    pub fn subscribers(&self) -> &[Entity] {
        &self.subscribers
    }
}

/// Supply drop на земле — ждёт, пока игрок подойдёт
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SupplyDrop {
    /// Радиус подбора (метры)
    pub pickup_radius: f32,
}

impl Default for SupplyDrop {
    fn default() -> Self {
        Self { pickup_radius: 1.5 }
    }
}

/// Event: supply drop подобран → все подписанные магазины +1
#[derive(Event, Debug, Clone, Default)]
pub struct SupplyDropCollected;

/// Helper: заспавнить supply drop в точке (используется при смерти зомби)
pub fn spawn_supply_drop(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            SupplyDrop::default(),
            Transform::from_translation(position),
        ))
        .id()
}

/// System: подписка активированного оружия
pub fn register_weapon_listeners(
    mut channel: ResMut<SupplyChannel>,
    activated: Query<Entity, Added<Weapon>>,
) {
    for weapon in activated.iter() {
        channel.subscribe(weapon);
        log(&format!("Weapon {:?} subscribed to supply channel", weapon));
    }
}

/// System: отписка деактивированного оружия
pub fn unregister_weapon_listeners(
    mut channel: ResMut<SupplyChannel>,
    mut deactivated: RemovedComponents<Weapon>,
) {
    for weapon in deactivated.read() {
        channel.unsubscribe(weapon);
        log(&format!("Weapon {:?} unsubscribed from supply channel", weapon));
    }
}

/// System: подбор supply drop игроком (sphere overlap)
pub fn collect_supply_drops(
    mut commands: Commands,
    drops: Query<(Entity, &Transform, &SupplyDrop)>,
    players: Query<&Transform, With<Player>>,
    mut collected: EventWriter<SupplyDropCollected>,
) {
    for (drop_entity, drop_transform, drop) in drops.iter() {
        let picked_up = players.iter().any(|player_transform| {
            player_transform
                .translation
                .distance(drop_transform.translation)
                <= drop.pickup_radius
        });

        if !picked_up {
            continue;
        }

        collected.write(SupplyDropCollected);

        if let Ok(mut entity_commands) = commands.get_entity(drop_entity) {
            entity_commands.despawn();
        }

        log(&format!("Supply drop {:?} collected", drop_entity));
    }
}

/// System: диспетчеризация publish → Magazine::replenish
///
/// Каждый publish даёт ровно одно пополнение каждому подписчику,
/// в порядке подписки. Капнутые магазины — no-op внутри replenish.
pub fn replenish_subscribed_magazines(
    mut collected: EventReader<SupplyDropCollected>,
    channel: Res<SupplyChannel>,
    mut magazines: Query<&mut Magazine, With<Weapon>>,
) {
    for _event in collected.read() {
        for weapon in channel.subscribers() {
            let Ok(mut magazine) = magazines.get_mut(*weapon) else {
                continue;
            };

            magazine.replenish();
            log(&format!(
                "Weapon {:?} replenished ({} magazines)",
                weapon, magazine.magazines_held
            ));
        }
    }
}

/// Supply Plugin — канал создаётся один раз на старте сессии
pub struct SupplyPlugin;

impl Plugin for SupplyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SupplyChannel>()
            .add_event::<SupplyDropCollected>();

        app.add_systems(
            FixedUpdate,
            (
                register_weapon_listeners,
                unregister_weapon_listeners,
                collect_supply_drops,
                replenish_subscribed_magazines,
            )
                .chain()
                .in_set(SimulationSet::Supply),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_order_preserved() {
        let mut channel = SupplyChannel::default();
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);

        channel.subscribe(first);
        channel.subscribe(second);
        channel.subscribe(first); // Повторная — no-op

        assert_eq!(channel.subscribers(), &[first, second]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut channel = SupplyChannel::default();
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);

        channel.subscribe(first);
        channel.subscribe(second);
        channel.unsubscribe(first);

        assert_eq!(channel.subscribers(), &[second]);

        channel.unsubscribe(first); // Уже отписан — no-op
        assert_eq!(channel.subscribers(), &[second]);
    }
}
