//! Combat события: запросы урона, выстрелы, результаты

use bevy::prelude::*;

use crate::components::TeamMask;

/// Запрос урона (melee атака или попадание луча)
///
/// Здоровье цели перечитывается в момент применения, не кэшируется.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageRequest {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: f32,
}

/// Выстрел hitscan оружия (allied агенты, игрок)
#[derive(Event, Debug, Clone, Copy)]
pub struct ShotFired {
    pub shooter: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub range: f32,
    pub damage: f32,
    /// Кого луч может задеть
    pub filter: TeamMask,
}

/// Событие: урон нанесен
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}
