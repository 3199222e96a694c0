//! Damage application.

use bevy::prelude::*;

use crate::components::Health;
use super::{DamageDealt, DamageRequest, EntityDied};

/// Система: применить DamageRequest к Health
///
/// Цель могла исчезнуть или умереть между атакой и применением,
/// такие запросы тихо пропускаем (stale reference, не ошибка).
pub fn apply_damage(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<&mut Health>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        health.take_damage(request.amount);
        let target_died = !health.is_alive();

        dealt_events.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            damage: request.amount,
            target_died,
        });

        if target_died {
            died_events.write(EntityDied {
                entity: request.target,
                killer: Some(request.attacker),
            });
            crate::logger::log_info(&format!(
                "💀 Entity {:?} killed by {:?}",
                request.target, request.attacker
            ));
        }
    }
}
