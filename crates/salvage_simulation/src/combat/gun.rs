//! Hitscan gun: ShotFired → raycast → DamageRequest

use bevy::prelude::*;

use crate::spatial::{SpatialIndex, SpatialQuery};
use super::{DamageRequest, ShotFired};

/// Система: разрешить выстрелы через Spatial Query raycast
///
/// Урон получает первое живое попадание из фильтра выстрела.
/// Промах: не ошибка, просто ничего не происходит.
pub fn resolve_shots(
    mut shots: EventReader<ShotFired>,
    spatial: SpatialIndex,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    for shot in shots.read() {
        let Some(hit) = spatial.raycast(shot.origin, shot.direction, shot.range, shot.filter) else {
            continue;
        };

        if hit.entity == shot.shooter {
            continue;
        }

        damage_requests.write(DamageRequest {
            attacker: shot.shooter,
            target: hit.entity,
            amount: shot.damage,
        });
    }
}
