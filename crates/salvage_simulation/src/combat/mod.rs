//! Combat module
//!
//! ECS ответственность:
//! - Game state: Health
//! - Combat rules: melee урон напрямую, hitscan через Spatial Query raycast
//! - Events: DamageRequest → DamageDealt / EntityDied
//!
//! Кто атакует и когда решает AI FSM (crate::ai), здесь только разрешение.

use bevy::prelude::*;

pub mod damage;
pub mod events;
pub mod gun;


pub use damage::apply_damage;
pub use events::{DamageDealt, DamageRequest, EntityDied, ShotFired};
pub use gun::resolve_shots;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate, SimulationSet::Resolve):
/// 1. resolve_shots: ShotFired → raycast → DamageRequest
/// 2. apply_damage: DamageRequest → Health, DamageDealt, EntityDied
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<ShotFired>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (resolve_shots, apply_damage)
                .chain()
                .in_set(crate::SimulationSet::Resolve),
        );
    }
}
