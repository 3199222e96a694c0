//! Structure module: Structure Progression FSM (Damaged → Repaired → Finalized)
//!
//! ECS ответственность:
//! - Каталог вариантов, случайный выбор при спавне
//! - Proximity контрибьютора через box trigger volume
//! - Перенос scrap из ResourcePool контрибьютора
//! - Смена модели и finalization effect (allied подкрепления, ровно один раз)

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod progress_tests;

pub use components::*;
pub use systems::*;

/// Event: контрибьютор вошёл/вышел из trigger volume здания
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributorProximity {
    Entered { structure: Entity, contributor: Entity },
    Exited { structure: Entity, contributor: Entity },
}

/// Event: здание финализировано, подкрепления заспавнены
#[derive(Event, Debug, Clone)]
pub struct StructureFinalized {
    pub structure: Entity,
    pub reinforcements: Vec<Entity>,
}

/// Structure Plugin
///
/// Порядок (FixedUpdate):
/// - Schedule: register_structure_tasks (после advance_scheduler)
/// - Decide: detect_contributors → apply_proximity_events
/// - Progression: contribute → check_state → display → retire
pub struct StructurePlugin;

impl Plugin for StructurePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Structure>()
            .register_type::<StructureVariant>()
            .register_type::<RepairSite>()
            .register_type::<StructureVisual>()
            .register_type::<StructureModel>()
            .add_event::<ContributorProximity>()
            .add_event::<StructureFinalized>();

        app.add_systems(
            FixedUpdate,
            (
                register_structure_tasks
                    .in_set(crate::SimulationSet::Schedule)
                    .after(crate::schedule::advance_scheduler),
                (detect_contributors, apply_proximity_events)
                    .chain()
                    .in_set(crate::SimulationSet::Decide),
                (
                    structure_contribute,
                    structure_check_state,
                    publish_repair_progress,
                    retire_structures,
                )
                    .chain()
                    .in_set(crate::SimulationSet::Progression),
            ),
        );
    }
}
