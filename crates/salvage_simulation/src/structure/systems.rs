//! Structure Progression systems.
//!
//! Три независимых цикла на здание (как у агентов: свои TaskKind):
//! - StructureContribute: перенос scrap от контрибьютора (только Damaged)
//! - StructureStateCheck: Repaired → смена модели → Finalized → подкрепления
//! - StructureDisplay: progress ratio в HUD
//! Плюс StructureRetire через grace delay после финализации.

use bevy::prelude::*;
use rand::Rng;

use super::components::{
    structure_model_bundle, RepairSite, Retired, Structure, StructureSpawnPoints, StructureState,
    StructureVariant, StructureVisual,
};
use super::{ContributorProximity, StructureFinalized};
use crate::ai::spawn_agent;
use crate::components::{ResourcePool, Team};
use crate::config::{SimulationConfig, StructureTiming};
use crate::hud::{HudUpdate, HudValue};
use crate::schedule::{DueTasks, TaskKind, TaskScheduler};
use crate::DeterministicRng;

/// Bundle здания выбранного варианта (модель спавнится в register_structure_tasks)
pub fn structure_bundle(
    variant: StructureVariant,
    variant_index: usize,
    timing: &StructureTiming,
    position: Vec3,
) -> impl Bundle {
    (
        Structure::new(
            variant_index,
            variant.resource_needed,
            timing.repair_speed,
            timing.min_contribution,
        ),
        RepairSite::new(Vec3::from_array(variant.collection_extents)),
        StructureSpawnPoints(timing.spawn_points()),
        Transform::from_translation(position),
        variant,
    )
}

/// Заспавнить здание со случайным вариантом из каталога
///
/// Пустой каталог → None (валидный конфиг такого не допускает).
pub fn spawn_structure(
    commands: &mut Commands,
    config: &SimulationConfig,
    position: Vec3,
    rng: &mut impl Rng,
) -> Option<Entity> {
    if config.structures.is_empty() {
        crate::log_error("spawn_structure: structure catalog is empty");
        return None;
    }

    let variant_index = rng.gen_range(0..config.structures.len());
    let variant = config.structures[variant_index].clone();

    crate::log(&format!(
        "🏚️ Structure variant {} ({}) at {:?}, needs {} scrap",
        variant_index, variant.damaged_model, position, variant.resource_needed
    ));

    Some(
        commands
            .spawn(structure_bundle(variant, variant_index, &config.structure_timing, position))
            .id(),
    )
}

/// Система: новые здания получают damaged модель и три периодические задачи
pub fn register_structure_tasks(
    mut commands: Commands,
    mut scheduler: ResMut<TaskScheduler>,
    mut structures: Query<
        (Entity, &Transform, &StructureVariant, &mut StructureVisual),
        Added<Structure>,
    >,
) {
    for (entity, transform, variant, mut visual) in structures.iter_mut() {
        let model = commands
            .spawn(structure_model_bundle(
                entity,
                StructureState::Damaged,
                &variant.damaged_model,
                transform.translation,
            ))
            .id();
        visual.model = Some(model);

        scheduler.schedule_in(Some(entity), TaskKind::StructureContribute, 0.0);
        scheduler.schedule_in(Some(entity), TaskKind::StructureStateCheck, 0.0);
        scheduler.schedule_in(Some(entity), TaskKind::StructureDisplay, 0.0);
    }
}

/// Система: box trigger volume → ContributorProximity события
///
/// Контрибьютор: любой entity с ResourcePool. Здание помнит одного,
/// Exited приходит когда он вышел из volume или исчез из мира.
pub fn detect_contributors(
    structures: Query<(Entity, &Transform, &RepairSite), (With<Structure>, Without<Retired>)>,
    contributors: Query<(Entity, &Transform), With<ResourcePool>>,
    mut proximity: EventWriter<ContributorProximity>,
) {
    for (structure, transform, site) in structures.iter() {
        let center = transform.translation;

        if let Some(current) = site.contributor {
            let still_inside = contributors
                .get(current)
                .is_ok_and(|(_, t)| site.contains(center, t.translation));
            if !still_inside {
                proximity.write(ContributorProximity::Exited {
                    structure,
                    contributor: current,
                });
            }
            continue;
        }

        let entered = contributors
            .iter()
            .find(|(_, t)| site.contains(center, t.translation));
        if let Some((contributor, _)) = entered {
            proximity.write(ContributorProximity::Entered {
                structure,
                contributor,
            });
        }
    }
}

/// Система: применить enter/exit к RepairSite
pub fn apply_proximity_events(
    mut events: EventReader<ContributorProximity>,
    mut sites: Query<&mut RepairSite>,
) {
    for event in events.read() {
        match *event {
            ContributorProximity::Entered {
                structure,
                contributor,
            } => {
                if let Ok(mut site) = sites.get_mut(structure) {
                    site.contributor = Some(contributor);
                }
            }
            ContributorProximity::Exited {
                structure,
                contributor,
            } => {
                if let Ok(mut site) = sites.get_mut(structure) {
                    if site.contributor == Some(contributor) {
                        site.contributor = None;
                    }
                }
            }
        }
    }
}

/// Система: contribute тик (только пока Damaged)
pub fn structure_contribute(
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    config: Res<SimulationConfig>,
    mut structures: Query<(&mut Structure, &RepairSite)>,
    mut pools: Query<&mut ResourcePool>,
) {
    for entity in due.owners(TaskKind::StructureContribute) {
        let Ok((mut structure, site)) = structures.get_mut(entity) else {
            continue;
        };

        // Контрибьютор мог исчезнуть между тиками: тогда просто нет пула
        let mut pool = site.contributor.and_then(|c| pools.get_mut(c).ok());
        let transferred = structure.contribute(pool.as_deref_mut());

        debug_assert!(structure.resource_collected() <= structure.resource_needed());

        if transferred > 0 {
            crate::log(&format!(
                "🔧 Structure {:?}: +{} scrap ({}/{})",
                entity,
                transferred,
                structure.resource_collected(),
                structure.resource_needed()
            ));
        }

        if structure.state() == StructureState::Damaged {
            scheduler.schedule_in(
                Some(entity),
                TaskKind::StructureContribute,
                config.structure_timing.contribute_interval,
            );
        } else {
            crate::log_info(&format!("🏠 Structure {:?} repaired", entity));
        }
    }
}

/// Система: Repaired → смена модели → Finalized → подкрепления (ровно один раз)
#[allow(clippy::too_many_arguments)]
pub fn structure_check_state(
    mut commands: Commands,
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    config: Res<SimulationConfig>,
    mut rng: ResMut<DeterministicRng>,
    mut structures: Query<(
        &mut Structure,
        &mut StructureVisual,
        &StructureVariant,
        &StructureSpawnPoints,
        &Transform,
    )>,
    mut finalized: EventWriter<StructureFinalized>,
) {
    let timing = &config.structure_timing;

    for entity in due.owners(TaskKind::StructureStateCheck) {
        let Ok((mut structure, mut visual, variant, spawn_points, transform)) =
            structures.get_mut(entity)
        else {
            continue;
        };

        if structure.state() == StructureState::Repaired {
            // Старая модель уничтожается целиком, новая создаётся с нуля
            if let Some(old) = visual.model.take() {
                if let Ok(mut model) = commands.get_entity(old) {
                    model.despawn();
                }
            }

            let position = transform.translation;
            let model = commands
                .spawn(structure_model_bundle(
                    entity,
                    StructureState::Repaired,
                    &variant.repaired_model,
                    position,
                ))
                .id();
            visual.model = Some(model);

            if structure.finalize() {
                let mut reinforcements = Vec::new();
                for offset in spawn_points.0.iter() {
                    for _ in 0..timing.reinforcements_per_point {
                        reinforcements.push(spawn_agent(
                            &mut commands,
                            &config.allied,
                            Team::Allied,
                            position + *offset,
                            &mut rng.rng,
                        ));
                    }
                }

                crate::log_info(&format!(
                    "🏁 Structure {:?} finalized, {} reinforcements",
                    entity,
                    reinforcements.len()
                ));

                finalized.write(StructureFinalized {
                    structure: entity,
                    reinforcements,
                });

                scheduler.schedule_in(Some(entity), TaskKind::StructureRetire, timing.retire_delay);
            }
        }

        if structure.state() != StructureState::Finalized {
            scheduler.schedule_in(
                Some(entity),
                TaskKind::StructureStateCheck,
                timing.state_check_interval,
            );
        }
    }
}

/// Система: progress ratio в HUD каждые display_interval
pub fn publish_repair_progress(
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    config: Res<SimulationConfig>,
    structures: Query<&Structure>,
    mut hud: EventWriter<HudUpdate>,
) {
    for entity in due.owners(TaskKind::StructureDisplay) {
        let Ok(structure) = structures.get(entity) else {
            continue;
        };

        hud.write(HudUpdate(HudValue::RepairProgress {
            structure: entity,
            ratio: structure.progress_ratio(),
        }));

        scheduler.schedule_in(
            Some(entity),
            TaskKind::StructureDisplay,
            config.structure_timing.display_interval,
        );
    }
}

/// Система: после grace delay снять все задачи здания
///
/// Entity и Structure остаются: агрегатор продолжает их считать.
pub fn retire_structures(
    mut commands: Commands,
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
) {
    for entity in due.owners(TaskKind::StructureRetire) {
        let cancelled = scheduler.cancel_owner(entity);
        if let Ok(mut structure) = commands.get_entity(entity) {
            structure.insert(Retired);
        }
        crate::log(&format!(
            "Structure {:?} retired ({} pending tasks cancelled)",
            entity, cancelled
        ));
    }
}
