//! Display collaborator (HUD)
//!
//! Fire-and-forget: симуляция пишет `HudUpdate`, внешний UI читает.
//! Headless режим складывает последние значения в `HudReadout`.

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::structure::Structure;

/// Значение для отображения
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudValue {
    /// Сколько зданий в Finalized (Progress Aggregator)
    FinishedStructures(u32),
    PlayerHealthRatio(f32),
    PlayerStaminaRatio(f32),
    ScrapCount(u32),
    /// Прогресс ремонта здания (0..=1)
    RepairProgress { structure: Entity, ratio: f32 },
}

/// Event: новое значение для HUD
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HudUpdate(pub HudValue);

/// Последнее значение каждого канала
#[derive(Resource, Debug, Default, Clone)]
pub struct HudReadout {
    pub finished_structures: Option<u32>,
    pub player_health_ratio: Option<f32>,
    pub player_stamina_ratio: Option<f32>,
    pub scrap_count: Option<u32>,
    pub repair_progress: BTreeMap<Entity, f32>,
    /// Всего принятых обновлений
    pub updates_received: u64,
}

impl HudReadout {
    pub fn apply(&mut self, value: HudValue) {
        self.updates_received += 1;
        match value {
            HudValue::FinishedStructures(count) => self.finished_structures = Some(count),
            HudValue::PlayerHealthRatio(ratio) => self.player_health_ratio = Some(ratio),
            HudValue::PlayerStaminaRatio(ratio) => self.player_stamina_ratio = Some(ratio),
            HudValue::ScrapCount(count) => self.scrap_count = Some(count),
            HudValue::RepairProgress { structure, ratio } => {
                self.repair_progress.insert(structure, ratio);
            }
        }
    }
}

/// Система: применить HudUpdate к HudReadout
///
/// Прогресс despawned зданий выкидывается из readout.
pub fn record_hud_updates(
    mut updates: EventReader<HudUpdate>,
    mut removed: RemovedComponents<Structure>,
    mut readout: ResMut<HudReadout>,
) {
    for HudUpdate(value) in updates.read() {
        readout.apply(*value);
    }

    for structure in removed.read() {
        readout.repair_progress.remove(&structure);
    }
}

/// HUD Plugin (SimulationSet::Report)
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HudUpdate>()
            .init_resource::<HudReadout>()
            .add_systems(
                FixedUpdate,
                record_hud_updates.in_set(crate::SimulationSet::Report),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_keeps_latest_value_per_channel() {
        let mut readout = HudReadout::default();
        readout.apply(HudValue::FinishedStructures(1));
        readout.apply(HudValue::ScrapCount(12));
        readout.apply(HudValue::FinishedStructures(2));

        assert_eq!(readout.finished_structures, Some(2));
        assert_eq!(readout.scrap_count, Some(12));
        assert_eq!(readout.player_health_ratio, None);
        assert_eq!(readout.updates_received, 3);
    }

    #[test]
    fn test_repair_progress_per_structure() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut readout = HudReadout::default();
        readout.apply(HudValue::RepairProgress { structure: a, ratio: 0.25 });
        readout.apply(HudValue::RepairProgress { structure: b, ratio: 1.0 });
        readout.apply(HudValue::RepairProgress { structure: a, ratio: 0.5 });

        assert_eq!(readout.repair_progress.get(&a), Some(&0.5));
        assert_eq!(readout.repair_progress.get(&b), Some(&1.0));
    }

    #[test]
    fn test_despawned_structure_drops_out_of_readout() {
        let mut app = App::new();
        app.add_event::<HudUpdate>()
            .init_resource::<HudReadout>()
            .add_systems(Update, record_hud_updates);

        let kept = app.world_mut().spawn(Structure::new(0, 10, 1, 2)).id();
        let gone = app.world_mut().spawn(Structure::new(0, 10, 1, 2)).id();

        for structure in [kept, gone] {
            app.world_mut().send_event(HudUpdate(HudValue::RepairProgress {
                structure,
                ratio: 0.4,
            }));
        }
        app.update();
        assert_eq!(app.world().resource::<HudReadout>().repair_progress.len(), 2);

        app.world_mut().entity_mut(gone).despawn();
        app.update();

        let readout = app.world().resource::<HudReadout>();
        assert_eq!(readout.repair_progress.get(&kept), Some(&0.4));
        assert!(!readout.repair_progress.contains_key(&gone));
    }
}
