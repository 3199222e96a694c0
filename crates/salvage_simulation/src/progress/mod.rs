//! Progress Aggregator
//!
//! Глобальная задача каждые `progress_poll_interval`: заново перечислить
//! живые здания (никакого кэша между опросами), посчитать Finalized,
//! отправить число в HUD.

use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::hud::{HudUpdate, HudValue};
use crate::schedule::{DueTasks, TaskKind, TaskScheduler};
use crate::structure::{Structure, StructureState};

/// Сколько зданий в Finalized
pub fn count_finalized<'a>(structures: impl IntoIterator<Item = &'a Structure>) -> u32 {
    structures
        .into_iter()
        .filter(|s| s.state() == StructureState::Finalized)
        .count() as u32
}

/// Startup: первая проверка сразу на первом тике
pub fn start_progress_poll(mut scheduler: ResMut<TaskScheduler>) {
    if !scheduler.is_scheduled(None, TaskKind::ProgressPoll) {
        scheduler.schedule_in(None, TaskKind::ProgressPoll, 0.0);
    }
}

/// Система: опрос зданий по глобальной задаче ProgressPoll
pub fn poll_finished_structures(
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    config: Res<SimulationConfig>,
    structures: Query<&Structure>,
    mut hud: EventWriter<HudUpdate>,
) {
    if !due.has_global(TaskKind::ProgressPoll) {
        return;
    }

    let finished = count_finalized(structures.iter());
    hud.write(HudUpdate(HudValue::FinishedStructures(finished)));

    scheduler.schedule_in(None, TaskKind::ProgressPoll, config.progress_poll_interval);
}

/// Progress Plugin (SimulationSet::Progression, после структур)
pub struct ProgressPlugin;

impl Plugin for ProgressPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, start_progress_poll).add_systems(
            FixedUpdate,
            poll_finished_structures
                .in_set(crate::SimulationSet::Progression)
                .after(crate::structure::retire_structures),
        );
    }
}
