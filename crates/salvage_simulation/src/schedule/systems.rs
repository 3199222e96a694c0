//! Scheduler systems.

use bevy::ecs::entity::Entities;
use bevy::prelude::*;

use super::{DueTasks, TaskScheduler};

/// Система: продвинуть clock и собрать наступившие задачи
///
/// Задачи владельцев, которых уже нет в мире, выбрасываются без запуска.
pub fn advance_scheduler(
    mut scheduler: ResMut<TaskScheduler>,
    mut due: ResMut<DueTasks>,
    entities: &Entities,
    time: Res<Time<Fixed>>,
) {
    scheduler.advance(time.delta_secs_f64());
    due.clear();

    while let Some(task) = scheduler.pop_due() {
        if let Some(owner) = task.owner {
            if !entities.contains(owner) {
                continue;
            }
        }
        due.push(task);
    }
}
