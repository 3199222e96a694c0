//! Task scheduler: periodic per-entity задачи на priority queue
//!
//! # Архитектура
//!
//! **FixedUpdate (60 Hz)** → advance_scheduler
//!   ├─ clock += fixed delta
//!   ├─ все задачи с due <= now → DueTasks (порядок: due, затем seq)
//!   └─ задачи despawned владельцев выбрасываются (никогда не посещаем released entity)
//!
//! FSM системы читают свои `TaskKind` из `DueTasks` и сами перепланируют
//! следующий запуск через `interval` (семантика "подождать и повторить").
//! У каждого поведения своя частота: поиск, движение и атака не совпадают по тикам.

use bevy::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

pub mod systems;

#[cfg(test)]
mod scheduler_tests;

pub use systems::advance_scheduler;

/// Допуск сравнения due-времени (накопление f64 delta не должно сдвигать тик)
const DUE_EPSILON: f64 = 1e-6;

/// Вид периодической задачи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TaskKind {
    /// Searching: поиск ближайшей цели
    AgentSearch,
    /// Tracking / ReturningToStart: обновление destination
    AgentMove,
    /// Attacking: удар/выстрел
    AgentAttack,
    /// Damaged: перенос scrap от контрибьютора
    StructureContribute,
    /// Repaired → Finalized: смена модели + finalization effect
    StructureStateCheck,
    /// Публикация progress ratio в HUD
    StructureDisplay,
    /// Отключение structure после grace delay
    StructureRetire,
    /// Progress Aggregator (глобальная задача)
    ProgressPoll,
    /// Enemy spawner roll
    EnemySpawn,
}

/// Запись в очереди: кто, что и когда
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTask {
    pub due: f64,
    pub seq: u64,
    /// None = глобальная задача (не отменяется деспавном)
    pub owner: Option<Entity>,
    pub kind: TaskKind,
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Центральная очередь задач (min-heap по due)
#[derive(Resource, Debug, Default)]
pub struct TaskScheduler {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<ScheduledTask>>,
}

impl TaskScheduler {
    /// Текущее время симуляции (секунды)
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn advance(&mut self, delta: f64) {
        self.now += delta.max(0.0);
    }

    /// Запланировать задачу через `delay` секунд от текущего времени
    pub fn schedule_in(&mut self, owner: Option<Entity>, kind: TaskKind, delay: f32) -> u64 {
        let due = self.now + f64::from(delay.max(0.0));
        self.schedule_at(owner, kind, due)
    }

    pub fn schedule_at(&mut self, owner: Option<Entity>, kind: TaskKind, due: f64) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(ScheduledTask {
            due,
            seq,
            owner,
            kind,
        }));
        seq
    }

    /// Достать следующую задачу если она уже наступила
    pub fn pop_due(&mut self) -> Option<ScheduledTask> {
        let Reverse(next) = self.queue.peek()?;
        if next.due > self.now + DUE_EPSILON {
            return None;
        }
        self.queue.pop().map(|Reverse(task)| task)
    }

    /// Отменить все задачи владельца. Возвращает число отменённых.
    pub fn cancel_owner(&mut self, owner: Entity) -> usize {
        let before = self.queue.len();
        self.queue
            .retain(|Reverse(task)| task.owner != Some(owner));
        before - self.queue.len()
    }

    pub fn pending_for(&self, owner: Entity) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(task)| task.owner == Some(owner))
            .count()
    }

    pub fn is_scheduled(&self, owner: Option<Entity>, kind: TaskKind) -> bool {
        self.queue
            .iter()
            .any(|Reverse(task)| task.owner == owner && task.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Задачи, наступившие в текущем fixed тике
#[derive(Resource, Debug, Default)]
pub struct DueTasks {
    tasks: Vec<ScheduledTask>,
}

impl DueTasks {
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn push(&mut self, task: ScheduledTask) {
        self.tasks.push(task);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter()
    }

    /// Владельцы задач данного вида (в порядке due/seq)
    pub fn owners(&self, kind: TaskKind) -> Vec<Entity> {
        self.tasks
            .iter()
            .filter(|task| task.kind == kind)
            .filter_map(|task| task.owner)
            .collect()
    }

    /// Наступила ли глобальная задача данного вида
    pub fn has_global(&self, kind: TaskKind) -> bool {
        self.tasks
            .iter()
            .any(|task| task.kind == kind && task.owner.is_none())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Schedule Plugin: clock + dispatch due задач
pub struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TaskScheduler>()
            .init_resource::<DueTasks>()
            .add_systems(
                FixedUpdate,
                advance_scheduler.in_set(crate::SimulationSet::Schedule),
            );
    }
}
