//! Tests for task scheduler.

#[cfg(test)]
mod tests {
    use super::super::{DueTasks, TaskKind, TaskScheduler};
    use bevy::prelude::*;

    fn drain(scheduler: &mut TaskScheduler) -> Vec<(TaskKind, u64)> {
        let mut out = Vec::new();
        while let Some(task) = scheduler.pop_due() {
            out.push((task.kind, task.seq));
        }
        out
    }

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut scheduler = TaskScheduler::default();
        scheduler.schedule_in(None, TaskKind::AgentAttack, 0.5);
        scheduler.schedule_in(None, TaskKind::AgentSearch, 0.1);
        scheduler.schedule_in(None, TaskKind::AgentMove, 0.25);

        assert!(drain(&mut scheduler).is_empty());

        scheduler.advance(0.3);
        let fired: Vec<_> = drain(&mut scheduler).into_iter().map(|(k, _)| k).collect();
        assert_eq!(fired, vec![TaskKind::AgentSearch, TaskKind::AgentMove]);

        scheduler.advance(0.3);
        let fired: Vec<_> = drain(&mut scheduler).into_iter().map(|(k, _)| k).collect();
        assert_eq!(fired, vec![TaskKind::AgentAttack]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_equal_due_resolves_by_insertion_order() {
        let mut scheduler = TaskScheduler::default();
        let first = scheduler.schedule_in(None, TaskKind::StructureContribute, 0.1);
        let second = scheduler.schedule_in(None, TaskKind::StructureStateCheck, 0.1);

        scheduler.advance(0.1);
        let fired = drain(&mut scheduler);
        assert_eq!(fired[0].1, first);
        assert_eq!(fired[1].1, second);
    }

    #[test]
    fn test_cancel_owner_removes_only_that_owner() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut scheduler = TaskScheduler::default();
        scheduler.schedule_in(Some(a), TaskKind::AgentSearch, 0.1);
        scheduler.schedule_in(Some(a), TaskKind::AgentMove, 0.1);
        scheduler.schedule_in(Some(b), TaskKind::AgentSearch, 0.1);
        scheduler.schedule_in(None, TaskKind::ProgressPoll, 1.0);

        assert_eq!(scheduler.pending_for(a), 2);
        assert_eq!(scheduler.cancel_owner(a), 2);
        assert_eq!(scheduler.pending_for(a), 0);
        assert_eq!(scheduler.pending_for(b), 1);
        assert!(scheduler.is_scheduled(None, TaskKind::ProgressPoll));
    }

    #[test]
    fn test_accumulated_fixed_steps_hit_interval() {
        // 6 шагов по 1/60 == 0.1 с: задача должна сработать ровно на шестом
        let mut scheduler = TaskScheduler::default();
        scheduler.schedule_in(None, TaskKind::StructureContribute, 0.1);

        let mut fired_at = None;
        for step in 1..=10 {
            scheduler.advance(1.0 / 60.0);
            if scheduler.pop_due().is_some() {
                fired_at = Some(step);
                break;
            }
        }
        assert_eq!(fired_at, Some(6));
    }

    #[test]
    fn test_due_tasks_filters_by_kind() {
        let mut world = World::new();
        let a = world.spawn_empty().id();

        let mut scheduler = TaskScheduler::default();
        scheduler.schedule_in(Some(a), TaskKind::AgentSearch, 0.0);
        scheduler.schedule_in(None, TaskKind::ProgressPoll, 0.0);

        let mut due = DueTasks::default();
        while let Some(task) = scheduler.pop_due() {
            due.push(task);
        }

        assert_eq!(due.owners(TaskKind::AgentSearch), vec![a]);
        assert!(due.owners(TaskKind::AgentMove).is_empty());
        assert!(due.has_global(TaskKind::ProgressPoll));
        assert!(!due.has_global(TaskKind::AgentSearch));
    }
}
