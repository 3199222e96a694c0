//! Agent Combat FSM systems (search, move, attack).
//!
//! Каждое поведение тикает на своём TaskKind со своим интервалом.
//! Цель это weak reference, перед каждым использованием перепроверяем через
//! `SpatialQuery::live_position`, stale цель == "нет цели".

use bevy::prelude::*;

use crate::ai::components::{Agent, AgentProfile, AgentState, AttackKind, CombatTarget};
use crate::ai::targeting::select_nearest;
use crate::ai::transitions::{decide_attack, decide_return, decide_tracking};
use crate::combat::{DamageRequest, ShotFired};
use crate::components::{HomePosition, MovementCommand};
use crate::schedule::{DueTasks, TaskKind, TaskScheduler};
use crate::spatial::{SpatialIndex, SpatialQuery};

/// Смена состояния с логом (self-loop: no-op)
pub(crate) fn transition(entity: Entity, state: &mut AgentState, next: AgentState) {
    if *state == next {
        return;
    }

    debug_assert!(
        state.allows(next),
        "undeclared transition {:?} → {:?}",
        *state,
        next
    );

    crate::log(&format!("🧠 Agent {:?}: {:?} → {:?}", entity, *state, next));
    *state = next;
}

/// Вход в Searching: цель сбрасывается, движение останавливается
fn fall_back_to_searching(
    entity: Entity,
    state: &mut AgentState,
    target: &mut CombatTarget,
    command: &mut MovementCommand,
) {
    target.0 = None;
    *command = MovementCommand::Idle;
    transition(entity, state, AgentState::Searching);
}

/// Система (Searching): поиск ближайшей цели каждые search_interval
pub fn agent_search(
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    spatial: SpatialIndex,
    mut agents: Query<(&Transform, &AgentProfile, &mut AgentState, &mut CombatTarget), With<Agent>>,
) {
    for entity in due.owners(TaskKind::AgentSearch) {
        let Ok((transform, profile, mut state, mut target)) = agents.get_mut(entity) else {
            continue;
        };

        scheduler.schedule_in(Some(entity), TaskKind::AgentSearch, profile.search_interval);

        if *state != AgentState::Searching {
            continue;
        }

        let position = transform.translation;
        let candidates = spatial
            .query_nearby(position, profile.search_radius, profile.targets)
            .into_iter()
            .filter(|(candidate, _)| *candidate != entity);

        if let Some(found) = select_nearest(position, candidates) {
            target.0 = Some(found);
            transition(entity, &mut state, AgentState::Tracking);
        }
    }
}

/// Система (Tracking / ReturningToStart): обновление destination каждые move_interval
pub fn agent_move(
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    spatial: SpatialIndex,
    mut agents: Query<
        (
            &Transform,
            &HomePosition,
            &AgentProfile,
            &mut AgentState,
            &mut CombatTarget,
            &mut MovementCommand,
        ),
        With<Agent>,
    >,
) {
    for entity in due.owners(TaskKind::AgentMove) {
        let Ok((transform, home, profile, mut state, mut target, mut command)) =
            agents.get_mut(entity)
        else {
            continue;
        };

        scheduler.schedule_in(Some(entity), TaskKind::AgentMove, profile.move_interval);

        let position = transform.translation;
        let target_position = target.0.and_then(|t| spatial.live_position(t));

        match *state {
            AgentState::Tracking => {
                let Some(chase) = target_position else {
                    fall_back_to_searching(entity, &mut state, &mut target, &mut command);
                    continue;
                };

                let next = decide_tracking(profile, position, home.0, Some(chase));
                *command = match next {
                    AgentState::ReturningToStart => MovementCommand::MoveToPosition { target: home.0 },
                    AgentState::Attacking => MovementCommand::Hold {
                        at: position,
                        face: chase,
                    },
                    _ => MovementCommand::MoveToPosition { target: chase },
                };
                transition(entity, &mut state, next);
            }
            AgentState::ReturningToStart => {
                if target_position.is_none() {
                    target.0 = None;
                }

                match decide_return(profile, position, home.0, target_position) {
                    AgentState::Searching => {
                        fall_back_to_searching(entity, &mut state, &mut target, &mut command);
                    }
                    AgentState::Attacking => {
                        if let Some(face) = target_position {
                            *command = MovementCommand::Hold { at: position, face };
                        }
                        transition(entity, &mut state, AgentState::Attacking);
                    }
                    _ => {
                        *command = MovementCommand::MoveToPosition { target: home.0 };
                    }
                }
            }
            AgentState::Searching | AgentState::Attacking => {}
        }
    }
}

/// Система (Attacking): стоим, смотрим на цель, бьём каждые attack_interval
///
/// Сначала атака, потом проверка дистанции (цель могла уйти с прошлого тика).
pub fn agent_attack(
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    spatial: SpatialIndex,
    mut agents: Query<
        (
            &Transform,
            &AgentProfile,
            &mut AgentState,
            &mut CombatTarget,
            &mut MovementCommand,
        ),
        With<Agent>,
    >,
    mut damage_requests: EventWriter<DamageRequest>,
    mut shots: EventWriter<ShotFired>,
) {
    for entity in due.owners(TaskKind::AgentAttack) {
        let Ok((transform, profile, mut state, mut target, mut command)) = agents.get_mut(entity)
        else {
            continue;
        };

        scheduler.schedule_in(Some(entity), TaskKind::AgentAttack, profile.attack_interval);

        if *state != AgentState::Attacking {
            continue;
        }

        let position = transform.translation;
        let live = target
            .0
            .and_then(|t| spatial.live_position(t).map(|p| (t, p)));

        let Some((victim, victim_position)) = live else {
            fall_back_to_searching(entity, &mut state, &mut target, &mut command);
            continue;
        };

        *command = MovementCommand::Hold {
            at: position,
            face: victim_position,
        };

        match profile.attack {
            AttackKind::Melee { damage } => {
                damage_requests.write(DamageRequest {
                    attacker: entity,
                    target: victim,
                    amount: damage,
                });
            }
            AttackKind::Hitscan { damage, range } => {
                shots.write(ShotFired {
                    shooter: entity,
                    origin: position,
                    direction: victim_position - position,
                    range,
                    damage,
                    filter: profile.targets,
                });
            }
        }

        let next = decide_attack(profile, position, Some(victim_position));
        if next == AgentState::Tracking {
            *command = MovementCommand::MoveToPosition {
                target: victim_position,
            };
        }
        transition(entity, &mut state, next);
    }
}
