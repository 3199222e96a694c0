//! AI module: Agent Combat FSM для hostile и allied агентов
//!
//! ECS ответственность:
//! - Один FSM, параметризованный `AgentProfile` (фильтр целей, атака, return policy)
//! - Решения на своих TaskKind (search / move / attack с разными интервалами)
//! - Смерть → лут, death effect, отмена задач, despawn
//!
//! Мир виден только через Spatial Query, движение только через MovementCommand.

use bevy::prelude::*;

pub mod components;
pub mod systems;
pub mod targeting;
pub mod transitions;

pub use components::*;
pub use systems::{
    agent_attack, agent_move, agent_search, expire_death_effects, register_agent_tasks, release_dead_agents,
    roll_loot_count, scatter_position, spawn_agent, AgentReleased,
};
pub use targeting::select_nearest;

/// AI Plugin
///
/// Порядок (FixedUpdate):
/// - Schedule: register_agent_tasks (после advance_scheduler)
/// - Decide: agent_search → agent_move → agent_attack
/// - Lifecycle: expire_death_effects → release_dead_agents (после Resolve, смерть в том же тике)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Agent>()
            .register_type::<AgentState>()
            .register_type::<CombatTarget>()
            .register_type::<AgentProfile>()
            .add_event::<AgentReleased>();

        app.add_systems(
            FixedUpdate,
            (
                register_agent_tasks
                    .in_set(crate::SimulationSet::Schedule)
                    .after(crate::schedule::advance_scheduler),
                (agent_search, agent_move, agent_attack)
                    .chain()
                    .in_set(crate::SimulationSet::Decide),
                (expire_death_effects, release_dead_agents)
                    .chain()
                    .in_set(crate::SimulationSet::Lifecycle),
            ),
        );
    }
}
