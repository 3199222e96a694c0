//! AI systems

pub mod fsm;
pub mod lifecycle;

pub use fsm::{agent_attack, agent_move, agent_search};
pub use lifecycle::{
    expire_death_effects, register_agent_tasks, release_dead_agents, roll_loot_count, scatter_position, spawn_agent,
    AgentReleased,
};
