//! Agent lifecycle: регистрация задач, смерть, лут, release.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::components::{agent_bundle, Agent, AgentProfile, LootTable};
use crate::components::{DeathEffect, Health, Scrap, Team};
use crate::schedule::{TaskKind, TaskScheduler};
use crate::DeterministicRng;

/// Event: агент уничтожен и удалён из мира
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentReleased {
    pub entity: Entity,
    pub position: Vec3,
    pub loot_count: u32,
}

/// Система: запланировать search/move/attack для новых агентов
///
/// Первый запуск сразу на следующем тике, дальше каждое поведение
/// перепланирует себя само.
pub fn register_agent_tasks(
    mut scheduler: ResMut<TaskScheduler>,
    new_agents: Query<Entity, Added<Agent>>,
) {
    for entity in new_agents.iter() {
        scheduler.schedule_in(Some(entity), TaskKind::AgentSearch, 0.0);
        scheduler.schedule_in(Some(entity), TaskKind::AgentMove, 0.0);
        scheduler.schedule_in(Some(entity), TaskKind::AgentAttack, 0.0);
    }
}

/// Количество лута: равномерно в [min, max), min для пустого диапазона
pub fn roll_loot_count(loot: &LootTable, rng: &mut impl Rng) -> u32 {
    if loot.max_count > loot.min_count {
        rng.gen_range(loot.min_count..loot.max_count)
    } else {
        loot.min_count
    }
}

/// Точка выпадения: XZ квадрат ±scatter вокруг origin, фиксированная высота
pub fn scatter_position(origin: Vec3, loot: &LootTable, rng: &mut impl Rng) -> Vec3 {
    let spread = loot.scatter.abs();
    Vec3::new(
        origin.x + rng.gen_range(-spread..=spread),
        loot.drop_height,
        origin.z + rng.gen_range(-spread..=spread),
    )
}

/// Система: мёртвые агенты (health <= 0) удаляются в том же тике
///
/// Порядок: лут → death effect → отмена задач → despawn → AgentReleased.
pub fn release_dead_agents(
    mut commands: Commands,
    mut scheduler: ResMut<TaskScheduler>,
    mut rng: ResMut<DeterministicRng>,
    agents: Query<(Entity, &Transform, &Health, &AgentProfile), With<Agent>>,
    mut released: EventWriter<AgentReleased>,
) {
    for (entity, transform, health, profile) in agents.iter() {
        if health.is_alive() {
            continue;
        }

        let position = transform.translation;
        let mut loot_count = 0;

        if let Some(loot) = profile.loot.as_ref() {
            loot_count = roll_loot_count(loot, &mut rng.rng);
            for _ in 0..loot_count {
                let drop = scatter_position(position, loot, &mut rng.rng);
                commands.spawn((Scrap, Transform::from_translation(drop)));
            }
        }

        commands.spawn((DeathEffect::new(position), Transform::from_translation(position)));

        let cancelled = scheduler.cancel_owner(entity);
        commands.entity(entity).despawn();

        crate::log_info(&format!(
            "☠️ Agent {:?} released at {:?}: {} scrap dropped, {} tasks cancelled",
            entity, position, loot_count, cancelled
        ));

        released.write(AgentReleased {
            entity,
            position,
            loot_count,
        });
    }
}

/// Система: despawn отыгравших death effects
pub fn expire_death_effects(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut effects: Query<(Entity, &mut DeathEffect)>,
) {
    let dt = time.delta_secs();
    for (entity, mut effect) in effects.iter_mut() {
        if effect.tick(dt) {
            commands.entity(entity).despawn();
        }
    }
}

/// Заспавнить агента: attack cadence фиксируется один раз на агента
pub fn spawn_agent(
    commands: &mut Commands,
    profile: &AgentProfile,
    team: Team,
    position: Vec3,
    rng: &mut impl Rng,
) -> Entity {
    let profile = profile.resolved(rng);
    commands.spawn(agent_bundle(profile, team, position)).id()
}
