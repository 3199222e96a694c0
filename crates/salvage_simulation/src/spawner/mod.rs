//! Enemy spawner: каждые `interval` бросок 0..100, при `roll <= chance`: hostile агент
//!
//! Здоровье масштабируется `game_time_factor / 100`, точка спавнера = дом агента.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{spawn_agent, AgentProfile};
use crate::components::Team;
use crate::config::{SimulationConfig, SpawnerSettings};
use crate::schedule::{DueTasks, TaskKind, TaskScheduler};
use crate::DeterministicRng;

/// Точка спавна врагов
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EnemySpawner {
    pub interval: f32,
    pub chance_percent: u32,
    pub game_time_factor: f32,
}

impl From<&SpawnerSettings> for EnemySpawner {
    fn from(settings: &SpawnerSettings) -> Self {
        Self {
            interval: settings.interval,
            chance_percent: settings.chance_percent,
            game_time_factor: settings.game_time_factor,
        }
    }
}

/// Выпал ли спавн (бросок 0..100 включительно сравнивается с шансом)
pub fn roll_spawn(chance_percent: u32, rng: &mut impl Rng) -> bool {
    let roll: u32 = rng.gen_range(0..100);
    roll <= chance_percent
}

/// Профиль заспавненного врага: здоровье * factor / 100, не меньше 1
pub fn scaled_profile(base: &AgentProfile, game_time_factor: f32) -> AgentProfile {
    let mut profile = base.clone();
    profile.health = (base.health * game_time_factor / 100.0).max(1.0);
    profile
}

/// Система: новые спавнеры получают свою периодическую задачу
pub fn register_spawners(
    mut scheduler: ResMut<TaskScheduler>,
    spawners: Query<Entity, Added<EnemySpawner>>,
) {
    for entity in spawners.iter() {
        scheduler.schedule_in(Some(entity), TaskKind::EnemySpawn, 0.0);
    }
}

/// Система: бросок спавна для каждого наступившего спавнера
pub fn run_enemy_spawners(
    mut commands: Commands,
    due: Res<DueTasks>,
    mut scheduler: ResMut<TaskScheduler>,
    config: Res<SimulationConfig>,
    mut rng: ResMut<DeterministicRng>,
    spawners: Query<(&EnemySpawner, &Transform)>,
) {
    for entity in due.owners(TaskKind::EnemySpawn) {
        let Ok((spawner, transform)) = spawners.get(entity) else {
            continue;
        };

        if roll_spawn(spawner.chance_percent, &mut rng.rng) {
            let profile = scaled_profile(&config.hostile, spawner.game_time_factor);
            let position = transform.translation;
            let agent = spawn_agent(&mut commands, &profile, Team::Hostile, position, &mut rng.rng);
            crate::log(&format!("👹 Spawner {:?} spawned hostile {:?} at {:?}", entity, agent, position));
        }

        scheduler.schedule_in(Some(entity), TaskKind::EnemySpawn, spawner.interval);
    }
}

/// Spawner Plugin (SimulationSet::Lifecycle)
pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<EnemySpawner>().add_systems(
            FixedUpdate,
            (
                register_spawners
                    .in_set(crate::SimulationSet::Schedule)
                    .after(crate::schedule::advance_scheduler),
                run_enemy_spawners
                    .in_set(crate::SimulationSet::Lifecycle)
                    .after(crate::ai::release_dead_agents),
            ),
        );
    }
}
