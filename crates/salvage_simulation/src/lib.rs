//! SALVAGE Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16:
//! - Agent Combat FSM (hostile + allied, один FSM с разными профилями)
//! - Structure Progression FSM (Damaged → Repaired → Finalized)
//! - Progress Aggregator
//!
//! Physics, pathfinding, рендер и UI: внешние коллабораторы. Здесь их
//! headless реализации: `SpatialIndex`, `drive_navigation`, `HudReadout`.
//!
//! Все периодические циклы идут через `TaskScheduler` (priority queue due-времён)
//! внутри FixedUpdate 60 Hz.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod hud;
pub mod logger;
pub mod navigation;
pub mod player;
pub mod progress;
pub mod schedule;
pub mod spatial;
pub mod spawner;
pub mod structure;

// Re-export для удобства
pub use ai::{AIPlugin, Agent, AgentProfile, AgentReleased, AgentState, CombatTarget, ReturnPolicy};
pub use combat::{CombatPlugin, DamageDealt, DamageRequest, EntityDied, ShotFired};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use hud::{HudPlugin, HudReadout, HudUpdate, HudValue};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use navigation::NavigationPlugin;
pub use player::{Player, PlayerPlugin, SessionEnded, SessionState};
pub use progress::ProgressPlugin;
pub use schedule::{SchedulePlugin, TaskKind, TaskScheduler};
pub use spawner::{EnemySpawner, SpawnerPlugin};
pub use structure::{Structure, StructurePlugin, StructureState};

/// Порядок фаз fixed тика (chain)
///
/// Schedule → Decide → Resolve → Lifecycle → Progression → Motion → Report
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Clock + due задачи, регистрация задач новых entities
    Schedule,
    /// FSM решения, proximity, ввод игрока
    Decide,
    /// Выстрелы и урон
    Resolve,
    /// Смерть, release, спавнеры
    Lifecycle,
    /// Structure progression, aggregator, scrap
    Progression,
    /// Navigation
    Motion,
    /// HUD
    Report,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Seed из create_headless_app не перезаписываем
            .init_resource::<DeterministicRng>()
            .init_resource::<SimulationConfig>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Schedule,
                    SimulationSet::Decide,
                    SimulationSet::Resolve,
                    SimulationSet::Lifecycle,
                    SimulationSet::Progression,
                    SimulationSet::Motion,
                    SimulationSet::Report,
                )
                    .chain(),
            )
            .add_plugins((
                SchedulePlugin,
                AIPlugin,
                CombatPlugin,
                NavigationPlugin,
                StructurePlugin,
                ProgressPlugin,
                PlayerPlugin,
                SpawnerPlugin,
                HudPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` двигает виртуальное время ровно на один fixed шаг,
/// так что прогон воспроизводим независимо от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let step = Time::<Fixed>::from_hz(60.0).timestep();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
