//! Headless прогон симуляции
//!
//! salvage_simulation [config.json] [--ticks N]
//!
//! Сцена: игрок с запасом scrap идёт к зданию, два спавнера врагов.
//! Раз в симулированную секунду печатается HUD.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;
use salvage_simulation::player::spawn_player;
use salvage_simulation::structure::spawn_structure;
use salvage_simulation::{
    create_headless_app, log_info, DeterministicRng, EnemySpawner, HudReadout, MovementCommand,
    SessionState, SimulationConfig, SimulationPlugin,
};

const DEFAULT_TICKS: u32 = 60 * 120;

/// Headless salvage simulation run
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config (без него: демо-конфиг)
    config: Option<PathBuf>,

    /// Сколько fixed тиков (60 в секунду) прогнать
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u32,
}

fn setup_scene(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut rng: ResMut<DeterministicRng>,
) {
    let structure_a = Vec3::new(20.0, 0.0, 0.0);
    let structure_b = Vec3::new(-20.0, 0.0, 10.0);
    spawn_structure(&mut commands, &config, structure_a, &mut rng.rng);
    spawn_structure(&mut commands, &config, structure_b, &mut rng.rng);

    let player = spawn_player(&mut commands, &config.player, Vec3::ZERO);
    commands
        .entity(player)
        .insert(MovementCommand::MoveToPosition { target: structure_a });

    for position in [Vec3::new(0.0, 0.0, 35.0), Vec3::new(30.0, 0.0, -30.0)] {
        commands.spawn((
            EnemySpawner::from(&config.spawner),
            Transform::from_translation(position),
        ));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => SimulationConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => {
            // Демо без конфига: игроку хватает scrap на любой вариант
            let mut demo = SimulationConfig::default();
            demo.player.starting_scrap = 200;
            demo
        }
    };

    let mut app = create_headless_app(42);
    app.insert_resource(config)
        .add_plugins(SimulationPlugin)
        .add_systems(Startup, setup_scene);

    for tick in 1..=args.ticks {
        app.update();

        if tick % 60 == 0 {
            let hud = app.world().resource::<HudReadout>();
            log_info(&format!(
                "t={:>4}s finished={:?} health={:?} scrap={:?} repairs={:?}",
                tick / 60,
                hud.finished_structures,
                hud.player_health_ratio,
                hud.scrap_count,
                hud.repair_progress.values().collect::<Vec<_>>()
            ));
        }

        if app.world().resource::<SessionState>().ended {
            log_info(&format!("Session ended at tick {}", tick));
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_to_demo_run() {
        let args = Args::try_parse_from(["salvage_simulation"]).expect("no args is valid");
        assert!(args.config.is_none());
        assert_eq!(args.ticks, DEFAULT_TICKS);
    }

    #[test]
    fn test_args_config_and_ticks() {
        let args = Args::try_parse_from(["salvage_simulation", "scene.json", "--ticks", "600"])
            .expect("valid args");
        assert_eq!(args.config, Some(PathBuf::from("scene.json")));
        assert_eq!(args.ticks, 600);

        assert!(Args::try_parse_from(["salvage_simulation", "--ticks", "soon"]).is_err());
    }
}
