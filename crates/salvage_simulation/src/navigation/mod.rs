//! Navigation Service (headless)
//!
//! FSM пишет MovementCommand, здесь Transform двигается к destination
//! не больше чем на `speed * dt` за тик. Телепортов нет.

use bevy::prelude::*;

use crate::components::{MovementCommand, NavAgent};

/// Новая позиция после одного шага к `target`
///
/// Внутри `stopping_distance` стоим на месте, иначе идём вплотную к цели
/// (шаг не длиннее `max_step`, перелёта нет).
pub fn step_toward(current: Vec3, target: Vec3, max_step: f32, stopping_distance: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();

    if distance <= stopping_distance || distance <= f32::EPSILON {
        return current;
    }

    if distance <= max_step {
        target
    } else {
        current + offset / distance * max_step
    }
}

fn face_toward(transform: &mut Transform, point: Vec3) {
    let flat = Vec3::new(point.x, transform.translation.y, point.z);
    if flat.distance_squared(transform.translation) > 1e-6 {
        transform.look_at(flat, Vec3::Y);
    }
}

/// Система: выполнить MovementCommand всех навигационных агентов
pub fn drive_navigation(
    time: Res<Time<Fixed>>,
    mut agents: Query<(&mut Transform, &NavAgent, &MovementCommand)>,
) {
    let max_travel = time.delta_secs();

    for (mut transform, nav, command) in agents.iter_mut() {
        match *command {
            MovementCommand::Idle => {}
            MovementCommand::MoveToPosition { target } => {
                let next = step_toward(
                    transform.translation,
                    target,
                    nav.speed * max_travel,
                    nav.stopping_distance,
                );
                if next != transform.translation {
                    face_toward(&mut transform, next);
                    transform.translation = next;
                }
            }
            MovementCommand::Hold { at, face } => {
                let next = step_toward(transform.translation, at, nav.speed * max_travel, 0.0);
                transform.translation = next;
                face_toward(&mut transform, face);
            }
        }
    }
}

/// Navigation Plugin (SimulationSet::Motion)
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MovementCommand>()
            .register_type::<NavAgent>()
            .add_systems(
                FixedUpdate,
                drive_navigation.in_set(crate::SimulationSet::Motion),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_step_is_bounded_by_speed() {
        let next = step_toward(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.5, 0.5);
        assert_eq!(next, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_step_lands_on_close_target() {
        let next = step_toward(Vec3::ZERO, Vec3::new(0.3, 0.0, 0.4), 1.0, 0.0);
        assert_eq!(next, Vec3::new(0.3, 0.0, 0.4));
    }

    #[test]
    fn test_within_stopping_distance_stays() {
        let current = Vec3::new(1.0, 0.0, 1.0);
        let next = step_toward(current, Vec3::new(1.2, 0.0, 1.0), 1.0, 0.5);
        assert_eq!(next, current);
    }

    #[test]
    fn test_drive_navigation_moves_gradually() {
        let mut app = App::new();
        app.insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_systems(FixedUpdate, drive_navigation);

        let agent = app
            .world_mut()
            .spawn((
                Transform::default(),
                NavAgent {
                    speed: 6.0,
                    stopping_distance: 0.0,
                },
                MovementCommand::MoveToPosition {
                    target: Vec3::new(100.0, 0.0, 0.0),
                },
            ))
            .id();

        // Один fixed шаг: 6 м/с * 1/60 с = 0.1 м
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_secs_f64(1.0 / 60.0));
        app.world_mut().run_schedule(FixedUpdate);

        let x = app.world().get::<Transform>(agent).map(|t| t.translation.x);
        let x = x.expect("agent has transform");
        assert!((x - 0.1).abs() < 1e-4, "moved {x}");
    }
}
