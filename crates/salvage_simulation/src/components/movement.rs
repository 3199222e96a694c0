//! Movement компоненты: команды перемещения и параметры навигации

use bevy::prelude::*;

/// Команда движения для актора (выполняется Navigation Service)
///
/// Архитектура:
/// - AI FSM пишет MovementCommand (high-level intent)
/// - Navigation система читает и двигает Transform к цели
/// - Агент приближается постепенно, никогда не телепортируется
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Стоять в точке `at` и смотреть на `face` (атака)
    Hold { at: Vec3, face: Vec3 },
}

impl MovementCommand {
    /// Текущая точка назначения (None для Idle)
    pub fn destination(&self) -> Option<Vec3> {
        match self {
            MovementCommand::Idle => None,
            MovementCommand::MoveToPosition { target } => Some(*target),
            MovementCommand::Hold { at, .. } => Some(*at),
        }
    }
}

/// Параметры навигационного агента
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Скорость (метры/сек)
    pub speed: f32,
    /// Ближе этого считаем что пришли
    pub stopping_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 0.5,
        }
    }
}
