//! World компоненты: домашняя точка, коллайдер, подбираемый scrap, маркеры эффектов

use bevy::prelude::*;

/// Точка спавна агента (фиксируется один раз, дальше только читается)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HomePosition(pub Vec3);

/// Сферический коллайдер для spatial queries и raycast
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub radius: f32,
}

impl Default for Collider {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Подбираемый scrap (лут с убитых врагов)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Scrap;

/// Маркер эффекта смерти (particles рисует внешний renderer)
///
/// Живёт `remaining` секунд симуляции, потом despawn.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DeathEffect {
    pub position: Vec3,
    pub remaining: f32,
}

impl DeathEffect {
    pub const LIFETIME: f32 = 2.0;

    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            remaining: Self::LIFETIME,
        }
    }

    /// Отсчитать `dt`, true когда эффект отыграл
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Путь к визуальной модели (data-driven, рисует внешний renderer)
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PrefabPath {
    pub path: String,
}

impl PrefabPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_effect_expires_after_lifetime() {
        let mut effect = DeathEffect::new(Vec3::ZERO);
        let dt = 1.0 / 60.0;
        let ticks = (DeathEffect::LIFETIME / dt).round() as usize;

        for _ in 0..ticks - 1 {
            assert!(!effect.tick(dt));
        }
        // Последние тики: float накопление может съесть один шаг
        assert!(effect.tick(dt) || effect.tick(dt));
    }
}
