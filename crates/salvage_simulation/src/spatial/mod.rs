//! Spatial Query Service
//!
//! FSM видит мир только через `SpatialQuery`:
//! - `query_nearby`: overlap sphere с фильтром по командам
//! - `raycast`: первый живой коллайдер вдоль луча
//! - `live_position`: проверка weak reference (entity существует и жив)
//!
//! `SpatialIndex`: headless реализация поверх ECS (линейный проход в порядке query).
//! Порядок кандидатов = порядок query, от него зависит tie-break в Target Selector.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::{Collider, Health, Team, TeamMask};

/// Результат raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// Контракт spatial сервиса (внешний physics engine или headless индекс)
pub trait SpatialQuery {
    /// Живые entities фильтра, чьи коллайдеры пересекают сферу
    fn query_nearby(&self, position: Vec3, radius: f32, filter: TeamMask) -> Vec<(Entity, Vec3)>;

    /// Ближайшее попадание луча (direction нормализуется внутри)
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: TeamMask,
    ) -> Option<RayHit>;

    /// Позиция entity если он ещё существует и жив, иначе None (stale reference)
    fn live_position(&self, entity: Entity) -> Option<Vec3>;
}

/// Headless spatial индекс (SystemParam)
#[derive(SystemParam)]
pub struct SpatialIndex<'w, 's> {
    bodies: Query<
        'w,
        's,
        (
            Entity,
            &'static Transform,
            &'static Team,
            Option<&'static Collider>,
            Option<&'static Health>,
        ),
    >,
}

fn is_alive(health: Option<&Health>) -> bool {
    health.map_or(true, Health::is_alive)
}

impl SpatialQuery for SpatialIndex<'_, '_> {
    fn query_nearby(&self, position: Vec3, radius: f32, filter: TeamMask) -> Vec<(Entity, Vec3)> {
        self.bodies
            .iter()
            .filter(|(_, _, team, _, health)| filter.contains(**team) && is_alive(*health))
            .filter(|(_, transform, _, collider, _)| {
                let reach = radius + collider.map_or(Collider::default().radius, |c| c.radius);
                transform.translation.distance_squared(position) <= reach * reach
            })
            .map(|(entity, transform, ..)| (entity, transform.translation))
            .collect()
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: TeamMask,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let mut best: Option<RayHit> = None;

        for (entity, transform, team, collider, health) in self.bodies.iter() {
            if !filter.contains(*team) || !is_alive(health) {
                continue;
            }

            let radius = collider.map_or(Collider::default().radius, |c| c.radius);
            let Some(distance) = ray_sphere_distance(origin, direction, transform.translation, radius)
            else {
                continue;
            };

            if distance > max_distance {
                continue;
            }

            if best.map_or(true, |hit| distance < hit.distance) {
                best = Some(RayHit {
                    entity,
                    point: origin + direction * distance,
                    distance,
                });
            }
        }

        best
    }

    fn live_position(&self, entity: Entity) -> Option<Vec3> {
        let (_, transform, _, _, health) = self.bodies.get(entity).ok()?;
        is_alive(health).then_some(transform.translation)
    }
}

/// Расстояние вдоль луча до сферы (0 если origin внутри), None если мимо
///
/// `direction` должен быть нормализован.
pub fn ray_sphere_distance(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let m = origin - center;
    let b = m.dot(direction);
    let c = m.length_squared() - radius * radius;

    // Origin снаружи и луч смотрит от сферы
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    Some((-b - discriminant.sqrt()).max(0.0))
}
