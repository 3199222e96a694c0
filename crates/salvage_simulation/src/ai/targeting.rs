//! Target Selector: ближайший кандидат по квадрату расстояния
//!
//! Pure, stateless. Кандидат заменяется только при строго меньшем расстоянии,
//! поэтому при равенстве выигрывает первый встреченный.

use bevy::prelude::*;

/// Ближайший кандидат к `origin` или None для пустого списка
pub fn select_nearest<T, I>(origin: Vec3, candidates: I) -> Option<T>
where
    I: IntoIterator<Item = (T, Vec3)>,
{
    let mut best: Option<(T, f32)> = None;

    for (candidate, position) in candidates {
        let distance_sq = origin.distance_squared(position);
        match best {
            Some((_, best_sq)) if distance_sq >= best_sq => {}
            _ => best = Some((candidate, distance_sq)),
        }
    }

    best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_minimum_squared_distance() {
        // Квадраты расстояний: 9, 4, 16
        let candidates = [
            ("a", Vec3::new(3.0, 0.0, 0.0)),
            ("b", Vec3::new(0.0, 0.0, 2.0)),
            ("c", Vec3::new(0.0, 4.0, 0.0)),
        ];
        assert_eq!(select_nearest(Vec3::ZERO, candidates), Some("b"));
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: Vec<(u32, Vec3)> = Vec::new();
        assert_eq!(select_nearest(Vec3::ZERO, candidates), None);
    }

    #[test]
    fn test_tie_resolves_to_first_encountered() {
        let candidates = [
            (1, Vec3::new(2.0, 0.0, 0.0)),
            (2, Vec3::new(-2.0, 0.0, 0.0)),
            (3, Vec3::new(0.0, 0.0, 2.0)),
        ];
        assert_eq!(select_nearest(Vec3::ZERO, candidates), Some(1));
    }

    #[test]
    fn test_relative_to_origin() {
        let origin = Vec3::new(10.0, 0.0, 10.0);
        let candidates = [
            (1, Vec3::ZERO),
            (2, Vec3::new(9.0, 0.0, 9.0)),
        ];
        assert_eq!(select_nearest(origin, candidates), Some(2));
    }
}
