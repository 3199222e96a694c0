//! Правила переходов Agent Combat FSM (pure функции)
//!
//! Системы передают сюда уже перепроверенную позицию цели:
//! `None` значит цель despawned/мертва (stale weak reference).

use bevy::prelude::*;

use super::components::{AgentProfile, AgentState, ReturnPolicy};

/// Tracking: leash проверяется первым и побеждает attack range
pub fn decide_tracking(
    profile: &AgentProfile,
    position: Vec3,
    home: Vec3,
    target_position: Option<Vec3>,
) -> AgentState {
    let Some(target) = target_position else {
        return AgentState::Searching;
    };

    if position.distance(home) > profile.leash_radius {
        AgentState::ReturningToStart
    } else if position.distance(target) <= profile.attack_radius {
        AgentState::Attacking
    } else {
        AgentState::Tracking
    }
}

/// ReturningToStart: variant B (EngageIfInRange) перекрывает прибытие
pub fn decide_return(
    profile: &AgentProfile,
    position: Vec3,
    home: Vec3,
    target_position: Option<Vec3>,
) -> AgentState {
    if profile.return_policy == ReturnPolicy::EngageIfInRange {
        if let Some(target) = target_position {
            if position.distance(target) <= profile.attack_radius {
                return AgentState::Attacking;
            }
        }
    }

    if position.distance(home) <= profile.arrival_tolerance {
        AgentState::Searching
    } else {
        AgentState::ReturningToStart
    }
}

/// Attacking: цель пропала → Searching, вышла из радиуса → Tracking
pub fn decide_attack(
    profile: &AgentProfile,
    position: Vec3,
    target_position: Option<Vec3>,
) -> AgentState {
    match target_position {
        None => AgentState::Searching,
        Some(target) if position.distance(target) > profile.attack_radius => AgentState::Tracking,
        Some(_) => AgentState::Attacking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hostile() -> AgentProfile {
        AgentProfile::hostile() // attack 2, leash 20, arrival 1
    }

    #[test]
    fn test_tracking_keeps_chasing() {
        let next = decide_tracking(&hostile(), Vec3::ZERO, Vec3::ZERO, Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(next, AgentState::Tracking);
    }

    #[test]
    fn test_tracking_enters_attack_at_radius() {
        let next = decide_tracking(&hostile(), Vec3::ZERO, Vec3::ZERO, Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(next, AgentState::Attacking);
    }

    #[test]
    fn test_tracking_leash_wins_over_attack() {
        let position = Vec3::new(21.0, 0.0, 0.0);
        let target = Vec3::new(22.0, 0.0, 0.0);
        let next = decide_tracking(&hostile(), position, Vec3::ZERO, Some(target));
        assert_eq!(next, AgentState::ReturningToStart);
    }

    #[test]
    fn test_tracking_lost_target_falls_back_to_searching() {
        let next = decide_tracking(&hostile(), Vec3::ZERO, Vec3::ZERO, None);
        assert_eq!(next, AgentState::Searching);
    }

    #[test]
    fn test_return_variant_a_ignores_target_in_range() {
        let position = Vec3::new(10.0, 0.0, 0.0);
        let target = Vec3::new(11.0, 0.0, 0.0);
        let next = decide_return(&hostile(), position, Vec3::ZERO, Some(target));
        assert_eq!(next, AgentState::ReturningToStart);

        let arrived = decide_return(&hostile(), Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO, Some(target));
        assert_eq!(arrived, AgentState::Searching);
    }

    #[test]
    fn test_return_variant_b_engages_in_range() {
        let allied = AgentProfile::allied(); // attack 8
        let position = Vec3::new(10.0, 0.0, 0.0);

        let engaged = decide_return(&allied, position, Vec3::ZERO, Some(Vec3::new(15.0, 0.0, 0.0)));
        assert_eq!(engaged, AgentState::Attacking);

        let still_returning = decide_return(&allied, position, Vec3::ZERO, Some(Vec3::new(30.0, 0.0, 0.0)));
        assert_eq!(still_returning, AgentState::ReturningToStart);

        let arrived_no_target = decide_return(&allied, Vec3::ZERO, Vec3::ZERO, None);
        assert_eq!(arrived_no_target, AgentState::Searching);
    }

    #[test]
    fn test_attack_outcomes() {
        let profile = hostile();
        assert_eq!(decide_attack(&profile, Vec3::ZERO, None), AgentState::Searching);
        assert_eq!(
            decide_attack(&profile, Vec3::ZERO, Some(Vec3::new(1.5, 0.0, 0.0))),
            AgentState::Attacking
        );
        assert_eq!(
            decide_attack(&profile, Vec3::ZERO, Some(Vec3::new(2.5, 0.0, 0.0))),
            AgentState::Tracking
        );
    }
}
