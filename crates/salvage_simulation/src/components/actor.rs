//! Базовые компоненты акторов: Team, Health, Stamina, ResourcePool

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Команда актора (аналог layer/tag в движке)
///
/// Hostile агенты охотятся на Player, Allied: на Hostile.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum Team {
    Player,
    Hostile,
    Allied,
}

impl Team {
    const fn bit(self) -> u8 {
        match self {
            Team::Player => 1 << 0,
            Team::Hostile => 1 << 1,
            Team::Allied => 1 << 2,
        }
    }
}

/// Фильтр целей для spatial queries (набор команд)
///
/// В конфиге сериализуется как список команд: `["Player", "Allied"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(from = "Vec<Team>", into = "Vec<Team>")]
pub struct TeamMask(u8);

impl TeamMask {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(Team::Player.bit());
    pub const HOSTILE: Self = Self(Team::Hostile.bit());
    pub const ALLIED: Self = Self(Team::Allied.bit());

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, team: Team) -> bool {
        self.0 & team.bit() != 0
    }

    pub fn teams(self) -> Vec<Team> {
        [Team::Player, Team::Hostile, Team::Allied]
            .into_iter()
            .filter(|team| self.contains(*team))
            .collect()
    }
}

impl From<Vec<Team>> for TeamMask {
    fn from(teams: Vec<Team>) -> Self {
        teams
            .into_iter()
            .fold(TeamMask::NONE, |mask, team| mask.union(TeamMask(team.bit())))
    }
}

impl From<TeamMask> for Vec<Team> {
    fn from(mask: TeamMask) -> Self {
        mask.teams()
    }
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. `current <= 0` = мертв, необратимо.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    /// Доля здоровья для HUD (0 если max == 0)
    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// Выносливость игрока (спринт)
///
/// Инвариант: 0.0 ≤ current ≤ max.
/// Drain/regen считаются в единицах за тик, cooldown: в тиках.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub drain_per_tick: f32,
    pub regen_per_tick: f32,
    /// Тики до разрешения спринта после полного истощения
    pub cooldown: f32,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            drain_per_tick: 1.0,
            regen_per_tick: 0.2,
            cooldown: 0.0,
        }
    }

    pub fn can_sprint(&self) -> bool {
        self.current > 0.0 && self.cooldown < 1.0
    }

    pub fn drain(&mut self) {
        self.current = (self.current - self.drain_per_tick).max(0.0);
    }

    pub fn regenerate(&mut self) {
        self.current = (self.current + self.regen_per_tick).min(self.max);
    }

    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// Запас scrap у актора-контрибьютора
///
/// Инвариант: никогда не уходит ниже нуля (withdraw клампит в пределах одного вызова).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ResourcePool {
    amount: u32,
}

impl ResourcePool {
    pub fn new(amount: u32) -> Self {
        Self { amount }
    }

    pub fn available(&self) -> u32 {
        self.amount
    }

    pub fn deposit(&mut self, amount: u32) {
        self.amount = self.amount.saturating_add(amount);
    }

    /// Снимает до `amount` единиц и возвращает сколько реально снято
    pub fn withdraw(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.amount);
        self.amount -= taken;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(10.0);
        health.take_damage(4.0);
        assert_eq!(health.current, 6.0);
        assert!(health.is_alive());

        health.take_damage(15.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_ratio_guards_zero_max() {
        assert_eq!(Health::new(0.0).ratio(), 0.0);

        let mut health = Health::new(100.0);
        health.take_damage(25.0);
        assert_eq!(health.ratio(), 0.75);
    }

    #[test]
    fn test_pool_withdraw_floor_clamped() {
        let mut pool = ResourcePool::new(3);
        assert_eq!(pool.withdraw(2), 2);
        assert_eq!(pool.available(), 1);

        assert_eq!(pool.withdraw(5), 1);
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.withdraw(1), 0);
    }

    #[test]
    fn test_stamina_sprint_and_regen() {
        let mut stamina = Stamina::new(100.0);
        assert!(stamina.can_sprint());

        stamina.drain();
        assert_eq!(stamina.current, 99.0);

        stamina.regenerate();
        assert!((stamina.current - 99.2).abs() < 1e-4);

        stamina.current = 100.0;
        stamina.regenerate(); // Clamp to max
        assert_eq!(stamina.current, 100.0);
    }

    #[test]
    fn test_team_mask() {
        let mask = TeamMask::PLAYER.union(TeamMask::ALLIED);
        assert!(mask.contains(Team::Player));
        assert!(mask.contains(Team::Allied));
        assert!(!mask.contains(Team::Hostile));
        assert_eq!(mask.teams(), vec![Team::Player, Team::Allied]);
        assert_eq!(TeamMask::from(vec![Team::Hostile]), TeamMask::HOSTILE);
    }
}
