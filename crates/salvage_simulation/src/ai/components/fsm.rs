//! FSM AI components (state, target, profile).

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Collider, Health, HomePosition, MovementCommand, NavAgent, Team, TeamMask};

/// Маркер агента (hostile или allied), управляемого Combat FSM
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(AgentState, CombatTarget, MovementCommand)]
pub struct Agent;

/// Agent Combat FSM состояния
///
/// Searching → Tracking → Attacking, ReturningToStart достижим из Tracking.
/// Терминального состояния нет: смерть удаляет агента целиком.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum AgentState {
    /// Ищем ближайшую цель каждые search_interval
    #[default]
    Searching,
    /// Преследуем цель, обновляя destination каждые move_interval
    Tracking,
    /// Вышли за leash radius: идём домой (target не сбрасываем)
    ReturningToStart,
    /// Стоим, смотрим на цель и атакуем каждые attack_interval
    Attacking,
}

impl AgentState {
    /// Объявленный ли это переход (self-loop всегда разрешён)
    pub fn allows(self, next: AgentState) -> bool {
        use AgentState::*;

        self == next
            || matches!(
                (self, next),
                (Searching, Tracking)
                    | (Tracking, ReturningToStart)
                    | (Tracking, Attacking)
                    | (Tracking, Searching)
                    | (ReturningToStart, Searching)
                    | (ReturningToStart, Attacking)
                    | (Attacking, Tracking)
                    | (Attacking, Searching)
            )
    }
}

/// Weak reference на цель
///
/// Перед каждым использованием проверяется через `SpatialQuery::live_position`.
/// Despawned или мёртвая цель == "нет цели".
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct CombatTarget(pub Option<Entity>);

/// Что делает ReturningToStart по прибытии / по пути
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ReturnPolicy {
    /// Variant A (hostile): дошли до дома → Searching
    ResumeSearch,
    /// Variant B (allied): цель в attack radius → сразу Attacking
    EngageIfInRange,
}

/// Атакующее действие агента
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum AttackKind {
    /// Прямой урон по цели
    Melee { damage: f32 },
    /// Выстрел лучом в сторону цели, урон получает первое попадание
    Hitscan { damage: f32, range: f32 },
}

/// Лут при смерти: count ∈ [min_count, max_count), разброс по XZ квадрату
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct LootTable {
    pub min_count: u32,
    pub max_count: u32,
    pub scatter: f32,
    pub drop_height: f32,
}

/// Параметры агента (capability set для общего FSM)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct AgentProfile {
    /// Радиус поиска целей (метры)
    pub search_radius: f32,
    /// Дистанция атаки
    pub attack_radius: f32,
    /// Максимальное удаление от дома до принудительного возврата
    pub leash_radius: f32,
    /// Допуск "пришли домой"
    pub arrival_tolerance: f32,
    /// Интервалы переоценки (секунды)
    pub search_interval: f32,
    pub move_interval: f32,
    pub attack_interval: f32,
    /// Если задан: attack_interval выбирается равномерно из [min, max) при спавне
    pub attack_interval_range: Option<(f32, f32)>,
    /// Кого ищем
    pub targets: TeamMask,
    pub attack: AttackKind,
    pub return_policy: ReturnPolicy,
    pub health: f32,
    pub move_speed: f32,
    pub loot: Option<LootTable>,
}

impl AgentProfile {
    /// Враг: melee, охотится на игрока, после возврата снова ищет
    pub fn hostile() -> Self {
        Self {
            search_radius: 10.0,
            attack_radius: 2.0,
            leash_radius: 20.0,
            arrival_tolerance: 1.0,
            search_interval: 0.5,
            move_interval: 0.25,
            attack_interval: 0.5,
            attack_interval_range: None,
            targets: TeamMask::PLAYER,
            attack: AttackKind::Melee { damage: 2.0 },
            return_policy: ReturnPolicy::ResumeSearch,
            health: 100.0,
            move_speed: 3.5,
            loot: Some(LootTable {
                min_count: 10,
                max_count: 100,
                scatter: 2.0,
                drop_height: 1.0,
            }),
        }
    }

    /// Союзник (подкрепление из отремонтированного здания): стреляет по врагам
    pub fn allied() -> Self {
        Self {
            search_radius: 15.0,
            attack_radius: 8.0,
            leash_radius: 25.0,
            arrival_tolerance: 0.5,
            search_interval: 0.1,
            move_interval: 0.2,
            attack_interval: 0.1,
            attack_interval_range: Some((0.05, 0.15)),
            targets: TeamMask::HOSTILE,
            attack: AttackKind::Hitscan {
                damage: 15.0,
                range: 100.0,
            },
            return_policy: ReturnPolicy::EngageIfInRange,
            health: 100.0,
            move_speed: 4.0,
            loot: None,
        }
    }

    /// Копия профиля с конкретным attack_interval (jitter раз на агента)
    pub fn resolved(&self, rng: &mut impl Rng) -> Self {
        let mut profile = self.clone();
        if let Some((min, max)) = self.attack_interval_range {
            profile.attack_interval = if max > min { rng.gen_range(min..max) } else { min };
        }
        profile
    }
}

/// Bundle агента: дом = точка спавна
///
/// Навигация останавливается не дальше `arrival_tolerance`, иначе
/// ReturningToStart никогда не засчитает прибытие.
pub fn agent_bundle(profile: AgentProfile, team: Team, position: Vec3) -> impl Bundle {
    let defaults = NavAgent::default();
    let stopping_distance = profile
        .arrival_tolerance
        .clamp(0.0, defaults.stopping_distance);

    (
        Agent,
        team,
        Transform::from_translation(position),
        HomePosition(position),
        Health::new(profile.health),
        NavAgent {
            speed: profile.move_speed,
            stopping_distance,
            ..defaults
        },
        Collider::default(),
        profile,
    )
}
