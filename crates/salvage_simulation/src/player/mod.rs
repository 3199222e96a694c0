//! Player module: игрок как цель hostile агентов и контрибьютор зданий
//!
//! Ввод внешний: `SprintIntent` (компонент) и `PlayerFireIntent` (event).
//! Смерть игрока завершает сессию (`SessionEnded`, ровно один раз).

use bevy::prelude::*;

use crate::combat::ShotFired;
use crate::components::{
    Collider, Health, MovementCommand, NavAgent, ResourcePool, Scrap, Stamina, Team, TeamMask,
};
use crate::config::{PlayerSettings, SimulationConfig};
use crate::hud::{HudUpdate, HudValue};

/// Маркер игрока
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Подбор scrap в радиусе
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ScrapCollector {
    pub pickup_radius: f32,
}

/// Спринт зажат (пишет внешний input)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct SprintIntent(pub bool);

/// Hitscan пушка игрока
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlayerGun {
    pub damage: f32,
    pub range: f32,
}

/// Event: выстрел игрока в направлении `direction`
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerFireIntent {
    pub direction: Vec3,
}

/// Event: игрок умер, сессия окончена (scene transition collaborator)
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionEnded {
    pub player: Entity,
}

/// Состояние сессии
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub ended: bool,
}

pub fn player_bundle(settings: &PlayerSettings, position: Vec3) -> impl Bundle {
    (
        Player,
        Team::Player,
        Transform::from_translation(position),
        Health::new(settings.health),
        Stamina::new(settings.stamina),
        ResourcePool::new(settings.starting_scrap),
        ScrapCollector {
            pickup_radius: settings.pickup_radius,
        },
        SprintIntent::default(),
        PlayerGun {
            damage: settings.gun_damage,
            range: settings.gun_range,
        },
        NavAgent {
            speed: settings.walk_speed,
            stopping_distance: 0.0,
        },
        MovementCommand::Idle,
        Collider::default(),
    )
}

pub fn spawn_player(commands: &mut Commands, settings: &PlayerSettings, position: Vec3) -> Entity {
    commands.spawn(player_bundle(settings, position)).id()
}

/// Один тик выносливости
///
/// Спринт: drain пока есть stamina и нет cooldown. Иначе cooldown тикает вниз,
/// на нуле stamina взводится заново, и идёт регенерация.
/// Возвращает true если игрок спринтует в этом тике.
pub fn tick_stamina(stamina: &mut Stamina, sprinting: bool, exhaustion_cooldown: f32) -> bool {
    if sprinting && stamina.can_sprint() {
        stamina.drain();
        return true;
    }

    stamina.cooldown = (stamina.cooldown - 1.0).max(0.0);
    if stamina.current <= 0.0 {
        stamina.cooldown = exhaustion_cooldown;
    }
    if stamina.current < stamina.max {
        stamina.regenerate();
    }
    false
}

/// Система: выносливость и скорость ходьбы/бега
pub fn update_player_stamina(
    config: Res<SimulationConfig>,
    mut players: Query<(&mut Stamina, &mut NavAgent, &SprintIntent), With<Player>>,
) {
    let settings = &config.player;
    for (mut stamina, mut nav, intent) in players.iter_mut() {
        let running = tick_stamina(&mut stamina, intent.0, settings.stamina_cooldown_ticks);
        nav.speed = if running {
            settings.run_speed
        } else {
            settings.walk_speed
        };
    }
}

/// Система: подобрать scrap в радиусе (+1 в пул за штуку)
pub fn collect_scrap(
    mut commands: Commands,
    mut players: Query<(&Transform, &ScrapCollector, &mut ResourcePool, &Health), With<Player>>,
    scrap: Query<(Entity, &Transform), With<Scrap>>,
) {
    for (transform, collector, mut pool, health) in players.iter_mut() {
        if !health.is_alive() {
            continue;
        }

        let reach_sq = collector.pickup_radius * collector.pickup_radius;
        for (item, item_transform) in scrap.iter() {
            if item_transform.translation.distance_squared(transform.translation) <= reach_sq {
                commands.entity(item).despawn();
                pool.deposit(1);
            }
        }
    }
}

/// Система: PlayerFireIntent → ShotFired по hostile
pub fn player_fire(
    mut intents: EventReader<PlayerFireIntent>,
    players: Query<(Entity, &Transform, &PlayerGun, &Health), With<Player>>,
    mut shots: EventWriter<ShotFired>,
) {
    for intent in intents.read() {
        for (entity, transform, gun, health) in players.iter() {
            if !health.is_alive() {
                continue;
            }

            shots.write(ShotFired {
                shooter: entity,
                origin: transform.translation,
                direction: intent.direction,
                range: gun.range,
                damage: gun.damage,
                filter: TeamMask::HOSTILE,
            });
        }
    }
}

/// Система: health <= 0 → SessionEnded (один раз за сессию)
pub fn end_session_on_player_death(
    mut session: ResMut<SessionState>,
    players: Query<(Entity, &Health), With<Player>>,
    mut ended: EventWriter<SessionEnded>,
) {
    if session.ended {
        return;
    }

    if let Some((player, _)) = players.iter().find(|(_, health)| !health.is_alive()) {
        session.ended = true;
        ended.write(SessionEnded { player });
        crate::log_warning(&format!("💀 Player {:?} died, session ended", player));
    }
}

/// Система: здоровье, выносливость и scrap в HUD каждый тик
pub fn publish_player_vitals(
    players: Query<(&Health, &Stamina, &ResourcePool), With<Player>>,
    mut hud: EventWriter<HudUpdate>,
) {
    for (health, stamina, pool) in players.iter() {
        hud.write(HudUpdate(HudValue::PlayerHealthRatio(health.ratio())));
        hud.write(HudUpdate(HudValue::PlayerStaminaRatio(stamina.ratio())));
        hud.write(HudUpdate(HudValue::ScrapCount(pool.available())));
    }
}

/// Player Plugin
///
/// Порядок (FixedUpdate):
/// - Decide: update_player_stamina → player_fire (после агентов)
/// - Lifecycle: end_session_on_player_death
/// - Progression: collect_scrap → publish_player_vitals (до contribute)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Player>()
            .register_type::<SprintIntent>()
            .add_event::<PlayerFireIntent>()
            .add_event::<SessionEnded>()
            .init_resource::<SessionState>();

        app.add_systems(
            FixedUpdate,
            (
                (update_player_stamina, player_fire)
                    .chain()
                    .in_set(crate::SimulationSet::Decide)
                    .after(crate::ai::agent_attack),
                end_session_on_player_death.in_set(crate::SimulationSet::Lifecycle),
                (collect_scrap, publish_player_vitals)
                    .chain()
                    .in_set(crate::SimulationSet::Progression)
                    .before(crate::structure::structure_contribute),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprint_drains_and_walk_regenerates() {
        let mut stamina = Stamina::new(100.0);

        assert!(tick_stamina(&mut stamina, true, 60.0));
        assert_eq!(stamina.current, 99.0);

        assert!(!tick_stamina(&mut stamina, false, 60.0));
        assert!((stamina.current - 99.2).abs() < 1e-4);
    }

    #[test]
    fn test_exhaustion_starts_cooldown() {
        let mut stamina = Stamina::new(100.0);
        for _ in 0..100 {
            tick_stamina(&mut stamina, true, 60.0);
        }
        assert_eq!(stamina.current, 0.0);

        // Следующий тик: спринт невозможен, взводится cooldown
        assert!(!tick_stamina(&mut stamina, true, 60.0));
        assert_eq!(stamina.cooldown, 60.0);

        // Пока cooldown >= 1 спринт заблокирован даже с регенерированной stamina
        for _ in 0..59 {
            assert!(!tick_stamina(&mut stamina, true, 60.0));
        }
        assert!(stamina.current > 0.0);
        assert!(!tick_stamina(&mut stamina, true, 60.0));
        assert!(tick_stamina(&mut stamina, true, 60.0));
    }

    #[test]
    fn test_stamina_never_exceeds_max() {
        let mut stamina = Stamina::new(100.0);
        for _ in 0..10 {
            tick_stamina(&mut stamina, false, 60.0);
        }
        assert_eq!(stamina.current, 100.0);
    }
}
