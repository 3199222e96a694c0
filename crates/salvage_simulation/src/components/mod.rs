//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: команда, здоровье, выносливость, запас scrap
//! - movement: навигация и перемещение (MovementCommand, NavAgent)
//! - world: позиционирование и маркеры (HomePosition, Collider, Scrap, DeathEffect, PrefabPath)
//!
//! AI и structure компоненты живут в своих модулях (crate::ai, crate::structure).

pub mod actor;
pub mod movement;
pub mod world;

pub use actor::*;
pub use movement::*;
pub use world::*;
