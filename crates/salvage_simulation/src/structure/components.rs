//! Structure Progression компоненты: состояние ремонта, каталог, proximity, визуал.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{PrefabPath, ResourcePool};

/// Structure Progression FSM состояния
///
/// Только вперёд: Damaged → Repaired → Finalized. Ord отражает порядок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Reflect)]
pub enum StructureState {
    #[default]
    Damaged,
    Repaired,
    Finalized,
}

/// Запись каталога зданий (пара моделей + порог ремонта)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct StructureVariant {
    pub damaged_model: String,
    pub repaired_model: String,
    /// Half-extents box trigger volume для контрибьютора
    pub collection_extents: [f32; 3],
    /// Высота прогресс-лейбла над зданием
    pub label_height: f32,
    /// Может быть <= 0 в кривом конфиге (нормализуется при спавне)
    pub resource_needed: i32,
}

impl StructureVariant {
    pub fn new(damaged_model: &str, repaired_model: &str, resource_needed: i32) -> Self {
        Self {
            damaged_model: damaged_model.to_string(),
            repaired_model: repaired_model.to_string(),
            collection_extents: [4.0, 2.0, 4.0],
            label_height: 6.0,
            resource_needed,
        }
    }
}

/// Здание под ремонт
///
/// Инварианты:
/// - 0 ≤ resource_collected ≤ resource_needed
/// - state только растёт
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(RepairSite, StructureVisual)]
pub struct Structure {
    state: StructureState,
    variant_index: usize,
    resource_needed: u32,
    resource_collected: u32,
    /// Сколько scrap переносится за один contribute тик
    pub repair_speed: u32,
    /// Минимальный запас контрибьютора для переноса
    pub min_contribution: u32,
}

impl Structure {
    /// Отрицательный порог нормализуется в 0 (здание сразу отремонтируется)
    pub fn new(variant_index: usize, resource_needed: i32, repair_speed: u32, min_contribution: u32) -> Self {
        if resource_needed < 0 {
            crate::log_warning(&format!(
                "Structure variant {} has negative resource_needed {}, treating as 0",
                variant_index, resource_needed
            ));
        }

        Self {
            state: StructureState::Damaged,
            variant_index,
            resource_needed: u32::try_from(resource_needed).unwrap_or(0),
            resource_collected: 0,
            repair_speed,
            min_contribution,
        }
    }

    pub fn state(&self) -> StructureState {
        self.state
    }

    pub fn variant_index(&self) -> usize {
        self.variant_index
    }

    pub fn resource_needed(&self) -> u32 {
        self.resource_needed
    }

    pub fn resource_collected(&self) -> u32 {
        self.resource_collected
    }

    /// Один contribute тик. Возвращает сколько scrap реально перенесено.
    ///
    /// Перенос только в Damaged и только если у контрибьютора >= min_contribution.
    /// Снимается не больше чем осталось до порога, так что пул не теряет лишнего.
    /// Порог достигнут (в том числе нулевой) → Repaired.
    pub fn contribute(&mut self, pool: Option<&mut ResourcePool>) -> u32 {
        if self.state != StructureState::Damaged {
            return 0;
        }

        let mut transferred = 0;
        if let Some(pool) = pool {
            let remaining = self.resource_needed - self.resource_collected;
            if remaining > 0 && pool.available() >= self.min_contribution {
                transferred = pool.withdraw(self.repair_speed.min(remaining));
                self.resource_collected += transferred;
            }
        }

        if self.resource_collected >= self.resource_needed {
            self.state = StructureState::Repaired;
        }

        transferred
    }

    /// Repaired → Finalized. true только при первом вызове (guard эффекта).
    pub fn finalize(&mut self) -> bool {
        if self.state == StructureState::Repaired {
            self.state = StructureState::Finalized;
            true
        } else {
            false
        }
    }

    /// Прогресс для HUD (1.0 при нулевом пороге)
    pub fn progress_ratio(&self) -> f32 {
        if self.resource_needed == 0 {
            1.0
        } else {
            self.resource_collected as f32 / self.resource_needed as f32
        }
    }
}

/// Trigger volume вокруг здания + weak reference на контрибьютора внутри
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct RepairSite {
    pub contributor: Option<Entity>,
    pub half_extents: Vec3,
}

impl RepairSite {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            contributor: None,
            half_extents,
        }
    }

    /// Точка внутри box volume с центром `center`
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        let offset = (point - center).abs();
        offset.x <= self.half_extents.x
            && offset.y <= self.half_extents.y
            && offset.z <= self.half_extents.z
    }
}

/// Текущая визуальная модель здания (принадлежит только зданию)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct StructureVisual {
    pub model: Option<Entity>,
}

/// Entity модели (damaged или repaired), рисует внешний renderer
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct StructureModel {
    pub owner: Entity,
    pub state: StructureState,
}

/// Точки спавна подкреплений (offset от здания)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct StructureSpawnPoints(pub Vec<Vec3>);

/// Здание отработало: задачи сняты, дальше только опрашивается агрегатором
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Retired;

/// Bundle модели здания
pub fn structure_model_bundle(owner: Entity, state: StructureState, path: &str, position: Vec3) -> impl Bundle {
    (
        StructureModel { owner, state },
        PrefabPath::new(path),
        Transform::from_translation(position),
    )
}
