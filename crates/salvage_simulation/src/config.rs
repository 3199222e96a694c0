//! Simulation config: пресеты агентов, каталог зданий, тайминги
//!
//! Дефолты = наблюдаемые значения дизайна. JSON конфиг может переопределить
//! любое поле (`#[serde(default)]`), после парсинга всегда `validate()`.
//! Per-entity параметры копируются в компоненты при спавне.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AgentProfile;
use crate::structure::StructureVariant;

/// Ошибки загрузки конфига (единственная fallible поверхность)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("structure catalog is empty")]
    EmptyCatalog,

    #[error("{profile} loot range is inverted: min {min} > max {max}")]
    InvertedLoot {
        profile: &'static str,
        min: u32,
        max: u32,
    },

    #[error("{name} must be positive, got {value}")]
    NonPositiveInterval { name: String, value: f32 },
}

/// Тайминги и параметры Structure Progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureTiming {
    pub contribute_interval: f32,
    pub state_check_interval: f32,
    pub display_interval: f32,
    /// Grace delay между финализацией и отключением
    pub retire_delay: f32,
    pub min_contribution: u32,
    pub repair_speed: u32,
    pub reinforcements_per_point: u32,
    /// Offset точек спавна подкреплений от здания
    pub spawn_offsets: Vec<[f32; 3]>,
}

impl Default for StructureTiming {
    fn default() -> Self {
        Self {
            contribute_interval: 0.1,
            state_check_interval: 0.1,
            display_interval: 0.1,
            retire_delay: 1.0,
            min_contribution: 2,
            repair_speed: 1,
            reinforcements_per_point: 1,
            spawn_offsets: vec![[-3.0, 0.0, 5.0], [3.0, 0.0, 5.0]],
        }
    }
}

impl StructureTiming {
    pub fn spawn_points(&self) -> Vec<Vec3> {
        self.spawn_offsets.iter().map(|o| Vec3::from_array(*o)).collect()
    }
}

/// Параметры enemy spawner по умолчанию
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    pub interval: f32,
    /// Спавн при roll (0..100) <= chance_percent
    pub chance_percent: u32,
    /// Масштаб здоровья: health * factor / 100
    pub game_time_factor: f32,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            interval: 5.0,
            chance_percent: 1,
            game_time_factor: 100.0,
        }
    }
}

/// Игрок: здоровье, выносливость, подбор scrap, пушка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub health: f32,
    pub stamina: f32,
    pub stamina_cooldown_ticks: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub pickup_radius: f32,
    pub gun_damage: f32,
    pub gun_range: f32,
    pub starting_scrap: u32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            health: 100.0,
            stamina: 100.0,
            stamina_cooldown_ticks: 60.0,
            walk_speed: 5.0,
            run_speed: 8.0,
            pickup_radius: 1.0,
            gun_damage: 15.0,
            gun_range: 1000.0,
            starting_scrap: 0,
        }
    }
}

/// Конфиг симуляции (Resource)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub hostile: AgentProfile,
    pub allied: AgentProfile,
    pub structures: Vec<StructureVariant>,
    pub structure_timing: StructureTiming,
    pub spawner: SpawnerSettings,
    pub player: PlayerSettings,
    /// Интервал Progress Aggregator (секунды)
    pub progress_poll_interval: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hostile: AgentProfile::hostile(),
            allied: AgentProfile::allied(),
            structures: vec![
                StructureVariant::new("structures/workshop_damaged", "structures/workshop", 50),
                StructureVariant::new("structures/depot_damaged", "structures/depot", 80),
                StructureVariant::new("structures/tower_damaged", "structures/tower", 120),
            ],
            structure_timing: StructureTiming::default(),
            spawner: SpawnerSettings::default(),
            player: PlayerSettings::default(),
            progress_poll_interval: 1.0,
        }
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveInterval {
            name: name.to_string(),
            value,
        })
    }
}

fn validate_profile(label: &'static str, profile: &AgentProfile) -> Result<(), ConfigError> {
    require_positive(&format!("{label}.search_interval"), profile.search_interval)?;
    require_positive(&format!("{label}.move_interval"), profile.move_interval)?;
    require_positive(&format!("{label}.attack_interval"), profile.attack_interval)?;

    if let Some((min, _)) = profile.attack_interval_range {
        require_positive(&format!("{label}.attack_interval_range"), min)?;
    }

    if let Some(loot) = profile.loot.as_ref() {
        if loot.min_count > loot.max_count {
            return Err(ConfigError::InvertedLoot {
                profile: label,
                min: loot.min_count,
                max: loot.max_count,
            });
        }
    }

    Ok(())
}

impl SimulationConfig {
    /// Парсинг + валидация
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Проверка того, что нельзя починить clamp'ом на лету
    ///
    /// Отрицательный resource_needed сюда не относится: он нормализуется при спавне.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.structures.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        validate_profile("hostile", &self.hostile)?;
        validate_profile("allied", &self.allied)?;

        let timing = &self.structure_timing;
        require_positive("structure_timing.contribute_interval", timing.contribute_interval)?;
        require_positive("structure_timing.state_check_interval", timing.state_check_interval)?;
        require_positive("structure_timing.display_interval", timing.display_interval)?;
        require_positive("spawner.interval", self.spawner.interval)?;
        require_positive("progress_poll_interval", self.progress_poll_interval)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.structures.len(), 3);
        assert_eq!(config.structure_timing.spawn_points().len(), 2);
        assert_eq!(config.progress_poll_interval, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "progress_poll_interval": 2.5, "structure_timing": { "repair_speed": 3 } }"#;
        let config = SimulationConfig::from_json_str(json).expect("valid config");

        assert_eq!(config.progress_poll_interval, 2.5);
        assert_eq!(config.structure_timing.repair_speed, 3);
        assert_eq!(config.structure_timing.min_contribution, 2);
        assert_eq!(config.hostile, AgentProfile::hostile());
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let config = SimulationConfig::default();
        let json = config.to_json_string().expect("serializes");
        let parsed = SimulationConfig::from_json_str(&json).expect("parses");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "structures": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCatalog));
    }

    #[test]
    fn test_inverted_loot_rejected() {
        let mut config = SimulationConfig::default();
        if let Some(loot) = config.hostile.loot.as_mut() {
            loot.min_count = 50;
            loot.max_count = 10;
        }
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvertedLoot { profile: "hostile", .. }));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = SimulationConfig::default();
        config.allied.search_interval = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("allied.search_interval"));
    }
}
