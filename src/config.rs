pub mod range_types;

use crate::errors::{MazeError, MazeResult};
use crate::maze::GridSize;
use crate::maze_generation::{
    FillFactor, GeneratorOptions, MazeAlgorithm, ZonePlacementConfig, ZoneSource,
};
use range_types::{PlacementRetries, ZoneCoverage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use validator::Validate;

/// Defaults used when a maze is generated without explicit options
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
#[serde(default)]
pub struct MazeConfig {
    #[validate(range(min = 1, max = 512))]
    pub width: i32,
    #[validate(range(min = 1, max = 512))]
    pub height: i32,
    pub algorithm: MazeAlgorithm,
    pub fill_factor: FillFactor,
    pub auto_zones: bool,
    pub zone_coverage: ZoneCoverage,
    pub placement_retries: PlacementRetries,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            algorithm: MazeAlgorithm::default(),
            fill_factor: FillFactor::default(),
            auto_zones: false,
            zone_coverage: ZoneCoverage::default(),
            placement_retries: PlacementRetries::default(),
        }
    }
}

impl MazeConfig {
    pub fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    pub fn options(&self) -> GeneratorOptions {
        let zones = if self.auto_zones {
            ZoneSource::Auto
        } else {
            ZoneSource::None
        };
        GeneratorOptions {
            zone_placement: ZonePlacementConfig {
                max_fill: self.zone_coverage.get(),
                retries: self.placement_retries.get(),
                ..Default::default()
            },
            ..GeneratorOptions::new(self.algorithm, self.fill_factor).with_zones(zones)
        }
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("mazeforge");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

pub fn load_config() -> MazeConfig {
    get_config_path()
        .map(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Read a config file, falling back to defaults when it is missing or invalid
pub fn load_config_from(path: &Path) -> MazeConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return MazeConfig::default();
    };
    match toml::from_str::<MazeConfig>(&contents) {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Ignoring invalid config {}: {}", path.display(), e);
                MazeConfig::default()
            }
        },
        Err(e) => {
            warn!("Ignoring unreadable config {}: {}", path.display(), e);
            MazeConfig::default()
        }
    }
}

pub fn save_config(config: &MazeConfig) -> MazeResult<()> {
    let path = get_config_path().ok_or(MazeError::ConfigDirNotFound)?;
    save_config_to(config, &path)
}

pub fn save_config_to(config: &MazeConfig, path: &Path) -> MazeResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
