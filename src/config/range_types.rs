use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Share of the maze automatic zones may cover, constrained to [0.05, 0.9]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct ZoneCoverage(f64);

impl ZoneCoverage {
    const MIN: f64 = 0.05;
    const MAX: f64 = 0.9;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0.clamp(Self::MIN, Self::MAX)
    }
}

impl Default for ZoneCoverage {
    fn default() -> Self {
        Self::new(crate::maze_generation::constants::DEFAULT_MAX_ZONE_FILL)
    }
}

/// Zone placement rounds, constrained to [1, 10]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
pub struct PlacementRetries(u32);

impl PlacementRetries {
    const MIN: u32 = 1;
    const MAX: u32 = 10;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0.clamp(Self::MIN, Self::MAX)
    }
}

impl Default for PlacementRetries {
    fn default() -> Self {
        Self::new(crate::maze_generation::constants::ZONE_PLACEMENT_RETRIES)
    }
}
