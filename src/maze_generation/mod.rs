pub mod aldous_broder;
pub mod binary_tree;
pub mod builder;
pub mod cell_set;
pub mod constants;
pub mod hunt_and_kill;
pub mod recursive_backtracker;
pub mod sidewinder;
pub mod wilsons;
pub mod zone_placement;

pub use builder::MazeBuilder;
pub use zone_placement::{ZonePlacementConfig, ZonePlacer};

use crate::errors::{MazeError, MazeResult};
use crate::maze::{GridSize, MazeGraph, Zone};
use crate::trails;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// When generation counts as done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillFactor {
    /// Every eligible cell is connected
    #[default]
    Full,
    /// Connected cells reach both the west and east edges
    FullWidth,
    /// Connected cells reach both the south and north edges
    FullHeight,
    Quarter,
    Half,
    ThreeQuarters,
    NinetyPercent,
}

impl FillFactor {
    pub const ALL: [FillFactor; 7] = [
        FillFactor::Full,
        FillFactor::FullWidth,
        FillFactor::FullHeight,
        FillFactor::Quarter,
        FillFactor::Half,
        FillFactor::ThreeQuarters,
        FillFactor::NinetyPercent,
    ];

    /// Share of eligible cells to connect, for the percentage policies
    pub fn fraction(&self) -> Option<f64> {
        match self {
            FillFactor::Quarter => Some(0.25),
            FillFactor::Half => Some(0.5),
            FillFactor::ThreeQuarters => Some(0.75),
            FillFactor::NinetyPercent => Some(0.9),
            FillFactor::Full | FillFactor::FullWidth | FillFactor::FullHeight => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FillFactor::Full => "full",
            FillFactor::FullWidth => "full_width",
            FillFactor::FullHeight => "full_height",
            FillFactor::Quarter => "quarter",
            FillFactor::Half => "half",
            FillFactor::ThreeQuarters => "three_quarters",
            FillFactor::NinetyPercent => "ninety_percent",
        }
    }
}

impl fmt::Display for FillFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FillFactor {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        get_fill_factor(s).ok_or_else(|| MazeError::UnknownFillFactor {
            name: s.to_string(),
        })
    }
}

/// Resolve a fill factor by name
pub fn get_fill_factor(name: &str) -> Option<FillFactor> {
    match normalize_name(name).as_str() {
        "full" | "100" => Some(FillFactor::Full),
        "full_width" | "width" => Some(FillFactor::FullWidth),
        "full_height" | "height" => Some(FillFactor::FullHeight),
        "quarter" | "25" => Some(FillFactor::Quarter),
        "half" | "50" => Some(FillFactor::Half),
        "three_quarters" | "75" => Some(FillFactor::ThreeQuarters),
        "ninety_percent" | "90" => Some(FillFactor::NinetyPercent),
        _ => None,
    }
}

/// Maze generation algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MazeAlgorithm {
    BinaryTree,
    Sidewinder,
    AldousBroder,
    Wilsons,
    HuntAndKill,
    #[default]
    RecursiveBacktracker,
}

impl MazeAlgorithm {
    pub const ALL: [MazeAlgorithm; 6] = [
        MazeAlgorithm::BinaryTree,
        MazeAlgorithm::Sidewinder,
        MazeAlgorithm::AldousBroder,
        MazeAlgorithm::Wilsons,
        MazeAlgorithm::HuntAndKill,
        MazeAlgorithm::RecursiveBacktracker,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MazeAlgorithm::BinaryTree => "binary_tree",
            MazeAlgorithm::Sidewinder => "sidewinder",
            MazeAlgorithm::AldousBroder => "aldous_broder",
            MazeAlgorithm::Wilsons => "wilsons",
            MazeAlgorithm::HuntAndKill => "hunt_and_kill",
            MazeAlgorithm::RecursiveBacktracker => "recursive_backtracker",
        }
    }

    /// Row sweeping algorithms only know how to fill the whole maze
    pub fn supports_fill_factor(&self, fill_factor: FillFactor) -> bool {
        match self {
            MazeAlgorithm::BinaryTree | MazeAlgorithm::Sidewinder => {
                fill_factor == FillFactor::Full
            }
            _ => true,
        }
    }

    /// Run the algorithm until the builder reports the fill is complete
    pub fn generate(&self, builder: &mut MazeBuilder) -> MazeResult<()> {
        if !self.supports_fill_factor(builder.fill_factor()) {
            return Err(MazeError::IncompatibleOptions {
                algorithm: self.name().to_string(),
                fill_factor: builder.fill_factor().name().to_string(),
            });
        }
        match self {
            MazeAlgorithm::BinaryTree => binary_tree::generate(builder),
            MazeAlgorithm::Sidewinder => sidewinder::generate(builder),
            MazeAlgorithm::AldousBroder => aldous_broder::generate(builder),
            MazeAlgorithm::Wilsons => wilsons::generate(builder),
            MazeAlgorithm::HuntAndKill => hunt_and_kill::generate(builder),
            MazeAlgorithm::RecursiveBacktracker => recursive_backtracker::generate(builder),
        }
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MazeAlgorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        get_algorithm(s).ok_or_else(|| MazeError::UnknownAlgorithm {
            name: s.to_string(),
        })
    }
}

/// Resolve a generation algorithm by name
pub fn get_algorithm(name: &str) -> Option<MazeAlgorithm> {
    match normalize_name(name).as_str() {
        "binary_tree" | "binarytree" => Some(MazeAlgorithm::BinaryTree),
        "sidewinder" => Some(MazeAlgorithm::Sidewinder),
        "aldous_broder" | "aldousbroder" => Some(MazeAlgorithm::AldousBroder),
        "wilsons" | "wilson" => Some(MazeAlgorithm::Wilsons),
        "hunt_and_kill" | "huntandkill" => Some(MazeAlgorithm::HuntAndKill),
        "recursive_backtracker" | "backtracker" | "dfs" => {
            Some(MazeAlgorithm::RecursiveBacktracker)
        }
        _ => None,
    }
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
        .replace('\'', "")
}

/// Where the zones of a maze come from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZoneSource {
    #[default]
    None,
    Explicit(Vec<Zone>),
    Auto,
}

/// Everything that shapes a generation run apart from size and seed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratorOptions {
    pub algorithm: MazeAlgorithm,
    pub fill_factor: FillFactor,
    pub zones: ZoneSource,
    pub zone_placement: ZonePlacementConfig,
}

impl GeneratorOptions {
    pub fn new(algorithm: MazeAlgorithm, fill_factor: FillFactor) -> Self {
        Self {
            algorithm,
            fill_factor,
            ..Default::default()
        }
    }

    pub fn with_zones(mut self, zones: ZoneSource) -> Self {
        self.zones = zones;
        self
    }

    /// Reject option combinations before any work starts
    pub fn validate(&self) -> MazeResult<()> {
        if !self.algorithm.supports_fill_factor(self.fill_factor) {
            return Err(MazeError::IncompatibleOptions {
                algorithm: self.algorithm.name().to_string(),
                fill_factor: self.fill_factor.name().to_string(),
            });
        }
        Ok(())
    }
}

/// Seeded maze generator: zones, carving, hall entrances and navigation tags
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    pub seed: u64,
    pub options: GeneratorOptions,
}

impl MazeGenerator {
    /// Create a generator, drawing a random seed when none is given
    pub fn new(seed: Option<u64>, options: GeneratorOptions) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self { seed, options }
    }

    /// Generate a maze of the given size. The same seed and options always
    /// produce the same maze.
    pub fn generate(&self, size: GridSize) -> MazeResult<MazeGraph> {
        let size = GridSize::validated(size.width, size.height)?;
        self.options.validate()?;

        let mut rng = Pcg64::seed_from_u64(self.seed);
        let zones = match &self.options.zones {
            ZoneSource::None => Vec::new(),
            ZoneSource::Explicit(zones) => {
                if let Some(zone) = zones.iter().find(|zone| !zone.fits_into(size)) {
                    return Err(MazeError::InvalidZone {
                        reason: format!("{zone} does not fit into a {size} maze"),
                    });
                }
                zones.clone()
            }
            ZoneSource::Auto => {
                ZonePlacer::new(self.options.zone_placement.clone()).place(size, &mut rng)
            }
        };

        info!(
            "Generating {} maze with {} ({} fill, {} zones, seed {})",
            size,
            self.options.algorithm,
            self.options.fill_factor,
            zones.len(),
            self.seed
        );

        let mut graph = MazeGraph::new(size, zones)?;
        {
            let mut builder = MazeBuilder::new(&mut graph, self.options.fill_factor, rng);
            self.options.algorithm.generate(&mut builder)?;
            builder.connect_halls()?;
        }
        let merged = graph.merge_zone_interiors();

        let dead_ends = trails::tag_dead_ends(&mut graph).len();
        let trail = trails::tag_longest_trail(&mut graph).len();
        info!(
            "Maze ready: {} passages, {} merged zone walls, {} dead ends, longest trail {} cells",
            graph.edge_count(),
            merged,
            dead_ends,
            trail
        );
        Ok(graph)
    }
}
