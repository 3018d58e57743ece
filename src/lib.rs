pub mod config;
pub mod errors;
pub mod maze;
pub mod maze_generation;
pub mod storage;
pub mod trails;

// Selective re-exports for external consumers

pub use errors::{MazeError, MazeResult};

pub use maze::{Cell, CellAttribute, GridSize, MazeGraph, Position, Zone, ZoneType};

pub use maze_generation::{FillFactor, GeneratorOptions, MazeAlgorithm, MazeGenerator, ZoneSource};

pub use storage::MazeDefinition;
