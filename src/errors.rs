use crate::maze::coordinates::{GridSize, Position};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MazeError {
    // Configuration errors
    #[error(
        "Invalid maze size {width}x{height}: dimensions must be positive and the area within the cell limit"
    )]
    InvalidSize { width: i32, height: i32 },

    #[error("{algorithm} does not support the {fill_factor} fill factor (only full is supported)")]
    IncompatibleOptions {
        algorithm: String,
        fill_factor: String,
    },

    #[error("Invalid zone: {reason}")]
    InvalidZone { reason: String },

    #[error("Unknown maze algorithm: '{name}'")]
    UnknownAlgorithm { name: String },

    #[error("Unknown fill factor: '{name}'")]
    UnknownFillFactor { name: String },

    // Structural errors
    #[error("Position {position} is outside of the {size} maze")]
    OutOfBounds { position: Position, size: GridSize },

    #[error("Cannot link {from} to {to}: cells are not adjacent")]
    NotAdjacent { from: Position, to: Position },

    #[error("Cells {from} and {to} are already linked")]
    AlreadyLinked { from: Position, to: Position },

    #[error("Cell {position} is excluded from the maze and cannot be linked")]
    CellExcluded { position: Position },

    #[error("No eligible cells left to link")]
    NoEligibleCells,

    // Generation stalls
    #[error("Maze generation is stuck: {reason}")]
    GenerationStuck { reason: String, partial_maze: String },

    // Text format
    #[error("Failed to parse maze: {reason}")]
    ParseFailed { reason: String },

    // Config and file errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Failed to create config directory: {0}")]
    ConfigDirCreationFailed(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Maze file not found at path: {path}")]
    MazeFileNotFound { path: PathBuf },

    #[error("Corrupted maze file: {reason}")]
    CorruptedMazeFile { reason: String },

    #[error("Invalid maze data: {reason}")]
    InvalidMazeData { reason: String },
}

impl MazeError {
    /// Canonical text of the partially built maze, when generation got stuck
    pub fn partial_maze(&self) -> Option<&str> {
        match self {
            MazeError::GenerationStuck { partial_maze, .. } => Some(partial_maze),
            _ => None,
        }
    }
}

/// Result type alias for all operations
pub type MazeResult<T> = Result<T, MazeError>;
