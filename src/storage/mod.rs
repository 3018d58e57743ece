use crate::errors::{MazeError, MazeResult};
use crate::maze::MazeGraph;
use crate::maze_generation::{FillFactor, MazeAlgorithm, MazeGenerator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

/// A generated maze together with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MazeDefinition {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub seed: u64,
    pub algorithm: MazeAlgorithm,
    pub fill_factor: FillFactor,
    /// Canonical text form of the maze
    #[validate(custom(function = "validate_maze_text"))]
    pub maze: String,
}

fn validate_maze_text(text: &str) -> Result<(), ValidationError> {
    MazeGraph::parse(text)
        .map(|_| ())
        .map_err(|_| ValidationError::new("unparseable_maze"))
}

impl MazeDefinition {
    pub fn new(name: String, generator: &MazeGenerator, graph: &MazeGraph) -> MazeResult<Self> {
        let definition = Self {
            name,
            seed: generator.seed,
            algorithm: generator.options.algorithm,
            fill_factor: generator.options.fill_factor,
            maze: graph.serialize(),
        };

        definition.validate().map_err(|_| MazeError::InvalidMazeData {
            reason: "Maze definition validation failed".to_string(),
        })?;

        Ok(definition)
    }

    /// Rebuild the maze graph from the stored text
    pub fn to_graph(&self) -> MazeResult<MazeGraph> {
        MazeGraph::parse(&self.maze)
    }

    pub fn get_mazes_dir() -> MazeResult<PathBuf> {
        std::env::current_dir()
            .map_err(MazeError::ConfigDirCreationFailed)
            .map(|dir| dir.join("mazes"))
    }

    /// Load a maze from the mazes directory
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> MazeResult<Self> {
        Self::load_from_path(Self::get_mazes_dir()?.join(filename))
    }

    /// Save the maze to the mazes directory
    pub fn save_to_file<P: AsRef<Path>>(&self, filename: P) -> MazeResult<()> {
        self.save_to_path(Self::get_mazes_dir()?.join(filename))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> MazeResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        if !file_path.exists() {
            return Err(MazeError::MazeFileNotFound { path: file_path });
        }

        let data = std::fs::read(&file_path).map_err(MazeError::ConfigDirCreationFailed)?;

        let (definition, _): (MazeDefinition, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
                MazeError::CorruptedMazeFile {
                    reason: format!("Failed to deserialize maze data: {e}"),
                }
            })?;

        definition.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            MazeError::InvalidMazeData {
                reason: format!("Maze validation failed: {error_details}"),
            }
        })?;

        Ok(definition)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> MazeResult<()> {
        self.validate().map_err(|_| MazeError::InvalidMazeData {
            reason: "Maze validation failed before save".to_string(),
        })?;

        let file_path = path.as_ref();
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(MazeError::ConfigDirCreationFailed)?;
        }

        let data =
            bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(|e| {
                MazeError::InvalidMazeData {
                    reason: format!("Failed to serialize maze: {e}"),
                }
            })?;

        std::fs::write(file_path, data).map_err(MazeError::ConfigDirCreationFailed)?;

        Ok(())
    }
}
