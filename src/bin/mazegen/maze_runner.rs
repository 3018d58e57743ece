use mazeforge::storage::MazeDefinition;
use mazeforge::trails;
use mazeforge::{GeneratorOptions, GridSize, MazeGenerator, MazeGraph, MazeResult, Position};
use tracing::{info, warn};

pub struct MazeRunConfig {
    pub name: String,
    pub size: GridSize,
    pub seed: Option<u64>,
    pub options: GeneratorOptions,
    pub solve: Option<(Position, Position)>,
}

/// Everything a run produced
pub struct MazeRun {
    pub definition: MazeDefinition,
    pub graph: MazeGraph,
    pub route: Option<(Position, Position)>,
    pub solution: Option<Vec<Position>>,
}

pub struct MazeRunner;

impl MazeRunner {
    pub fn generate(config: MazeRunConfig) -> MazeResult<MazeRun> {
        let generator = MazeGenerator::new(config.seed, config.options);
        info!("Generating maze '{}' (seed: {})", config.name, generator.seed);

        let graph = match generator.generate(config.size) {
            Ok(graph) => graph,
            Err(e) => {
                if let Some(partial) = e.partial_maze() {
                    warn!("Partial maze: {}", partial);
                }
                return Err(e);
            }
        };

        let solution = match config.solve {
            Some((start, end)) => {
                let path = trails::solve_positions(&graph, start, end)?;
                if path.is_none() {
                    warn!("No route from {} to {}", start, end);
                }
                path
            }
            None => None,
        };

        let definition = MazeDefinition::new(config.name, &generator, &graph)?;
        Ok(MazeRun {
            definition,
            graph,
            route: config.solve,
            solution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazeforge::{FillFactor, MazeAlgorithm, MazeError};

    fn run_config(solve: Option<(Position, Position)>) -> MazeRunConfig {
        MazeRunConfig {
            name: "test".to_string(),
            size: GridSize::new(8, 6),
            seed: Some(12345),
            options: GeneratorOptions::new(MazeAlgorithm::Sidewinder, FillFactor::Full),
            solve,
        }
    }

    #[test]
    fn test_run_with_solution() {
        let run = MazeRunner::generate(run_config(Some((
            Position::new(0, 0),
            Position::new(7, 5),
        ))))
        .unwrap();
        assert_eq!(run.definition.seed, 12345);
        assert_eq!(run.definition.maze, run.graph.serialize());

        let solution = run.solution.unwrap();
        assert_eq!(solution.first(), Some(&Position::new(0, 0)));
        assert_eq!(solution.last(), Some(&Position::new(7, 5)));
        for step in solution.windows(2) {
            assert!(step[0].is_adjacent_to(step[1]));
        }
    }

    #[test]
    fn test_run_rejects_route_outside_maze() {
        assert!(matches!(
            MazeRunner::generate(run_config(Some((Position::new(0, 0), Position::new(8, 0))))),
            Err(MazeError::OutOfBounds { .. })
        ));
    }
}
