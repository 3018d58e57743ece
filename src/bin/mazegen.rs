use clap::Parser;
use mazeforge::config::{MazeConfig, load_config, save_config};
use mazeforge::storage::MazeDefinition;
use mazeforge::{MazeResult, ZoneSource};
use tracing_subscriber::EnvFilter;

mod mazegen {
    pub mod cli_utils;
    pub mod maze_runner;
    pub mod options_builder;
}

use mazegen::cli_utils::*;
use mazegen::maze_runner::{MazeRun, MazeRunConfig, MazeRunner};
use mazegen::options_builder::OptionsBuilder;

#[derive(Parser, Clone)]
#[command(name = "mazegen")]
#[command(about = "Generate seeded mazes with halls, caves and filled areas")]
struct Args {
    /// Maze name
    #[arg(long, default_value = "generated_maze")]
    name: String,

    /// Maze size in cells (format: WIDTHxHEIGHT), defaults to the configured size
    #[arg(long)]
    size: Option<String>,

    /// Generation algorithm (binary_tree, sidewinder, aldous_broder, wilsons, hunt_and_kill, recursive_backtracker)
    #[arg(long)]
    algorithm: Option<String>,

    /// Fill factor (full, full_width, full_height, quarter, half, three_quarters, ninety_percent)
    #[arg(long)]
    fill: Option<String>,

    /// Random seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated zones, e.g. "P1x1;S3x2;Hall,P6x2;S3x3;Cave;den"
    #[arg(long)]
    zones: Option<String>,

    /// Place random halls, caves and filled areas
    #[arg(long)]
    auto_zones: bool,

    /// Output file path relative to the mazes/ directory (e.g., "crypt.bin")
    #[arg(long)]
    output: Option<String>,

    /// Find a route between two cells (format: X,Y:X,Y)
    #[arg(long)]
    solve: Option<String>,

    /// Store this run's size, algorithm and fill factor as the new defaults
    #[arg(long)]
    save_config: bool,

    /// Log every connection
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> MazeResult<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config();

    // Parse and validate all CLI arguments
    let size = match &args.size {
        Some(size) => parse_size(size)?,
        None => config.size(),
    };
    let solve = args.solve.as_deref().map(parse_solve).transpose()?;
    if let Some(output) = &args.output {
        validate_output_path(output)?;
    }

    let options = OptionsBuilder::new(config.clone())
        .algorithm(args.algorithm)
        .fill(args.fill)
        .zones(args.zones)
        .auto_zones(args.auto_zones)
        .build()?;

    if args.save_config {
        let updated = MazeConfig {
            width: size.width,
            height: size.height,
            algorithm: options.algorithm,
            fill_factor: options.fill_factor,
            auto_zones: options.zones == ZoneSource::Auto,
            ..config
        };
        save_config(&updated)?;
        println!("Saved defaults: {} {} {}", size, updated.algorithm, updated.fill_factor);
    }

    let run = MazeRunner::generate(MazeRunConfig {
        name: args.name,
        size,
        seed: args.seed,
        options,
        solve,
    })?;

    println!("{}", run.definition.maze);

    if let Some(output) = &args.output {
        run.definition.save_to_file(output)?;
        let full_path = MazeDefinition::get_mazes_dir()?.join(output);
        println!("\nMaze saved successfully to: {}", full_path.display());
    }

    print_maze_summary(&run);
    Ok(())
}

fn print_maze_summary(run: &MazeRun) {
    let graph = &run.graph;
    let definition = &run.definition;

    println!("\nMaze summary:");
    println!("  Name: {}", definition.name);
    println!(
        "  Size: {} using {} ({} fill, seed {})",
        graph.size(),
        definition.algorithm,
        definition.fill_factor,
        definition.seed
    );
    println!(
        "  Passages: {} linking {} of {} cells",
        graph.edge_count(),
        graph.connected_count(),
        graph.len()
    );

    println!("  Zones: {}", graph.zones().len());
    for (i, zone) in graph.zones().iter().enumerate() {
        println!("    Zone {}: {}", i + 1, zone);
    }

    println!("  Dead ends: {}", graph.dead_ends().len());
    let trail = graph.longest_trail();
    if let (Some(&start), Some(&end)) = (trail.first(), trail.last()) {
        println!(
            "  Longest trail: {} cells from {} to {}",
            trail.len(),
            graph.position_of(start),
            graph.position_of(end)
        );
    }

    if let Some((start, end)) = run.route {
        match &run.solution {
            Some(path) => {
                let steps: Vec<String> = path.iter().map(|position| position.to_string()).collect();
                println!("  Solution: {} cells", path.len());
                println!("    {}", steps.join(" -> "));
            }
            None => println!("  Solution: no route from {start} to {end}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_integration() {
        let args = Args::parse_from([
            "mazegen",
            "--size",
            "10x8",
            "--algorithm",
            "wilsons",
            "--seed",
            "99",
            "--zones",
            "P1x1;S3x2;Hall,P5x4;S3x3;Cave",
            "--solve",
            "0,0:9,7",
        ]);

        let size = parse_size(args.size.as_deref().unwrap()).unwrap();
        let solve = args.solve.as_deref().map(parse_solve).transpose().unwrap();
        let options = OptionsBuilder::new(MazeConfig::default())
            .algorithm(args.algorithm)
            .fill(args.fill)
            .zones(args.zones)
            .auto_zones(args.auto_zones)
            .build()
            .unwrap();

        let run = MazeRunner::generate(MazeRunConfig {
            name: args.name,
            size,
            seed: args.seed,
            options,
            solve,
        })
        .unwrap();
        assert_eq!(run.definition.name, "generated_maze");
        assert_eq!(run.graph.zones().len(), 2);
        assert!(run.solution.is_some());
    }
}
