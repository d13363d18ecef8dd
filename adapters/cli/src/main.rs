#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a chunked maze, prints it, and
//! optionally drives the agent from the start cell to the finish block.

mod ascii;
mod config;
mod drive;
mod maze_transfer;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_drive_core::{FinishArea, MazeParameters};
use maze_drive_system_generation::generate;
use maze_drive_system_nav_graph::build_graph;

use crate::config::CliConfig;

/// Chunked maze generator and agent driver.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generator seed
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Cells along each chunk edge
    #[arg(long)]
    chunk_size: Option<i32>,

    /// Maze width in chunks
    #[arg(long)]
    chunks_x: Option<i32>,

    /// Maze depth in chunks
    #[arg(long)]
    chunks_z: Option<i32>,

    /// Placement of the 2x2 finish block
    #[arg(long, value_enum)]
    finish: Option<FinishChoice>,

    /// Maze transfer string to rebuild instead of the configured maze
    #[arg(long, conflicts_with_all = ["seed", "chunk_size", "chunks_x", "chunks_z", "finish"])]
    import: Option<String>,

    /// Print the transfer string of the generated maze
    #[arg(long)]
    export: bool,

    /// Drive the agent from the start cell to the finish block
    #[arg(long)]
    drive: bool,

    /// Skip drawing the maze
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn parameters(&self, config: &CliConfig) -> Result<MazeParameters> {
        if let Some(value) = &self.import {
            return maze_transfer::decode(value).context("failed to import maze string");
        }

        let mut parameters = config.parameters();
        if let Some(seed) = self.seed {
            parameters.seed = seed;
        }
        if let Some(chunk_size) = self.chunk_size {
            parameters.chunk_size = chunk_size;
        }
        if let Some(chunks_x) = self.chunks_x {
            parameters.width = chunks_x;
        }
        if let Some(chunks_z) = self.chunks_z {
            parameters.height = chunks_z;
        }
        if let Some(finish) = self.finish {
            parameters.finish = finish.into();
        }
        Ok(parameters)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FinishChoice {
    None,
    Center,
    Corner,
}

impl From<FinishChoice> for FinishArea {
    fn from(choice: FinishChoice) -> Self {
        match choice {
            FinishChoice::None => FinishArea::None,
            FinishChoice::Center => FinishArea::Center,
            FinishChoice::Corner => FinishArea::Corner,
        }
    }
}

/// Entry point for the maze command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = CliConfig::load(args.config.as_deref())?;
    let parameters = args.parameters(&config)?;

    let model = generate(parameters.to_spec(), &parameters.options())
        .context("failed to generate maze")?;
    let graph = build_graph(&model, &config.layout.anchor_layout())
        .context("failed to build navigation graph")?;
    let (model, graph) = (Arc::new(model), Arc::new(graph));

    if args.export {
        println!("{}", maze_transfer::encode(&parameters)?);
    }

    let summary = if args.drive {
        Some(drive::drive_to_finish(&model, &graph, &config.drive)?)
    } else {
        None
    };

    if !args.quiet {
        let route = summary
            .as_ref()
            .map_or(&[][..], |summary| summary.path.as_slice());
        print!("{}", ascii::render(&model, route));
    }

    if let Some(summary) = summary {
        println!(
            "reached finish at {} after {} moves and {} turns ({:.2}s simulated)",
            summary.finish,
            summary.moves,
            summary.turns,
            summary.elapsed.as_secs_f32()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "maze-drive",
            "--seed",
            "-3",
            "--chunks-x",
            "5",
            "--finish",
            "corner",
        ]);
        let parameters = args.parameters(&CliConfig::default()).expect("parameters");

        assert_eq!(parameters.seed, -3);
        assert_eq!(parameters.width, 5);
        assert_eq!(parameters.height, CliConfig::default().chunks_z);
        assert_eq!(parameters.finish, FinishArea::Corner);
    }

    #[test]
    fn import_replaces_configured_maze() {
        let exported = MazeParameters {
            seed: 11,
            chunk_size: 2,
            width: 6,
            height: 1,
            finish: FinishArea::None,
        };
        let encoded = maze_transfer::encode(&exported).expect("encodes");
        let args = Args::parse_from(["maze-drive", "--import", encoded.as_str()]);

        assert_eq!(
            args.parameters(&CliConfig::default()).expect("parameters"),
            exported
        );
    }
}
