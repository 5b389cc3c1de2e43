use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tileworld_author::Editor;
use tileworld_common::{REGION_SIZE, VIEW_RADIUS};
use tileworld_kernel::World;
use tileworld_nav::{DEFAULT_NEIGHBOR_OFFSETS, a_star_with};
use tileworld_region::{RegionStore, FILE_VERSION};
use tileworld_render::DebugTileRenderer;
use tileworld_tools::RegionInspector;

#[derive(Parser)]
#[command(name = "tileworld-cli", about = "CLI tool for tileworld map operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and format info
    Info,
    /// Summarize one region file, with an ASCII walkability map
    Inspect {
        /// Map directory holding region files
        #[arg(short, long, default_value = "maps")]
        maps: PathBuf,
        #[arg(long, default_value = "0")]
        rx: i32,
        #[arg(long, default_value = "0")]
        ry: i32,
        /// Print the tile map as text
        #[arg(long)]
        draw: bool,
    },
    /// Find a path between two world tiles
    Path {
        #[arg(short, long, default_value = "maps")]
        maps: PathBuf,
        /// Start tile as X,Y
        #[arg(long, value_parser = parse_point)]
        from: (i32, i32),
        /// Goal tile as X,Y
        #[arg(long, value_parser = parse_point)]
        to: (i32, i32),
        /// Use cell values as step costs instead of uniform cost
        #[arg(long)]
        weighted: bool,
    },
    /// Block or clear a world tile and save the owning region
    Block {
        #[arg(short, long, default_value = "maps")]
        maps: PathBuf,
        /// Tile as X,Y
        #[arg(long, value_parser = parse_point)]
        at: (i32, i32),
        /// Clear the flag instead of setting it
        #[arg(long)]
        clear: bool,
    },
    /// Walk a point across the map and report the streaming window at each stop
    Stream {
        #[arg(short, long, default_value = "maps")]
        maps: PathBuf,
        /// Number of region boundaries to cross
        #[arg(short, long, default_value = "4")]
        steps: i32,
    },
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y: {e}"))?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tileworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("region size: {REGION_SIZE}x{REGION_SIZE} tiles");
            println!("file version: {FILE_VERSION}");
            println!("default view radius: {VIEW_RADIUS}");
        }
        Commands::Inspect { maps, rx, ry, draw } => {
            let store = RegionStore::new(maps);
            let region = store.load(rx, ry)?;
            println!("{}", RegionInspector::summary(&region));
            if draw {
                print!("{}", DebugTileRenderer::render(&region));
            }
        }
        Commands::Path {
            maps,
            from,
            to,
            weighted,
        } => {
            let mut world = World::new(RegionStore::new(maps));
            let (grid, ox, oy) = world.walkable_window(from.0, from.1)?;
            let start = (from.0 - ox, from.1 - oy);
            let goal = (to.0 - ox, to.1 - oy);
            match a_star_with(&grid, start, goal, &DEFAULT_NEIGHBOR_OFFSETS, weighted) {
                Some(path) => {
                    println!("path: {} steps", path.len() - 1);
                    for (lx, ly) in path {
                        println!("  ({}, {})", lx + ox, ly + oy);
                    }
                }
                None => println!("no path"),
            }
        }
        Commands::Block { maps, at, clear } => {
            let mut world = World::new(RegionStore::new(maps));
            let mut editor = Editor::new();
            editor.set_blocked(&mut world, at.0, at.1, !clear)?;
            let written = world.save_dirty()?;
            println!(
                "{} ({}, {}); {written} region file(s) written",
                if clear { "cleared" } else { "blocked" },
                at.0,
                at.1
            );
        }
        Commands::Stream { maps, steps } => {
            let mut world = World::new(RegionStore::new(maps));
            for i in 0..=steps {
                let x = i * REGION_SIZE;
                world.update_streaming(x, 0)?;
                println!(
                    "at ({x}, 0): {}",
                    RegionInspector::stream_report(world.manager())
                );
            }
            world.shutdown();
        }
    }

    Ok(())
}
