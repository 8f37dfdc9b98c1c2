//! Headless trainer: runs generations, keeps the best driver, repeats.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roadevo::simulation::params::Params;
use roadevo::simulation::storage::{JsonFileStore, NetworkStore};
use roadevo::simulation::world::World;
use tracing::info;

#[derive(Parser)]
#[command(name = "roadevo")]
#[command(version)]
#[command(about = "Evolve self-driving cars by mutating the best driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run generations and keep the best network
    Run {
        /// Configuration file (JSON); defaults are used if it does not exist
        #[arg(short, long, default_value = "roadevo.json")]
        config: PathBuf,

        /// Where the best network is stored
        #[arg(short, long, default_value = "best_network.json")]
        store: PathBuf,

        /// Ticks per generation
        #[arg(short, long, default_value = "2000")]
        ticks: u64,

        /// Number of generations
        #[arg(short, long, default_value = "10")]
        generations: u32,

        /// Extra random traffic cars per generation
        #[arg(long, default_value = "0")]
        extra_traffic: usize,

        /// Write the final snapshot as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "roadevo.json")]
        output: PathBuf,
    },

    /// Show the stored network
    Inspect {
        /// Stored network file
        #[arg(short, long, default_value = "best_network.json")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            store,
            ticks,
            generations,
            extra_traffic,
            snapshot,
        } => run(config, store, ticks, generations, extra_traffic, snapshot),
        Commands::Init { output } => {
            Params::default()
                .save_to_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(path = %output.display(), "default configuration written");
            Ok(())
        }
        Commands::Inspect { store } => inspect(store),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn run(
    config: PathBuf,
    store: PathBuf,
    ticks: u64,
    generations: u32,
    extra_traffic: usize,
    snapshot: Option<PathBuf>,
) -> Result<()> {
    let params = if config.exists() {
        info!(path = %config.display(), "loading configuration");
        Params::load_from_file(&config).with_context(|| format!("reading {}", config.display()))?
    } else {
        info!("using default configuration");
        Params::default()
    };

    let mut world = World::new(params, JsonFileStore::new(store))?;

    for generation in 0..generations {
        for _ in 0..extra_traffic {
            world.add_random_traffic(200.0)?;
        }

        for _ in 0..ticks {
            world.tick();
            if world.population().alive_count() == 0 {
                break;
            }
        }

        let population = world.population();
        info!(
            generation,
            ticks = world.tick_count(),
            best_y = population.best().y,
            alive = population.alive_count(),
            "generation finished"
        );

        world.save_best()?;
        if generation + 1 < generations {
            world.restart()?;
        }
    }

    if let Some(path) = snapshot {
        let json = serde_json::to_string_pretty(&world.snapshot())?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}

fn inspect(store: PathBuf) -> Result<()> {
    let store = JsonFileStore::new(store);
    match store.load()? {
        Some(network) => {
            println!("topology: {:?}", network.topology());
            for (i, level) in network.levels().iter().enumerate() {
                println!(
                    "level {}: {} -> {}, biases {:?}",
                    i,
                    level.input_count(),
                    level.output_count(),
                    level.biases.to_vec()
                );
            }
        }
        None => println!("no network stored at {}", store.path().display()),
    }
    Ok(())
}
