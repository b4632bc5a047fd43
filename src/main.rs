//! SOCIOGENESIS - CLI Entry Point
//!
//! Headless runner for the artificial-life simulator.

use clap::{Parser, Subcommand};
use sociogenesis::analysis::ExportSystem;
use sociogenesis::{benchmark, Config, Driver, DriverConfig, World};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sociogenesis")]
#[command(version)]
#[command(about = "Artificial-life simulator of evolving cells, tribes and culture")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "10000")]
        ticks: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for exported results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// Initial population size
        #[arg(short, long, default_value = "200")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn init_logging(default_level: &str) {
    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            output,
            quiet,
        } => run_simulation(config, ticks, seed, output, quiet),

        Commands::Benchmark { ticks, population } => {
            init_logging("warn");
            run_benchmark(ticks, population)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }
    }
}

fn run_simulation(
    config_path: PathBuf,
    ticks: u64,
    seed: Option<u64>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, loaded) = if config_path.exists() {
        (Config::from_file(&config_path)?, true)
    } else {
        (Config::default(), false)
    };
    init_logging(&config.logging.log_level);

    if loaded {
        log::info!("Loaded config from {:?}", config_path);
    } else {
        log::info!("No config at {:?}, using defaults", config_path);
    }

    let world = if let Some(s) = seed {
        World::new_with_seed(config.clone(), s)
    } else {
        World::new(config.clone())
    };

    println!("Starting simulation");
    println!("  Initial population: {}", world.population());
    println!("  World size: {}x{}", config.world.width, config.world.height);
    println!("  Ticks: {}", ticks);
    if let Some(s) = world.seed() {
        println!("  Seed: {}", s);
    }
    println!();

    let mut driver = Driver::new(world, DriverConfig::from_config(&config));
    let report_interval = config.logging.analysis_interval.max(1);

    let report = driver.run_with(ticks, |snapshot| {
        if !quiet && snapshot.tick % report_interval == 0 {
            println!("{}", snapshot.stats.summary());
        }
    })?;

    let world = driver.into_world();

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", report.elapsed_secs);
    println!("Ticks: {}", world.time);
    println!("Speed: {:.1} ticks/s", report.ticks_per_second());
    println!("Restarts: {}", report.restarts);
    println!("Final population: {}", report.final_population);
    println!("Tribes: {}", world.tribes.len());
    println!("Max generation: {}", world.generation_max());
    for insight in &world.insights {
        println!("  {}", insight);
    }

    if let Some(dir) = output {
        let manifest = ExportSystem::export_full_state(&world, &dir)?;
        ExportSystem::export_summary(&world, dir.join("summary.txt"))?;
        println!("Results exported to {:?} (tick {})", dir, manifest.time);
    }

    Ok(())
}

fn run_benchmark(ticks: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== SOCIOGENESIS Benchmark ===");
    println!("Ticks: {}", ticks);
    println!("Population: {}", population);
    println!();

    let result = benchmark(ticks, population);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    log::info!("Configuration saved to {:?}", output);
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
