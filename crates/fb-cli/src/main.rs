mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// fishbowl CLI -- derive and animate office scenes from workflow snapshots.
#[derive(Parser)]
#[command(name = "fb", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a scene snapshot from a workspace snapshot file.
    Scene {
        /// Workspace snapshot JSON to read.
        #[arg(long)]
        workspace: PathBuf,
        /// Previous scene JSON, for position continuity and transition events.
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Floor plan TOML (built-in office plan when omitted).
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Tag the scene as locally generated instead of ingested.
        #[arg(long)]
        local: bool,
        /// Pretty-print the output JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Derive a scene, then step the movement simulation and print the
    /// rendered agents.
    Simulate {
        /// Workspace snapshot JSON to read.
        #[arg(long)]
        workspace: PathBuf,
        /// Floor plan TOML (built-in office plan when omitted).
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Number of ticks to run.
        #[arg(long, default_value_t = 10)]
        ticks: u32,
        /// Milliseconds of simulated time per tick.
        #[arg(long = "delta-ms", default_value_t = 100.0)]
        delta_ms: f64,
        /// Pretty-print the output JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Generate the deterministic identity and sprite for a seed.
    Sprite {
        /// Identity seed (usually the agent id).
        #[arg(long)]
        seed: String,
        /// Agent role (orchestrator, planner, frontend, backend, reviewer,
        /// worker).
        #[arg(long)]
        role: String,
        /// Display name used for the callsign (defaults to the seed).
        #[arg(long)]
        name: Option<String>,
        /// Walk-cycle frame to render.
        #[arg(long, default_value_t = 0)]
        frame: u32,
        /// Print an ASCII preview instead of JSON.
        #[arg(long)]
        ascii: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scene {
            workspace,
            previous,
            plan,
            local,
            pretty,
        } => commands::scene::run(&workspace, previous.as_deref(), plan.as_deref(), local, pretty),
        Commands::Simulate {
            workspace,
            plan,
            ticks,
            delta_ms,
            pretty,
        } => commands::simulate::run(&workspace, plan.as_deref(), ticks, delta_ms, pretty),
        Commands::Sprite {
            seed,
            role,
            name,
            frame,
            ascii,
        } => commands::sprite::run(&seed, &role, name.as_deref(), frame, ascii),
    }
}
