//! marrow CLI — headless simulation, validation, and frame export.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "marrow")]
#[command(version, about = "marrow — 2D AVBD rigid and soft body physics engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene headless for a fixed duration.
    Simulate {
        /// Path to a scene description (JSON).
        #[arg(short, long)]
        scene: Option<String>,

        /// Built-in fixture to run instead of a scene file
        /// (cloth, hex, cantilever).
        #[arg(short, long)]
        fixture: Option<String>,

        /// Simulated duration in seconds.
        #[arg(short, long, default_value_t = 5.0)]
        duration: f32,

        /// Output JSON file for captured frames.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a scene description without running it.
    Validate {
        /// Path to a scene description (JSON).
        path: String,
    },

    /// List the built-in fixtures.
    Scenes,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            scene,
            fixture,
            duration,
            output,
        } => commands::simulate(scene.as_deref(), fixture.as_deref(), duration, output.as_deref()),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Scenes => commands::scenes(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
