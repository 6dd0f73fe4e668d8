//! CLI frontend for Parley, a grid world where you talk to characters whose
//! lines come from a chat-completion service.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "parley",
    about = "Parley: walk up to characters and talk to them",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal
    Play {
        /// World file (default: the built-in village)
        #[arg(short, long)]
        world: Option<PathBuf>,

        /// Chat model (overrides OPENAI_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// API root (overrides OPENAI_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Number of reply options to ask for
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=9))]
        options: u8,

        /// Where to write the log
        #[arg(long, default_value = "parley.log")]
        log_file: PathBuf,
    },

    /// Validate a world file
    Check {
        /// World file (default: the built-in village)
        #[arg(short, long)]
        world: Option<PathBuf>,
    },

    /// List the characters in a world
    List {
        /// World file (default: the built-in village)
        #[arg(short, long)]
        world: Option<PathBuf>,
    },
}

fn main() {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            world,
            model,
            base_url,
            options,
            log_file,
        } => commands::play::run(commands::play::PlayOptions {
            world,
            model,
            base_url,
            options,
            log_file,
        }),
        Commands::Check { world } => commands::check::run(world.as_deref()),
        Commands::List { world } => commands::list::run(world.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
