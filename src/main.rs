//! zaplaunch - Eaglercraft installer and launcher
//!
//! Entry point for the command-line front end.

mod cli;
mod config;
mod core;
mod util;

use clap::Parser;
use cli::{Args, Commands, Session};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let settings = config::load()?;
    let session = Session::new(settings, args.work_dir);

    match args.command.unwrap_or(Commands::Status) {
        Commands::Status => cli::status(&session),
        Commands::Install { launch } => cli::install(&session, launch).await,
        Commands::Launch { no_capture } => {
            // The game owns this thread until it exits
            tokio::task::block_in_place(|| cli::launch(&session, no_capture))
        }
        Commands::Select { path } => cli::select(&session, &path),
        Commands::Gpu => cli::gpu_check(),
    }
}
