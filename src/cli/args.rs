//! CLI argument definitions
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// zaplaunch - Install and run Eaglercraft (no Java needed)
#[derive(Parser, Debug)]
#[command(name = "zaplaunch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for the downloaded archive and extracted game
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the saved executable and GPU support
    Status,

    /// Download and install Eaglercraft
    Install {
        /// Launch the game once installed
        #[arg(long)]
        launch: bool,
    },

    /// Launch the installed game
    Launch {
        /// Let the game write straight to this terminal
        #[arg(long)]
        no_capture: bool,
    },

    /// Use an existing executable instead of installing
    Select {
        /// Path to the Eaglercraft executable
        path: PathBuf,
    },

    /// Check the graphics adapter against known-unsupported GPUs
    Gpu,
}
