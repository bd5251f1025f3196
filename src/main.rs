//! assetline - A static-site asset pipeline with content-hashed releases.

mod asset;
mod cli;
mod config;
mod core;
mod freshness;
mod logger;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    // Validated before any file is touched
    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build::build_release(&config),
        Commands::Dev { clean } => build::build_dev(&config, *clean),
        Commands::Clean => build::clean(&config),
    }
}
