//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Static asset pipeline: sass, scripts, images and content-hashed releases
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Config file path (default: assetline.toml)
    #[arg(short = 'C', long, global = true, default_value = "assetline.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Release build: clean, minify, content-hash and rewrite references
    #[command(visible_alias = "b")]
    Build {
        /// Content-hash file names (overrides `revision.enable`)
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        hash: Option<bool>,
    },

    /// Development build: unminified, only rewrites changed files
    #[command(visible_alias = "d")]
    Dev {
        /// Clean output directory completely before building
        #[arg(short, long)]
        clean: bool,
    },

    /// Delete everything inside the output directory
    #[command(visible_alias = "c")]
    Clean,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_hash_flag() {
        let cli = Cli::parse_from(["assetline", "build"]);
        assert!(matches!(cli.command, Commands::Build { hash: None }));

        let cli = Cli::parse_from(["assetline", "build", "--hash"]);
        assert!(matches!(cli.command, Commands::Build { hash: Some(true) }));

        let cli = Cli::parse_from(["assetline", "b", "--hash", "false"]);
        assert!(matches!(cli.command, Commands::Build { hash: Some(false) }));
    }

    #[test]
    fn test_dev_and_globals() {
        let cli = Cli::parse_from(["assetline", "dev", "--clean", "-v", "-C", "site.toml"]);
        assert!(matches!(cli.command, Commands::Dev { clean: true }));
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }

    #[test]
    fn test_clean_alias() {
        let cli = Cli::parse_from(["assetline", "c"]);
        assert!(matches!(cli.command, Commands::Clean));
        assert_eq!(cli.config, PathBuf::from("assetline.toml"));
    }
}
