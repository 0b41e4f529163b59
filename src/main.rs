//! routetree - route trees from filesystem conventions.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use routetree::cli::{self, Cli, Commands};
use routetree::config::ProjectConfig;
use routetree::logger::set_verbose;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    set_verbose(cli.verbose);

    let config = ProjectConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Routes { format, pretty } => cli::routes::print_routes(&config, *format, *pretty),
        Commands::Migrate { dirs, dry_run } => cli::migrate::run_migrate(&config, dirs, *dry_run),
        Commands::Rollback { dirs } => cli::migrate::run_rollback(&config, dirs),
    }
}
