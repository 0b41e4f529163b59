//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Compile filesystem route conventions into a route tree
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: routetree.toml)
    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = "routetree.toml",
        value_hint = clap::ValueHint::FilePath
    )]
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
    /// Print the route tree
    #[command(visible_alias = "r")]
    Routes {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Migrate a legacy route directory to the hybrid convention
    #[command(visible_alias = "m")]
    Migrate {
        #[command(flatten)]
        dirs: MigrateDirs,

        /// Stage the migrated tree without swapping it in
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Restore the route directory after an interrupted migration
    Rollback {
        #[command(flatten)]
        dirs: MigrateDirs,
    },
}

/// Source and staging directories (default: `[migrate]` section).
#[derive(clap::Args, Debug, Clone)]
pub struct MigrateDirs {
    /// Route directory to migrate
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Staging directory for the migrated tree
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub target: Option<PathBuf>,
}

/// Route tree output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    /// JSX-like listing, as host routers print it
    Listing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_routes() {
        let cli = Cli::parse_from(["routetree", "routes", "--format", "listing"]);
        assert!(matches!(
            cli.command,
            Commands::Routes {
                format: Format::Listing,
                pretty: false
            }
        ));
        assert_eq!(cli.config, PathBuf::from("routetree.toml"));
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::parse_from(["routetree", "-v", "migrate", "app/routes", "--dry-run"]);
        assert!(cli.verbose);
        let Commands::Migrate { dirs, dry_run } = cli.command else {
            panic!("expected migrate");
        };
        assert!(dry_run);
        assert_eq!(dirs.source, Some(PathBuf::from("app/routes")));
        assert_eq!(dirs.target, None);
    }
}
