use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vtysync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative Quagga routing configuration through vtysh", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the vtysh executable
    #[arg(long, env = "VTYSH", global = true)]
    pub vtysh: Option<PathBuf>,

    /// Desired-state file (default: ~/.config/vtysync/desired.toml)
    #[arg(short, long, env = "VTYSYNC_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show resources as currently configured on the router
    Show(ShowArgs),

    /// Preview what apply would change
    Diff(DiffArgs),

    /// Make the router match the desired state
    Apply(ApplyArgs),

    /// Validate the desired-state file
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ShowArgs {
    /// Only show one resource kind
    #[arg(value_parser = PossibleValuesParser::new(quaggakit::kinds::NAMES.iter().copied()))]
    pub kind: Option<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Only plan one kind or resource (`route_map` or `route_map.NAME SEQ`)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only apply one kind or resource (`route_map` or `route_map.NAME SEQ`)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Dry run - show what would be done
    #[arg(short, long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
