//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// n9res - Bundle static resource provider
///
/// Serves namespaced CSS, JS and image resources out of a bundle and
/// revalidates client copies against the bundle's last-modified time.
#[derive(Parser, Debug)]
#[command(name = "n9res")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "N9RES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bundle root directory (overrides bundle.root)
    #[arg(short, long, global = true)]
    pub bundle: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch resource requests against the bundle
    Fetch(FetchArgs),

    /// List resources served from the bundle
    List(ListArgs),

    /// Show bundle, namespace and watermark details
    Status,

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Namespaced paths (e.g. .notesin9/app.css or /.ibmxspres/.notesin9/app.css)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Client copy timestamp: HTTP date or epoch millis
    #[arg(long, value_name = "DATE")]
    pub if_modified_since: Option<String>,

    /// Write the body to a file (single path only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., resources.namespace)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for fetch and list
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
