//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for faultline using clap's
//! derive API. Each command has its own argument struct with validation.
//!
//! # Commands
//!
//! - `init`: Initialize a new workspace
//! - `list` / `show`: Inspect components
//! - `add` / `remove` / `link` / `unlink` / `status`: Edit the topology
//! - `impact` / `domains` / `health`: Run analyses
//! - `export`: Dump the topology as DOT or JSON
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! faultline add db-001 --type database --status healthy
//! faultline add app-001 --type application --depends-on db-001
//! faultline status db-001 critical
//! faultline impact db-001
//! faultline --json health
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

// Re-export argument structs
pub use args::{
    AddArgs, ComponentIdArgs, DomainsArgs, ExportArgs, InitArgs, LinkArgs, ListArgs, StatusArgs,
};

// Re-export types
pub use types::{ComponentStatusArg, ComponentTypeArg, ExportFormatArg};

// Re-export validators for external use
pub use validators::{validate_component_id, validate_name};

/// Faultline - infrastructure dependency topology and failure analysis
///
/// Track infrastructure components and their dependencies, then ask what a
/// failure would take down. The topology lives in `.faultline/topology.json`.
#[derive(Parser, Debug)]
#[command(name = "faultline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new faultline workspace
    ///
    /// Creates the `.faultline/` directory with configuration and an empty
    /// topology snapshot. Use `--sample` to start from a small example.
    Init(InitArgs),

    /// List components with optional filters
    List(ListArgs),

    /// Show a component with its dependencies and dependents
    Show(ComponentIdArgs),

    /// Add or replace a component
    ///
    /// Dependencies naming components that do not exist yet are ignored.
    Add(AddArgs),

    /// Remove a component and every relationship touching it
    Remove(ComponentIdArgs),

    /// Record that one component depends on another
    Link(LinkArgs),

    /// Remove a dependency between two components
    Unlink(LinkArgs),

    /// Set a component's status
    Status(StatusArgs),

    /// Show what a failure of the given component would affect
    ///
    /// Lists every component that transitively depends on it, the failure
    /// domains among them, and a 0-1 impact score.
    Impact(ComponentIdArgs),

    /// Partition components into independent failure domains
    Domains(DomainsArgs),

    /// Summarize the blast radius of every unhealthy component
    Health,

    /// Export the topology
    Export(ExportArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Faultline infrastructure topology analysis");
            println!("Use --help for more information");
            return Ok(());
        };

        match command {
            Commands::Init(args) => execute::execute_init(args).await,
            Commands::List(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_list(&app, args, output_mode)
            }
            Commands::Show(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_show(&app, args, output_mode)
            }
            Commands::Add(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_add(&app, args, output_mode).await
            }
            Commands::Remove(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_remove(&app, args, output_mode).await
            }
            Commands::Link(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_link(&app, args, output_mode).await
            }
            Commands::Unlink(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_unlink(&app, args, output_mode).await
            }
            Commands::Status(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_status(&app, args, output_mode).await
            }
            Commands::Impact(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_impact(&app, args, output_mode).await
            }
            Commands::Domains(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_domains(&app, args, output_mode).await
            }
            Commands::Health => {
                let app = open_app(output_mode).await?;
                execute::execute_health(&app, output_mode).await
            }
            Commands::Export(args) => {
                let app = open_app(output_mode).await?;
                execute::execute_export(&app, args, output_mode)
            }
        }
    }
}

/// Open the workspace containing the current directory.
///
/// Snapshot load warnings go to stderr in text mode so JSON output stays clean.
async fn open_app(output_mode: crate::output::OutputMode) -> Result<crate::app::App> {
    let app = crate::app::App::from_directory(&std::env::current_dir()?).await?;
    if output_mode == crate::output::OutputMode::Text {
        crate::output::print_load_warnings(app.load_warnings())?;
    }
    Ok(app)
}
