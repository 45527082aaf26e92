//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;

use super::types::{ComponentStatusArg, ComponentTypeArg, ExportFormatArg};
use super::validators::{validate_component_id, validate_name};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Seed the snapshot with a small sample topology
    #[arg(long)]
    pub sample: bool,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<ComponentStatusArg>,

    /// Filter by component type
    #[arg(short = 't', long = "type", value_enum)]
    pub component_type: Option<ComponentTypeArg>,
}

/// Arguments for commands that take a single component ID
#[derive(Parser, Debug, Clone)]
pub struct ComponentIdArgs {
    /// Component ID
    #[arg(value_parser = validate_component_id)]
    pub component_id: String,
}

/// Arguments for the `add` command
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Component ID (replaces an existing component with the same ID)
    #[arg(value_parser = validate_component_id)]
    pub component_id: String,

    /// Component type
    #[arg(short = 't', long = "type", value_enum)]
    pub component_type: ComponentTypeArg,

    /// Initial status
    #[arg(short, long, value_enum, default_value = "unknown")]
    pub status: ComponentStatusArg,

    /// Display name (defaults to the ID)
    #[arg(short, long, value_parser = validate_name)]
    pub name: Option<String>,

    /// Components this one depends on (comma-separated IDs)
    #[arg(short, long, value_delimiter = ',', value_parser = validate_component_id)]
    pub depends_on: Vec<String>,

    /// Physical or logical location
    #[arg(long)]
    pub location: Option<String>,

    /// Owning team or person
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for the `link` and `unlink` commands
#[derive(Parser, Debug, Clone)]
pub struct LinkArgs {
    /// The component that depends on the other
    #[arg(value_parser = validate_component_id)]
    pub dependent: String,

    /// The component being depended on
    #[arg(value_parser = validate_component_id)]
    pub dependency: String,
}

/// Arguments for the `status` command
#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Component ID
    #[arg(value_parser = validate_component_id)]
    pub component_id: String,

    /// New status
    #[arg(value_enum)]
    pub status: ComponentStatusArg,
}

/// Arguments for the `domains` command
#[derive(Parser, Debug, Clone)]
pub struct DomainsArgs {
    /// Components to partition into failure domains
    #[arg(value_parser = validate_component_id)]
    pub component_ids: Vec<String>,
}

/// Arguments for the `export` command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "dot")]
    pub format: ExportFormatArg,
}
