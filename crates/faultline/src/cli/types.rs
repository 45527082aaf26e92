//! CLI value enums and domain type conversions.
//!
//! This module contains the value enums used for CLI argument parsing
//! and their conversions to/from domain types.

use clap::ValueEnum;

use crate::domain::{ComponentStatus, ComponentType};

// ============================================================================
// Value Enums
// ============================================================================

/// Component type for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentTypeArg {
    /// Physical or virtual host
    Server,
    /// Database instance
    Database,
    /// Network segment or device
    Network,
    /// Storage volume or array
    Storage,
    /// Deployed application
    Application,
    /// Service endpoint
    Service,
    /// Container workload
    Container,
    /// Load balancer
    #[value(name = "load_balancer", alias = "load-balancer")]
    LoadBalancer,
    /// Cache tier
    Cache,
    /// Message queue
    Queue,
}

/// Component status for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentStatusArg {
    /// Operating normally
    Healthy,
    /// Running with reduced capacity
    Degraded,
    /// Showing early signs of trouble
    Warning,
    /// Failing or down
    Critical,
    /// No status reported
    #[default]
    Unknown,
    /// Deliberately out of rotation
    Maintenance,
}

/// Export format for the `export` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormatArg {
    /// Graphviz DOT, edges point from dependent to dependency
    #[default]
    Dot,
    /// Topology snapshot JSON
    Json,
}

impl std::fmt::Display for ComponentTypeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&ComponentType::from(*self), f)
    }
}

impl std::fmt::Display for ComponentStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&ComponentStatus::from(*self), f)
    }
}

// ============================================================================
// Domain Conversions
// ============================================================================

impl From<ComponentTypeArg> for ComponentType {
    fn from(arg: ComponentTypeArg) -> Self {
        match arg {
            ComponentTypeArg::Server => ComponentType::Server,
            ComponentTypeArg::Database => ComponentType::Database,
            ComponentTypeArg::Network => ComponentType::Network,
            ComponentTypeArg::Storage => ComponentType::Storage,
            ComponentTypeArg::Application => ComponentType::Application,
            ComponentTypeArg::Service => ComponentType::Service,
            ComponentTypeArg::Container => ComponentType::Container,
            ComponentTypeArg::LoadBalancer => ComponentType::LoadBalancer,
            ComponentTypeArg::Cache => ComponentType::Cache,
            ComponentTypeArg::Queue => ComponentType::Queue,
        }
    }
}

impl From<ComponentStatusArg> for ComponentStatus {
    fn from(arg: ComponentStatusArg) -> Self {
        match arg {
            ComponentStatusArg::Healthy => ComponentStatus::Healthy,
            ComponentStatusArg::Degraded => ComponentStatus::Degraded,
            ComponentStatusArg::Warning => ComponentStatus::Warning,
            ComponentStatusArg::Critical => ComponentStatus::Critical,
            ComponentStatusArg::Unknown => ComponentStatus::Unknown,
            ComponentStatusArg::Maintenance => ComponentStatus::Maintenance,
        }
    }
}
