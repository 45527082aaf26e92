//! Output formatting for CLI commands.
//!
//! This module formats components and analysis results either as
//! human-readable text or as JSON for programmatic use.

pub mod color;

use crate::domain::{AnalysisKind, AnalysisResult, Component, ComponentId};
use crate::topology::LoadWarning;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success, warning};

use color::{bold, colored_status_icon, colorize_id, colorize_score, colorize_status, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

/// Configuration for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `FAULTLINE_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `FAULTLINE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_ascii = match env::var("FAULTLINE_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "FAULTLINE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR (https://no-color.org/)
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("FAULTLINE_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a list of components in the specified format
pub fn print_components(components: &[Component], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_components_text(&mut handle, components, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(&components),
    }
}

/// Print a single component with all of its fields
pub fn print_component_details(component: &Component, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_component_details_text(&mut handle, component, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(component),
    }
}

/// Print an analysis result in the specified format
pub fn print_analysis(kind: AnalysisKind, result: &AnalysisResult, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_analysis_text(&mut handle, kind, result, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(result),
    }
}

/// Print snapshot load warnings to stderr
pub fn print_load_warnings(warnings: &[LoadWarning]) -> io::Result<()> {
    let config = OutputConfig::from_env();
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    for w in warnings {
        writeln!(handle, "{} {w}", warning("warning:", &config))?;
    }
    Ok(())
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn join_ids(ids: &[ComponentId], config: &OutputConfig) -> String {
    ids.iter()
        .map(|id| colorize_id(id.as_str(), config))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_components_text<W: Write>(
    w: &mut W,
    components: &[Component],
    config: &OutputConfig,
) -> io::Result<()> {
    if components.is_empty() {
        writeln!(w, "No components found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} component(s):", components.len())?;
    writeln!(w)?;

    for component in components {
        writeln!(
            w,
            "{} {}  {}  {}  {}",
            colored_status_icon(component.status, config),
            colorize_id(component.id.as_str(), config),
            component.component_type,
            colorize_status(component.status, config),
            component.name
        )?;
    }

    Ok(())
}

fn write_component_details_text<W: Write>(
    w: &mut W,
    component: &Component,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}: {}",
        colored_status_icon(component.status, config),
        colorize_id(component.id.as_str(), config),
        component.name
    )?;
    writeln!(
        w,
        "{}  {}    {}  {}",
        dimmed("Type:", config),
        component.component_type,
        dimmed("Status:", config),
        colorize_status(component.status, config)
    )?;

    if let Some(ref location) = component.location {
        writeln!(w, "{} {location}", dimmed("Location:", config))?;
    }
    if let Some(ref owner) = component.owner {
        writeln!(w, "{} {owner}", dimmed("Owner:", config))?;
    }

    writeln!(
        w,
        "{} {}    {} {}",
        dimmed("Created:", config),
        component.created_at.format("%Y-%m-%d %H:%M"),
        dimmed("Updated:", config),
        component.updated_at.format("%Y-%m-%d %H:%M")
    )?;

    if !component.dependency_ids.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} ({}):",
            bold("Depends on", config),
            component.dependency_ids.len()
        )?;
        for id in &component.dependency_ids {
            writeln!(w, "  → {}", colorize_id(id.as_str(), config))?;
        }
    }

    if !component.dependent_ids.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} ({}):",
            bold("Required by", config),
            component.dependent_ids.len()
        )?;
        for id in &component.dependent_ids {
            writeln!(w, "  ← {}", colorize_id(id.as_str(), config))?;
        }
    }

    if !component.metadata.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Metadata", config))?;
        for (key, value) in &component.metadata {
            writeln!(w, "  {} {value}", dimmed(&format!("{key}:"), config))?;
        }
    }

    Ok(())
}

fn write_analysis_text<W: Write>(
    w: &mut W,
    kind: AnalysisKind,
    result: &AnalysisResult,
    config: &OutputConfig,
) -> io::Result<()> {
    let title = match kind {
        AnalysisKind::Impact => "Impact analysis",
        AnalysisKind::FailureDomains => "Failure domain analysis",
        AnalysisKind::Health => "Health analysis",
    };
    match result.source_component {
        Some(ref source) => writeln!(
            w,
            "{}: {}",
            bold(title, config),
            colorize_id(source, config)
        )?,
        None => writeln!(w, "{}", bold(title, config))?,
    }

    writeln!(
        w,
        "{} {}",
        dimmed("Impact score:", config),
        colorize_score(result.impact_score, config)
    )?;

    if result.affected_components.is_empty() {
        let message = match kind {
            AnalysisKind::Health => "All components healthy.",
            _ => "No components affected.",
        };
        writeln!(w, "{}", success(message, config))?;
        return Ok(());
    }

    let label = match kind {
        AnalysisKind::FailureDomains => "Requested",
        _ => "Affected",
    };
    writeln!(
        w,
        "{} ({}): {}",
        dimmed(label, config),
        result.affected_components.len(),
        join_ids(&result.affected_components, config)
    )?;

    writeln!(w)?;
    writeln!(
        w,
        "{} ({}):",
        bold("Failure domains", config),
        result.failure_domains.len()
    )?;
    for (i, domain) in result.failure_domains.iter().enumerate() {
        writeln!(w, "  {}. {}", i + 1, join_ids(domain, config))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComponentStatus, ComponentType};

    fn plain() -> OutputConfig {
        OutputConfig::new(true, false)
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn ids(list: &[&str]) -> Vec<ComponentId> {
        list.iter().map(|s| ComponentId::new(*s)).collect()
    }

    #[test]
    fn test_output_config_default() {
        let config = OutputConfig::default();
        assert!(!config.use_ascii);
        assert!(config.use_colors);
    }

    #[test]
    fn test_components_text_empty() {
        let out = render(|w| write_components_text(w, &[], &plain()));
        assert_eq!(out, "No components found.\n");
    }

    #[test]
    fn test_components_text_lists_each_component() {
        let components = vec![
            Component::new("db-001", ComponentType::Database)
                .with_name("Primary Database")
                .with_status(ComponentStatus::Critical),
            Component::new("lb-001", ComponentType::LoadBalancer).with_status(ComponentStatus::Healthy),
        ];

        let out = render(|w| write_components_text(w, &components, &plain()));

        assert!(out.starts_with("Found 2 component(s):"));
        assert!(out.contains("x db-001  database  critical  Primary Database"));
        assert!(out.contains("+ lb-001  load_balancer  healthy  lb-001"));
    }

    #[test]
    fn test_component_details_show_edges() {
        let mut component = Component::new("app-001", ComponentType::Application)
            .with_status(ComponentStatus::Degraded)
            .depends_on(["db-001", "server-001"]);
        component.dependent_ids.insert(ComponentId::new("service-001"));
        component.owner = Some("platform".to_string());

        let out = render(|w| write_component_details_text(w, &component, &plain()));

        assert!(out.contains("Status:  degraded"));
        assert!(out.contains("Owner: platform"));
        assert!(out.contains("Depends on (2):"));
        assert!(out.contains("→ db-001"));
        assert!(out.contains("Required by (1):"));
        assert!(out.contains("← service-001"));
    }

    #[test]
    fn test_analysis_text_impact() {
        let mut result = AnalysisResult::empty(Some("B".to_string()));
        result.affected_components = ids(&["A", "B"]);
        result.failure_domains = vec![ids(&["A", "B"])];
        result.impact_score = 0.53;

        let out = render(|w| write_analysis_text(w, AnalysisKind::Impact, &result, &plain()));

        assert!(out.starts_with("Impact analysis: B\n"));
        assert!(out.contains("Impact score: 0.53"));
        assert!(out.contains("Affected (2): A, B"));
        assert!(out.contains("Failure domains (1):"));
        assert!(out.contains("  1. A, B"));
    }

    #[test]
    fn test_analysis_text_healthy_fleet() {
        let result = AnalysisResult::empty(Some("infrastructure".to_string()));

        let out = render(|w| write_analysis_text(w, AnalysisKind::Health, &result, &plain()));

        assert!(out.contains("Health analysis: infrastructure"));
        assert!(out.contains("All components healthy."));
        assert!(!out.contains("Failure domains"));
    }

    #[test]
    fn test_analysis_text_without_source() {
        let result = AnalysisResult::empty(None);
        let out =
            render(|w| write_analysis_text(w, AnalysisKind::FailureDomains, &result, &plain()));
        assert!(out.starts_with("Failure domain analysis\n"));
    }
}
