//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::{Result, bail};

use super::args::{
    AddArgs, ComponentIdArgs, DomainsArgs, ExportArgs, InitArgs, LinkArgs, ListArgs, StatusArgs,
};
use super::types::ExportFormatArg;
use crate::app::App;
use crate::domain::{AnalysisKind, Component, ComponentId, ComponentStatus, ComponentType};
use crate::output::{self, OutputMode};
use crate::topology::Topology;

/// Look up a component or fail with a user-facing message.
fn require_component(app: &App, id: &ComponentId) -> Result<Component> {
    match app.service().store().get_component(id)? {
        Some(component) => Ok(component),
        None => bail!("Component not found: {id}"),
    }
}

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;

    if !args.quiet {
        println!(
            "Initializing faultline workspace{}...",
            if args.sample { " with sample topology" } else { "" }
        );
    }

    let result = init::init(&current_dir, args.sample).await?;

    if !args.quiet {
        println!("Initialized faultline in {}", result.faultline_dir.display());
        println!("  Config:     {}", result.config_file.display());
        println!("  Snapshot:   {}", result.snapshot_file.display());
        println!("  Components: {}", result.components);
    }

    Ok(())
}

/// Execute the list command
pub fn execute_list(app: &App, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    let status: Option<ComponentStatus> = args.status.map(Into::into);
    let component_type: Option<ComponentType> = args.component_type.map(Into::into);

    let components: Vec<Component> = app.service().store().with_topology(|topology| {
        topology
            .sorted_ids()
            .into_iter()
            .filter_map(|id| topology.get_component(id))
            .filter(|c| status.is_none_or(|s| c.status == s))
            .filter(|c| component_type.is_none_or(|t| c.component_type == t))
            .cloned()
            .collect()
    })?;

    output::print_components(&components, output_mode)?;
    Ok(())
}

/// Execute the show command
pub fn execute_show(app: &App, args: &ComponentIdArgs, output_mode: OutputMode) -> Result<()> {
    let component = require_component(app, &ComponentId::new(&args.component_id))?;
    output::print_component_details(&component, output_mode)?;
    Ok(())
}

/// Execute the add command
pub async fn execute_add(app: &App, args: &AddArgs, output_mode: OutputMode) -> Result<()> {
    let id = ComponentId::new(&args.component_id);
    let existed = app.service().store().get_component(&id)?.is_some();

    let mut component = Component::new(id.clone(), args.component_type.into())
        .with_status(args.status.into())
        .depends_on(args.depends_on.iter().map(String::as_str));
    if let Some(ref name) = args.name {
        component = component.with_name(name);
    }
    component.location.clone_from(&args.location);
    component.owner.clone_from(&args.owner);

    app.service().add_component(component)?;
    app.save().await?;

    let stored = require_component(app, &id)?;
    let missing: Vec<&str> = args
        .depends_on
        .iter()
        .map(String::as_str)
        .filter(|dep| !stored.dependency_ids.contains(&ComponentId::new(*dep)))
        .collect();

    match output_mode {
        OutputMode::Json => output::print_json(&stored)?,
        OutputMode::Text => {
            let verb = if existed { "Replaced" } else { "Added" };
            println!("{verb} component: {id}");
            if !missing.is_empty() {
                let config = output::OutputConfig::from_env();
                eprintln!(
                    "{} ignored unknown dependencies: {}",
                    output::warning("warning:", &config),
                    missing.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Execute the remove command
pub async fn execute_remove(app: &App, args: &ComponentIdArgs, output_mode: OutputMode) -> Result<()> {
    let id = ComponentId::new(&args.component_id);
    let Some(removed) = app.service().remove_component(&id)? else {
        bail!("Component not found: {id}");
    };
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&removed)?,
        OutputMode::Text => println!("Removed component: {id}"),
    }
    Ok(())
}

/// Execute the link command
pub async fn execute_link(app: &App, args: &LinkArgs, output_mode: OutputMode) -> Result<()> {
    let dependent = ComponentId::new(&args.dependent);
    let dependency = ComponentId::new(&args.dependency);
    require_component(app, &dependent)?;
    require_component(app, &dependency)?;

    let changed = app.service().add_relationship(&dependent, &dependency)?;
    if changed {
        app.save().await?;
    }

    print_edge_change(output_mode, &dependent, &dependency, changed, "Linked", "Already linked")
}

/// Execute the unlink command
pub async fn execute_unlink(app: &App, args: &LinkArgs, output_mode: OutputMode) -> Result<()> {
    let dependent = ComponentId::new(&args.dependent);
    let dependency = ComponentId::new(&args.dependency);
    require_component(app, &dependent)?;
    require_component(app, &dependency)?;

    let changed = app.service().remove_relationship(&dependent, &dependency)?;
    if changed {
        app.save().await?;
    }

    print_edge_change(output_mode, &dependent, &dependency, changed, "Unlinked", "Not linked")
}

fn print_edge_change(
    output_mode: OutputMode,
    dependent: &ComponentId,
    dependency: &ComponentId,
    changed: bool,
    done: &str,
    unchanged: &str,
) -> Result<()> {
    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "dependent": dependent,
            "dependency": dependency,
            "changed": changed,
        }))?,
        OutputMode::Text => {
            let verb = if changed { done } else { unchanged };
            println!("{verb}: {dependent} -> {dependency}");
        }
    }
    Ok(())
}

/// Execute the status command
pub async fn execute_status(app: &App, args: &StatusArgs, output_mode: OutputMode) -> Result<()> {
    let id = ComponentId::new(&args.component_id);
    let status: ComponentStatus = args.status.into();

    if !app.service().update_status(&id, status)? {
        bail!("Component not found: {id}");
    }
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&require_component(app, &id)?)?,
        OutputMode::Text => println!("Status of {id} set to {status}"),
    }
    Ok(())
}

/// Execute the impact command
pub async fn execute_impact(app: &App, args: &ComponentIdArgs, output_mode: OutputMode) -> Result<()> {
    let id = ComponentId::new(&args.component_id);
    if output_mode == OutputMode::Text && app.service().store().get_component(&id)?.is_none() {
        tracing::warn!(component = %id, "Unknown component, impact is empty");
    }

    let result = app.service().analyze_impact(&id).await?;
    output::print_analysis(AnalysisKind::Impact, &result, output_mode)?;
    Ok(())
}

/// Execute the domains command
pub async fn execute_domains(app: &App, args: &DomainsArgs, output_mode: OutputMode) -> Result<()> {
    let ids: Vec<ComponentId> = args.component_ids.iter().map(ComponentId::new).collect();

    let result = app.service().analyze_failure_domains(&ids).await?;
    output::print_analysis(AnalysisKind::FailureDomains, &result, output_mode)?;
    Ok(())
}

/// Execute the health command
pub async fn execute_health(app: &App, output_mode: OutputMode) -> Result<()> {
    let result = app.service().analyze_health().await?;
    output::print_analysis(AnalysisKind::Health, &result, output_mode)?;
    Ok(())
}

/// Execute the export command
pub fn execute_export(app: &App, args: &ExportArgs, output_mode: OutputMode) -> Result<()> {
    let format = if output_mode == OutputMode::Json {
        ExportFormatArg::Json
    } else {
        args.format
    };

    match format {
        ExportFormatArg::Json => {
            let snapshot = app.service().store().with_topology(Topology::to_snapshot)?;
            output::print_json(&snapshot)?;
        }
        ExportFormatArg::Dot => {
            let (dot, cyclic) = app
                .service()
                .store()
                .with_topology(|topology| (topology.to_dot(), topology.has_cycles()))?;
            if cyclic {
                tracing::warn!("Topology contains dependency cycles");
            }
            output::print_message(dot.trim_end())?;
        }
    }
    Ok(())
}
