//! Fleet-wide health analysis.

use super::reachability::affected_closure;
use super::scoring;
use crate::domain::{AnalysisResult, ComponentId, INFRASTRUCTURE_SOURCE};
use crate::topology::Topology;
use chrono::Utc;
use std::collections::BTreeSet;

/// Summarize the blast radius of every unhealthy component.
///
/// Every component whose status is critical, warning, or degraded is treated
/// as a failure source. Each source contributes its own impact closure as one
/// entry of `failure_domains`; those entries are **not** merged, so two
/// sources with shared dependents produce overlapping domains.
/// `affected_components` is the union of all closures.
///
/// Score: `0.5·ratio + 0.5·criticality` over the union. With no unhealthy
/// components the result is empty with score `0.0`.
pub fn analyze_health(topology: &Topology) -> AnalysisResult {
    let problematic: Vec<&ComponentId> = topology
        .sorted_ids()
        .into_iter()
        .filter(|id| {
            topology
                .get_component(id)
                .is_some_and(|c| c.status.is_problematic())
        })
        .collect();

    if problematic.is_empty() {
        tracing::debug!(components = topology.len(), "No unhealthy components");
        return AnalysisResult::empty(Some(INFRASTRUCTURE_SOURCE.to_string()));
    }

    let mut all_affected: BTreeSet<ComponentId> = BTreeSet::new();
    let mut failure_domains = Vec::with_capacity(problematic.len());
    for id in &problematic {
        let Some(closure) = affected_closure(topology, id) else {
            continue;
        };
        let affected = closure.sorted_ids();
        all_affected.extend(affected.iter().cloned());
        failure_domains.push(affected);
    }

    let criticality = scoring::mean_weight(
        all_affected
            .iter()
            .filter_map(|id| topology.get_component(id))
            .map(|c| c.status),
    );
    let affected_ratio = scoring::ratio(all_affected.len(), topology.len());
    let impact_score = scoring::health_score(affected_ratio, criticality);

    tracing::debug!(
        problematic = problematic.len(),
        affected = all_affected.len(),
        impact_score,
        "Health analysis complete"
    );

    AnalysisResult {
        source_component: Some(INFRASTRUCTURE_SOURCE.to_string()),
        affected_components: all_affected.into_iter().collect(),
        failure_domains,
        impact_score,
        timestamp: Utc::now(),
    }
}
