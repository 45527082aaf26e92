//! Impact analysis via reverse breadth-first search.
//!
//! A component is affected by a failure in `source` when it transitively
//! depends on `source`. Edges are stored dependent -> dependency, so the walk
//! follows `dependent_ids` outward from the source.

use super::partition::partition;
use super::scoring::{self, ImpactFactors};
use crate::domain::{AnalysisResult, ComponentId};
use crate::topology::Topology;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};

/// Ancestor closure of a source component, with BFS depths.
///
/// The source itself is included at depth 0. Each other member's depth is the
/// length of its shortest dependent-path to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    source: ComponentId,
    depths: HashMap<ComponentId, usize>,
}

impl Reachability {
    /// The component the walk started from.
    pub fn source(&self) -> &ComponentId {
        &self.source
    }

    /// Whether `id` is in the closure.
    pub fn contains(&self, id: &ComponentId) -> bool {
        self.depths.contains_key(id)
    }

    /// Depth at which `id` was first reached.
    pub fn depth_of(&self, id: &ComponentId) -> Option<usize> {
        self.depths.get(id).copied()
    }

    /// Largest recorded depth (0 when only the source is affected).
    pub fn max_depth(&self) -> usize {
        self.depths.values().copied().max().unwrap_or(0)
    }

    /// Number of components in the closure, source included.
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Always `false`: the closure contains at least the source.
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Members of the closure in ascending id order.
    pub fn sorted_ids(&self) -> Vec<ComponentId> {
        let mut ids: Vec<_> = self.depths.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Walk `dependent_ids` breadth-first from `source_id`.
///
/// Returns `None` if the source is not in the topology. Each component is
/// visited at most once, so cyclic topologies terminate in O(V + E) over the
/// reachable subgraph.
pub fn affected_closure(topology: &Topology, source_id: &ComponentId) -> Option<Reachability> {
    let source = topology.get_component(source_id)?;

    let mut depths: HashMap<ComponentId, usize> = HashMap::new();
    depths.insert(source.id.clone(), 0);
    let mut queue = VecDeque::from([(source, 0usize)]);

    while let Some((current, depth)) = queue.pop_front() {
        for dependent_id in &current.dependent_ids {
            if depths.contains_key(dependent_id) {
                continue;
            }
            debug_assert!(
                topology.contains(dependent_id),
                "dangling dependent edge {dependent_id} -> {}",
                current.id
            );
            let Some(dependent) = topology.get_component(dependent_id) else {
                continue;
            };
            depths.insert(dependent_id.clone(), depth + 1);
            queue.push_back((dependent, depth + 1));
        }
    }

    Some(Reachability {
        source: source.id.clone(),
        depths,
    })
}

/// Analyze the blast radius of `source_id` failing.
///
/// - `affected_components`: the ancestor closure, source included, sorted
/// - `failure_domains`: weakly connected groups of the affected subgraph
/// - `impact_score`: `0.4·ratio + 0.4·criticality + 0.2·depth`
///
/// An unknown source yields an empty result with score `0.0`.
pub fn analyze_impact(topology: &Topology, source_id: &ComponentId) -> AnalysisResult {
    let Some(closure) = affected_closure(topology, source_id) else {
        tracing::debug!(source = %source_id, "Impact analysis for unknown component");
        return AnalysisResult::empty(Some(source_id.to_string()));
    };

    let affected = closure.sorted_ids();
    let factors = ImpactFactors {
        affected_ratio: scoring::ratio(affected.len(), topology.len()),
        criticality: scoring::mean_weight(
            affected
                .iter()
                .filter_map(|id| topology.get_component(id))
                .map(|c| c.status),
        ),
        max_depth: closure.max_depth(),
    };
    let failure_domains = partition(topology, &affected);
    let impact_score = factors.score();

    tracing::debug!(
        source = %source_id,
        affected = affected.len(),
        domains = failure_domains.len(),
        max_depth = factors.max_depth,
        impact_score,
        "Impact analysis complete"
    );

    AnalysisResult {
        source_component: Some(source_id.to_string()),
        affected_components: affected,
        failure_domains,
        impact_score,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Component, ComponentStatus, ComponentType};

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    fn ids(list: &[&str]) -> Vec<ComponentId> {
        list.iter().map(|s| id(s)).collect()
    }

    /// A(healthy) -> B(critical) -> C(healthy)
    fn abc() -> Topology {
        let mut topology = Topology::new();
        topology.add_component(
            Component::new("C", ComponentType::Database).with_status(ComponentStatus::Healthy),
        );
        topology.add_component(
            Component::new("B", ComponentType::Application)
                .with_status(ComponentStatus::Critical)
                .depends_on(["C"]),
        );
        topology.add_component(
            Component::new("A", ComponentType::Service)
                .with_status(ComponentStatus::Healthy)
                .depends_on(["B"]),
        );
        topology
    }

    #[test]
    fn test_impact_excludes_dependencies_of_source() {
        let result = analyze_impact(&abc(), &id("B"));

        assert_eq!(result.source_component.as_deref(), Some("B"));
        assert_eq!(result.affected_components, ids(&["A", "B"]));
        assert_eq!(result.failure_domains, vec![ids(&["A", "B"])]);
        // ratio 2/3, criticality 0.55, depth 1
        assert!((result.impact_score - 0.53).abs() < 1e-9);
    }

    #[test]
    fn test_impact_of_leaf_dependency_reaches_everything() {
        let topology = abc();
        let closure = affected_closure(&topology, &id("C")).unwrap();

        assert_eq!(closure.sorted_ids(), ids(&["A", "B", "C"]));
        assert_eq!(closure.depth_of(&id("C")), Some(0));
        assert_eq!(closure.depth_of(&id("B")), Some(1));
        assert_eq!(closure.depth_of(&id("A")), Some(2));
        assert_eq!(closure.max_depth(), 2);
    }

    #[test]
    fn test_impact_of_top_level_component_is_only_itself() {
        let result = analyze_impact(&abc(), &id("A"));
        assert_eq!(result.affected_components, ids(&["A"]));
        assert_eq!(result.failure_domains, vec![ids(&["A"])]);
    }

    #[test]
    fn test_unknown_source_is_empty_result() {
        let result = analyze_impact(&abc(), &id("nope"));

        assert_eq!(result.source_component.as_deref(), Some("nope"));
        assert!(result.affected_components.is_empty());
        assert!(result.failure_domains.is_empty());
        assert!(result.impact_score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut topology = abc();
        topology.add_relationship(&id("C"), &id("A"));

        let closure = affected_closure(&topology, &id("B")).unwrap();

        assert_eq!(closure.sorted_ids(), ids(&["A", "B", "C"]));
        assert_eq!(closure.depth_of(&id("C")), Some(2));
    }

    #[test]
    fn test_depth_is_shortest_path() {
        // top depends on both mid and src directly; mid depends on src.
        let mut topology = Topology::new();
        topology.add_component(Component::new("src", ComponentType::Network));
        topology.add_component(Component::new("mid", ComponentType::Server).depends_on(["src"]));
        topology.add_component(
            Component::new("top", ComponentType::Service).depends_on(["mid", "src"]),
        );

        let closure = affected_closure(&topology, &id("src")).unwrap();
        assert_eq!(closure.depth_of(&id("top")), Some(1));
        assert_eq!(closure.max_depth(), 1);
    }

    #[test]
    fn test_affected_domain_is_single_when_connected_through_source() {
        // Two independent consumers of the same source stay in one domain,
        // connected through the source.
        let mut topology = Topology::new();
        topology.add_component(Component::new("db", ComponentType::Database));
        topology.add_component(Component::new("x", ComponentType::Application).depends_on(["db"]));
        topology.add_component(Component::new("y", ComponentType::Application).depends_on(["db"]));

        let result = analyze_impact(&topology, &id("db"));
        assert_eq!(result.failure_domains, vec![ids(&["db", "x", "y"])]);
    }
}
