//! petgraph view of a topology.
//!
//! The arena in [`Topology`] is the source of truth; this module materializes
//! a `DiGraph` from it for algorithms petgraph already provides (cycle
//! detection, DOT rendering, reference traversals).
//!
//! Edges point from **dependent -> dependency**, matching `dependency_ids`.

use super::Topology;
use crate::domain::ComponentId;
use petgraph::algo;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A directed graph built from a topology, plus the id-to-node mapping.
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    /// Nodes hold component ids; edge source depends on edge target.
    pub graph: DiGraph<ComponentId, ()>,

    /// Mapping from component id to graph node.
    pub node_map: HashMap<ComponentId, NodeIndex>,
}

impl TopologyGraph {
    /// Node for a component id, if present.
    pub fn node(&self, id: &ComponentId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }
}

impl Topology {
    /// Build a petgraph `DiGraph` of this topology.
    ///
    /// Nodes are inserted in ascending id order so repeated calls produce
    /// identical graphs.
    pub fn to_graph(&self) -> TopologyGraph {
        let mut graph = DiGraph::with_capacity(self.len(), self.edge_count());
        let mut node_map = HashMap::with_capacity(self.len());

        for id in self.sorted_ids() {
            let node = graph.add_node(id.clone());
            node_map.insert(id.clone(), node);
        }

        for id in self.sorted_ids() {
            let Some(component) = self.get_component(id) else {
                continue;
            };
            let from = node_map[id];
            for dependency in &component.dependency_ids {
                if let Some(&to) = node_map.get(dependency) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        TopologyGraph { graph, node_map }
    }

    /// Whether any dependency cycle exists (self-dependencies included).
    pub fn has_cycles(&self) -> bool {
        algo::is_cyclic_directed(&self.to_graph().graph)
    }

    /// Render the topology in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let labeled = self
            .to_graph()
            .graph
            .map(|_, id| id.to_string(), |_, _| "");
        format!("{}", Dot::with_config(&labeled, &[Config::EdgeNoLabel]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Component, ComponentType};

    fn chain() -> Topology {
        let mut topology = Topology::new();
        for s in ["a", "b", "c"] {
            topology.add_component(Component::new(s, ComponentType::Service));
        }
        topology.add_relationship(&ComponentId::new("a"), &ComponentId::new("b"));
        topology.add_relationship(&ComponentId::new("b"), &ComponentId::new("c"));
        topology
    }

    #[test]
    fn test_to_graph_mirrors_edges() {
        let topology = chain();
        let graph = topology.to_graph();

        assert_eq!(graph.graph.node_count(), 3);
        assert_eq!(graph.graph.edge_count(), 2);

        let a = graph.node(&ComponentId::new("a")).unwrap();
        let b = graph.node(&ComponentId::new("b")).unwrap();
        assert!(graph.graph.contains_edge(a, b));
        assert!(!graph.graph.contains_edge(b, a));
    }

    #[test]
    fn test_has_cycles() {
        let mut topology = chain();
        assert!(!topology.has_cycles());

        topology.add_relationship(&ComponentId::new("c"), &ComponentId::new("a"));
        assert!(topology.has_cycles());
    }

    #[test]
    fn test_to_dot_contains_labels() {
        let dot = chain().to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("\"a\""));
        assert!(dot.contains("->"));
    }
}
