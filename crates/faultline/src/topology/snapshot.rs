//! Serializable snapshots of a topology.
//!
//! A snapshot is what the component repository hands over: a flat list of
//! components whose declared edges may be incomplete, one-sided, or point at
//! components that no longer exist. Loading is resilient: bad edges become
//! [`LoadWarning`]s instead of failing the whole load.

use super::Topology;
use crate::domain::{Component, ComponentId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat, serializable form of a topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    /// All components, with their declared edges
    #[serde(default)]
    pub components: Vec<Component>,
}

/// Warning produced while loading a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// An edge referenced a component missing from the snapshot.
    OrphanedDependency {
        /// The dependent side of the edge
        from: ComponentId,
        /// The dependency side of the edge
        to: ComponentId,
    },

    /// The same id appeared more than once; the last record won.
    DuplicateComponent {
        /// The repeated id
        id: ComponentId,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanedDependency { from, to } => {
                write!(f, "skipped relationship {from} -> {to}: unknown component")
            }
            Self::DuplicateComponent { id } => {
                write!(f, "component {id} listed more than once, keeping the last entry")
            }
        }
    }
}

impl Topology {
    /// Build a topology from a snapshot.
    ///
    /// Components are inserted first, then every edge declared on either side
    /// (`dependencies` or `dependents`) is linked. Edges naming unknown
    /// components are skipped and reported.
    pub fn from_snapshot(snapshot: TopologySnapshot) -> (Self, Vec<LoadWarning>) {
        let mut topology = Topology::new();
        let mut warnings = Vec::new();
        // (declaring component, dependent, dependency)
        let mut declared: Vec<(ComponentId, ComponentId, ComponentId)> = Vec::new();

        for mut component in snapshot.components {
            let owner = component.id.clone();
            if topology.contains(&owner) {
                warnings.push(LoadWarning::DuplicateComponent { id: owner.clone() });
                declared.retain(|(declared_by, _, _)| declared_by != &owner);
            }
            for dependency in std::mem::take(&mut component.dependency_ids) {
                declared.push((owner.clone(), owner.clone(), dependency));
            }
            for dependent in std::mem::take(&mut component.dependent_ids) {
                declared.push((owner.clone(), dependent, owner.clone()));
            }
            topology.add_component(component);
        }

        for (_, from, to) in declared {
            if !topology.contains(&from) || !topology.contains(&to) {
                tracing::warn!(from = %from, to = %to, "Skipping relationship to unknown component");
                warnings.push(LoadWarning::OrphanedDependency { from, to });
                continue;
            }
            topology.add_relationship(&from, &to);
        }

        (topology, warnings)
    }

    /// Capture the topology as a snapshot, components sorted by id.
    pub fn to_snapshot(&self) -> TopologySnapshot {
        TopologySnapshot {
            components: self
                .sorted_ids()
                .into_iter()
                .filter_map(|id| self.get_component(id).cloned())
                .collect(),
        }
    }
}
