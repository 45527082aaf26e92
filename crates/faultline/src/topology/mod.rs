//! In-memory topology of components and dependency edges.
//!
//! This module owns every mutation of the component graph. Each component
//! carries both directions of its edges, and the [`Topology`] keeps them in
//! lock-step so that analyses can walk either direction without a separate
//! index.
//!
//! # Edge Direction Convention
//!
//! - `A.dependency_ids` contains `B` when **A depends on B**
//! - `B.dependent_ids` contains `A` for the same edge
//!
//! A failure in `B` can therefore affect `A`; impact analysis walks
//! `dependent_ids` outward from the failing component.
//!
//! # Unknown Ids
//!
//! Mutations naming a component that is not present are silent no-ops. The
//! caller may race with concurrent deletions in the external store, so a
//! missing endpoint is not an error.
//!
//! # Thread Safety
//!
//! [`Topology`] itself is a plain owned value. [`TopologyStore`] wraps it in
//! `Arc<RwLock<_>>`: mutations take the write lock, and analyses hold the read
//! lock for the whole traversal so they never observe a half-applied edge.

mod graph;
mod snapshot;
mod store;

pub use graph::TopologyGraph;
pub use snapshot::{LoadWarning, TopologySnapshot};
pub use store::TopologyStore;

use crate::domain::{Component, ComponentId, ComponentStatus};
use chrono::Utc;
use std::collections::HashMap;

/// Owned arena of components keyed by id.
///
/// Invariant: for any components `A`, `B`,
/// `B ∈ A.dependency_ids ⇔ A ∈ B.dependent_ids`, and every id referenced by
/// an edge set names a component in the arena. Every mutating method checks
/// this with a debug assertion before returning.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    components: HashMap<ComponentId, Component>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a component.
    ///
    /// When a component with the same id exists, its relationships are
    /// detached first. Edges declared on `component` are wired up only for
    /// neighbors already present; the rest are dropped.
    pub fn add_component(&mut self, mut component: Component) {
        let id = component.id.clone();
        if self.components.contains_key(&id) {
            tracing::debug!(component = %id, "Replacing existing component");
            self.detach(&id);
        }

        let dependencies = std::mem::take(&mut component.dependency_ids);
        let dependents = std::mem::take(&mut component.dependent_ids);
        self.components.insert(id.clone(), component);

        for dependency in &dependencies {
            self.link(&id, dependency);
        }
        for dependent in &dependents {
            self.link(dependent, &id);
        }

        self.debug_check();
    }

    /// Remove a component and strip it from every neighbor's edge sets.
    ///
    /// Returns the removed component (with empty edge sets), or `None` if it
    /// was not present.
    pub fn remove_component(&mut self, id: &ComponentId) -> Option<Component> {
        if !self.components.contains_key(id) {
            return None;
        }
        self.detach(id);
        let removed = self.components.remove(id);
        self.debug_check();
        removed
    }

    /// Record that `dependent_id` depends on `dependency_id`.
    ///
    /// No-op if either id is unknown or the edge already exists. Returns
    /// whether the topology changed.
    pub fn add_relationship(
        &mut self,
        dependent_id: &ComponentId,
        dependency_id: &ComponentId,
    ) -> bool {
        let changed = self.link(dependent_id, dependency_id);
        self.debug_check();
        changed
    }

    /// Remove the edge `dependent_id -> dependency_id` from both sides.
    ///
    /// No-op if either id is unknown or the edge does not exist. Returns
    /// whether the topology changed.
    pub fn remove_relationship(
        &mut self,
        dependent_id: &ComponentId,
        dependency_id: &ComponentId,
    ) -> bool {
        let changed = self.unlink(dependent_id, dependency_id);
        self.debug_check();
        changed
    }

    /// Set a component's status. No-op for unknown ids.
    pub fn update_status(&mut self, id: &ComponentId, status: ComponentStatus) -> bool {
        match self.components.get_mut(id) {
            Some(component) if component.status != status => {
                component.status = status;
                component.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    /// Look up a component by id.
    pub fn get_component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Whether a component with this id exists.
    pub fn contains(&self, id: &ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Iterate over all components in arbitrary order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// All component ids in ascending order.
    pub fn sorted_ids(&self) -> Vec<&ComponentId> {
        let mut ids: Vec<_> = self.components.keys().collect();
        ids.sort();
        ids
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the topology has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.components.values().map(|c| c.dependency_ids.len()).sum()
    }

    /// Check the bidirectional-edge invariant and that no edge dangles.
    pub fn is_consistent(&self) -> bool {
        self.components.iter().all(|(id, component)| {
            component.dependency_ids.iter().all(|dep| {
                self.components
                    .get(dep)
                    .is_some_and(|c| c.dependent_ids.contains(id))
            }) && component.dependent_ids.iter().all(|dependent| {
                self.components
                    .get(dependent)
                    .is_some_and(|c| c.dependency_ids.contains(id))
            })
        })
    }

    fn debug_check(&self) {
        debug_assert!(
            self.is_consistent(),
            "topology edge sets are asymmetric or dangling"
        );
    }

    /// Add both halves of an edge. Does not run the invariant check.
    fn link(&mut self, dependent_id: &ComponentId, dependency_id: &ComponentId) -> bool {
        if !self.components.contains_key(dependent_id)
            || !self.components.contains_key(dependency_id)
        {
            tracing::trace!(
                dependent = %dependent_id,
                dependency = %dependency_id,
                "Ignoring relationship with unknown endpoint"
            );
            return false;
        }

        let now = Utc::now();
        let mut changed = false;
        if let Some(dependent) = self.components.get_mut(dependent_id) {
            if dependent.dependency_ids.insert(dependency_id.clone()) {
                dependent.updated_at = now;
                changed = true;
            }
        }
        if let Some(dependency) = self.components.get_mut(dependency_id) {
            if dependency.dependent_ids.insert(dependent_id.clone()) {
                dependency.updated_at = now;
                changed = true;
            }
        }
        changed
    }

    /// Remove both halves of an edge. Does not run the invariant check.
    fn unlink(&mut self, dependent_id: &ComponentId, dependency_id: &ComponentId) -> bool {
        let now = Utc::now();
        let mut changed = false;
        if let Some(dependent) = self.components.get_mut(dependent_id) {
            if dependent.dependency_ids.remove(dependency_id) {
                dependent.updated_at = now;
                changed = true;
            }
        }
        if let Some(dependency) = self.components.get_mut(dependency_id) {
            if dependency.dependent_ids.remove(dependent_id) {
                dependency.updated_at = now;
                changed = true;
            }
        }
        changed
    }

    /// Strip every edge touching `id`, leaving the component in place.
    fn detach(&mut self, id: &ComponentId) {
        let Some(component) = self.components.get_mut(id) else {
            return;
        };
        let dependencies = std::mem::take(&mut component.dependency_ids);
        let dependents = std::mem::take(&mut component.dependent_ids);

        let now = Utc::now();
        for dependency in &dependencies {
            if let Some(neighbor) = self.components.get_mut(dependency) {
                if neighbor.dependent_ids.remove(id) {
                    neighbor.updated_at = now;
                }
            }
        }
        for dependent in &dependents {
            if let Some(neighbor) = self.components.get_mut(dependent) {
                if neighbor.dependency_ids.remove(id) {
                    neighbor.updated_at = now;
                }
            }
        }
    }
}
