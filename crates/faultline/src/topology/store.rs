//! Thread-safe handle over a shared [`Topology`].

use super::Topology;
use crate::analysis;
use crate::domain::{AnalysisResult, Component, ComponentId, ComponentStatus};
use crate::error::{Error, Result};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared, lock-guarded topology.
///
/// Cloning the store clones the handle, not the topology. Mutations are
/// serialized behind the write lock. Each analysis holds the read lock for its
/// entire traversal, so several analyses can run at once but never interleave
/// with a mutation.
#[derive(Debug, Clone, Default)]
pub struct TopologyStore {
    inner: Arc<RwLock<Topology>>,
}

impl TopologyStore {
    /// Create a store over an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that takes ownership of an existing topology.
    pub fn from_topology(topology: Topology) -> Self {
        Self {
            inner: Arc::new(RwLock::new(topology)),
        }
    }

    /// Acquire the read lock, converting poison errors to our error type.
    fn read(&self) -> Result<RwLockReadGuard<'_, Topology>> {
        self.inner
            .read()
            .map_err(|e| Error::Internal(format!("topology lock poisoned: {e}")))
    }

    /// Acquire the write lock, converting poison errors to our error type.
    fn write(&self) -> Result<RwLockWriteGuard<'_, Topology>> {
        self.inner
            .write()
            .map_err(|e| Error::Internal(format!("topology lock poisoned: {e}")))
    }

    // ========== Mutations ==========

    /// Insert or replace a component. See [`Topology::add_component`].
    pub fn add_component(&self, component: Component) -> Result<()> {
        let id = component.id.clone();
        self.write()?.add_component(component);
        tracing::debug!(component = %id, "Component added");
        Ok(())
    }

    /// Remove a component and its edges. Returns the removed component, if any.
    pub fn remove_component(&self, id: &ComponentId) -> Result<Option<Component>> {
        let removed = self.write()?.remove_component(id);
        if removed.is_some() {
            tracing::debug!(component = %id, "Component removed");
        }
        Ok(removed)
    }

    /// Record that `dependent_id` depends on `dependency_id`.
    pub fn add_relationship(
        &self,
        dependent_id: &ComponentId,
        dependency_id: &ComponentId,
    ) -> Result<bool> {
        let changed = self.write()?.add_relationship(dependent_id, dependency_id);
        tracing::debug!(dependent = %dependent_id, dependency = %dependency_id, changed, "Add relationship");
        Ok(changed)
    }

    /// Remove the edge `dependent_id -> dependency_id`.
    pub fn remove_relationship(
        &self,
        dependent_id: &ComponentId,
        dependency_id: &ComponentId,
    ) -> Result<bool> {
        let changed = self
            .write()?
            .remove_relationship(dependent_id, dependency_id);
        tracing::debug!(dependent = %dependent_id, dependency = %dependency_id, changed, "Remove relationship");
        Ok(changed)
    }

    /// Set a component's status.
    pub fn update_status(&self, id: &ComponentId, status: ComponentStatus) -> Result<bool> {
        let changed = self.write()?.update_status(id, status);
        tracing::debug!(component = %id, %status, changed, "Update status");
        Ok(changed)
    }

    /// Swap in a whole new topology, e.g. after a repository refresh.
    pub fn replace(&self, topology: Topology) -> Result<()> {
        *self.write()? = topology;
        Ok(())
    }

    // ========== Reads ==========

    /// Clone a component out of the store.
    pub fn get_component(&self, id: &ComponentId) -> Result<Option<Component>> {
        Ok(self.read()?.get_component(id).cloned())
    }

    /// Number of components currently stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Clone the whole topology under the read lock.
    pub fn snapshot(&self) -> Result<Topology> {
        let guard = self.read()?;
        Ok(guard.clone())
    }

    /// Run a closure against the topology while holding the read lock.
    pub fn with_topology<R>(&self, f: impl FnOnce(&Topology) -> R) -> Result<R> {
        let guard = self.read()?;
        Ok(f(&guard))
    }

    // ========== Analyses ==========

    /// Impact of `source_id` failing. See [`analysis::analyze_impact`].
    pub fn analyze_impact(&self, source_id: &ComponentId) -> Result<AnalysisResult> {
        self.with_topology(|topology| analysis::analyze_impact(topology, source_id))
    }

    /// Failure domains among `component_ids`. See [`analysis::analyze_failure_domains`].
    pub fn analyze_failure_domains(&self, component_ids: &[ComponentId]) -> Result<AnalysisResult> {
        self.with_topology(|topology| analysis::analyze_failure_domains(topology, component_ids))
    }

    /// Fleet-wide health. See [`analysis::analyze_health`].
    pub fn analyze_health(&self) -> Result<AnalysisResult> {
        self.with_topology(analysis::analyze_health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentType;
    use std::thread;

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    #[test]
    fn test_clone_shares_topology() {
        let store = TopologyStore::new();
        let handle = store.clone();

        store
            .add_component(Component::new("a", ComponentType::Cache))
            .unwrap();

        assert!(handle.get_component(&id("a")).unwrap().is_some());
    }

    #[test]
    fn test_with_topology_sees_current_state() {
        let store = TopologyStore::new();
        store
            .add_component(Component::new("a", ComponentType::Cache))
            .unwrap();
        store
            .add_component(Component::new("b", ComponentType::Queue).depends_on(["a"]))
            .unwrap();

        let (len, edges) = store
            .with_topology(|topology| (topology.len(), topology.edge_count()))
            .unwrap();

        assert_eq!((len, edges), (2, 1));
        assert_eq!(store.analyze_impact(&id("a")).unwrap().affected_components.len(), 2);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = TopologyStore::new();
        store
            .add_component(Component::new("a", ComponentType::Cache))
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        store.remove_component(&id("a")).unwrap();

        assert!(snapshot.contains(&id("a")));
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_concurrent_mutations_keep_invariant() {
        let store = TopologyStore::new();
        for i in 0..20 {
            store
                .add_component(Component::new(format!("n{i}"), ComponentType::Container))
                .unwrap();
        }

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..20 {
                        let a = id(&format!("n{i}"));
                        let b = id(&format!("n{}", (i + t + 1) % 20));
                        store.add_relationship(&a, &b).unwrap();
                        let _ = store.analyze_impact(&b).unwrap();
                        if i % 3 == 0 {
                            store.remove_relationship(&a, &b).unwrap();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store.with_topology(Topology::is_consistent).unwrap());
    }
}
