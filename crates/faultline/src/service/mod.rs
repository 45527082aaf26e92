//! Analysis service: the topology store wired to its collaborators.
//!
//! The service owns a [`TopologyStore`], loads it from a [`ComponentRepository`],
//! and hands every analysis result to a [`ResultPublisher`] under a configured
//! topic. Publishing is best-effort: a failing publisher is logged and the
//! result is still returned to the caller.

pub mod publisher;
pub mod repository;

pub use publisher::{JsonlPublisher, NoopPublisher, PublishedMessage, ResultPublisher};
pub use repository::{ComponentRepository, InMemoryRepository, SnapshotRepository, sample_snapshot};

use crate::domain::{AnalysisKind, AnalysisResult, Component, ComponentId, ComponentStatus};
use crate::error::Result;
use crate::topology::{LoadWarning, Topology, TopologyStore};

/// Default topic analysis results are published to.
pub const DEFAULT_ANALYSIS_TOPIC: &str = "infrastructure-analysis";

/// Topology store plus repository and publisher.
pub struct AnalysisService {
    store: TopologyStore,
    repository: Box<dyn ComponentRepository>,
    publisher: Box<dyn ResultPublisher>,
    topic: String,
}

impl AnalysisService {
    /// Create a service over an empty store. Call [`refresh`](Self::refresh)
    /// to load the repository contents.
    pub fn new(
        repository: Box<dyn ComponentRepository>,
        publisher: Box<dyn ResultPublisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            store: TopologyStore::new(),
            repository,
            publisher,
            topic: topic.into(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Topic results are published to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Reload the store from the repository, replacing its contents.
    ///
    /// Edges pointing at unknown components are dropped and reported.
    pub async fn refresh(&self) -> Result<Vec<LoadWarning>> {
        let snapshot = self.repository.load().await?;
        let (topology, warnings) = Topology::from_snapshot(snapshot);
        let components = topology.len();
        self.store.replace(topology)?;

        tracing::info!(
            components,
            warnings = warnings.len(),
            "Topology loaded from repository"
        );
        Ok(warnings)
    }

    /// Write the store's current contents back to the repository.
    pub async fn persist(&self) -> Result<()> {
        let snapshot = self.store.with_topology(Topology::to_snapshot)?;
        self.repository.save(&snapshot).await
    }

    // ========== Mutations ==========

    /// Insert or replace a component.
    pub fn add_component(&self, component: Component) -> Result<()> {
        self.store.add_component(component)
    }

    /// Remove a component and every edge touching it.
    pub fn remove_component(&self, id: &ComponentId) -> Result<Option<Component>> {
        self.store.remove_component(id)
    }

    /// Record that `dependent_id` depends on `dependency_id`.
    pub fn add_relationship(&self, dependent_id: &ComponentId, dependency_id: &ComponentId) -> Result<bool> {
        self.store.add_relationship(dependent_id, dependency_id)
    }

    /// Remove the edge `dependent_id -> dependency_id`.
    pub fn remove_relationship(
        &self,
        dependent_id: &ComponentId,
        dependency_id: &ComponentId,
    ) -> Result<bool> {
        self.store.remove_relationship(dependent_id, dependency_id)
    }

    /// Set a component's status.
    pub fn update_status(&self, id: &ComponentId, status: ComponentStatus) -> Result<bool> {
        self.store.update_status(id, status)
    }

    // ========== Analyses ==========

    /// Impact of `source_id` failing, published under the source id.
    pub async fn analyze_impact(&self, source_id: &ComponentId) -> Result<AnalysisResult> {
        let result = self.store.analyze_impact(source_id)?;
        self.publish(AnalysisKind::Impact, &result).await;
        Ok(result)
    }

    /// Failure domains among `component_ids`, published under `failure-domains`.
    pub async fn analyze_failure_domains(&self, component_ids: &[ComponentId]) -> Result<AnalysisResult> {
        let result = self.store.analyze_failure_domains(component_ids)?;
        self.publish(AnalysisKind::FailureDomains, &result).await;
        Ok(result)
    }

    /// Fleet-wide health, published under `health-status`.
    pub async fn analyze_health(&self) -> Result<AnalysisResult> {
        let result = self.store.analyze_health()?;
        self.publish(AnalysisKind::Health, &result).await;
        Ok(result)
    }

    async fn publish(&self, kind: AnalysisKind, result: &AnalysisResult) {
        let key = kind.publish_key(result);
        if let Err(e) = self.publisher.publish(&self.topic, &key, result).await {
            tracing::warn!(topic = %self.topic, key = %key, error = %e, "Failed to publish analysis result");
        }
    }
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("store", &self.store)
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::topology::TopologySnapshot;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    type Published = Arc<Mutex<Vec<(String, String, AnalysisResult)>>>;

    #[derive(Default)]
    struct RecordingPublisher {
        published: Published,
    }

    #[async_trait]
    impl ResultPublisher for RecordingPublisher {
        async fn publish(&self, topic: &str, key: &str, result: &AnalysisResult) -> Result<()> {
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), key.to_string(), result.clone()));
            Ok(())
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl ResultPublisher for FailingPublisher {
        async fn publish(&self, _topic: &str, _key: &str, _result: &AnalysisResult) -> Result<()> {
            Err(Error::Publish("broker unavailable".to_string()))
        }
    }

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    async fn sample_service() -> (AnalysisService, Published) {
        let publisher = RecordingPublisher::default();
        let published = Arc::clone(&publisher.published);
        let service = AnalysisService::new(
            Box::new(InMemoryRepository::sample()),
            Box::new(publisher),
            "test-topic",
        );
        service.refresh().await.unwrap();
        (service, published)
    }

    #[tokio::test]
    async fn test_refresh_loads_repository() {
        let (service, _) = sample_service().await;
        assert_eq!(service.store().len().unwrap(), 6);
    }

    #[tokio::test]
    async fn test_refresh_reports_orphaned_edges() {
        let snapshot = TopologySnapshot {
            components: vec![
                Component::new("a", crate::domain::ComponentType::Server).depends_on(["ghost"]),
            ],
        };
        let service = AnalysisService::new(
            Box::new(InMemoryRepository::new(snapshot)),
            Box::new(NoopPublisher),
            DEFAULT_ANALYSIS_TOPIC,
        );

        let warnings = service.refresh().await.unwrap();

        assert_eq!(warnings.len(), 1);
        let a = service.store().get_component(&id("a")).unwrap().unwrap();
        assert!(a.dependency_ids.is_empty());
    }

    #[tokio::test]
    async fn test_impact_is_published_under_source_key() {
        let (service, published) = sample_service().await;

        let result = service.analyze_impact(&id("db-001")).await.unwrap();

        let published = published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (topic, key, value) = &published[0];
        assert_eq!(topic, "test-topic");
        assert_eq!(key, "db-001");
        assert_eq!(value, &result);
    }

    #[tokio::test]
    async fn test_domain_and_health_keys() {
        let (service, published) = sample_service().await;

        service
            .analyze_failure_domains(&[id("app-001"), id("db-001")])
            .await
            .unwrap();
        service.analyze_health().await.unwrap();

        let keys: Vec<String> = published
            .lock()
            .unwrap()
            .iter()
            .map(|(_, key, _)| key.clone())
            .collect();
        assert_eq!(keys, vec!["failure-domains", "health-status"]);
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_fail_analysis() {
        let service = AnalysisService::new(
            Box::new(InMemoryRepository::sample()),
            Box::new(FailingPublisher),
            DEFAULT_ANALYSIS_TOPIC,
        );
        service.refresh().await.unwrap();

        let result = service.analyze_impact(&id("server-001")).await.unwrap();
        assert!(!result.affected_components.is_empty());
    }

    #[tokio::test]
    async fn test_persist_writes_mutations_back() {
        let (service, _) = sample_service().await;
        service.remove_component(&id("app-003")).unwrap();
        service
            .update_status(&id("db-001"), ComponentStatus::Critical)
            .unwrap();

        service.persist().await.unwrap();
        service.refresh().await.unwrap();

        assert_eq!(service.store().len().unwrap(), 5);
        let db = service.store().get_component(&id("db-001")).unwrap().unwrap();
        assert_eq!(db.status, ComponentStatus::Critical);
        assert!(!db.dependent_ids.contains(&id("app-003")));
    }
}
