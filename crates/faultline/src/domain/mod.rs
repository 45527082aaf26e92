//! Domain types for infrastructure topology analysis.
//!
//! This module contains the core domain types: component identity, the closed
//! type and status enumerations, the [`Component`] record itself, and the
//! [`AnalysisResult`] value every analysis produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Source label used by fleet-wide health results.
pub const INFRASTRUCTURE_SOURCE: &str = "infrastructure";

/// Unique identifier for a component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    /// Create a new component ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of infrastructure unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
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
    /// Service endpoint (gateways, APIs)
    Service,
    /// Container workload
    Container,
    /// Load balancer
    LoadBalancer,
    /// Cache tier
    Cache,
    /// Message queue
    Queue,
}

impl ComponentType {
    /// All component types, in declaration order.
    pub const ALL: [ComponentType; 10] = [
        Self::Server,
        Self::Database,
        Self::Network,
        Self::Storage,
        Self::Application,
        Self::Service,
        Self::Container,
        Self::LoadBalancer,
        Self::Cache,
        Self::Queue,
    ];

    /// The wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Database => "database",
            Self::Network => "network",
            Self::Storage => "storage",
            Self::Application => "application",
            Self::Service => "service",
            Self::Container => "container",
            Self::LoadBalancer => "load_balancer",
            Self::Cache => "cache",
            Self::Queue => "queue",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown component type '{s}'"))
    }
}

/// Operational status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
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
    /// Deliberately taken out of rotation
    Maintenance,
}

impl ComponentStatus {
    /// All statuses, in declaration order.
    pub const ALL: [ComponentStatus; 6] = [
        Self::Healthy,
        Self::Degraded,
        Self::Warning,
        Self::Critical,
        Self::Unknown,
        Self::Maintenance,
    ];

    /// Severity weight used by every scoring formula.
    ///
    /// | status              | weight |
    /// |---------------------|--------|
    /// | critical            | 1.0    |
    /// | warning             | 0.7    |
    /// | degraded            | 0.5    |
    /// | unknown/maintenance | 0.3    |
    /// | healthy             | 0.1    |
    pub fn weight(self) -> f64 {
        match self {
            Self::Critical => 1.0,
            Self::Warning => 0.7,
            Self::Degraded => 0.5,
            Self::Unknown | Self::Maintenance => 0.3,
            Self::Healthy => 0.1,
        }
    }

    /// Whether this status makes a component a source for health analysis.
    pub fn is_problematic(self) -> bool {
        matches!(self, Self::Critical | Self::Warning | Self::Degraded)
    }

    /// The wire name of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown component status '{s}'"))
    }
}

/// An infrastructure component tracked in the topology.
///
/// `dependency_ids` and `dependent_ids` are two views of the same edge set:
/// `B` is in `A.dependency_ids` exactly when `A` is in `B.dependent_ids`.
/// The [`Topology`](crate::topology::Topology) maintains that symmetry; a
/// `Component` on its own does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier
    #[serde(rename = "component_id")]
    pub id: ComponentId,

    /// Human-readable name
    pub name: String,

    /// Kind of infrastructure unit
    pub component_type: ComponentType,

    /// Current status
    #[serde(default)]
    pub status: ComponentStatus,

    /// Components this one requires
    #[serde(rename = "dependencies", default)]
    pub dependency_ids: BTreeSet<ComponentId>,

    /// Components that require this one
    #[serde(rename = "dependents", default)]
    pub dependent_ids: BTreeSet<ComponentId>,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Physical or logical location (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Owning team or person (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Component {
    /// Create a component with no edges, `unknown` status, and the id as its name.
    pub fn new(id: impl Into<ComponentId>, component_type: ComponentType) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            name: id.0.clone(),
            id,
            component_type,
            status: ComponentStatus::Unknown,
            dependency_ids: BTreeSet::new(),
            dependent_ids: BTreeSet::new(),
            metadata: serde_json::Map::new(),
            location: None,
            owner: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: ComponentStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare dependencies. They are only wired up once the component is
    /// added to a topology that contains the targets.
    #[must_use]
    pub fn depends_on<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ComponentId>,
    {
        self.dependency_ids.extend(ids.into_iter().map(Into::into));
        self
    }
}

/// Which analysis produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Reachability from a single failing component
    Impact,
    /// Union-find partition of a component subset
    FailureDomains,
    /// Fleet-wide health summary
    Health,
}

impl AnalysisKind {
    /// Key used when publishing a result of this kind.
    ///
    /// Impact results are keyed by their source component; the other kinds
    /// use a fixed key.
    pub fn publish_key(self, result: &AnalysisResult) -> String {
        match self {
            Self::Impact => result.source_component.clone().unwrap_or_default(),
            Self::FailureDomains => "failure-domains".to_string(),
            Self::Health => "health-status".to_string(),
        }
    }
}

/// Outcome of any analysis. Produced fresh per query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Component the analysis started from, if any
    pub source_component: Option<String>,

    /// Components within the blast radius
    pub affected_components: Vec<ComponentId>,

    /// Groups of connected components
    pub failure_domains: Vec<Vec<ComponentId>>,

    /// Normalized score in `[0.0, 1.0]`, rounded to two decimals
    pub impact_score: f64,

    /// When the result was produced
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// A zero-score result with nothing affected.
    pub fn empty(source_component: Option<String>) -> Self {
        Self {
            source_component,
            affected_components: Vec::new(),
            failure_domains: Vec::new(),
            impact_score: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Affected components as a set, ignoring order and duplicates.
    pub fn affected_set(&self) -> BTreeSet<ComponentId> {
        self.affected_components.iter().cloned().collect()
    }

    /// Failure domains as a set of sets, ignoring member and domain order.
    pub fn domain_sets(&self) -> BTreeSet<BTreeSet<ComponentId>> {
        self.failure_domains
            .iter()
            .map(|domain| domain.iter().cloned().collect())
            .collect()
    }
}
