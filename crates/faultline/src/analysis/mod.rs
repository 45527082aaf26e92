//! Graph analyses over a topology.
//!
//! Three analyses answer the three questions the crate exists for:
//!
//! - [`analyze_impact`]: reverse breadth-first reachability from a failing
//!   component along `dependent_ids`
//! - [`analyze_failure_domains`]: disjoint-set partition of a component subset
//! - [`analyze_health`]: union of impact closures over every unhealthy component
//!
//! All of them borrow the topology immutably and return a fresh
//! [`AnalysisResult`](crate::domain::AnalysisResult). Unknown ids are never an
//! error; they produce empty, zero-score results.

pub mod disjoint_set;
mod health;
mod partition;
mod reachability;
pub mod scoring;

pub use disjoint_set::DisjointSet;
pub use health::analyze_health;
pub use partition::{analyze_failure_domains, partition};
pub use reachability::{Reachability, affected_closure, analyze_impact};
