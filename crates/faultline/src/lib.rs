//! Faultline - infrastructure dependency topology and failure analysis.
//!
//! This crate provides both a CLI application and a library for tracking
//! infrastructure components, the dependency edges between them, and for
//! answering three questions over that topology:
//!
//! - **Impact**: if a component fails, which components are affected and how badly?
//! - **Failure domains**: how does a subset of components partition into
//!   independently failing groups?
//! - **Health**: what does the blast radius of every currently unhealthy
//!   component look like across the fleet?
//!
//! The analysis core ([`topology`] and [`analysis`]) is synchronous and purely
//! in-memory. Loading snapshots and publishing results happens in the
//! [`service`] layer through injected collaborators.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod analysis;
pub mod domain;
pub mod error;
pub mod service;
pub mod topology;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;
pub mod config;
pub mod output;

// Command implementations
pub mod commands;
