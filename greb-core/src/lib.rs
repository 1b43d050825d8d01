//! Greb Core
//!
//! This crate provides the engine behind greb, a tool that keeps chains of
//! git branches up to date. It implements:
//!
//! - A dependency graph of branches built from their tracking configuration
//! - The order in which branches must be pulled (upstreams first)
//! - Re-parenting of tracking branches when a branch is deleted
//! - Text and dot renderings of the graph
//!
//! The engine never runs git itself. The caller reads the repository
//! configuration (through [`discovery::TrackingSource`]), runs the pulls in
//! the order the graph gives, and applies the [`graph::Update`]s produced
//! by removals.
//!
//! # Architecture
//!
//! - `graph`: the branch graph, ordering and removal
//! - `discovery`: breadth-first construction from tracking configuration
//! - `render`: forest text and dot output
//! - `config`: settings for rendering and processing
//!
//! # Example
//!
//! ```rust
//! use greb_core::graph::{BranchGraph, Reference};
//!
//! let mut graph = BranchGraph::new();
//! let (main, _) = graph.node(Reference::local("refs/heads/main"));
//! let (topic, _) = graph.node(Reference::local("refs/heads/topic"));
//! let (origin, _) = graph.node(Reference::new("refs/heads/main", "origin"));
//! graph.edge(main, origin, "refs/heads/main");
//! graph.edge(topic, main, "refs/heads/main");
//!
//! // main is pulled before topic
//! assert_eq!(graph.sort(), vec![main, topic]);
//!
//! // deleting main moves topic onto origin's main
//! let updates = graph.remove(main).unwrap();
//! assert_eq!(updates.len(), 3);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod render;

pub use config::Settings;
pub use error::{GraphError, Result};
pub use graph::{BranchGraph, Node, NodeId, Reference, Update};
