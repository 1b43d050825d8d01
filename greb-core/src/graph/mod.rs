//! Branch Dependency Graph
//!
//! This module implements the graph of tracking relationships between
//! branches and the operations derived from it.
//!
//! # Overview
//!
//! - Nodes represent branches, local or living in a remote
//! - Edges represent tracking: if A tracks B, B is an upstream of A and A a
//!   downstream of B
//!
//! A branch may track several upstreams, which git allows as long as they
//! all come from the same remote.
//!
//! # Design Decisions
//!
//! 1. The graph owns every node and nodes refer to each other by id, so
//!    there are no reference cycles to manage.
//!
//! 2. Both directions of an edge are stored, and only the graph mutates
//!    them, always together.
//!
//! 3. Nodes and edges are kept in insertion order and every output that
//!    could depend on iteration order is sorted by label, so the same input
//!    always produces the same output.

mod node;
mod order;
mod reference;
mod removal;
mod store;

pub use node::{Node, NodeId};
pub use order::Scope;
pub use reference::{Reference, LOCAL_REMOTE};
pub use removal::Update;
pub use store::BranchGraph;
