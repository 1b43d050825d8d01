//! Discovery
//!
//! Builds a [`BranchGraph`](crate::graph::BranchGraph) from the tracking
//! configuration of a repository. The repository itself stays behind the
//! [`TrackingSource`] trait; nothing here runs git.

mod builder;
mod refspec;

pub use builder::{GraphBuilder, Tracking, TrackingSource, HEADS_PREFIX};
pub use refspec::FetchSpec;
