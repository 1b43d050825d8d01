//! Rendering
//!
//! Read-only textual projections of a [`BranchGraph`](crate::graph::BranchGraph).
//! Both renderers sort everything they print, so rendering the same graph
//! twice yields identical output.

mod dot;
mod text;

pub use dot::DotRenderer;
pub use text::{TextPalette, TextRenderer};
