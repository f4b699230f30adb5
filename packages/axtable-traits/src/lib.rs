//! Shared types for axtable
//!
//! This crate holds the vocabulary shared between a DOM provider and the accessibility
//! layer built on top of it: the accessibility [`role`]s a node can resolve to, and the
//! subset of computed [`style`] that the table heuristics read.

pub mod role;
pub mod style;

pub use role::AccessibilityRole;
pub use style::{BorderEdges, ComputedStyle, Display, EmptyCells};
