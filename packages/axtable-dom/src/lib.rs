//! A headless DOM with an accessible table model
//!
//! This crate implements a small DOM ([`BaseDocument`]) that is built and changed through a
//! [`DocumentMutator`], and an accessibility layer ([`AxTree`]) on top of it that decides
//! which tables are exposed to assistive technology and how their cells are laid out.
//!
//! The accessibility layer has three parts:
//!
//!  - A classifier telling ARIA tables, data tables and layout tables apart.
//!  - A grid builder implementing the HTML table-forming algorithm, producing the
//!    row/column slot grid of a table with row and column spans resolved.
//!  - The per-table query API on [`AxTree`]: rows, columns, cells, headers and ARIA
//!    counts and indices.
//!
//! ## Feature flags
//!  - `default`: Enables the features listed below.
//!  - `tracing`: Enables tracing support.
//!  - `accessibility`: Export exposed tables as [accesskit](https://docs.rs/accesskit) tree
//!    updates.

/// The DOM implementation.
///
/// This is the primary entry point for this crate.
mod document;

/// The nodes themselves, and their data.
pub mod node;

pub mod accessibility;
mod config;
mod debug;
mod error;
mod mutator;
pub mod traversal;
pub mod util;

pub use accessibility::{AxId, AxNode, AxTree, CellSlots, TableModel};
pub use config::{AccessibilityConfig, SpanLimits, TableHeuristics};
pub use document::BaseDocument;
pub use error::{DomError, DomResult};
pub use mutator::DocumentMutator;
pub use node::{Attribute, ElementData, Node, NodeData, TextNodeData};

pub use axtable_traits::style;
pub use axtable_traits::{AccessibilityRole, BorderEdges, ComputedStyle, Display, EmptyCells};
