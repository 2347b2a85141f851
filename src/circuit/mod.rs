//! Diagram data model and terminal graph.
//!
//! A diagram is a list of [`Part`]s and the [`Connection`]s between their
//! terminals. The [`catalog`] knows which terminals each kind has, and
//! [`CircuitGraph`] turns a diagram snapshot into an undirected graph over
//! those terminals.

pub mod catalog;
mod diagram;
mod graph;
mod types;

pub use catalog::{terminals_of, unit_options, UnitOptions};
pub use diagram::{decode_each, Diagram, WireEvent};
pub use graph::CircuitGraph;
pub use types::*;
