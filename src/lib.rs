//! # Breadboard Core
//!
//! The engine behind a drag-and-drop breadboard editor.
//!
//! This library provides:
//! - A data model for placed parts, their terminals and the wires between them
//! - A circuit-completeness check: does a battery reach an LED and a ground?
//! - A small rule engine that turns summed part values into a feedback message
//! - The LED glow/brightness state that follows from an evaluation
//!
//! ## Architecture
//!
//! - [`circuit`] - Parts, terminals, connections, the terminal graph and an
//!   editable [`Diagram`]
//! - [`eval`] - Reachability, aggregation, message rules and result mapping
//! - [`error`] - Errors for editing and snapshot loading
//!
//! Rendering, dragging and form input stay in the UI. The UI hands over a
//! snapshot and re-renders from the [`Evaluation`] it gets back.
//!
//! ## Usage
//!
//! ### Native
//!
//! ```
//! use breadboard_core::{evaluate_circuit, Connection, Endpoint, Part, PartKind};
//!
//! let parts = vec![
//!     Part::new("bat", PartKind::Battery).with_value(10.0),
//!     Part::new("led", PartKind::Led),
//!     Part::new("gnd", PartKind::Ground),
//! ];
//! let wires = vec![
//!     Connection::new(Endpoint::new("bat", "P"), Endpoint::new("led", "P")),
//!     Connection::new(Endpoint::new("led", "N"), Endpoint::new("gnd", "GND")),
//! ];
//!
//! let result = evaluate_circuit(&parts, &wires);
//! assert!(result.complete);
//! assert_eq!(result.brightness, 0.5);
//! ```
//!
//! ### CLI
//!
//! ```bash
//! breadboard diagram.json --json
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmBreadboard } from 'breadboard_core';
//!
//! const board = new WasmBreadboard();
//! const bat = board.addPart('battery');
//! const result = board.evaluate();
//! ```

pub mod circuit;
pub mod error;
pub mod eval;

// Re-export main types for convenience
pub use circuit::{
    terminals_of, CircuitGraph, Connection, Diagram, Endpoint, NodeId, Part, PartId, PartKind,
    WireEvent,
};
pub use error::{BreadboardError, Result};
pub use eval::{evaluate_circuit, evaluate_circuit_with, EvalConfig, Evaluation, Lighting};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmBreadboard;
