//! Error types for the breadboard engine.
//!
//! Circuit evaluation itself never fails: stale connections, unknown kinds
//! and malformed values are absorbed while the graph is built. The
//! [`BreadboardError`] type covers the operations around it, namely editing
//! a [`Diagram`](crate::circuit::Diagram), loading snapshots and the
//! front-end bindings.

use thiserror::Error;

/// Result type alias using [`BreadboardError`].
pub type Result<T> = std::result::Result<T, BreadboardError>;

/// Unified error type for all breadboard operations.
#[derive(Error, Debug)]
pub enum BreadboardError {
    // ============ Editing Errors ============
    /// No live part carries this id
    #[error("Part '{id}' not found in diagram")]
    PartNotFound { id: String },

    /// Terminal is not part of the kind's terminal set
    #[error("Part '{part}' ({kind}) has no terminal '{terminal}'")]
    UnknownTerminal {
        part: String,
        kind: String,
        terminal: String,
    },

    /// Unit is not one of the kind's unit options
    #[error("Unit '{unit}' is not valid for a {kind}")]
    InvalidUnit { kind: String, unit: String },

    /// Connection index out of range
    #[error("Connection #{index} not found (diagram has {len} connections)")]
    ConnectionNotFound { index: usize, len: usize },

    // ============ Snapshot Errors ============
    /// Error reading a diagram file
    #[error("Failed to read diagram file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON could not be decoded or encoded
    #[error("Invalid diagram snapshot: {source}")]
    SnapshotError {
        #[from]
        source: serde_json::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl BreadboardError {
    /// Create a part-not-found error
    pub fn part_not_found(id: impl Into<String>) -> Self {
        Self::PartNotFound { id: id.into() }
    }

    /// Create an unknown terminal error
    pub fn unknown_terminal(
        part: impl Into<String>,
        kind: impl Into<String>,
        terminal: impl Into<String>,
    ) -> Self {
        Self::UnknownTerminal {
            part: part.into(),
            kind: kind.into(),
            terminal: terminal.into(),
        }
    }

    /// Create an invalid unit error
    pub fn invalid_unit(kind: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::InvalidUnit {
            kind: kind.into(),
            unit: unit.into(),
        }
    }
}
