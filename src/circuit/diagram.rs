//! Editable diagram: the parts and wires a user has placed.
//!
//! The evaluator only needs a snapshot; [`Diagram`] is the holder a front
//! end can use to keep that snapshot consistent while the user edits it.
//! Removing a part removes its wires in the same call, so a diagram never
//! holds a connection to a part that is gone.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::catalog::resolve_terminal;
use super::types::{parse_value_input, sanitize_value, Connection, Endpoint, Part, PartId, PartKind};
use crate::error::{BreadboardError, Result};
use crate::eval::{evaluate_circuit_with, EvalConfig, Evaluation};

/// Decode a JSON array one element at a time.
///
/// Elements that do not decode are dropped, and anything other than an
/// array (including `null`) yields an empty list. Used where a snapshot
/// comes from outside and evaluation must go ahead regardless.
pub fn decode_each<T: DeserializeOwned>(value: serde_json::Value) -> Vec<T> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Vec::new(),
        other => {
            warn!("expected a list in snapshot, got {other}");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                debug!("dropping unreadable snapshot element: {err}");
                None
            }
        })
        .collect()
}

/// Outcome of clicking a terminal during wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WireEvent {
    /// First terminal picked; waiting for the second
    Started { at: Endpoint },
    /// The pending terminal was clicked again
    Cancelled,
    /// A wire was added
    Connected { connection: Connection },
}

/// A diagram snapshot plus the editing state around it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    parts: Vec<Part>,
    #[serde(default)]
    connections: Vec<Connection>,

    /// Terminal picked by the first click of a wiring gesture
    #[serde(skip)]
    pending: Option<Endpoint>,

    /// Counter for generated part ids
    #[serde(skip)]
    next_id: u64,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a diagram from an existing snapshot.
    ///
    /// Parts are kept as given; wires whose endpoints do not resolve are
    /// kept too (the evaluator ignores them) so the caller's data
    /// round-trips.
    pub fn from_parts(parts: Vec<Part>, connections: Vec<Connection>) -> Self {
        Self {
            parts,
            connections,
            pending: None,
            next_id: 0,
        }
    }

    /// Decode a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as a pretty-printed JSON snapshot.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON snapshot from disk.
    #[cfg(feature = "cli")]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BreadboardError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Terminal waiting for the second click of a wiring gesture.
    pub fn pending(&self) -> Option<&Endpoint> {
        self.pending.as_ref()
    }

    pub fn part(&self, id: &PartId) -> Option<&Part> {
        self.parts.iter().find(|p| &p.id == id)
    }

    fn part_mut(&mut self, id: &PartId) -> Result<&mut Part> {
        self.parts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| BreadboardError::part_not_found(id.as_str()))
    }

    fn fresh_id(&mut self) -> PartId {
        loop {
            self.next_id += 1;
            let id = PartId(format!("p{}", self.next_id));
            if self.part(&id).is_none() {
                return id;
            }
        }
    }

    /// Place a new part with its kind's default value and unit.
    pub fn add_part(&mut self, kind: PartKind) -> PartId {
        let id = self.fresh_id();
        debug!("placing {kind} as {id}");
        self.parts.push(Part::new(id.clone(), kind));
        id
    }

    /// Set a part's value; negative and non-finite values are stored as 0.
    ///
    /// Ground parts carry no value and are left untouched.
    pub fn set_value(&mut self, id: &PartId, value: f64) -> Result<()> {
        let part = self.part_mut(id)?;
        if part.kind.has_value() {
            part.value = Some(sanitize_value(value));
        }
        Ok(())
    }

    /// Set a part's value from raw text input (see [`parse_value_input`]).
    pub fn set_value_input(&mut self, id: &PartId, text: &str) -> Result<()> {
        self.set_value(id, parse_value_input(text))
    }

    /// Pick one of the unit options of the part's kind.
    pub fn set_unit(&mut self, id: &PartId, unit: &str) -> Result<()> {
        let part = self.part_mut(id)?;
        match part.kind.unit_options() {
            Some(units) if units.contains(unit) => {
                part.unit = Some(unit.to_string());
                Ok(())
            }
            _ => Err(BreadboardError::invalid_unit(part.kind.name(), unit)),
        }
    }

    /// Remove a part together with every wire touching it.
    pub fn remove_part(&mut self, id: &PartId) -> Result<Part> {
        let index = self
            .parts
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| BreadboardError::part_not_found(id.as_str()))?;
        let part = self.parts.remove(index);

        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        if self.pending.as_ref().is_some_and(|p| &p.part_id == id) {
            self.pending = None;
        }
        debug!(
            "removed {id} and {} connection(s)",
            before - self.connections.len()
        );
        Ok(part)
    }

    fn check_endpoint(&self, endpoint: &Endpoint) -> Result<()> {
        let part = self
            .part(&endpoint.part_id)
            .ok_or_else(|| BreadboardError::part_not_found(endpoint.part_id.as_str()))?;
        match resolve_terminal(&part.kind, &endpoint.terminal_id) {
            Some(_) => Ok(()),
            None => Err(BreadboardError::unknown_terminal(
                part.id.as_str(),
                part.kind.name(),
                endpoint.terminal_id.as_str(),
            )),
        }
    }

    /// Add a wire between two existing terminals.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<&Connection> {
        self.check_endpoint(&from)?;
        self.check_endpoint(&to)?;
        self.connections.push(Connection::new(from, to));
        Ok(&self.connections[self.connections.len() - 1])
    }

    /// Remove the wire at `index`, returning it as it was entered.
    pub fn remove_connection(&mut self, index: usize) -> Result<Connection> {
        if index >= self.connections.len() {
            return Err(BreadboardError::ConnectionNotFound {
                index,
                len: self.connections.len(),
            });
        }
        Ok(self.connections.remove(index))
    }

    /// Two-click wiring: the first click picks a terminal, a click on the
    /// same terminal cancels, and a click on any other terminal adds a wire
    /// from the first to the second.
    pub fn select_terminal(&mut self, endpoint: Endpoint) -> Result<WireEvent> {
        self.check_endpoint(&endpoint)?;
        match self.pending.take() {
            None => {
                self.pending = Some(endpoint.clone());
                Ok(WireEvent::Started { at: endpoint })
            }
            Some(start) if start == endpoint => Ok(WireEvent::Cancelled),
            Some(start) => {
                let connection = Connection::new(start, endpoint);
                self.connections.push(connection.clone());
                Ok(WireEvent::Connected { connection })
            }
        }
    }

    /// Evaluate the current snapshot without changing it.
    pub fn evaluate(&self, config: &EvalConfig) -> Evaluation {
        evaluate_circuit_with(&self.parts, &self.connections, config)
    }

    /// Evaluate and store the updated LED states.
    pub fn evaluate_and_apply(&mut self, config: &EvalConfig) -> Evaluation {
        let evaluation = self.evaluate(config);
        self.parts = evaluation.updated_parts.clone();
        evaluation
    }
}
