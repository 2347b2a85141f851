//! WASM bindings for Breadboard Core.
//!
//! This module provides JavaScript-friendly bindings for the browser editor.
//! The editor keeps drawing and dragging to itself and calls in here for
//! every edit that changes the circuit and for the evaluation itself.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmBreadboard, terminalsOf } from 'breadboard_core';
//!
//! await init();
//!
//! const board = new WasmBreadboard();
//! const bat = board.addPart('battery');
//! const led = board.addPart('led');
//! const gnd = board.addPart('ground');
//! board.setValueInput(bat, '9');
//!
//! board.selectTerminal(bat, 'P');
//! board.selectTerminal(led, 'P');   // { event: 'connected', connection: ... }
//! board.connect(led, 'N', gnd, 'GND');
//!
//! const { complete, message, updatedParts } = board.evaluate();
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::circuit::{self, Connection, Diagram, Endpoint, Part, PartId, PartKind};
use crate::error::BreadboardError;
use crate::eval::{self, EvalConfig, Lighting};

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::debug!("initialized breadboard_core logger");
    }
}

fn js_error(err: BreadboardError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn wasm_error(err: serde_wasm_bindgen::Error) -> JsValue {
    js_error(BreadboardError::WasmError {
        message: err.to_string(),
    })
}

/// Serialize to plain JS objects (maps become objects, not `Map`s).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(wasm_error)
}

/// WASM-compatible diagram editor state.
///
/// Wraps a [`Diagram`] and the evaluation settings.
#[wasm_bindgen]
pub struct WasmBreadboard {
    diagram: Diagram,
    config: EvalConfig,
}

impl Default for WasmBreadboard {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmBreadboard {
    /// Create an empty board.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmBreadboard {
        WasmBreadboard {
            diagram: Diagram::new(),
            config: EvalConfig::default(),
        }
    }

    /// Create a board from a JSON snapshot (`{ parts, connections }`).
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<WasmBreadboard, JsValue> {
        let diagram = Diagram::from_json(json).map_err(js_error)?;
        Ok(WasmBreadboard {
            diagram,
            config: EvalConfig::default(),
        })
    }

    /// Export the current snapshot as JSON.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.diagram.to_json().map_err(js_error)
    }

    /// Place a part and return its id.
    #[wasm_bindgen(js_name = addPart)]
    pub fn add_part(&mut self, kind: &str) -> String {
        self.diagram.add_part(PartKind::from_name(kind)).0
    }

    /// Remove a part and every wire attached to it.
    #[wasm_bindgen(js_name = removePart)]
    pub fn remove_part(&mut self, id: &str) -> Result<(), JsValue> {
        self.diagram
            .remove_part(&PartId::from(id))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Set a numeric value (clamped to be non-negative).
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&mut self, id: &str, value: f64) -> Result<(), JsValue> {
        self.diagram
            .set_value(&PartId::from(id), value)
            .map_err(js_error)
    }

    /// Set a value from the raw contents of an input field.
    #[wasm_bindgen(js_name = setValueInput)]
    pub fn set_value_input(&mut self, id: &str, text: &str) -> Result<(), JsValue> {
        self.diagram
            .set_value_input(&PartId::from(id), text)
            .map_err(js_error)
    }

    /// Pick a unit from the kind's options.
    #[wasm_bindgen(js_name = setUnit)]
    pub fn set_unit(&mut self, id: &str, unit: &str) -> Result<(), JsValue> {
        self.diagram
            .set_unit(&PartId::from(id), unit)
            .map_err(js_error)
    }

    /// Handle a click on a terminal marker.
    ///
    /// Returns `{ event: 'started' | 'cancelled' | 'connected', ... }`.
    #[wasm_bindgen(js_name = selectTerminal)]
    pub fn select_terminal(
        &mut self,
        part_id: &str,
        terminal_id: &str,
    ) -> Result<JsValue, JsValue> {
        let event = self
            .diagram
            .select_terminal(Endpoint::new(part_id, terminal_id))
            .map_err(js_error)?;
        to_js(&event)
    }

    /// Add a wire directly.
    #[wasm_bindgen]
    pub fn connect(
        &mut self,
        from_part: &str,
        from_terminal: &str,
        to_part: &str,
        to_terminal: &str,
    ) -> Result<(), JsValue> {
        self.diagram
            .connect(
                Endpoint::new(from_part, from_terminal),
                Endpoint::new(to_part, to_terminal),
            )
            .map(|_| ())
            .map_err(js_error)
    }

    /// Remove the wire at `index`.
    #[wasm_bindgen(js_name = removeConnection)]
    pub fn remove_connection(&mut self, index: usize) -> Result<(), JsValue> {
        self.diagram
            .remove_connection(index)
            .map(|_| ())
            .map_err(js_error)
    }

    /// Light only LEDs inside a complete circuit (default: all LEDs).
    #[wasm_bindgen(js_name = setPerComponentLighting)]
    pub fn set_per_component_lighting(&mut self, enabled: bool) {
        let lighting = if enabled {
            Lighting::PerComponent
        } else {
            Lighting::Global
        };
        self.config = self.config.clone().with_lighting(lighting);
    }

    /// Current parts as plain objects.
    #[wasm_bindgen]
    pub fn parts(&self) -> Result<JsValue, JsValue> {
        to_js(self.diagram.parts())
    }

    /// Current connections as plain objects.
    #[wasm_bindgen]
    pub fn connections(&self) -> Result<JsValue, JsValue> {
        to_js(self.diagram.connections())
    }

    /// Evaluate the board, store the new LED states and return the result.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<JsValue, JsValue> {
        let evaluation = self.diagram.evaluate_and_apply(&self.config);
        to_js(&evaluation)
    }
}

/// Read a JS value as JSON; values serde cannot read become `null`.
fn from_js(value: JsValue) -> serde_json::Value {
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|err| {
        log::warn!("unreadable snapshot input: {err}");
        serde_json::Value::Null
    })
}

/// Evaluate a snapshot held by the caller.
///
/// `parts` and `connections` are arrays of plain objects in the snapshot
/// format; returns `{ complete, message, updatedParts, totals, brightness }`.
/// Elements that cannot be read are left out rather than thrown on.
#[wasm_bindgen(js_name = evaluateCircuit)]
pub fn evaluate_circuit(parts: JsValue, connections: JsValue) -> Result<JsValue, JsValue> {
    let parts: Vec<Part> = circuit::decode_each(from_js(parts));
    let connections: Vec<Connection> = circuit::decode_each(from_js(connections));
    to_js(&eval::evaluate_circuit(&parts, &connections))
}

/// Terminal identifiers of a part kind (empty for unknown kinds).
#[wasm_bindgen(js_name = terminalsOf)]
pub fn terminals_of(kind: &str) -> Vec<String> {
    circuit::terminals_of(kind)
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[derive(Serialize)]
struct UnitChoice<'a> {
    default: &'a str,
    options: &'a [&'a str],
}

/// `{ default, options }` for a kind, or `null` for ground and unknown kinds.
#[wasm_bindgen(js_name = unitOptions)]
pub fn unit_options(kind: &str) -> Result<JsValue, JsValue> {
    let choice = circuit::unit_options(kind).map(|u| UnitChoice {
        default: u.default,
        options: u.options,
    });
    to_js(&choice)
}

#[derive(Serialize)]
struct ToolboxItem<'a> {
    kind: &'a str,
    label: &'a str,
}

/// Toolbox entries in display order.
#[wasm_bindgen(js_name = toolboxItems)]
pub fn toolbox_items() -> Result<JsValue, JsValue> {
    let kinds = PartKind::ALL;
    let items: Vec<ToolboxItem> = kinds
        .iter()
        .map(|kind| ToolboxItem {
            kind: kind.name(),
            label: kind.label(),
        })
        .collect();
    to_js(&items)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
