//! Circuit evaluation.
//!
//! One evaluation runs four steps over an immutable snapshot:
//!
//! 1. Build the terminal graph ([`CircuitGraph::build`])
//! 2. Search from every battery terminal for an LED and a ground in the same
//!    component ([`Evaluator`])
//! 3. Sum part values per kind and pick a feedback message ([`RuleSet`])
//! 4. Derive the new LED states ([`apply_lighting`])
//!
//! Evaluation is total: whatever the snapshot holds, a result comes back.

mod apply;
mod reach;
mod rules;

pub use apply::{apply_lighting, apply_result, brightness, brightness_for};
pub use reach::{is_complete, Conduction, Evaluator, NodeRoles, Reach, Reachability};
pub use rules::{
    KindCounts, Rule, RuleSet, Totals, FALLBACK_MESSAGE, INCOMPLETE_MESSAGE, STANDARD_RULES,
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitGraph, Connection, Part};

/// Total source strength at which LEDs reach full brightness.
pub const FULL_BRIGHTNESS_STRENGTH: f64 = 20.0;

/// Which LEDs a complete circuit lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lighting {
    /// Any complete circuit lights every LED in the diagram
    #[default]
    Global,
    /// Only LEDs inside a complete component light up
    PerComponent,
}

/// Configuration for an evaluation.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Message rules consulted for complete circuits.
    pub rules: RuleSet,
    /// Source strength that maps to brightness 1.
    pub full_brightness: f64,
    /// Which LEDs light up.
    pub lighting: Lighting,
    /// Whether parts conduct between their own terminals.
    pub conduction: Conduction,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::standard(),
            full_brightness: FULL_BRIGHTNESS_STRENGTH,
            lighting: Lighting::default(),
            conduction: Conduction::default(),
        }
    }
}

impl EvalConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the message rules.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set the source strength that gives full brightness.
    pub fn with_full_brightness(mut self, full_brightness: f64) -> Self {
        self.full_brightness = full_brightness;
        self
    }

    /// Set which LEDs a complete circuit lights.
    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }

    /// Set how current moves through parts.
    pub fn with_conduction(mut self, conduction: Conduction) -> Self {
        self.conduction = conduction;
        self
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Whether a battery reaches an LED and a ground
    pub complete: bool,
    /// Feedback message for the display
    pub message: String,
    /// The input parts with LED glow/brightness updated
    pub updated_parts: Vec<Part>,
    /// Per-kind sums the message was chosen from
    pub totals: Totals,
    /// Brightness of lit LEDs (0 when incomplete)
    pub brightness: f64,
}

/// Evaluate a snapshot with the default configuration.
pub fn evaluate_circuit(parts: &[Part], connections: &[Connection]) -> Evaluation {
    evaluate_circuit_with(parts, connections, &EvalConfig::default())
}

/// Evaluate a snapshot.
pub fn evaluate_circuit_with(
    parts: &[Part],
    connections: &[Connection],
    config: &EvalConfig,
) -> Evaluation {
    let graph = CircuitGraph::build(parts, connections);
    let evaluator =
        Evaluator::new(&graph, NodeRoles::from_parts(parts)).with_conduction(config.conduction);

    let totals = Totals::from_parts(parts);
    let level = brightness_for(totals.total_source_strength, config.full_brightness);

    let (complete, updated_parts) = match config.lighting {
        Lighting::Global => {
            let complete = evaluator.is_complete();
            (complete, apply_lighting(parts, |_| complete, level))
        }
        Lighting::PerComponent => {
            let reach = evaluator.complete_components();
            let lit = apply_lighting(parts, |p| reach.lit_sinks.contains(&p.id), level);
            (reach.complete, lit)
        }
    };

    let message = if complete {
        config.rules.select(&totals)
    } else {
        INCOMPLETE_MESSAGE
    };

    info!(
        "evaluated {} parts / {} connections: complete={}, source strength {}",
        parts.len(),
        connections.len(),
        complete,
        totals.total_source_strength
    );

    Evaluation {
        complete,
        message: message.to_string(),
        updated_parts,
        totals,
        brightness: if complete { level } else { 0.0 },
    }
}
