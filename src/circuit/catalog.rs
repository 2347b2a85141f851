//! Static per-kind tables: terminals, unit options and toolbox labels.
//!
//! Geometry (where a terminal is drawn on the part icon) belongs to the UI;
//! only the identifiers live here.

use super::types::PartKind;

/// Positive/negative pair, positive first.
const POSITIVE_FIRST: &[&str] = &["P", "N"];
/// Positive/negative pair, negative first.
const NEGATIVE_FIRST: &[&str] = &["N", "P"];
const GROUND: &[&str] = &["GND"];

/// Unit choices offered for a kind's value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitOptions {
    pub default: &'static str,
    pub options: &'static [&'static str],
}

impl UnitOptions {
    pub fn contains(&self, unit: &str) -> bool {
        self.options.contains(&unit)
    }
}

/// Ordered terminal identifiers for a kind name.
///
/// Unknown kinds have no terminals.
pub fn terminals_of(kind: &str) -> &'static [&'static str] {
    match kind {
        "battery" | "led" => POSITIVE_FIRST,
        "resistor" | "capacitor" | "inductor" => NEGATIVE_FIRST,
        "ground" => GROUND,
        _ => &[],
    }
}

/// Unit options for a kind name; `None` for ground and unknown kinds.
pub fn unit_options(kind: &str) -> Option<UnitOptions> {
    let units = match kind {
        "battery" => UnitOptions {
            default: "V",
            options: &["V"],
        },
        "resistor" => UnitOptions {
            default: "Ω",
            options: &["µΩ", "Ω", "kΩ", "MΩ"],
        },
        "capacitor" => UnitOptions {
            default: "µF",
            options: &["pF", "nF", "µF", "mF"],
        },
        "inductor" => UnitOptions {
            default: "mH",
            options: &["µH", "mH", "H"],
        },
        "led" => UnitOptions {
            default: "lm",
            options: &["lm"],
        },
        _ => return None,
    };
    Some(units)
}

/// Resolve a terminal name against the catalog entry for `kind`.
///
/// Returns the catalog's own `'static` identifier so graph nodes never
/// borrow from connection data.
pub fn resolve_terminal(kind: &PartKind, terminal: &str) -> Option<&'static str> {
    terminals_of(kind.name())
        .iter()
        .copied()
        .find(|t| *t == terminal)
}

impl PartKind {
    /// Label shown in the toolbox.
    pub fn label(&self) -> &str {
        match self {
            PartKind::Battery => "Battery (Passion)",
            PartKind::Resistor => "Resistor (Resilience)",
            PartKind::Capacitor => "Capacitor (Memory)",
            PartKind::Inductor => "Inductor (Growth)",
            PartKind::Led => "LED (Joy)",
            PartKind::Ground => "Ground",
            PartKind::Other(name) => name,
        }
    }

    pub fn terminals(&self) -> &'static [&'static str] {
        terminals_of(self.name())
    }

    pub fn unit_options(&self) -> Option<UnitOptions> {
        unit_options(self.name())
    }
}
