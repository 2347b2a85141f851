//! Core types for diagram representation.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a placed part, stable for the part's lifetime.
///
/// Snapshots may carry numeric ids (editors often stamp parts with a
/// timestamp); they are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct PartId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for PartId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(id) => PartId(id),
            RawId::Number(n) => PartId(n.to_string()),
        }
    }
}

impl From<PartId> for String {
    fn from(id: PartId) -> Self {
        id.0
    }
}

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        PartId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        PartId(id.to_string())
    }
}

/// The role a part plays in the completeness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Drives the circuit (battery)
    Source,
    /// Lights up when the circuit is complete (LED)
    Sink,
    /// Return-path anchor (ground)
    Ground,
    /// Sits on a path without a role of its own (R, C, L)
    Passive,
}

/// Kind of a placed part.
///
/// Kind names outside the known set are kept verbatim in
/// [`PartKind::Other`] so a snapshot survives evaluation unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartKind {
    Battery,
    Resistor,
    Capacitor,
    Inductor,
    Led,
    Ground,
    Other(String),
}

impl PartKind {
    /// Known kinds in toolbox order.
    pub const ALL: [PartKind; 6] = [
        PartKind::Battery,
        PartKind::Resistor,
        PartKind::Capacitor,
        PartKind::Inductor,
        PartKind::Led,
        PartKind::Ground,
    ];

    /// Resolve a kind name. Never fails; unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "battery" => PartKind::Battery,
            "resistor" => PartKind::Resistor,
            "capacitor" => PartKind::Capacitor,
            "inductor" => PartKind::Inductor,
            "led" => PartKind::Led,
            "ground" => PartKind::Ground,
            other => PartKind::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PartKind::Battery => "battery",
            PartKind::Resistor => "resistor",
            PartKind::Capacitor => "capacitor",
            PartKind::Inductor => "inductor",
            PartKind::Led => "led",
            PartKind::Ground => "ground",
            PartKind::Other(name) => name,
        }
    }

    /// Role in the completeness check, `None` for unknown kinds.
    pub fn role(&self) -> Option<Role> {
        match self {
            PartKind::Battery => Some(Role::Source),
            PartKind::Led => Some(Role::Sink),
            PartKind::Ground => Some(Role::Ground),
            PartKind::Resistor | PartKind::Capacitor | PartKind::Inductor => Some(Role::Passive),
            PartKind::Other(_) => None,
        }
    }

    /// Whether parts of this kind carry a numeric value.
    pub fn has_value(&self) -> bool {
        !matches!(self, PartKind::Ground)
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for PartKind {
    fn from(name: String) -> Self {
        match PartKind::from_name(&name) {
            PartKind::Other(_) => PartKind::Other(name),
            known => known,
        }
    }
}

impl From<PartKind> for String {
    fn from(kind: PartKind) -> Self {
        match kind {
            PartKind::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

/// One placed circuit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,

    #[serde(alias = "type")]
    pub kind: PartKind,

    /// Numeric value; `None` for ground
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: Option<f64>,

    /// Cosmetic unit label
    #[serde(default)]
    pub unit: Option<String>,

    /// Whether the part is lit (LEDs only)
    #[serde(default)]
    pub glow: bool,

    /// Brightness in [0, 1] (LEDs only)
    #[serde(default)]
    pub brightness: f64,

    /// Fields owned by the UI (position, selection state, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Part {
    /// Create a freshly placed part with its kind's defaults.
    pub fn new(id: impl Into<PartId>, kind: PartKind) -> Self {
        let value = kind.has_value().then_some(0.0);
        let unit = super::catalog::unit_options(kind.name()).map(|u| u.default.to_string());
        Self {
            id: id.into(),
            kind,
            value,
            unit,
            glow: false,
            brightness: 0.0,
            extra: BTreeMap::new(),
        }
    }

    /// Builder-style value setter, clamping like an edit would.
    pub fn with_value(mut self, value: f64) -> Self {
        if self.kind.has_value() {
            self.value = Some(sanitize_value(value));
        }
        self
    }

    /// Value as used by aggregation: missing, negative or non-finite is 0.
    pub fn effective_value(&self) -> f64 {
        self.value.map(sanitize_value).unwrap_or(0.0)
    }

    /// Terminal identifiers of this part's kind.
    pub fn terminals(&self) -> &'static [&'static str] {
        super::catalog::terminals_of(self.kind.name())
    }

    /// Endpoint for one of this part's terminals.
    pub fn terminal(&self, terminal: impl Into<String>) -> Endpoint {
        Endpoint::new(self.id.clone(), terminal)
    }
}

impl From<String> for PartId {
    fn from(id: String) -> Self {
        PartId(id)
    }
}

/// One side of a connection: a terminal on a part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(alias = "compId")]
    pub part_id: PartId,
    pub terminal_id: String,
}

impl Endpoint {
    pub fn new(part_id: impl Into<PartId>, terminal_id: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            terminal_id: terminal_id.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.part_id, self.terminal_id)
    }
}

/// A user-made wire between two terminals.
///
/// Reachability ignores the direction, but `from`/`to` are kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }

    /// Whether either end sits on the given part.
    pub fn touches(&self, part: &PartId) -> bool {
        &self.from.part_id == part || &self.to.part_id == part
    }
}

/// A graph node: one terminal of one live part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub part: PartId,
    pub terminal: &'static str,
}

impl NodeId {
    pub fn new(part: PartId, terminal: &'static str) -> Self {
        Self { part, terminal }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.part, self.terminal)
    }
}

/// Read a part value the way an edit would: numbers as they are, text
/// through [`parse_value_input`], anything else as absent.
fn lenient_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Number(f64),
        Text(String),
        Other(de::IgnoredAny),
    }

    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        Some(RawValue::Number(value)) => Some(value),
        Some(RawValue::Text(text)) => Some(parse_value_input(&text)),
        Some(RawValue::Other(_)) | None => None,
    })
}

/// Clamp a stored value: negative and non-finite inputs become 0.
pub fn sanitize_value(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Interpret free-form value input.
///
/// Reads the longest leading decimal number (`"12.5V"` gives 12.5) and
/// clamps the result with [`sanitize_value`]. Text without a leading number
/// yields 0.
pub fn parse_value_input(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when digits follow it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().map(sanitize_value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in PartKind::ALL {
            assert_eq!(PartKind::from_name(kind.name()), kind);
        }
        let odd = PartKind::from("transistor".to_string());
        assert_eq!(odd, PartKind::Other("transistor".to_string()));
        assert_eq!(String::from(odd), "transistor");
    }

    #[test]
    fn test_new_part_defaults() {
        let battery = Part::new("b1", PartKind::Battery);
        assert_eq!(battery.value, Some(0.0));
        assert_eq!(battery.unit.as_deref(), Some("V"));
        assert!(!battery.glow);

        let ground = Part::new("g1", PartKind::Ground);
        assert_eq!(ground.value, None);
        assert_eq!(ground.unit, None);
        assert_eq!(ground.with_value(5.0).value, None);
    }

    #[test]
    fn test_effective_value() {
        let mut r = Part::new("r1", PartKind::Resistor).with_value(-3.0);
        assert_eq!(r.value, Some(0.0));
        r.value = Some(f64::NAN);
        assert_eq!(r.effective_value(), 0.0);
        r.value = Some(-7.0);
        assert_eq!(r.effective_value(), 0.0);
        r.value = Some(47.0);
        assert_eq!(r.effective_value(), 47.0);
    }

    #[test]
    fn test_parse_value_input() {
        assert_eq!(parse_value_input("12"), 12.0);
        assert_eq!(parse_value_input("  4.5V"), 4.5);
        assert_eq!(parse_value_input(".5"), 0.5);
        assert_eq!(parse_value_input("3."), 3.0);
        assert_eq!(parse_value_input("1e2"), 100.0);
        assert_eq!(parse_value_input("2e"), 2.0);
        assert_eq!(parse_value_input("-8"), 0.0);
        assert_eq!(parse_value_input("abc"), 0.0);
        assert_eq!(parse_value_input(""), 0.0);
        assert_eq!(parse_value_input("."), 0.0);
        assert_eq!(parse_value_input("1e999"), 0.0);
    }

    #[test]
    fn test_node_display() {
        let node = NodeId::new(PartId::from("42"), "GND");
        assert_eq!(node.to_string(), "42_GND");
    }

    #[test]
    fn test_part_json_keeps_ui_fields() {
        let json = r#"{"id":"7","type":"led","value":0,"unit":"lm","x":120.5,"y":40}"#;
        let part: Part = serde_json::from_str(json).unwrap();
        assert_eq!(part.kind, PartKind::Led);
        assert_eq!(part.extra["x"], serde_json::json!(120.5));

        let back = serde_json::to_value(&part).unwrap();
        assert_eq!(back["kind"], "led");
        assert_eq!(back["y"], 40);
    }

    #[test]
    fn test_part_value_is_read_leniently() {
        let part = |json: &str| serde_json::from_str::<Part>(json).unwrap();

        assert_eq!(part(r#"{"id":"1","kind":"battery","value":"9V"}"#).value, Some(9.0));
        let text = part(r#"{"id":"1","kind":"battery","value":"abc"}"#);
        assert_eq!(text.effective_value(), 0.0);
        assert_eq!(part(r#"{"id":"1","kind":"battery","value":true}"#).value, None);
        assert_eq!(part(r#"{"id":"1","kind":"ground"}"#).value, None);
    }

    #[test]
    fn test_numeric_ids() {
        let part: Part = serde_json::from_str(r#"{"id":1700000000001,"kind":"led"}"#).unwrap();
        assert_eq!(part.id, PartId::from("1700000000001"));
        assert_eq!(serde_json::to_value(&part.id).unwrap(), "1700000000001");

        let endpoint: Endpoint =
            serde_json::from_str(r#"{"compId":1700000000001,"terminalId":"P"}"#).unwrap();
        assert_eq!(endpoint.part_id, part.id);
    }

    #[test]
    fn test_endpoint_accepts_comp_id() {
        let json = r#"{"compId":"3","terminalId":"P"}"#;
        let endpoint: Endpoint = serde_json::from_str(json).unwrap();
        assert_eq!(endpoint, Endpoint::new("3", "P"));
    }
}
