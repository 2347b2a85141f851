//! Value aggregation and the feedback message rules.
//!
//! Messages are chosen by an ordered decision list: the first rule whose
//! predicate holds wins, and the fallback covers everything else. Rule
//! order is data, so precedence can be inspected and tested directly.

use std::fmt;

use serde::Serialize;

use crate::circuit::{Part, PartKind};

/// Shown instead of any rule message when the circuit is not complete.
pub const INCOMPLETE_MESSAGE: &str =
    "Incomplete Circuit! Ensure a battery, an LED, and ground are connected.";

/// Shown when no rule matches.
pub const FALLBACK_MESSAGE: &str =
    "Every component of you matters. Embrace your unique journey!";

/// Number of placed parts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub battery: usize,
    pub resistor: usize,
    pub capacitor: usize,
    pub inductor: usize,
    pub led: usize,
    pub ground: usize,
    pub other: usize,
}

/// Per-kind sums over the live parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of battery values
    pub total_source_strength: f64,
    /// Sum of resistor values
    pub total_resistive_load: f64,
    /// Sum of capacitor values
    pub total_stored_potential: f64,
    /// Sum of inductor values
    pub total_growth_factor: f64,
    pub counts: KindCounts,
}

impl Totals {
    /// Aggregate a parts snapshot. Missing or invalid values count as 0 and
    /// unknown kinds are only counted.
    pub fn from_parts(parts: &[Part]) -> Self {
        let mut totals = Totals::default();
        for part in parts {
            let value = part.effective_value();
            match part.kind {
                PartKind::Battery => {
                    totals.total_source_strength += value;
                    totals.counts.battery += 1;
                }
                PartKind::Resistor => {
                    totals.total_resistive_load += value;
                    totals.counts.resistor += 1;
                }
                PartKind::Capacitor => {
                    totals.total_stored_potential += value;
                    totals.counts.capacitor += 1;
                }
                PartKind::Inductor => {
                    totals.total_growth_factor += value;
                    totals.counts.inductor += 1;
                }
                PartKind::Led => totals.counts.led += 1,
                PartKind::Ground => totals.counts.ground += 1,
                PartKind::Other(_) => totals.counts.other += 1,
            }
        }
        totals
    }
}

/// One entry of the decision list.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Short name, used in logs
    pub name: &'static str,
    pub predicate: fn(&Totals) -> bool,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(
        name: &'static str,
        predicate: fn(&Totals) -> bool,
        message: &'static str,
    ) -> Self {
        Self {
            name,
            predicate,
            message,
        }
    }

    pub fn matches(&self, totals: &Totals) -> bool {
        (self.predicate)(totals)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

fn high_energy(t: &Totals) -> bool {
    t.total_source_strength >= 15.0 && t.total_resistive_load < 5.0
}

fn overcame_resistance(t: &Totals) -> bool {
    t.total_resistive_load > 50.0
}

fn stored_potential(t: &Totals) -> bool {
    t.total_stored_potential > 20.0
}

fn steady_growth(t: &Totals) -> bool {
    t.total_growth_factor > 10.0
}

fn gentle_spark(t: &Totals) -> bool {
    t.total_source_strength < 5.0
}

/// The standard rules, highest priority first.
pub const STANDARD_RULES: [Rule; 5] = [
    Rule::new(
        "high-energy",
        high_energy,
        "Your energy is electrifying and unstoppable!",
    ),
    Rule::new(
        "overcame-resistance",
        overcame_resistance,
        "You’ve overcome massive resistance – keep shining!",
    ),
    Rule::new(
        "stored-potential",
        stored_potential,
        "Your memory stores endless potential. Keep evolving!",
    ),
    Rule::new(
        "steady-growth",
        steady_growth,
        "Slow and steady growth leads to amazing results.",
    ),
    Rule::new(
        "gentle-spark",
        gentle_spark,
        "A gentle spark of passion. Keep fueling your dreams!",
    ),
];

/// Ordered decision list with a fallback message.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    fallback: &'static str,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// The standard feedback rules.
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES.to_vec(),
            fallback: FALLBACK_MESSAGE,
        }
    }

    /// An empty list that always yields `fallback`.
    pub fn empty(fallback: &'static str) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule at the lowest priority.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    /// First matching rule, if any.
    pub fn first_match(&self, totals: &Totals) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(totals))
    }

    /// Message for a complete circuit.
    pub fn select(&self, totals: &Totals) -> &'static str {
        self.first_match(totals)
            .map(|rule| rule.message)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(source: f64, resistive: f64, stored: f64, growth: f64) -> Totals {
        Totals {
            total_source_strength: source,
            total_resistive_load: resistive,
            total_stored_potential: stored,
            total_growth_factor: growth,
            counts: KindCounts::default(),
        }
    }

    fn rule_name(t: &Totals) -> Option<&'static str> {
        RuleSet::standard().first_match(t).map(|r| r.name)
    }

    #[test]
    fn test_aggregation() {
        let parts = vec![
            Part::new("b1", PartKind::Battery).with_value(9.0),
            Part::new("b2", PartKind::Battery).with_value(1.5),
            Part::new("r1", PartKind::Resistor).with_value(100.0),
            Part::new("c1", PartKind::Capacitor).with_value(22.0),
            Part::new("l1", PartKind::Inductor).with_value(3.0),
            Part::new("d1", PartKind::Led),
            Part::new("g1", PartKind::Ground),
            Part::new("x1", PartKind::Other("gizmo".into())).with_value(99.0),
        ];
        let t = Totals::from_parts(&parts);
        assert_eq!(t.total_source_strength, 10.5);
        assert_eq!(t.total_resistive_load, 100.0);
        assert_eq!(t.total_stored_potential, 22.0);
        assert_eq!(t.total_growth_factor, 3.0);
        assert_eq!(t.counts.battery, 2);
        assert_eq!(t.counts.led, 1);
        assert_eq!(t.counts.ground, 1);
        assert_eq!(t.counts.other, 1);
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(rule_name(&totals(16.0, 2.0, 0.0, 0.0)), Some("high-energy"));
        // Rule 1 shadows every later rule
        assert_eq!(rule_name(&totals(16.0, 2.0, 500.0, 500.0)), Some("high-energy"));
        assert_eq!(rule_name(&totals(16.0, 51.0, 500.0, 0.0)), Some("overcame-resistance"));
        assert_eq!(rule_name(&totals(10.0, 5.0, 21.0, 11.0)), Some("stored-potential"));
        assert_eq!(rule_name(&totals(1.0, 0.0, 0.0, 11.0)), Some("steady-growth"));
        assert_eq!(rule_name(&totals(4.9, 0.0, 0.0, 0.0)), Some("gentle-spark"));
        assert_eq!(rule_name(&totals(10.0, 0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_thresholds_are_exact() {
        assert_eq!(rule_name(&totals(15.0, 4.99, 0.0, 0.0)), Some("high-energy"));
        assert_eq!(rule_name(&totals(15.0, 5.0, 0.0, 0.0)), None);
        assert_eq!(rule_name(&totals(10.0, 50.0, 20.0, 10.0)), None);
        assert_eq!(rule_name(&totals(5.0, 0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_select_fallback() {
        let rules = RuleSet::standard();
        assert_eq!(rules.rules().len(), STANDARD_RULES.len());
        assert_eq!(rules.fallback(), FALLBACK_MESSAGE);
        assert_eq!(rules.select(&totals(10.0, 0.0, 0.0, 0.0)), FALLBACK_MESSAGE);
        assert_eq!(
            rules.select(&totals(0.0, 0.0, 0.0, 0.0)),
            "A gentle spark of passion. Keep fueling your dreams!"
        );
    }

    #[test]
    fn test_custom_rule_set() {
        fn many_leds(t: &Totals) -> bool {
            t.counts.led >= 3
        }
        let rules = RuleSet::empty("plain").with_rule(Rule::new("many-leds", many_leds, "festive"));
        assert_eq!(rules.rules()[0].name, "many-leds");
        assert_eq!(rules.fallback(), "plain");
        let mut t = totals(0.0, 0.0, 0.0, 0.0);
        assert_eq!(rules.select(&t), "plain");
        t.counts.led = 3;
        assert_eq!(rules.select(&t), "festive");
    }
}
