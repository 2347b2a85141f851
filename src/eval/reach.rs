//! Source-to-sink-to-ground reachability.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitGraph, NodeId, Part, PartId, PartKind, Role};

/// How current may move between nodes during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Conduction {
    /// Wires plus the inside of every non-source part: reaching one
    /// terminal of an LED, resistor, capacitor or inductor reaches the
    /// other. Batteries never join their own terminals.
    #[default]
    ThroughParts,
    /// Wire edges only; each terminal is its own island unless wired
    WiresOnly,
}

/// Graph nodes grouped by the role of the part they belong to.
#[derive(Debug, Clone, Default)]
pub struct NodeRoles {
    /// Battery terminals, in part order
    pub sources: Vec<NodeId>,
    /// LED terminals
    pub sinks: HashSet<NodeId>,
    /// Ground terminals
    pub grounds: HashSet<NodeId>,
}

impl NodeRoles {
    /// Classify the terminals of every part by role.
    pub fn from_parts(parts: &[Part]) -> Self {
        let mut roles = NodeRoles::default();
        let mut seen = HashSet::new();
        for part in parts {
            // Later parts reusing an id are not in the graph either
            if !seen.insert(&part.id) {
                continue;
            }
            let Some(role) = part.kind.role() else {
                continue;
            };
            for &terminal in part.terminals() {
                let node = NodeId::new(part.id.clone(), terminal);
                match role {
                    Role::Source => roles.sources.push(node),
                    Role::Sink => {
                        roles.sinks.insert(node);
                    }
                    Role::Ground => {
                        roles.grounds.insert(node);
                    }
                    Role::Passive => {}
                }
            }
        }
        roles
    }
}

/// What one traversal ran into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reach {
    /// Sink parts met, in visit order, one entry per part
    pub sink_parts: Vec<PartId>,
    /// Whether a ground terminal was met
    pub ground: bool,
}

impl Reach {
    pub fn has_sink(&self) -> bool {
        !self.sink_parts.is_empty()
    }

    /// Both a sink and a ground share the source's component.
    pub fn is_complete(&self) -> bool {
        self.has_sink() && self.ground
    }
}

/// Outcome of examining every source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachability {
    /// Some source reaches both a sink and a ground
    pub complete: bool,
    /// Sink parts lying in complete components
    pub lit_sinks: HashSet<PartId>,
}

/// Depth-first reachability over a [`CircuitGraph`].
pub struct Evaluator<'g> {
    graph: &'g CircuitGraph,
    roles: NodeRoles,
    conduction: Conduction,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g CircuitGraph, roles: NodeRoles) -> Self {
        Self {
            graph,
            roles,
            conduction: Conduction::default(),
        }
    }

    pub fn with_conduction(mut self, conduction: Conduction) -> Self {
        self.conduction = conduction;
        self
    }

    /// Whether traversal may cross from `node` to the other terminals of
    /// its part.
    fn conducts_through(&self, node: &NodeId) -> bool {
        self.conduction == Conduction::ThroughParts
            && self
                .graph
                .kind_of(&node.part)
                .and_then(PartKind::role)
                .is_some_and(|role| role != Role::Source)
    }

    /// Depth-first traversal from `start`.
    ///
    /// Nodes already in `visited` are not entered again, and every node
    /// reached is added to it. Uses an explicit stack.
    pub fn traverse(&self, start: &NodeId, visited: &mut HashSet<NodeId>) -> Reach {
        let mut reach = Reach::default();
        if !self.graph.contains(start) || !visited.insert(start.clone()) {
            return reach;
        }

        let mut stack = vec![start.clone()];
        while let Some(node) = stack.pop() {
            if self.roles.sinks.contains(&node) && !reach.sink_parts.contains(&node.part) {
                reach.sink_parts.push(node.part.clone());
            }
            if self.roles.grounds.contains(&node) {
                reach.ground = true;
            }

            for next in self.graph.neighbors(&node) {
                if visited.insert(next.clone()) {
                    stack.push(next.clone());
                }
            }
            if self.conducts_through(&node) {
                for next in self.graph.part_siblings(&node) {
                    if !visited.contains(&next) {
                        visited.insert(next.clone());
                        stack.push(next);
                    }
                }
            }
        }
        reach
    }

    /// Whether any source node's component holds a sink and a ground.
    ///
    /// Stops at the first source that qualifies. A source node swept up by
    /// an earlier traversal sits in an already examined component and is
    /// skipped.
    pub fn is_complete(&self) -> bool {
        let mut visited = HashSet::new();
        for source in &self.roles.sources {
            if visited.contains(source) {
                continue;
            }
            if self.traverse(source, &mut visited).is_complete() {
                debug!("source {source} reaches a sink and ground");
                return true;
            }
        }
        false
    }

    /// Examine every component that holds a source and collect the sinks
    /// of the complete ones.
    pub fn complete_components(&self) -> Reachability {
        let mut visited = HashSet::new();
        let mut result = Reachability::default();
        for source in &self.roles.sources {
            if visited.contains(source) {
                continue;
            }
            let reach = self.traverse(source, &mut visited);
            if reach.is_complete() {
                debug!(
                    "source {source} completes a circuit through {} sink(s)",
                    reach.sink_parts.len()
                );
                result.complete = true;
                result.lit_sinks.extend(reach.sink_parts);
            }
        }
        result
    }
}

/// Whether the snapshot's graph holds a complete circuit, with parts
/// conducting between their terminals.
pub fn is_complete(graph: &CircuitGraph, parts: &[Part]) -> bool {
    Evaluator::new(graph, NodeRoles::from_parts(parts)).is_complete()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Connection, Endpoint, PartKind};

    fn wire(a: &str, ta: &str, b: &str, tb: &str) -> Connection {
        Connection::new(Endpoint::new(a, ta), Endpoint::new(b, tb))
    }

    fn check(parts: &[Part], conns: &[Connection]) -> bool {
        is_complete(&CircuitGraph::build(parts, conns), parts)
    }

    fn check_wires_only(parts: &[Part], conns: &[Connection]) -> bool {
        let graph = CircuitGraph::build(parts, conns);
        Evaluator::new(&graph, NodeRoles::from_parts(parts))
            .with_conduction(Conduction::WiresOnly)
            .is_complete()
    }

    fn basic_parts() -> Vec<Part> {
        vec![
            Part::new("b", PartKind::Battery),
            Part::new("l", PartKind::Led),
            Part::new("g", PartKind::Ground),
        ]
    }

    #[test]
    fn test_roles() {
        let mut parts = basic_parts();
        parts.push(Part::new("r", PartKind::Resistor));
        let roles = NodeRoles::from_parts(&parts);
        assert_eq!(roles.sources.len(), 2);
        assert_eq!(roles.sinks.len(), 2);
        assert_eq!(roles.grounds.len(), 1);
    }

    #[test]
    fn test_empty_graph_is_incomplete() {
        assert!(!check(&[], &[]));
        assert!(!check_wires_only(&[], &[]));
    }

    #[test]
    fn test_series_path() {
        let conns = vec![wire("b", "P", "l", "P"), wire("l", "N", "g", "GND")];
        assert!(check(&basic_parts(), &conns));
        // The LED's own terminals are not joined by a wire
        assert!(!check_wires_only(&basic_parts(), &conns));
    }

    #[test]
    fn test_battery_does_not_bridge_its_terminals() {
        let conns = vec![wire("b", "P", "l", "P"), wire("b", "N", "g", "GND")];
        assert!(!check(&basic_parts(), &conns));
        assert!(!check_wires_only(&basic_parts(), &conns));
    }

    #[test]
    fn test_shared_net_is_complete_either_way() {
        let conns = vec![wire("b", "P", "l", "P"), wire("l", "P", "g", "GND")];
        assert!(check(&basic_parts(), &conns));
        assert!(check_wires_only(&basic_parts(), &conns));
    }

    #[test]
    fn test_unconnected_source() {
        let conns = vec![wire("l", "N", "g", "GND")];
        assert!(!check(&basic_parts(), &conns));
    }

    #[test]
    fn test_cycle_terminates() {
        let parts = vec![
            Part::new("b", PartKind::Battery),
            Part::new("r1", PartKind::Resistor),
            Part::new("r2", PartKind::Resistor),
        ];
        let conns = vec![
            wire("b", "P", "r1", "N"),
            wire("r1", "P", "r2", "N"),
            wire("r2", "P", "b", "N"),
            wire("r2", "P", "r1", "N"),
        ];
        assert!(!check(&parts, &conns));
        assert!(!check_wires_only(&parts, &conns));
    }

    #[test]
    fn test_unknown_kind_does_not_conduct() {
        let mut parts = basic_parts();
        parts.push(Part::new("x", PartKind::Other("gizmo".into())));
        let conns = vec![
            wire("b", "P", "x", "P"),
            wire("x", "N", "l", "P"),
            wire("l", "N", "g", "GND"),
        ];
        assert!(!check(&parts, &conns));
    }

    #[test]
    fn test_traverse_respects_visited() {
        let parts = basic_parts();
        let conns = vec![wire("b", "P", "l", "P"), wire("l", "N", "g", "GND")];
        let graph = CircuitGraph::build(&parts, &conns);
        let evaluator = Evaluator::new(&graph, NodeRoles::from_parts(&parts));
        let start = NodeId::new(PartId::from("b"), "P");

        let mut visited = HashSet::new();
        let first = evaluator.traverse(&start, &mut visited);
        assert!(first.is_complete());
        assert_eq!(first.sink_parts, vec![PartId::from("l")]);
        // b_P, l_P, l_N, g_GND; the battery's N side stays unvisited
        assert_eq!(visited.len(), 4);

        let again = evaluator.traverse(&start, &mut visited);
        assert_eq!(again, Reach::default());
    }

    #[test]
    fn test_duplicate_id_keeps_first_part() {
        let parts = vec![
            Part::new("1", PartKind::Battery),
            Part::new("l", PartKind::Led),
            Part::new("1", PartKind::Ground),
        ];
        let roles = NodeRoles::from_parts(&parts);
        assert_eq!(roles.sources.len(), 2);
        assert!(roles.grounds.is_empty());

        // The ground never made it into the graph, so its wire is stale
        let conns = vec![wire("1", "P", "l", "P"), wire("l", "N", "1", "GND")];
        assert!(!check(&parts, &conns));
    }

    #[test]
    fn test_components_are_examined_separately() {
        let parts = vec![
            Part::new("b1", PartKind::Battery),
            Part::new("l1", PartKind::Led),
            Part::new("g1", PartKind::Ground),
            Part::new("b2", PartKind::Battery),
            Part::new("l2", PartKind::Led),
        ];
        let conns = vec![
            wire("b1", "P", "l1", "P"),
            wire("l1", "N", "g1", "GND"),
            wire("b2", "P", "l2", "P"),
        ];
        let graph = CircuitGraph::build(&parts, &conns);
        let result = Evaluator::new(&graph, NodeRoles::from_parts(&parts)).complete_components();
        assert!(result.complete);
        assert!(result.lit_sinks.contains(&PartId::from("l1")));
        assert!(!result.lit_sinks.contains(&PartId::from("l2")));
    }
}
