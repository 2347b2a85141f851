//! Circuit graph structure.

use std::collections::HashMap;

use log::{debug, warn};

use super::catalog::resolve_terminal;
use super::types::{Connection, Endpoint, NodeId, Part, PartId, PartKind};

/// Undirected terminal graph built from a diagram snapshot.
///
/// Every terminal of every live part is a node; every valid connection is
/// one edge, stored in both endpoints' adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct CircuitGraph {
    /// Adjacency lists keyed by node
    adjacency: HashMap<NodeId, Vec<NodeId>>,

    /// Part kinds by id, used to resolve connection endpoints
    kinds: HashMap<PartId, PartKind>,

    /// Number of edges added
    num_edges: usize,

    /// Connections dropped because an endpoint did not resolve
    skipped_connections: usize,
}

impl CircuitGraph {
    /// Build the graph for a snapshot of parts and connections.
    ///
    /// Connections that point at a missing part or at a terminal the part's
    /// kind does not have are skipped. When several parts share an id, the
    /// first one is kept and the rest are left out of the graph. Runs in
    /// time linear in the number of parts plus connections.
    pub fn build(parts: &[Part], connections: &[Connection]) -> Self {
        let mut graph = CircuitGraph::default();

        for part in parts {
            if let Some(kept) = graph.kinds.get(&part.id) {
                warn!(
                    "duplicate part id '{}' in snapshot; keeping the {kept}, ignoring the {}",
                    part.id, part.kind
                );
                continue;
            }
            graph.kinds.insert(part.id.clone(), part.kind.clone());
            for &terminal in part.terminals() {
                graph
                    .adjacency
                    .entry(NodeId::new(part.id.clone(), terminal))
                    .or_default();
            }
        }

        for conn in connections {
            let (Some(a), Some(b)) = (graph.resolve(&conn.from), graph.resolve(&conn.to)) else {
                debug!("skipping stale connection {} -> {}", conn.from, conn.to);
                graph.skipped_connections += 1;
                continue;
            };
            graph.add_edge(a, b);
        }

        debug!(
            "built circuit graph: {} nodes, {} edges, {} skipped connections",
            graph.num_nodes(),
            graph.num_edges,
            graph.skipped_connections
        );
        graph
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId) {
        // Self-loops land in the same list twice, which traversal tolerates
        if let Some(adj) = self.adjacency.get_mut(&a) {
            adj.push(b.clone());
        }
        if let Some(adj) = self.adjacency.get_mut(&b) {
            adj.push(a);
        }
        self.num_edges += 1;
    }

    /// Resolve a connection endpoint to a graph node, if it is live.
    pub fn resolve(&self, endpoint: &Endpoint) -> Option<NodeId> {
        let kind = self.kinds.get(&endpoint.part_id)?;
        let terminal = resolve_terminal(kind, &endpoint.terminal_id)?;
        Some(NodeId::new(endpoint.part_id.clone(), terminal))
    }

    /// Check whether a node exists.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Adjacent nodes; empty for unknown nodes.
    pub fn neighbors(&self, node: &NodeId) -> &[NodeId] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The other terminals of the part `node` belongs to.
    ///
    /// These are not wire edges; the evaluator uses them when parts are
    /// treated as conducting between their own terminals.
    pub fn part_siblings<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let part = node.part.clone();
        let terminal = node.terminal;
        let terminals = self.kinds.get(&part).map(PartKind::terminals).unwrap_or(&[]);
        terminals
            .iter()
            .filter(move |t| **t != terminal)
            .map(move |t| NodeId::new(part.clone(), *t))
    }

    /// Kind of a live part.
    pub fn kind_of(&self, part: &PartId) -> Option<&PartKind> {
        self.kinds.get(part)
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn skipped_connections(&self) -> usize {
        self.skipped_connections
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(a: &str, ta: &str, b: &str, tb: &str) -> Connection {
        Connection::new(Endpoint::new(a, ta), Endpoint::new(b, tb))
    }

    fn node(part: &str, terminal: &'static str) -> NodeId {
        NodeId::new(PartId::from(part), terminal)
    }

    #[test]
    fn test_one_node_per_terminal() {
        let parts = vec![
            Part::new("b", PartKind::Battery),
            Part::new("r", PartKind::Resistor),
            Part::new("g", PartKind::Ground),
            Part::new("?", PartKind::Other("gizmo".into())),
        ];
        let graph = CircuitGraph::build(&parts, &[]);
        assert_eq!(graph.num_nodes(), 5);
        assert_eq!(graph.num_edges(), 0);
        assert!(graph.contains(&node("g", "GND")));
        assert!(graph.neighbors(&node("b", "P")).is_empty());
    }

    #[test]
    fn test_edges_are_undirected() {
        let parts = vec![
            Part::new("b", PartKind::Battery),
            Part::new("l", PartKind::Led),
        ];
        let graph = CircuitGraph::build(&parts, &[wire("b", "P", "l", "P")]);
        assert_eq!(graph.neighbors(&node("b", "P")), &[node("l", "P")]);
        assert_eq!(graph.neighbors(&node("l", "P")), &[node("b", "P")]);
    }

    #[test]
    fn test_invalid_connections_are_skipped() {
        let parts = vec![
            Part::new("b", PartKind::Battery),
            Part::new("g", PartKind::Ground),
        ];
        let conns = vec![
            wire("b", "P", "gone", "N"),
            wire("b", "X", "g", "GND"),
            wire("g", "P", "b", "N"),
            wire("b", "N", "g", "GND"),
        ];
        let graph = CircuitGraph::build(&parts, &conns);
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.skipped_connections(), 3);
        assert_eq!(graph.neighbors(&node("g", "GND")), &[node("b", "N")]);
    }

    #[test]
    fn test_duplicates_and_self_loops() {
        let parts = vec![Part::new("r", PartKind::Resistor)];
        let conns = vec![
            wire("r", "N", "r", "P"),
            wire("r", "P", "r", "N"),
            wire("r", "P", "r", "P"),
        ];
        let graph = CircuitGraph::build(&parts, &conns);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.neighbors(&node("r", "N")).len(), 2);
        assert_eq!(graph.neighbors(&node("r", "P")).len(), 4);
    }

    #[test]
    fn test_duplicate_id_keeps_first_kind() {
        let parts = vec![
            Part::new("1", PartKind::Battery),
            Part::new("l", PartKind::Led),
            Part::new("1", PartKind::Ground),
        ];
        let conns = vec![wire("1", "P", "l", "P"), wire("l", "N", "1", "GND")];
        let graph = CircuitGraph::build(&parts, &conns);
        assert_eq!(graph.kind_of(&PartId::from("1")), Some(&PartKind::Battery));
        assert!(graph.contains(&node("1", "N")));
        assert!(!graph.contains(&node("1", "GND")));
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.skipped_connections(), 1);
        let siblings: Vec<NodeId> = graph.part_siblings(&node("1", "P")).collect();
        assert_eq!(siblings, vec![node("1", "N")]);
    }

    #[test]
    fn test_unknown_node_has_no_neighbors() {
        let graph = CircuitGraph::build(&[], &[]);
        assert!(graph.is_empty());
        assert!(graph.neighbors(&node("x", "P")).is_empty());
    }
}
