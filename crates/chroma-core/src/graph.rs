use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Opaque node identifier, as declared in the level file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Color identifier from the level palette.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(color: impl Into<String>) -> Self {
        Self(color.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Color {
    fn from(color: &str) -> Self {
        Self(color.to_string())
    }
}

/// Unordered node pair. The constructor sorts the endpoints so the same edge
/// observed in either direction collapses to one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge(NodeId, NodeId);

impl Edge {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        (&self.0, &self.1)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Symmetric adjacency map. Inserting an edge records both directions, so a
/// node's neighbor set always mirrors its neighbors' sets.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    map: HashMap<NodeId, HashSet<NodeId>>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `node` has an entry even if no edge mentions it yet.
    pub fn touch(&mut self, node: &NodeId) {
        self.map.entry(node.clone()).or_default();
    }

    pub fn insert_edge(&mut self, edge: &Edge) {
        let (a, b) = edge.endpoints();
        self.map.entry(a.clone()).or_default().insert(b.clone());
        self.map.entry(b.clone()).or_default().insert(a.clone());
    }

    pub fn neighbors(&self, node: &NodeId) -> impl Iterator<Item = &NodeId> + '_ {
        self.map.get(node).into_iter().flatten()
    }

    /// Neighbors in lexicographic order, for deterministic traversal.
    pub fn sorted_neighbors(&self, node: &NodeId) -> Vec<&NodeId> {
        let mut neighbors: Vec<&NodeId> = self.neighbors(node).collect();
        neighbors.sort();
        neighbors
    }

    pub fn degree(&self, node: &NodeId) -> usize {
        self.map.get(node).map_or(0, |set| set.len())
    }

    pub fn are_adjacent(&self, a: &NodeId, b: &NodeId) -> bool {
        self.map.get(a).is_some_and(|set| set.contains(b))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.map.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_canonical_order() {
        let ab = Edge::new(NodeId::from("B"), NodeId::from("A"));
        let ba = Edge::new(NodeId::from("A"), NodeId::from("B"));
        assert_eq!(ab, ba);

        let (first, second) = ab.endpoints();
        assert_eq!(first.as_str(), "A");
        assert_eq!(second.as_str(), "B");
    }

    #[test]
    fn test_adjacency_symmetric() {
        let mut adj = Adjacency::new();
        adj.insert_edge(&Edge::new(NodeId::from("A"), NodeId::from("B")));

        assert!(adj.are_adjacent(&NodeId::from("A"), &NodeId::from("B")));
        assert!(adj.are_adjacent(&NodeId::from("B"), &NodeId::from("A")));
        assert_eq!(adj.degree(&NodeId::from("A")), 1);
        assert_eq!(adj.degree(&NodeId::from("B")), 1);
    }

    #[test]
    fn test_adjacency_dedupes_reversed_edges() {
        let mut adj = Adjacency::new();
        adj.insert_edge(&Edge::new(NodeId::from("A"), NodeId::from("B")));
        adj.insert_edge(&Edge::new(NodeId::from("B"), NodeId::from("A")));

        assert_eq!(adj.degree(&NodeId::from("A")), 1);
    }

    #[test]
    fn test_touch_creates_isolated_node() {
        let mut adj = Adjacency::new();
        adj.touch(&NodeId::from("X"));

        assert_eq!(adj.degree(&NodeId::from("X")), 0);
        assert_eq!(adj.nodes().count(), 1);
    }
}
