use crate::graph::{Adjacency, Color, Edge, NodeId};
use crate::observation::Observation;
use std::collections::{HashMap, HashSet};

/// Everything the agent has learned about the graph so far: discovered nodes
/// and edges, the colors it knows to hold, and which of those colors are
/// externally fixed.
///
/// Knowledge is append-only: nodes and edges are never removed. Merging the
/// same observation twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    nodes: HashSet<NodeId>,
    edges: HashSet<Edge>,
    adjacency: Adjacency,
    /// Known colors: environment-observed plus the agent's own decisions.
    assignment: HashMap<NodeId, Color>,
    /// Pre-colored by the environment; never altered by the planner.
    frozen: HashSet<NodeId>,
    /// Nodes the agent colored itself (distinguishes frozen marking).
    own_colored: HashSet<NodeId>,
    /// Nodes scheduled for recoloring by repair. Their old environment color
    /// is ignored on merge until the agent paints them again.
    stale: HashSet<NodeId>,
    /// Nodes the agent has physically occupied.
    visited: HashSet<NodeId>,
    palette: Vec<Color>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the knowledge base. Idempotent: re-merging
    /// identical data changes nothing.
    pub fn merge(&mut self, observation: &Observation) {
        self.palette = observation.palette.clone();
        self.visited.insert(observation.position.clone());

        for node in &observation.visible_nodes {
            self.nodes.insert(node.clone());
            self.adjacency.touch(node);
        }

        for edge in &observation.visible_edges {
            let (a, b) = edge.endpoints();
            // Edge endpoints one step past the radius become known here.
            self.nodes.insert(a.clone());
            self.nodes.insert(b.clone());
            if self.edges.insert(edge.clone()) {
                self.adjacency.insert_edge(edge);
            }
        }

        for (node, color) in &observation.visible_colors {
            let Some(color) = color else { continue };
            if self.stale.contains(node) {
                continue;
            }
            if !self.own_colored.contains(node) {
                self.frozen.insert(node.clone());
            }
            self.assignment
                .entry(node.clone())
                .or_insert_with(|| color.clone());
        }
    }

    /// Record a color the agent chose for `node` this turn.
    pub fn record_own(&mut self, node: &NodeId, color: &Color) {
        self.nodes.insert(node.clone());
        self.adjacency.touch(node);
        self.own_colored.insert(node.clone());
        self.stale.remove(node);
        self.assignment.insert(node.clone(), color.clone());
    }

    /// Schedule a repaired node for recoloring: its assignment entry is
    /// dropped and its old environment color will not be re-adopted on merge.
    pub fn mark_stale(&mut self, node: &NodeId) {
        if self.frozen.contains(node) {
            return;
        }
        self.assignment.remove(node);
        self.stale.insert(node.clone());
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn color_of(&self, node: &NodeId) -> Option<&Color> {
        self.assignment.get(node)
    }

    pub fn is_assigned(&self, node: &NodeId) -> bool {
        self.assignment.contains_key(node)
    }

    pub fn is_frozen(&self, node: &NodeId) -> bool {
        self.frozen.contains(node)
    }

    pub fn is_visited(&self, node: &NodeId) -> bool {
        self.visited.contains(node)
    }

    pub fn assignment(&self) -> &HashMap<NodeId, Color> {
        &self.assignment
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Known nodes with no current assignment, sorted for determinism.
    pub fn unassigned_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| !self.assignment.contains_key(*n))
            .cloned()
            .collect();
        nodes.sort();
        nodes
    }

    /// Assigned nodes the planner is allowed to clear, sorted for determinism.
    pub fn clearable_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .assignment
            .keys()
            .filter(|n| !self.frozen.contains(*n))
            .cloned()
            .collect();
        nodes.sort();
        nodes
    }
}
