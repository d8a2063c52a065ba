use crate::agent::Policy;
use crate::graph::{Adjacency, Color, Edge, NodeId};
use crate::level::Level;
use crate::observation::{Action, Observation};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

/// A rejected action. The session state is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// Move target is outside the current visible set
    MoveNotVisible { node: NodeId },
    /// Color action named a node other than the current position
    ColorWrongNode { node: NodeId, position: NodeId },
    /// Color is not in the level palette
    ColorNotInPalette { color: Color },
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveNotVisible { node } => {
                write!(f, "cannot move to '{}': not currently visible", node)
            }
            Self::ColorWrongNode { node, position } => {
                write!(f, "can only color the current node '{}', not '{}'", position, node)
            }
            Self::ColorNotInPalette { color } => {
                write!(f, "color '{}' is not in the palette", color)
            }
        }
    }
}

impl std::error::Error for TurnError {}

/// Final account of a game: who ended up which color, the move trace, and the
/// score after reassignment penalties.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub colors: BTreeMap<NodeId, Option<Color>>,
    pub moves: Vec<NodeId>,
    pub reassignments: u32,
    pub score: u32,
    pub solved: bool,
    pub disqualified: Option<String>,
}

/// The referee. Owns the true graph and coloring, computes what the agent may
/// see, validates actions, and keeps score.
///
/// Enforces the move-then-color turn cycle: each turn the agent is asked for
/// a move, then forced to produce a color for wherever it landed.
#[derive(Debug, Clone)]
pub struct GameSession {
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
    adjacency: Adjacency,
    palette: Vec<Color>,
    visibility_radius: usize,
    colors: HashMap<NodeId, Color>,
    position: NodeId,
    moves: Vec<NodeId>,
    reassignments: u32,
}

impl GameSession {
    pub fn new(level: &Level) -> Self {
        let mut adjacency = Adjacency::new();
        let mut edges = Vec::new();
        for node in &level.graph.nodes {
            adjacency.touch(node);
        }
        for (a, b) in &level.graph.edges {
            let edge = Edge::new(a.clone(), b.clone());
            if !edges.contains(&edge) {
                adjacency.insert_edge(&edge);
                edges.push(edge);
            }
        }

        Self {
            nodes: level.graph.nodes.clone(),
            edges,
            adjacency,
            palette: level.colors.clone(),
            visibility_radius: level.visibility_radius,
            colors: level.pre_colored.clone(),
            position: level.start_node.clone(),
            moves: vec![level.start_node.clone()],
            reassignments: 0,
        }
    }

    pub fn position(&self) -> &NodeId {
        &self.position
    }

    pub fn reassignments(&self) -> u32 {
        self.reassignments
    }

    /// Turns allowed before the game is called off.
    pub fn max_turns(&self) -> usize {
        self.nodes.len() * 10
    }

    /// What the agent sees from its current position: every node within the
    /// visibility radius, every edge incident to one of those nodes (whose
    /// far endpoint may lie just past the radius), and the colors of the
    /// visible nodes.
    pub fn observe(&self) -> Observation {
        let mut visible_nodes: BTreeSet<NodeId> = BTreeSet::new();
        let mut visible_edges: BTreeSet<Edge> = BTreeSet::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<(NodeId, usize)> =
            VecDeque::from([(self.position.clone(), 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            if depth > self.visibility_radius || !visited.insert(node.clone()) {
                continue;
            }
            visible_nodes.insert(node.clone());
            for neighbor in self.adjacency.sorted_neighbors(&node) {
                visible_edges.insert(Edge::new(node.clone(), neighbor.clone()));
                queue.push_back((neighbor.clone(), depth + 1));
            }
        }

        let visible_colors = visible_nodes
            .iter()
            .map(|n| (n.clone(), self.colors.get(n).cloned()))
            .collect();

        Observation {
            position: self.position.clone(),
            palette: self.palette.clone(),
            visible_nodes: visible_nodes.into_iter().collect(),
            visible_edges: visible_edges.into_iter().collect(),
            visible_colors,
        }
    }

    /// Validate and apply one action. Rejected actions leave the session
    /// untouched.
    pub fn apply(&mut self, action: &Action) -> Result<(), TurnError> {
        match action {
            Action::Move { node } => {
                let observation = self.observe();
                if !observation.is_visible(node) {
                    return Err(TurnError::MoveNotVisible { node: node.clone() });
                }
                self.position = node.clone();
                self.moves.push(node.clone());
                Ok(())
            }
            Action::Color { node, color } => {
                if node != &self.position {
                    return Err(TurnError::ColorWrongNode {
                        node: node.clone(),
                        position: self.position.clone(),
                    });
                }
                if !self.palette.contains(color) {
                    return Err(TurnError::ColorNotInPalette { color: color.clone() });
                }
                if let Some(previous) = self.colors.get(node) {
                    if previous != color {
                        self.reassignments += 1;
                    }
                }
                self.colors.insert(node.clone(), color.clone());
                Ok(())
            }
        }
    }

    /// Every node colored and no edge monochromatic.
    pub fn is_solved(&self) -> bool {
        self.nodes.iter().all(|n| self.colors.contains_key(n))
            && self.edges.iter().all(|edge| {
                let (a, b) = edge.endpoints();
                self.colors.get(a) != self.colors.get(b)
            })
    }

    /// 100 for a solved graph, minus one per reassignment, floored at zero.
    /// An unsolved graph scores nothing.
    pub fn score(&self) -> u32 {
        if self.is_solved() {
            100u32.saturating_sub(self.reassignments)
        } else {
            0
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            colors: self
                .nodes
                .iter()
                .map(|n| (n.clone(), self.colors.get(n).cloned()))
                .collect(),
            moves: self.moves.clone(),
            reassignments: self.reassignments,
            score: self.score(),
            solved: self.is_solved(),
            disqualified: None,
        }
    }

    /// Drive a policy through the full move-then-color loop until the graph
    /// is solved or the turn budget runs out. An invalid action disqualifies
    /// the policy with a zero score.
    pub fn run(&mut self, policy: &mut dyn Policy) -> Summary {
        for _ in 0..self.max_turns() {
            let observation = self.observe();
            let action = policy.decide_move(&observation);
            if let Err(error) = self.apply(&action) {
                return self.disqualified(error);
            }

            let observation = self.observe();
            let position = self.position.clone();
            let action = policy.decide_color(&position, &observation);
            if let Err(error) = self.apply(&action) {
                return self.disqualified(error);
            }

            if self.is_solved() {
                break;
            }
        }
        self.summary()
    }

    fn disqualified(&self, error: TurnError) -> Summary {
        Summary {
            score: 0,
            solved: false,
            disqualified: Some(error.to_string()),
            ..self.summary()
        }
    }
}
