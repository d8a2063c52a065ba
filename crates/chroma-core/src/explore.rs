use crate::graph::{Adjacency, NodeId};
use crate::knowledge::KnowledgeBase;
use crate::observation::Observation;
use crate::solver::domains;
use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

/// Per-turn movement policy. In priority order: stay to color the current
/// node, jump to the most constrained visible uncolored node, step toward the
/// most constrained known uncolored node, explore an unvisited visible node,
/// or stay put.
#[derive(Debug, Default)]
pub struct ExplorationPlanner;

impl ExplorationPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Pick the move target for this turn. Always returns a node that is
    /// visible in `observation` or equal to the current position.
    pub fn next_move(&self, kb: &KnowledgeBase, observation: &Observation) -> NodeId {
        let position = &observation.position;

        // Uncolored ground underfoot: stay and color it this turn.
        if !kb.is_assigned(position) {
            return position.clone();
        }

        let visible_unassigned: Vec<NodeId> = observation
            .visible_nodes
            .iter()
            .filter(|n| !kb.is_assigned(n))
            .cloned()
            .collect();
        if let Some(target) = most_constrained(kb, visible_unassigned) {
            return target;
        }

        // Nothing visible to color: head for the most constrained uncolored
        // node anywhere in the known graph.
        if let Some(goal) = most_constrained(kb, kb.unassigned_nodes()) {
            if let Some(path) = bfs_path(kb.adjacency(), position, &goal) {
                if path.len() > 1 && observation.is_visible(&path[1]) {
                    return path[1].clone();
                }
            }
        }

        // Expand knowledge: prefer somewhere we have never stood.
        let mut unvisited: Vec<NodeId> = observation
            .visible_nodes
            .iter()
            .filter(|n| *n != position && !kb.is_visited(n))
            .cloned()
            .collect();
        unvisited.sort();
        if let Some(target) = unvisited.into_iter().next() {
            return target;
        }

        position.clone()
    }
}

/// Shortest path over the known adjacency, breadth-first. Returns the node
/// sequence from `start` to `goal` inclusive, or `None` when the goal is
/// unreachable with current knowledge.
pub fn bfs_path(adjacency: &Adjacency, start: &NodeId, goal: &NodeId) -> Option<Vec<NodeId>> {
    if start == goal {
        return Some(vec![start.clone()]);
    }

    let mut queue: VecDeque<Vec<NodeId>> = VecDeque::from([vec![start.clone()]]);
    let mut seen: HashSet<NodeId> = HashSet::from([start.clone()]);

    while let Some(path) = queue.pop_front() {
        let last = path.last().expect("paths are never empty");
        for neighbor in adjacency.sorted_neighbors(last) {
            if !seen.insert(neighbor.clone()) {
                continue;
            }
            let mut next = path.clone();
            next.push(neighbor.clone());
            if neighbor == goal {
                return Some(next);
            }
            queue.push_back(next);
        }
    }

    None
}

/// Smallest live domain first, then highest degree, then name.
fn most_constrained(kb: &KnowledgeBase, mut candidates: Vec<NodeId>) -> Option<NodeId> {
    candidates.sort_by_key(|n| {
        (
            domains::legal_colors(kb.adjacency(), kb.assignment(), kb.palette(), n).len(),
            Reverse(kb.adjacency().degree(n)),
            n.clone(),
        )
    });
    candidates.into_iter().next()
}
