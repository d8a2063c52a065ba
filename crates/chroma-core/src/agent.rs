use crate::explore::ExplorationPlanner;
use crate::graph::{Color, NodeId};
use crate::knowledge::KnowledgeBase;
use crate::observation::{Action, Observation};
use crate::solver::{domains, heuristics, PlanOutcome, Planner, PlannerConfig};
use serde::Serialize;
use std::collections::BTreeSet;

/// Counters for how the agent's decisions were reached. `forced_conflicts`
/// is how a caller sees that a color decision knowingly violated a
/// constraint (the environment scores the damage).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AgentStats {
    /// Successful planning calls.
    pub plans: u32,
    /// Plans that needed the repair step.
    pub repairs: u32,
    /// Planning calls that exhausted every attempt.
    pub planning_failures: u32,
    /// Color decisions with no legal color left.
    pub forced_conflicts: u32,
}

/// A turn-based player: asked for a move, then for a color, every turn.
pub trait Policy {
    fn decide_move(&mut self, observation: &Observation) -> Action;
    fn decide_color(&mut self, node: &NodeId, observation: &Observation) -> Action;
}

/// The planning agent. Owns all per-game state; one instance drives exactly
/// one game.
///
/// Each turn the environment asks for a move, applies it, then asks for a
/// color for the new position. Both calls merge the observation first, so
/// knowledge never lags the decision being made.
#[derive(Debug, Default)]
pub struct Agent {
    kb: KnowledgeBase,
    planner: Planner,
    explorer: ExplorationPlanner,
    stats: AgentStats,
}

impl Agent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            planner: Planner::with_config(config),
            ..Self::default()
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn stats(&self) -> AgentStats {
        self.stats
    }

    /// Choose where to move this turn. The target is always visible in
    /// `observation` or equal to the current position.
    pub fn decide_move(&mut self, observation: &Observation) -> Action {
        self.kb.merge(observation);
        let node = self.explorer.next_move(&self.kb, observation);
        Action::Move { node }
    }

    /// Choose a color for `node`, the post-move position. Never fails: frozen
    /// nodes return their fixed color, planning failure falls back to a local
    /// choice, and a dead end returns a conflicting palette color rather than
    /// an error.
    pub fn decide_color(&mut self, node: &NodeId, observation: &Observation) -> Action {
        self.kb.merge(observation);

        if self.kb.is_frozen(node) {
            let color = self
                .kb
                .color_of(node)
                .expect("frozen nodes always carry a color")
                .clone();
            return Action::Color {
                node: node.clone(),
                color,
            };
        }

        let color = match self.planner.plan(&self.kb) {
            PlanOutcome::Complete { assignment, cleared } => {
                self.stats.plans += 1;
                if !cleared.is_empty() {
                    self.stats.repairs += 1;
                }
                for stale in &cleared {
                    if stale != node {
                        self.kb.mark_stale(stale);
                    }
                }
                assignment
                    .get(node)
                    .expect("a complete plan covers every known node")
                    .clone()
            }
            PlanOutcome::Failed => {
                self.stats.planning_failures += 1;
                self.local_fallback(node, observation)
            }
        };

        self.kb.record_own(node, &color);
        Action::Color {
            node: node.clone(),
            color,
        }
    }

    /// Single-node fallback when global planning fails: prefer a
    /// forward-check-valid color, then any legal color, least constraining
    /// first; with nothing legal, take the first palette color and let the
    /// environment score the conflict.
    fn local_fallback(&mut self, node: &NodeId, observation: &Observation) -> Color {
        let adjacency = self.kb.adjacency();
        let assignment = self.kb.assignment();
        let palette = self.kb.palette();

        let legal = domains::legal_colors(adjacency, assignment, palette, node);
        let survives_forward_check = |color: &Color| {
            adjacency
                .neighbors(node)
                .filter(|n| *n != node && !assignment.contains_key(*n))
                .all(|n| {
                    let mut neighbor = domains::legal_colors(adjacency, assignment, palette, n);
                    neighbor.remove(color);
                    !neighbor.is_empty()
                })
        };

        let valid: BTreeSet<Color> = legal
            .iter()
            .filter(|c| survives_forward_check(*c))
            .cloned()
            .collect();
        let pool = if valid.is_empty() { legal } else { valid };

        if let Some(color) =
            heuristics::order_values(node, &pool, adjacency, assignment, palette).first()
        {
            return color.clone();
        }

        self.stats.forced_conflicts += 1;
        observation
            .palette
            .first()
            .expect("the environment supplies a non-empty palette")
            .clone()
    }
}

impl Policy for Agent {
    fn decide_move(&mut self, observation: &Observation) -> Action {
        Agent::decide_move(self, observation)
    }

    fn decide_color(&mut self, node: &NodeId, observation: &Observation) -> Action {
        Agent::decide_color(self, node, observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use std::collections::HashMap;

    fn observation(
        position: &str,
        palette: &[&str],
        nodes: &[&str],
        edges: &[(&str, &str)],
        colors: &[(&str, &str)],
    ) -> Observation {
        let mut visible_colors: HashMap<NodeId, Option<Color>> =
            nodes.iter().map(|n| (NodeId::from(*n), None)).collect();
        for (node, color) in colors {
            visible_colors.insert(NodeId::from(*node), Some(Color::from(*color)));
        }
        Observation {
            position: NodeId::from(position),
            palette: palette.iter().map(|c| Color::from(*c)).collect(),
            visible_nodes: nodes.iter().map(|n| NodeId::from(*n)).collect(),
            visible_edges: edges
                .iter()
                .map(|(a, b)| Edge::new(NodeId::from(*a), NodeId::from(*b)))
                .collect(),
            visible_colors,
        }
    }

    #[test]
    fn test_frozen_node_bypasses_planning() {
        let obs = observation(
            "D",
            &["Red", "Green", "Blue"],
            &["D", "E"],
            &[("D", "E")],
            &[("D", "Green")],
        );
        let mut agent = Agent::new();

        for _ in 0..3 {
            let action = agent.decide_color(&NodeId::from("D"), &obs);
            assert_eq!(
                action,
                Action::Color {
                    node: NodeId::from("D"),
                    color: Color::from("Green"),
                }
            );
        }
        assert_eq!(agent.stats().plans, 0);
    }

    #[test]
    fn test_color_comes_from_palette() {
        let obs = observation(
            "A",
            &["Red", "Green", "Blue"],
            &["A", "B", "C"],
            &[("A", "B"), ("B", "C"), ("A", "C")],
            &[],
        );
        let mut agent = Agent::new();

        let action = agent.decide_color(&NodeId::from("A"), &obs);
        match action {
            Action::Color { node, color } => {
                assert_eq!(node, NodeId::from("A"));
                assert!(obs.palette.contains(&color));
            }
            other => panic!("expected a color action, got {other:?}"),
        }
    }

    #[test]
    fn test_move_target_is_visible_or_current() {
        let obs = observation(
            "A",
            &["Red", "Green"],
            &["A", "B"],
            &[("A", "B"), ("B", "C")],
            &[("A", "Red")],
        );
        let mut agent = Agent::new();
        agent.kb.record_own(&NodeId::from("A"), &Color::from("Red"));

        let action = agent.decide_move(&obs);
        match action {
            Action::Move { node } => {
                assert!(obs.is_visible(&node) || node == obs.position);
            }
            other => panic!("expected a move action, got {other:?}"),
        }
    }

    #[test]
    fn test_dead_end_surfaces_forced_conflict() {
        // Two frozen neighbors hold both palette colors; A has no legal
        // color and the planner has nothing to clear.
        let obs = observation(
            "A",
            &["Red", "Green"],
            &["A", "B", "C"],
            &[("A", "B"), ("A", "C"), ("B", "C")],
            &[("B", "Red"), ("C", "Green")],
        );
        let mut agent = Agent::new();

        let action = agent.decide_color(&NodeId::from("A"), &obs);
        assert_eq!(
            action,
            Action::Color {
                node: NodeId::from("A"),
                color: Color::from("Red"),
            }
        );
        assert_eq!(agent.stats().planning_failures, 1);
        assert_eq!(agent.stats().forced_conflicts, 1);
    }

    #[test]
    fn test_planning_failure_still_picks_legal_color() {
        // The planner cannot finish the whole graph (B-C is a dead pair with
        // frozen D), but A itself still has a legal color and must get one.
        let obs = observation(
            "A",
            &["Red", "Green"],
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("B", "D"), ("C", "D")],
            &[("D", "Red")],
        );
        let mut agent = Agent::new();

        let action = agent.decide_color(&NodeId::from("A"), &obs);
        match action {
            Action::Color { color, .. } => {
                assert_eq!(agent.stats().planning_failures, 1);
                assert_eq!(agent.stats().forced_conflicts, 0);
                assert_eq!(color, Color::from("Red"));
            }
            other => panic!("expected a color action, got {other:?}"),
        }
    }

    #[test]
    fn test_successful_plan_counts_once() {
        let obs = observation(
            "A",
            &["Red", "Green", "Blue"],
            &["A", "B"],
            &[("A", "B")],
            &[],
        );
        let mut agent = Agent::new();
        agent.decide_color(&NodeId::from("A"), &obs);

        assert_eq!(agent.stats().plans, 1);
        assert_eq!(agent.stats().repairs, 0);
    }
}
