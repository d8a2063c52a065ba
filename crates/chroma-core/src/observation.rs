use crate::graph::{Color, Edge, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the environment reveals for a single turn: the agent's position, the
/// ordered palette, and the subgraph within the visibility radius.
///
/// Transient: the agent merges it into its knowledge base and discards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Node the agent currently occupies.
    pub position: NodeId,
    /// Ordered palette for the level.
    pub palette: Vec<Color>,
    /// Nodes within the visibility radius.
    pub visible_nodes: Vec<NodeId>,
    /// Edges incident to any visible node. Endpoints may lie one step beyond
    /// the radius; that is how the frontier becomes known.
    pub visible_edges: Vec<Edge>,
    /// Color of each visible node, `None` while uncolored.
    pub visible_colors: HashMap<NodeId, Option<Color>>,
}

impl Observation {
    pub fn is_visible(&self, node: &NodeId) -> bool {
        self.visible_nodes.contains(node)
    }
}

/// A decision returned to the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Move to `node`, which must be visible this turn (or the current
    /// position, meaning stay).
    Move { node: NodeId },
    /// Paint `node`, always the post-move position, with `color`.
    Color { node: NodeId, color: Color },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        let action = Action::Move {
            node: NodeId::from("A"),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"action":"move","node":"A"}"#);

        let action = Action::Color {
            node: NodeId::from("B"),
            color: Color::from("Red"),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"action":"color","node":"B","color":"Red"}"#);
    }

    #[test]
    fn test_observation_round_trip() {
        let obs = Observation {
            position: NodeId::from("A"),
            palette: vec![Color::from("Red"), Color::from("Green")],
            visible_nodes: vec![NodeId::from("A"), NodeId::from("B")],
            visible_edges: vec![Edge::new(NodeId::from("A"), NodeId::from("B"))],
            visible_colors: HashMap::from([
                (NodeId::from("A"), None),
                (NodeId::from("B"), Some(Color::from("Red"))),
            ]),
        };

        let json = serde_json::to_string(&obs).unwrap();
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position, obs.position);
        assert_eq!(back.palette, obs.palette);
        assert!(back.is_visible(&NodeId::from("B")));
    }
}
