use crate::graph::{Color, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Result type for level loading.
pub type LevelResult<T> = Result<T, LevelError>;

/// Errors that can occur while loading or validating a level.
#[derive(Debug)]
pub enum LevelError {
    /// Reading the level file failed
    Io(String),
    /// The file is not valid level JSON
    Parse(String),
    /// The level contradicts itself
    Invalid(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Invalid(e) => write!(f, "Invalid level: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

/// The declared graph of a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGraph {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<(NodeId, NodeId)>,
}

/// A playable level: the graph, the palette, how far the agent can see, where
/// it starts, and any externally fixed colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub graph: LevelGraph,
    pub colors: Vec<Color>,
    pub visibility_radius: usize,
    pub start_node: NodeId,
    #[serde(default)]
    pub pre_colored: HashMap<NodeId, Color>,
}

impl Level {
    pub fn from_path(path: impl AsRef<Path>) -> LevelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LevelError::Io(e.to_string()))?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> LevelResult<Self> {
        let level: Level =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("levels always serialize")
    }

    fn validate(&self) -> LevelResult<()> {
        if self.graph.nodes.is_empty() {
            return Err(LevelError::Invalid("level has no nodes".into()));
        }
        if self.colors.is_empty() {
            return Err(LevelError::Invalid("level has no colors".into()));
        }
        if !self.graph.nodes.contains(&self.start_node) {
            return Err(LevelError::Invalid(format!(
                "start node '{}' is not in the graph",
                self.start_node
            )));
        }
        for (a, b) in &self.graph.edges {
            if a == b {
                return Err(LevelError::Invalid(format!("self-loop on '{}'", a)));
            }
            for endpoint in [a, b] {
                if !self.graph.nodes.contains(endpoint) {
                    return Err(LevelError::Invalid(format!(
                        "edge endpoint '{}' is not a declared node",
                        endpoint
                    )));
                }
            }
        }
        for (node, color) in &self.pre_colored {
            if !self.graph.nodes.contains(node) {
                return Err(LevelError::Invalid(format!(
                    "pre-colored node '{}' is not in the graph",
                    node
                )));
            }
            if !self.colors.contains(color) {
                return Err(LevelError::Invalid(format!(
                    "pre-colored '{}' uses '{}', which is not in the palette",
                    node, color
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_CYCLE: &str = r#"{
        "graph": {
            "nodes": ["A", "B", "C", "D", "E"],
            "edges": [["A","B"], ["B","C"], ["C","D"], ["D","E"], ["E","A"], ["A","C"]]
        },
        "colors": ["Red", "Green", "Blue"],
        "visibility_radius": 1,
        "start_node": "A"
    }"#;

    #[test]
    fn test_parse_level() {
        let level = Level::from_json(FIVE_CYCLE).unwrap();
        assert_eq!(level.graph.nodes.len(), 5);
        assert_eq!(level.graph.edges.len(), 6);
        assert_eq!(level.colors.len(), 3);
        assert_eq!(level.start_node, NodeId::from("A"));
        assert!(level.pre_colored.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let level = Level::from_json(FIVE_CYCLE).unwrap();
        let again = Level::from_json(&level.to_json()).unwrap();
        assert_eq!(again.graph.nodes, level.graph.nodes);
        assert_eq!(again.visibility_radius, level.visibility_radius);
    }

    #[test]
    fn test_unknown_start_node_rejected() {
        let json = FIVE_CYCLE.replace(r#""start_node": "A""#, r#""start_node": "Z""#);
        let err = Level::from_json(&json).unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));
    }

    #[test]
    fn test_stray_edge_endpoint_rejected() {
        let json = FIVE_CYCLE.replace(r#"["A","C"]"#, r#"["A","Q"]"#);
        let err = Level::from_json(&json).unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));
    }

    #[test]
    fn test_pre_colored_must_use_palette() {
        let json = FIVE_CYCLE.replace(
            r#""start_node": "A""#,
            r#""start_node": "A", "pre_colored": {"D": "Mauve"}"#,
        );
        let err = Level::from_json(&json).unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = Level::from_json("not json").unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }
}
