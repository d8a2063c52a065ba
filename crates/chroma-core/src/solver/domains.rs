use crate::graph::{Adjacency, Color, NodeId};
use std::collections::{BTreeSet, HashMap};

/// Legal colors for `node` under `assignment`: the palette minus the colors
/// of already-assigned neighbors.
///
/// Always derived from the live assignment, so callers never see a domain
/// that lags behind a decision made earlier in the same call.
pub fn legal_colors(
    adjacency: &Adjacency,
    assignment: &HashMap<NodeId, Color>,
    palette: &[Color],
    node: &NodeId,
) -> BTreeSet<Color> {
    let forbidden: BTreeSet<&Color> = adjacency
        .neighbors(node)
        .filter_map(|n| assignment.get(n))
        .collect();
    palette
        .iter()
        .filter(|c| !forbidden.contains(c))
        .cloned()
        .collect()
}

/// Initial domain table for a set of unassigned variables.
pub fn initial_domains(
    adjacency: &Adjacency,
    assignment: &HashMap<NodeId, Color>,
    palette: &[Color],
    unassigned: &[NodeId],
) -> HashMap<NodeId, BTreeSet<Color>> {
    unassigned
        .iter()
        .map(|node| {
            (
                node.clone(),
                legal_colors(adjacency, assignment, palette, node),
            )
        })
        .collect()
}
