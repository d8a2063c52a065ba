use crate::graph::{Adjacency, Color, NodeId};
use crate::solver::domains;
use std::collections::{BTreeSet, HashMap};

/// MRV variable ordering: smallest domain first, ties broken by the most
/// unassigned neighbors, then lexicographically so runs are reproducible.
pub fn select_variable<'a>(
    unassigned: &'a [NodeId],
    domains: &HashMap<NodeId, BTreeSet<Color>>,
    adjacency: &Adjacency,
    assignment: &HashMap<NodeId, Color>,
) -> Option<&'a NodeId> {
    unassigned.iter().min_by(|a, b| {
        let a_size = domains.get(*a).map_or(usize::MAX, |d| d.len());
        let b_size = domains.get(*b).map_or(usize::MAX, |d| d.len());
        let a_degree = unassigned_degree(adjacency, assignment, a);
        let b_degree = unassigned_degree(adjacency, assignment, b);
        a_size
            .cmp(&b_size)
            .then(b_degree.cmp(&a_degree))
            .then(a.cmp(b))
    })
}

/// LCV value ordering: for each candidate color, sum the sizes neighbors'
/// domains would keep if the color were taken; try the largest sum first.
/// Candidates start in palette order, and the sort is stable, so equal scores
/// keep that order.
pub fn order_values(
    node: &NodeId,
    domain: &BTreeSet<Color>,
    adjacency: &Adjacency,
    assignment: &HashMap<NodeId, Color>,
    palette: &[Color],
) -> Vec<Color> {
    let mut candidates: Vec<Color> = palette
        .iter()
        .filter(|c| domain.contains(*c))
        .cloned()
        .collect();
    candidates.sort_by_key(|color| {
        std::cmp::Reverse(preserved_options(node, color, adjacency, assignment, palette))
    });
    candidates
}

/// How many color options the unassigned neighbors of `node` keep after a
/// hypothetical assignment of `color`.
pub fn preserved_options(
    node: &NodeId,
    color: &Color,
    adjacency: &Adjacency,
    assignment: &HashMap<NodeId, Color>,
    palette: &[Color],
) -> usize {
    adjacency
        .neighbors(node)
        .filter(|n| !assignment.contains_key(*n))
        .map(|n| {
            let mut neighbor_domain = domains::legal_colors(adjacency, assignment, palette, n);
            neighbor_domain.remove(color);
            neighbor_domain.len()
        })
        .sum()
}

fn unassigned_degree(
    adjacency: &Adjacency,
    assignment: &HashMap<NodeId, Color>,
    node: &NodeId,
) -> usize {
    adjacency
        .neighbors(node)
        .filter(|n| !assignment.contains_key(*n))
        .count()
}
