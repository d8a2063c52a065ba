use crate::graph::{Adjacency, Color, NodeId};
use crate::solver::{domains, heuristics};
use std::collections::{BTreeSet, HashMap};

/// Depth-first search for a complete, consistent extension of `assignment`
/// over the `unassigned` variables. Returns the completed assignment, or
/// `None` when every branch exhausts.
///
/// Worst-case exponential; MRV/LCV ordering and forward checking keep it
/// tractable at the graph sizes the game plays on.
pub fn solve(
    adjacency: &Adjacency,
    palette: &[Color],
    assignment: &HashMap<NodeId, Color>,
    unassigned: &[NodeId],
) -> Option<HashMap<NodeId, Color>> {
    let mut working = assignment.clone();
    let mut remaining: Vec<NodeId> = unassigned.to_vec();
    if extend(adjacency, palette, &mut working, &mut remaining) {
        Some(working)
    } else {
        None
    }
}

fn extend(
    adjacency: &Adjacency,
    palette: &[Color],
    working: &mut HashMap<NodeId, Color>,
    remaining: &mut Vec<NodeId>,
) -> bool {
    if remaining.is_empty() {
        return true;
    }

    let live: HashMap<NodeId, BTreeSet<Color>> = remaining
        .iter()
        .map(|n| {
            (
                n.clone(),
                domains::legal_colors(adjacency, working, palette, n),
            )
        })
        .collect();

    let var = match heuristics::select_variable(remaining, &live, adjacency, working) {
        Some(var) => var.clone(),
        None => return false,
    };
    let domain = &live[&var];
    if domain.is_empty() {
        return false;
    }

    let index = remaining
        .iter()
        .position(|n| n == &var)
        .expect("selected variable comes from the remaining set");
    remaining.remove(index);

    for color in heuristics::order_values(&var, domain, adjacency, working, palette) {
        working.insert(var.clone(), color);
        if forward_check(adjacency, palette, working, &var)
            && extend(adjacency, palette, working, remaining)
        {
            return true;
        }
        working.remove(&var);
    }

    remaining.insert(index, var);
    false
}

/// Recompute each unassigned neighbor's legal set under the trial assignment;
/// reject as soon as one empties.
fn forward_check(
    adjacency: &Adjacency,
    palette: &[Color],
    working: &HashMap<NodeId, Color>,
    var: &NodeId,
) -> bool {
    adjacency
        .neighbors(var)
        .filter(|n| !working.contains_key(*n))
        .all(|n| !domains::legal_colors(adjacency, working, palette, n).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn palette(colors: &[&str]) -> Vec<Color> {
        colors.iter().map(|c| Color::from(*c)).collect()
    }

    fn adjacency(edges: &[(&str, &str)]) -> Adjacency {
        let mut adj = Adjacency::new();
        for (a, b) in edges {
            adj.insert_edge(&Edge::new(NodeId::from(*a), NodeId::from(*b)));
        }
        adj
    }

    fn is_proper(adjacency: &Adjacency, assignment: &HashMap<NodeId, Color>) -> bool {
        assignment.iter().all(|(node, color)| {
            adjacency
                .neighbors(node)
                .all(|n| assignment.get(n) != Some(color))
        })
    }

    #[test]
    fn test_colors_five_cycle_with_chord() {
        let adj = adjacency(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("D", "E"),
            ("E", "A"),
            ("A", "C"),
        ]);
        let unassigned: Vec<NodeId> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| NodeId::from(*n))
            .collect();

        let solution = solve(
            &adj,
            &palette(&["Red", "Green", "Blue"]),
            &HashMap::new(),
            &unassigned,
        )
        .unwrap();

        assert_eq!(solution.len(), 5);
        assert!(is_proper(&adj, &solution));
    }

    #[test]
    fn test_odd_cycle_two_colors_exhausts() {
        let adj = adjacency(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let unassigned: Vec<NodeId> = ["A", "B", "C"].iter().map(|n| NodeId::from(*n)).collect();

        let solution = solve(&adj, &palette(&["Red", "Green"]), &HashMap::new(), &unassigned);
        assert!(solution.is_none());
    }

    #[test]
    fn test_preserves_existing_assignment() {
        let adj = adjacency(&[("A", "B"), ("B", "C")]);
        let assignment = HashMap::from([(NodeId::from("B"), Color::from("Green"))]);
        let unassigned = vec![NodeId::from("A"), NodeId::from("C")];

        let solution = solve(
            &adj,
            &palette(&["Red", "Green"]),
            &assignment,
            &unassigned,
        )
        .unwrap();

        assert_eq!(solution[&NodeId::from("B")], Color::from("Green"));
        assert_ne!(solution[&NodeId::from("A")], Color::from("Green"));
        assert_ne!(solution[&NodeId::from("C")], Color::from("Green"));
    }

    #[test]
    fn test_complete_graph_needs_exactly_order_colors() {
        let adj = adjacency(&[
            ("A", "B"),
            ("A", "C"),
            ("A", "D"),
            ("B", "C"),
            ("B", "D"),
            ("C", "D"),
        ]);
        let unassigned: Vec<NodeId> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| NodeId::from(*n))
            .collect();

        assert!(solve(
            &adj,
            &palette(&["Red", "Green", "Blue"]),
            &HashMap::new(),
            &unassigned
        )
        .is_none());

        let solution = solve(
            &adj,
            &palette(&["Red", "Green", "Blue", "Yellow"]),
            &HashMap::new(),
            &unassigned,
        )
        .unwrap();
        assert!(is_proper(&adj, &solution));
    }
}
