use crate::graph::{Adjacency, Color, NodeId};
use crate::solver::domains;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Result of arc-consistency propagation. On wipeout the domain table is the
/// partial pruning reached so far, which repair uses to pick a culprit.
#[derive(Debug, Clone)]
pub struct Propagation {
    pub domains: HashMap<NodeId, BTreeSet<Color>>,
    /// First variable whose domain emptied, if any.
    pub wiped_out: Option<NodeId>,
}

impl Propagation {
    pub fn is_consistent(&self) -> bool {
        self.wiped_out.is_none()
    }
}

/// Enforce arc consistency over the unassigned variables.
///
/// Specialized to the binary inequality constraint: for an arc (X, Y), a
/// value x loses support only when Y's domain has collapsed to the singleton
/// {x}. A generic AC-3 revise would be wasted work here.
pub fn enforce(
    adjacency: &Adjacency,
    assignment: &HashMap<NodeId, Color>,
    palette: &[Color],
    unassigned: &[NodeId],
) -> Propagation {
    let mut domains = domains::initial_domains(adjacency, assignment, palette, unassigned);
    let pending: HashSet<&NodeId> = unassigned.iter().collect();

    // Seed the worklist with every ordered pair of unassigned neighbors.
    let mut worklist: VecDeque<(NodeId, NodeId)> = VecDeque::new();
    for x in unassigned {
        for y in adjacency.sorted_neighbors(x) {
            if pending.contains(y) {
                worklist.push_back((x.clone(), y.clone()));
            }
        }
    }

    for node in unassigned {
        if domains[node].is_empty() {
            return Propagation {
                domains,
                wiped_out: Some(node.clone()),
            };
        }
    }

    while let Some((x, y)) = worklist.pop_front() {
        let singleton = match domains.get(&y) {
            Some(domain) if domain.len() == 1 => domain.iter().next().cloned(),
            _ => None,
        };
        let Some(value) = singleton else { continue };

        let x_domain = domains.get_mut(&x).expect("arc endpoints are unassigned");
        if !x_domain.remove(&value) {
            continue;
        }

        if x_domain.is_empty() {
            return Propagation {
                domains,
                wiped_out: Some(x),
            };
        }

        // X shrank: every other unassigned neighbor must re-check its arc to X.
        for z in adjacency.sorted_neighbors(&x) {
            if z != &y && pending.contains(z) {
                worklist.push_back((z.clone(), x.clone()));
            }
        }
    }

    Propagation {
        domains,
        wiped_out: None,
    }
}
