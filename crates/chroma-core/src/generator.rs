use crate::graph::{Adjacency, Color, Edge, NodeId};
use crate::level::{Level, LevelGraph};
use crate::solver::search;
use std::collections::HashMap;

/// Palette names, taken in order.
const COLOR_NAMES: [&str; 8] = [
    "Red", "Green", "Blue", "Yellow", "Purple", "Orange", "Cyan", "Magenta",
];

/// Configuration for level generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of nodes.
    pub nodes: usize,
    /// Edges added on top of the connecting spanning tree.
    pub extra_edges: usize,
    /// Palette size (capped at the available color names).
    pub palette_size: usize,
    /// Visibility radius written into the level.
    pub visibility_radius: usize,
    /// Number of nodes pre-colored from a known proper coloring.
    pub pre_colored: usize,
    /// Attempts before widening the palette.
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            nodes: 8,
            extra_edges: 4,
            palette_size: 3,
            visibility_radius: 1,
            pre_colored: 0,
            max_attempts: 50,
        }
    }
}

impl GeneratorConfig {
    pub fn small() -> Self {
        Self {
            nodes: 6,
            extra_edges: 2,
            ..Self::default()
        }
    }

    pub fn medium() -> Self {
        Self {
            nodes: 10,
            extra_edges: 6,
            pre_colored: 1,
            max_attempts: 100,
            ..Self::default()
        }
    }

    pub fn large() -> Self {
        Self {
            nodes: 16,
            extra_edges: 10,
            palette_size: 4,
            pre_colored: 2,
            max_attempts: 200,
            ..Self::default()
        }
    }
}

/// Random level generator. Builds a connected graph (spanning tree plus
/// extra edges) and keeps only candidates the search engine can actually
/// color with the configured palette.
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with custom configuration.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Generate a level that is properly colorable with its palette.
    pub fn generate(&mut self) -> Level {
        for _ in 0..self.config.max_attempts {
            let candidate = self.candidate();
            if let Some(solution) = proper_coloring(&candidate) {
                return self.finish(candidate, &solution);
            }
        }

        // Couldn't hit the target palette size: widen the palette until the
        // last candidate becomes colorable.
        let mut candidate = self.candidate();
        while proper_coloring(&candidate).is_none()
            && candidate.colors.len() < COLOR_NAMES.len()
        {
            candidate
                .colors
                .push(Color::from(COLOR_NAMES[candidate.colors.len()]));
        }
        match proper_coloring(&candidate) {
            Some(solution) => self.finish(candidate, &solution),
            None => candidate,
        }
    }

    fn candidate(&mut self) -> Level {
        let node_count = self.config.nodes.max(1);
        let nodes: Vec<NodeId> = (0..node_count)
            .map(|i| NodeId::new(format!("N{}", i)))
            .collect();

        // Spanning tree first so the graph is connected, then extra edges.
        let mut edges: Vec<Edge> = Vec::new();
        for i in 1..nodes.len() {
            let j = self.rng.next_usize(i);
            edges.push(Edge::new(nodes[i].clone(), nodes[j].clone()));
        }
        for _ in 0..self.config.extra_edges {
            let a = self.rng.next_usize(nodes.len());
            let b = self.rng.next_usize(nodes.len());
            if a == b {
                continue;
            }
            let edge = Edge::new(nodes[a].clone(), nodes[b].clone());
            if !edges.contains(&edge) {
                edges.push(edge);
            }
        }

        let palette_size = self.config.palette_size.clamp(1, COLOR_NAMES.len());
        let start = nodes[self.rng.next_usize(nodes.len())].clone();

        Level {
            graph: LevelGraph {
                nodes,
                edges: edges
                    .into_iter()
                    .map(|e| {
                        let (a, b) = e.endpoints();
                        (a.clone(), b.clone())
                    })
                    .collect(),
            },
            colors: COLOR_NAMES[..palette_size]
                .iter()
                .map(|c| Color::from(*c))
                .collect(),
            visibility_radius: self.config.visibility_radius,
            start_node: start,
            pre_colored: HashMap::new(),
        }
    }

    /// Pre-color the configured number of nodes from a proper coloring, so
    /// frozen nodes never make the level unsolvable.
    fn finish(&mut self, mut level: Level, solution: &HashMap<NodeId, Color>) -> Level {
        let mut pool = level.graph.nodes.clone();
        self.shuffle(&mut pool);
        for node in pool.into_iter().take(self.config.pre_colored) {
            let color = solution[&node].clone();
            level.pre_colored.insert(node, color);
        }
        level
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Full-graph proper coloring via the search engine, or `None` when the
/// palette is too small.
fn proper_coloring(level: &Level) -> Option<HashMap<NodeId, Color>> {
    let mut adjacency = Adjacency::new();
    for node in &level.graph.nodes {
        adjacency.touch(node);
    }
    for (a, b) in &level.graph.edges {
        adjacency.insert_edge(&Edge::new(a.clone(), b.clone()));
    }
    let mut unassigned = level.graph.nodes.clone();
    unassigned.sort();
    search::solve(&adjacency, &level.colors, &HashMap::new(), &unassigned)
}

/// Simple PCG-style PRNG, seeded from the OS so plain `new()` varies.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::game::GameSession;

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let level_a = Generator::with_seed(42).generate();
        let level_b = Generator::with_seed(42).generate();
        assert_eq!(level_a, level_b);
    }

    #[test]
    fn test_generated_level_validates_and_round_trips() {
        let level = Generator::with_seed(7).generate();
        let parsed = Level::from_json(&level.to_json()).unwrap();
        assert_eq!(parsed.graph.nodes.len(), GeneratorConfig::default().nodes);
    }

    #[test]
    fn test_generated_level_is_colorable() {
        for seed in [1, 2, 3, 4, 5] {
            let level = Generator::with_seed(seed).generate();
            assert!(
                proper_coloring(&level).is_some(),
                "seed {seed} produced an uncolorable level"
            );
        }
    }

    #[test]
    fn test_pre_colored_nodes_come_from_a_proper_coloring() {
        let mut generator = Generator::seeded(GeneratorConfig::medium(), 11);
        let level = generator.generate();

        assert_eq!(level.pre_colored.len(), 1);
        for (node, color) in &level.pre_colored {
            assert!(level.graph.nodes.contains(node));
            assert!(level.colors.contains(color));
        }
    }

    #[test]
    fn test_agent_solves_generated_levels() {
        for seed in [1, 2, 3] {
            let level = Generator::seeded(GeneratorConfig::small(), seed).generate();
            let mut session = GameSession::new(&level);
            let mut agent = Agent::new();

            let summary = session.run(&mut agent);
            assert!(
                summary.disqualified.is_none(),
                "seed {seed}: {:?}",
                summary.disqualified
            );
            assert!(summary.solved, "seed {seed} ended unsolved");
        }
    }
}
