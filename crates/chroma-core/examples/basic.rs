//! Basic example: generate a level, let the agent play it, print the result.

use chroma_core::{Agent, GameSession, Generator, GeneratorConfig, Level};

fn main() {
    // Generate a small colorable level
    println!("Generating a level...\n");
    let mut generator = Generator::with_config(GeneratorConfig::small());
    let level = generator.generate();

    println!(
        "{} nodes, {} edges, {} colors, visibility radius {}",
        level.graph.nodes.len(),
        level.graph.edges.len(),
        level.colors.len(),
        level.visibility_radius
    );

    // Let the agent play it
    let mut session = GameSession::new(&level);
    let mut agent = Agent::new();
    let summary = session.run(&mut agent);

    println!("\nSolved: {}", summary.solved);
    println!("Moves: {}", summary.moves.len());
    println!("Reassignments: {}", summary.reassignments);
    println!("Score: {}", summary.score);

    let stats = agent.stats();
    println!(
        "Plans: {} ({} repaired, {} failed)",
        stats.plans, stats.repairs, stats.planning_failures
    );

    // Levels are plain JSON
    println!("\n--- Parsing a level from JSON ---\n");
    let json = r#"{
        "graph": {
            "nodes": ["A", "B", "C"],
            "edges": [["A","B"], ["B","C"]]
        },
        "colors": ["Red", "Green"],
        "visibility_radius": 1,
        "start_node": "A"
    }"#;
    match Level::from_json(json) {
        Ok(level) => {
            let mut session = GameSession::new(&level);
            let summary = session.run(&mut Agent::new());
            println!("Parsed level solved: {}", summary.solved);
        }
        Err(e) => println!("Bad level: {}", e),
    }
}
