use chroma_core::{Action, Agent, GameSession, Generator, GeneratorConfig, Level, Summary};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "chroma", about = "Graph coloring under partial observability", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a level with the planning agent
    Play {
        /// Level JSON file
        level: PathBuf,
        /// Suppress per-turn narration
        #[arg(long)]
        quiet: bool,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a random colorable level
    Generate {
        /// Number of nodes
        #[arg(long, default_value_t = 8)]
        nodes: usize,
        /// Edges beyond the spanning tree
        #[arg(long, default_value_t = 4)]
        extra_edges: usize,
        /// Palette size
        #[arg(long, default_value_t = 3)]
        colors: usize,
        /// Visibility radius
        #[arg(long, default_value_t = 1)]
        radius: usize,
        /// Nodes pre-colored by the environment
        #[arg(long, default_value_t = 0)]
        pre_colored: usize,
        /// Seed for reproducible output (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Play { level, quiet, json } => play(&level, quiet, json),
        Command::Generate {
            nodes,
            extra_edges,
            colors,
            radius,
            pre_colored,
            seed,
            output,
        } => {
            let config = GeneratorConfig {
                nodes,
                extra_edges,
                palette_size: colors,
                visibility_radius: radius,
                pre_colored,
                ..GeneratorConfig::default()
            };
            generate(config, seed, output.as_deref())
        }
    }
}

fn play(path: &std::path::Path, quiet: bool, json: bool) -> ExitCode {
    let level = match Level::from_path(path) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = GameSession::new(&level);
    let mut agent = Agent::new();

    if !quiet {
        println!(
            "Starting level: {} nodes, {} colors, radius {}. Agent at '{}'.",
            level.graph.nodes.len(),
            level.colors.len(),
            level.visibility_radius,
            session.position()
        );
    }

    let mut disqualified = None;
    for turn in 1..=session.max_turns() {
        let observation = session.observe();
        if !quiet {
            println!("\n--- Turn {} ---", turn);
        }

        let action = agent.decide_move(&observation);
        if let Err(error) = session.apply(&action) {
            disqualified = Some(error);
            break;
        }
        if !quiet {
            if let Action::Move { node } = &action {
                println!("Moved to '{}'.", node);
            }
        }

        let observation = session.observe();
        let position = session.position().clone();
        let action = agent.decide_color(&position, &observation);
        if let Err(error) = session.apply(&action) {
            disqualified = Some(error);
            break;
        }
        if !quiet {
            if let Action::Color { node, color } = &action {
                println!("Colored '{}' with '{}'.", node, color);
            }
        }

        if session.is_solved() {
            if !quiet {
                println!("\n--- Puzzle solved! ---");
            }
            break;
        }
    }

    let summary = match disqualified {
        Some(error) => {
            eprintln!("Agent disqualified: {}", error);
            Summary {
                score: 0,
                solved: false,
                disqualified: Some(error.to_string()),
                ..session.summary()
            }
        }
        None => session.summary(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).expect("summaries always serialize")
        );
    } else {
        let stats = agent.stats();
        println!("\nSolved: {}", summary.solved);
        println!("Moves: {}", summary.moves.len());
        println!("Reassignments: {}", summary.reassignments);
        println!("Score: {}", summary.score);
        println!(
            "Plans: {} ({} repaired, {} failed, {} forced conflicts)",
            stats.plans, stats.repairs, stats.planning_failures, stats.forced_conflicts
        );
    }

    if summary.solved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn generate(config: GeneratorConfig, seed: Option<u64>, output: Option<&std::path::Path>) -> ExitCode {
    let seed = seed.unwrap_or_else(rand::random);
    let level = Generator::seeded(config, seed).generate();
    let json = level.to_json();

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &json) {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            eprintln!("Wrote level (seed {}) to '{}'.", seed, path.display());
        }
        None => println!("{}", json),
    }
    ExitCode::SUCCESS
}
