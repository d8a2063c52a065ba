//! Graph coloring under partial observability.
//!
//! An [`Agent`] explores an unknown graph one node at a time, seeing only a
//! bounded neighborhood each turn, and must produce a proper coloring while
//! minimizing moves and reassignments. Knowledge accumulates in a
//! [`KnowledgeBase`]; the [`Planner`] colors the known graph with
//! arc-consistency propagation and heuristic backtracking search, repairing
//! by clearing a conflicting node when the first pass fails; the exploration
//! policy decides where to walk next.
//!
//! The environment side lives here too: [`Level`] files, the [`GameSession`]
//! referee with its move-then-color turn cycle, and a [`Generator`] for
//! random colorable levels.

pub mod agent;
pub mod explore;
pub mod game;
pub mod generator;
pub mod graph;
pub mod knowledge;
pub mod level;
pub mod observation;
pub mod solver;

pub use agent::{Agent, AgentStats, Policy};
pub use game::{GameSession, Summary, TurnError};
pub use generator::{Generator, GeneratorConfig};
pub use graph::{Adjacency, Color, Edge, NodeId};
pub use knowledge::KnowledgeBase;
pub use level::{Level, LevelError, LevelGraph, LevelResult};
pub use observation::{Action, Observation};
pub use solver::{PlanOutcome, Planner, PlannerConfig};
