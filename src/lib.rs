//! Solver for the Hua Rong Dao sliding-block puzzle.
//!
//! The board is a fixed 4x5 grid holding one 2x2 piece, five 1x2 pieces and
//! four 1x1 pieces, with two empty cells. A board is solved once the 2x2
//! piece's top-left cell reaches [`EXIT`]. Each move slides one piece by one
//! cell; A* and the default DFS both return the fewest such moves.

pub mod board;
pub mod heuristic;
pub mod moves;
pub mod parse;
pub mod report;
pub mod search;

pub use board::{Board, BoardError, Kind, Piece, Signature, EXIT};
pub use heuristic::{Blind, Heuristic, Manhattan};
pub use moves::{successors, Direction, Move};
pub use parse::{load, parse_board, LoadError};
pub use search::{AStar, Dfs, DfsMode, Outcome, Search, SearchStats, Solution, Step};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    AStar,
    /// Iterative-deepening DFS with learned lower bounds; returns a minimal solution.
    Dfs,
    /// Plain DFS; returns whichever solution it reaches first.
    DfsFirstFound,
}

impl Strategy {
    /// A fresh engine for this strategy, with the Manhattan heuristic.
    pub fn engine(self) -> Box<dyn Search> {
        match self {
            Strategy::AStar => Box::new(AStar::new(Manhattan)),
            Strategy::Dfs => Box::new(Dfs::new(DfsMode::Shortest, Manhattan)),
            Strategy::DfsFirstFound => Box::new(Dfs::new(DfsMode::FirstFound, Manhattan)),
        }
    }
}

pub fn solve(start: &Board, strategy: Strategy) -> (SearchStats, Outcome) {
    let mut engine = strategy.engine();
    let outcome = engine.search(start);
    let stats = engine.stats();

    match &outcome {
        Outcome::Solved(solution) => log::info!(
            "{strategy:?}: found a solution in {} moves, expanded {} boards (generated {} total)",
            solution.len(),
            stats.expanded,
            stats.generated
        ),
        Outcome::NoSolution => log::info!(
            "{strategy:?}: no solution after expanding {} boards (generated {} total)",
            stats.expanded,
            stats.generated
        ),
    }

    (stats, outcome)
}
