//! Search strategies over the implicit graph of boards.
//!
//! Every engine owns its frontier, node arena and visited map, and resets
//! them at the start of each search, so engines can be reused and separate
//! engines never share state.

mod astar;
mod dfs;

pub use astar::AStar;
pub use dfs::{Dfs, DfsMode};

use crate::board::{Board, Signature};
use crate::moves::Move;

pub trait Search {
    fn search(&mut self, start: &Board) -> Outcome;

    /// Counters from the most recent search.
    fn stats(&self) -> SearchStats;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards whose successors were generated.
    pub expanded: usize,
    /// Successor boards produced, duplicates included.
    pub generated: usize,
    /// Depth-bounded passes; always 1 for A*.
    pub passes: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// The reachable boards were exhausted without reaching the exit.
    NoSolution,
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::NoSolution => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::NoSolution => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub mv: Move,
    /// The board after `mv`.
    pub board: Board,
}

/// A path from a start board to a goal board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    start: Board,
    steps: Vec<Step>,
}

impl Solution {
    pub fn start(&self) -> &Board {
        &self.start
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the start board was already solved.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.steps.iter().map(|step| step.mv)
    }

    /// Start board followed by the board after each move.
    pub fn boards(&self) -> impl Iterator<Item = &Board> + '_ {
        std::iter::once(&self.start).chain(self.steps.iter().map(|step| &step.board))
    }

    pub fn goal(&self) -> &Board {
        self.steps.last().map_or(&self.start, |step| &step.board)
    }

    /// Re-applies the moves from the start board, checking each one is legal.
    pub fn replay(&self) -> Option<Board> {
        self.moves()
            .try_fold(self.start, |board, mv| board.apply(mv))
    }
}

/// Arena entry shared by the engines. Parents are arena indices.
#[derive(Clone, Copy, Debug)]
struct Node {
    board: Board,
    signature: Signature,
    parent: Option<usize>,
    mv: Option<Move>,
    g: u32,
    h: u32,
}

impl Node {
    fn root(board: Board, h: u32) -> Node {
        Node {
            board,
            signature: board.signature(),
            parent: None,
            mv: None,
            g: 0,
            h,
        }
    }

    /// `signature` has to be `board.signature()`.
    fn child(&self, parent: usize, mv: Move, board: Board, signature: Signature, h: u32) -> Node {
        Node {
            board,
            signature,
            parent: Some(parent),
            mv: Some(mv),
            g: self.g + 1,
            h,
        }
    }
}

/// Follows parent links from `goal` back to the root.
fn trace(nodes: &[Node], goal: usize) -> Solution {
    let mut steps = Vec::with_capacity(nodes[goal].g as usize);
    let mut current = goal;
    while let (Some(parent), Some(mv)) = (nodes[current].parent, nodes[current].mv) {
        steps.push(Step {
            mv,
            board: nodes[current].board,
        });
        current = parent;
    }
    steps.reverse();

    Solution {
        start: nodes[current].board,
        steps,
    }
}
