use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use super::{trace, Node, Outcome, Search, SearchStats};
use crate::board::{Board, Signature};
use crate::heuristic::{Heuristic, Manhattan};
use crate::moves::successors;

/// Frontier entry. `node` doubles as the insertion sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    f: u32,
    h: u32,
    node: usize,
}

impl Ord for Entry {
    // BinaryHeap pops the greatest entry, so every comparison is reversed:
    // lowest f first, then lowest h, then oldest
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cost-optimal search, ordered by `f = g + h`.
pub struct AStar<H = Manhattan> {
    heuristic: H,
    frontier: BinaryHeap<Entry>,
    nodes: Vec<Node>,
    // lowest depth each board has been expanded at
    best: FxHashMap<Signature, u32>,
    stats: SearchStats,
}

impl<H: Heuristic> AStar<H> {
    pub fn new(heuristic: H) -> Self {
        AStar {
            heuristic,
            frontier: BinaryHeap::new(),
            nodes: Vec::new(),
            best: FxHashMap::default(),
            stats: SearchStats::default(),
        }
    }

    fn reset(&mut self) {
        self.frontier.clear();
        self.nodes.clear();
        self.best.clear();
        self.stats = SearchStats {
            passes: 1,
            ..SearchStats::default()
        };
    }

    fn push(&mut self, node: Node) {
        let entry = Entry {
            f: node.g + node.h,
            h: node.h,
            node: self.nodes.len(),
        };
        self.nodes.push(node);
        self.frontier.push(entry);
    }

    fn known_at_or_below(&self, signature: Signature, g: u32) -> bool {
        self.best
            .get(&signature)
            .is_some_and(|&best| best <= g)
    }
}

impl Default for AStar<Manhattan> {
    fn default() -> Self {
        AStar::new(Manhattan)
    }
}

impl<H: Heuristic> Search for AStar<H> {
    fn search(&mut self, start: &Board) -> Outcome {
        self.reset();
        self.push(Node::root(*start, self.heuristic.estimate(start)));

        while let Some(entry) = self.frontier.pop() {
            let node = self.nodes[entry.node];
            if self.known_at_or_below(node.signature, node.g) {
                continue;
            }
            self.best.insert(node.signature, node.g);

            if node.board.is_goal() {
                log::debug!(
                    "a*: reached the exit at depth {} with {} boards still queued",
                    node.g,
                    self.frontier.len()
                );
                return Outcome::Solved(trace(&self.nodes, entry.node));
            }

            self.stats.expanded += 1;
            for (mv, next) in successors(&node.board) {
                self.stats.generated += 1;
                let signature = next.signature();
                if self.known_at_or_below(signature, node.g + 1) {
                    continue;
                }
                let h = self.heuristic.estimate(&next);
                self.push(node.child(entry.node, mv, next, signature, h));
            }
        }

        Outcome::NoSolution
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
