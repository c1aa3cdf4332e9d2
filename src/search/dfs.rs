use std::ops::Range;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{trace, Node, Outcome, Search, SearchStats};
use crate::board::{Board, Signature};
use crate::heuristic::{Heuristic, Manhattan};
use crate::moves::successors;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DfsMode {
    /// Iterative deepening on `g + h`: the first solution found is minimal.
    #[default]
    Shortest,
    /// A single unbounded pass that stops at the first solution it meets.
    FirstFound,
}

/// Depth-first search on an explicit stack.
///
/// A board is pruned when it has already been expanded at the same or a
/// shallower depth during the current pass.
///
/// Between passes the engine keeps a lower bound on the moves left from every
/// board it has expanded. When all children of a board have been searched,
/// that bound is raised to one more than the smallest bound among them, so
/// later passes cut subtrees that earlier passes already showed to be too
/// deep. The bounds never exceed the true distance, which keeps the first
/// solution minimal.
pub struct Dfs<H = Manhattan> {
    mode: DfsMode,
    heuristic: H,
    stack: Vec<Visit>,
    nodes: Vec<Node>,
    shallowest: FxHashMap<Signature, u32>,
    // keyed by every board expanded in any pass of the current search
    lower_bounds: FxHashMap<Signature, u32>,
    discovered: FxHashSet<Signature>,
    stats: SearchStats,
}

enum Visit {
    Enter(usize),
    /// All children of the node were searched; they sit at `children` in the arena.
    Leave(usize, Range<usize>),
}

enum Pass {
    Found(usize),
    /// Nodes were cut by the bound; the smallest `f` among them.
    Cut(u32),
    /// Every reachable board was expanded.
    Exhausted,
}

impl<H: Heuristic> Dfs<H> {
    pub fn new(mode: DfsMode, heuristic: H) -> Self {
        Dfs {
            mode,
            heuristic,
            stack: Vec::new(),
            nodes: Vec::new(),
            shallowest: FxHashMap::default(),
            lower_bounds: FxHashMap::default(),
            discovered: FxHashSet::default(),
            stats: SearchStats::default(),
        }
    }

    fn seen_at_or_above(&self, signature: Signature, g: u32) -> bool {
        self.shallowest
            .get(&signature)
            .is_some_and(|&depth| depth <= g)
    }

    fn lower_bound(&self, node: &Node) -> u32 {
        self.lower_bounds
            .get(&node.signature)
            .map_or(node.h, |&learned| learned.max(node.h))
    }

    /// Every board seen so far has been expanded, so the reachable boards
    /// are all known.
    fn closed(&self) -> bool {
        self.lower_bounds.len() == self.discovered.len()
    }

    fn pass(&mut self, start: &Board, bound: u32) -> Pass {
        self.stack.clear();
        self.nodes.clear();
        self.shallowest.clear();
        self.stats.passes += 1;

        self.nodes
            .push(Node::root(*start, self.heuristic.estimate(start)));
        self.stack.push(Visit::Enter(0));

        let mut next_bound: Option<u32> = None;

        while let Some(visit) = self.stack.pop() {
            let ix = match visit {
                Visit::Enter(ix) => ix,
                Visit::Leave(ix, children) => {
                    self.learn(ix, children);
                    continue;
                }
            };
            let node = self.nodes[ix];

            let h = self.lower_bound(&node);
            let f = node.g + h;
            if f > bound {
                next_bound = Some(next_bound.map_or(f, |b| b.min(f)));
                continue;
            }

            if self.seen_at_or_above(node.signature, node.g) {
                continue;
            }
            self.shallowest.insert(node.signature, node.g);

            if node.board.is_goal() {
                return Pass::Found(ix);
            }

            self.stats.expanded += 1;
            self.lower_bounds.insert(node.signature, h);

            let children = successors(&node.board);
            self.stats.generated += children.len();

            let first = self.nodes.len();
            for (mv, next) in children {
                let signature = next.signature();
                self.discovered.insert(signature);
                let h = self.heuristic.estimate(&next);
                self.nodes.push(node.child(ix, mv, next, signature, h));
            }
            let end = self.nodes.len();

            self.stack.push(Visit::Leave(ix, first..end));
            // pushed in reverse so the first generated move is explored first
            self.stack.extend((first..end).rev().map(Visit::Enter));
        }

        match next_bound {
            Some(bound) => Pass::Cut(bound),
            None => Pass::Exhausted,
        }
    }

    fn learn(&mut self, ix: usize, children: Range<usize>) {
        let node = self.nodes[ix];
        let through_children = children
            .map(|child| 1 + self.lower_bound(&self.nodes[child]))
            .min();

        if let Some(bound) = through_children {
            if bound > self.lower_bound(&node) {
                self.lower_bounds.insert(node.signature, bound);
            }
        }
    }
}

impl Default for Dfs<Manhattan> {
    fn default() -> Self {
        Dfs::new(DfsMode::default(), Manhattan)
    }
}

impl<H: Heuristic> Search for Dfs<H> {
    fn search(&mut self, start: &Board) -> Outcome {
        self.stats = SearchStats::default();
        self.lower_bounds.clear();
        self.discovered.clear();
        self.discovered.insert(start.signature());

        let mut bound = match self.mode {
            DfsMode::Shortest => self.heuristic.estimate(start),
            DfsMode::FirstFound => u32::MAX,
        };

        loop {
            match self.pass(start, bound) {
                Pass::Found(ix) => {
                    log::debug!(
                        "dfs ({:?}): reached the exit at depth {} on pass {}",
                        self.mode,
                        self.nodes[ix].g,
                        self.stats.passes
                    );
                    return Outcome::Solved(trace(&self.nodes, ix));
                }
                Pass::Cut(_) if self.closed() => {
                    log::debug!(
                        "dfs ({:?}): all {} reachable boards expanded without reaching the exit",
                        self.mode,
                        self.discovered.len()
                    );
                    return Outcome::NoSolution;
                }
                Pass::Cut(next) => {
                    log::debug!(
                        "dfs ({:?}): nothing within {bound} moves ({} boards expanded so far), retrying with {next}",
                        self.mode,
                        self.stats.expanded
                    );
                    bound = next;
                }
                Pass::Exhausted => return Outcome::NoSolution,
            }
        }
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::parse_board;

    const TWENTY_ONE: &str = "
^^^^
vvvv
2112
2112
<>..
";

    const FORTY_THREE: &str = "
<>^2
11v2
11^2
..v2
<><>
";

    #[test]
    fn shortest_matches_known_minimum() {
        let board = parse_board(TWENTY_ONE).unwrap();
        let mut engine = Dfs::default();
        let solution = engine.search(&board).into_solution().unwrap();

        assert_eq!(solution.len(), 21);
        assert_eq!(solution.replay(), Some(*solution.goal()));
        assert!(solution.goal().is_goal());
        assert!(engine.stats().passes > 1);
    }

    #[test]
    fn first_found_is_a_valid_path() {
        let board = parse_board(TWENTY_ONE).unwrap();
        let mut engine = Dfs::new(DfsMode::FirstFound, Manhattan);
        let solution = engine.search(&board).into_solution().unwrap();

        assert!(solution.len() >= 21);
        assert!(solution.replay().unwrap().is_goal());
        assert_eq!(engine.stats().passes, 1);
    }

    #[test]
    fn walled_off_board_has_no_solution() {
        // two full rows of horizontal pieces keep the 2x2 in the top half
        let board = parse_board("^11.\nv11.\n<><>\n<><>\n2222").unwrap();

        let mut engine = Dfs::new(DfsMode::FirstFound, Manhattan);
        assert_eq!(engine.search(&board), Outcome::NoSolution);
        assert_eq!(engine.stats().expanded, 3);

        // the bound grows 3 -> 5 -> 6 before all three boards have been expanded
        let mut engine = Dfs::default();
        assert_eq!(engine.search(&board), Outcome::NoSolution);
        assert_eq!(engine.stats().passes, 3);
        assert_eq!(engine.discovered.len(), 3);
        assert!(engine.closed());
    }

    #[test]
    fn learned_bounds_never_overestimate() {
        let board = parse_board(FORTY_THREE).unwrap();
        let mut engine = Dfs::default();
        let solution = engine.search(&board).into_solution().unwrap();
        assert_eq!(solution.len(), 43);

        // some bound was raised past the heuristic
        assert!(engine
            .lower_bounds
            .iter()
            .any(|(_, &learned)| learned > 5));

        // on a minimal path the moves left from the i-th board are exactly len - i
        for (i, board) in solution.boards().enumerate() {
            let remaining = (solution.len() - i) as u32;
            if let Some(&learned) = engine.lower_bounds.get(&board.signature()) {
                assert!(learned <= remaining, "step {i}: {learned} > {remaining}");
            }
        }
    }

    #[test]
    fn bounds_do_not_leak_between_searches() {
        let board = parse_board(FORTY_THREE).unwrap();
        let mut engine = Dfs::default();
        let first = engine.search(&board);
        let first_stats = engine.stats();
        let second = engine.search(&board);

        assert_eq!(first, second);
        assert_eq!(first_stats, engine.stats());
    }
}
