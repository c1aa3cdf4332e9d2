use crate::board::{Board, EXIT};

/// Lower bound on the number of moves left before `board` is solved.
///
/// Implementations must never overestimate, or A* loses its optimality.
pub trait Heuristic {
    fn estimate(&self, board: &Board) -> u32;
}

/// Manhattan distance from the 2x2 piece to the exit.
///
/// The 2x2 piece travels one cell per move, so it needs at least this many.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, board: &Board) -> u32 {
        let (row, col) = board.big().anchor();
        (row.abs_diff(EXIT.0) + col.abs_diff(EXIT.1)) as u32
    }
}

/// No guidance at all: A* degrades to uniform-cost search.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blind;

impl Heuristic for Blind {
    fn estimate(&self, _: &Board) -> u32 {
        0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::moves::successors;
    use crate::parse::parse_board;

    #[test]
    fn distance_to_exit() {
        let classic = parse_board("^11^\nv11v\n^<>^\nv22v\n2..2").unwrap();
        assert_eq!(Manhattan.estimate(&classic), 3);

        let corner = parse_board("11^^\n11vv\n2.2^\n^2^v\nv2v.").unwrap();
        assert_eq!(Manhattan.estimate(&corner), 4);

        let solved = parse_board("^<>^\nv22v\n^..^\nv11v\n2112").unwrap();
        assert!(solved.is_goal());
        assert_eq!(Manhattan.estimate(&solved), 0);
        assert_eq!(Blind.estimate(&classic), 0);
    }

    #[test]
    fn estimate_drops_by_at_most_one_per_move() {
        let board = parse_board("^<>^\nv22v\n^11^\nv11v\n2..2").unwrap();
        let here = Manhattan.estimate(&board);
        for (_, next) in successors(&board) {
            assert!(here <= Manhattan.estimate(&next) + 1);
        }
    }
}
