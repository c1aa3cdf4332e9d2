use std::fmt::{self, Display};

use smallvec::SmallVec;

use crate::board::{Board, Piece, FULL, WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used by the move generator.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// One piece sliding one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// The piece as it stood before the move.
    pub piece: Piece,
    pub direction: Direction,
}

impl Move {
    /// Where the piece ends up, or `None` if that leaves the grid.
    pub fn target(&self) -> Option<Piece> {
        let (row, col) = self.piece.anchor();
        let (row, col) = match self.direction {
            Direction::Up => (row.checked_sub(1)?, col),
            Direction::Down => (row + 1, col),
            Direction::Left => (row, col.checked_sub(1)?),
            Direction::Right => (row, col + 1),
        };

        let target = Piece::new(self.piece.kind(), row, col);
        target.fits().then_some(target)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.piece, self.direction)
    }
}

/// Two empty cells can be entered from at most four sides each.
pub type Successors = SmallVec<[(Move, Board); 8]>;

const LEFT_COLUMN: u32 = 0b0001_0001_0001_0001_0001;
const RIGHT_COLUMN: u32 = LEFT_COLUMN << (WIDTH - 1);

// cells orthogonally adjacent to any cell in `mask`
fn neighbours(mask: u32) -> u32 {
    let up = mask >> WIDTH;
    let down = (mask << WIDTH) & FULL;
    let left = (mask & !LEFT_COLUMN) >> 1;
    let right = (mask & !RIGHT_COLUMN) << 1;
    up | down | left | right
}

/// Every legal single-step move from `board`, with the board it produces.
///
/// Pieces are visited in canonical order and directions in [`Direction::ALL`]
/// order, so the output is deterministic.
pub fn successors(board: &Board) -> Successors {
    let mut out = Successors::new();

    // only pieces touching an empty cell can move, and there are just two of those
    let empty = board.empty_mask();
    let touching = neighbours(empty);

    for (ix, piece) in board.pieces().iter().enumerate() {
        let footprint = piece.mask();
        if footprint & touching == 0 {
            continue;
        }

        for direction in Direction::ALL {
            let mv = Move {
                piece: *piece,
                direction,
            };
            let Some(target) = mv.target() else {
                continue;
            };

            let entered = target.mask() & !footprint;
            if entered & !empty == 0 {
                out.push((mv, board.with_piece(ix, target)));
            }
        }
    }

    out
}

impl Board {
    /// Applies `mv`, or returns `None` if the piece isn't there or can't slide.
    pub fn apply(&self, mv: Move) -> Option<Board> {
        let ix = self.pieces().iter().position(|p| *p == mv.piece)?;
        let target = mv.target()?;

        let entered = target.mask() & !mv.piece.mask();
        (entered & self.occupied() == 0).then(|| self.with_piece(ix, target))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::{Kind, CELLS};
    use crate::parse::parse_board;

    fn opposite(direction: Direction) -> Direction {
        match direction {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    const CLASSIC: &str = "
^11^
v11v
^<>^
v22v
2..2
";

    // the 2x2 sits right above the two gaps
    const OPEN_BELOW: &str = "
^<>^
v22v
^11^
v11v
2..2
";

    fn assert_legal(board: &Board, mv: &Move, next: &Board) {
        // exactly one piece changed, by one cell
        let before: Vec<_> = board.pieces().iter().filter(|p| !next.pieces().contains(p)).collect();
        let after: Vec<_> = next.pieces().iter().filter(|p| !board.pieces().contains(p)).collect();
        assert_eq!(before, vec![&mv.piece]);
        assert_eq!(after, vec![&mv.target().unwrap()]);

        let (r0, c0) = mv.piece.anchor();
        let (r1, c1) = after[0].anchor();
        assert_eq!(r0.abs_diff(r1) + c0.abs_diff(c1), 1);

        // rebuilding from scratch re-checks bounds and overlap
        let rebuilt = Board::new(next.pieces().iter().copied()).unwrap();
        assert_eq!(&rebuilt, next);
        assert_eq!(next.occupied().count_ones() as usize, CELLS - 2);
    }

    #[test]
    fn classic_opening_moves() {
        let board = parse_board(CLASSIC).unwrap();
        let moves: Vec<String> = successors(&board)
            .iter()
            .map(|(mv, _)| mv.to_string())
            .collect();

        assert_eq!(
            moves,
            vec![
                "1x1 at (3,1) down",
                "1x1 at (3,2) down",
                "1x1 at (4,0) right",
                "1x1 at (4,3) left",
            ]
        );
    }

    #[test]
    fn big_piece_needs_both_gaps() {
        let board = parse_board(OPEN_BELOW).unwrap();
        let big_moves: Vec<_> = successors(&board)
            .into_iter()
            .filter(|(mv, _)| mv.piece.kind() == Kind::Big)
            .collect();

        assert_eq!(big_moves.len(), 1);
        let (mv, next) = &big_moves[0];
        assert_eq!(mv.direction, Direction::Down);
        assert!(next.is_goal());
    }

    #[test]
    fn pieces_move_one_cell_at_a_time() {
        // the bottom-left 1x1 has both gaps to its right but only takes the first
        let board = parse_board(CLASSIC).unwrap();
        let corner = Piece::new(Kind::Single, 4, 0);
        let targets: Vec<_> = successors(&board)
            .into_iter()
            .filter(|(mv, _)| mv.piece == corner)
            .map(|(mv, next)| (mv.target().unwrap().anchor(), next.to_string()))
            .collect();
        assert_eq!(targets, vec![((4, 1), "^11^\nv11v\n^<>^\nv22v\n.2.2".to_string())]);

        let board = parse_board(
            "
2112
^11^
v<>v
^..^
v22v
",
        )
        .unwrap();
        let slides: Vec<_> = successors(&board)
            .into_iter()
            .filter(|(mv, _)| mv.piece.kind() == Kind::Horizontal)
            .map(|(mv, next)| (mv.direction, next.to_string()))
            .collect();
        assert_eq!(
            slides,
            vec![(Direction::Down, "2112\n^11^\nv..v\n^<>^\nv22v".to_string())]
        );
    }

    #[test]
    fn successors_are_legal() {
        // walk a few levels out from the classic start and check every move
        let mut layer = vec![parse_board(CLASSIC).unwrap()];
        for _ in 0..5 {
            let mut next_layer = Vec::new();
            for board in &layer {
                let children = successors(board);
                assert!(!children.is_empty());
                for (mv, next) in children {
                    assert_legal(board, &mv, &next);
                    assert_eq!(board.apply(mv), Some(next));
                    let back = Move {
                        piece: mv.target().unwrap(),
                        direction: opposite(mv.direction),
                    };
                    assert_eq!(next.apply(back), Some(*board));
                    next_layer.push(next);
                }
            }
            layer = next_layer;
        }
    }

    #[test]
    fn apply_rejects_blocked_moves() {
        let board = parse_board(CLASSIC).unwrap();
        let blocked = Move {
            piece: board.big(),
            direction: Direction::Down,
        };
        assert_eq!(board.apply(blocked), None);

        let off_grid = Move {
            piece: board.big(),
            direction: Direction::Up,
        };
        assert_eq!(board.apply(off_grid), None);
    }
}
