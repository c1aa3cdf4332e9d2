//! Board snapshots for the 4x5 Hua Rong Dao grid.
//!
//! Cells are numbered row-major (`row * WIDTH + col`) so any set of cells fits
//! in a `u32` bitmask, bit 0 being the top-left cell.

use std::fmt::{self, Display, Write};

use itertools::Itertools;

pub const WIDTH: usize = 4;
pub const HEIGHT: usize = 5;
pub const CELLS: usize = WIDTH * HEIGHT;

/// Number of pieces on every valid board.
pub const PIECES: usize = 10;

/// Anchor the 2x2 piece must reach to solve the puzzle.
pub const EXIT: (usize, usize) = (3, 1);

pub(crate) const FULL: u32 = (1 << CELLS) - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// The 2x2 piece that has to reach the exit.
    Big,
    /// 1x2 lying across two columns.
    Horizontal,
    /// 1x2 standing across two rows.
    Vertical,
    /// 1x1.
    Single,
}

impl Kind {
    /// Footprint size as (rows, cols).
    pub const fn size(self) -> (usize, usize) {
        match self {
            Kind::Big => (2, 2),
            Kind::Horizontal => (1, 2),
            Kind::Vertical => (2, 1),
            Kind::Single => (1, 1),
        }
    }

    // symbols used by the text format, indexed by offset inside the footprint
    fn symbol(self, drow: usize, dcol: usize) -> u8 {
        match (self, drow, dcol) {
            (Kind::Big, _, _) => b'1',
            (Kind::Horizontal, _, 0) => b'<',
            (Kind::Horizontal, _, _) => b'>',
            (Kind::Vertical, 0, _) => b'^',
            (Kind::Vertical, _, _) => b'v',
            (Kind::Single, _, _) => b'2',
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Big => "2x2",
            Kind::Horizontal => "horizontal 1x2",
            Kind::Vertical => "vertical 1x2",
            Kind::Single => "1x1",
        })
    }
}

/// A piece placed at `anchor`, its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Piece {
    kind: Kind,
    row: u8,
    col: u8,
}

impl Piece {
    pub fn new(kind: Kind, row: usize, col: usize) -> Piece {
        // anything past the grid is rejected by `fits`, so clamping can't alias a valid cell
        let clamp = |v: usize| v.min(u8::MAX as usize) as u8;
        Piece {
            kind,
            row: clamp(row),
            col: clamp(col),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn anchor(&self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }

    /// Whether the whole footprint lies inside the grid.
    pub fn fits(&self) -> bool {
        let (rows, cols) = self.kind.size();
        let (row, col) = self.anchor();
        row + rows <= HEIGHT && col + cols <= WIDTH
    }

    /// Cells covered by the piece, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (rows, cols) = self.kind.size();
        let (row, col) = self.anchor();
        (row..row + rows).cartesian_product(col..col + cols)
    }

    /// Footprint as a cell bitmask. Only meaningful when the piece fits.
    pub fn mask(&self) -> u32 {
        debug_assert!(self.fits(), "{self} is off the grid");
        self.cells()
            .fold(0, |mask, (row, col)| mask | 1 << (row * WIDTH + col))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at ({},{})", self.kind, self.row, self.col)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("{0} does not fit on the 4x5 grid")]
    OutOfBounds(Piece),
    #[error("{0} overlaps another piece")]
    Overlap(Piece),
    #[error("expected {expected} {kind} piece(s), found {found}")]
    Inventory {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Order-independent identity of a board's occupancy.
///
/// Packs the number of horizontal pieces followed by every anchor in canonical
/// order, so two boards share a signature exactly when they are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature(u64);

/// An immutable placement of the ten pieces.
///
/// Pieces are kept sorted, so two boards with the same occupancy compare (and
/// hash) equal regardless of the order the pieces were supplied in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pieces: [Piece; PIECES],
    occupied: u32,
}

impl Board {
    /// Validates a placement and builds the board.
    pub fn new(pieces: impl IntoIterator<Item = Piece>) -> Result<Board, BoardError> {
        let mut pieces: Vec<Piece> = pieces.into_iter().collect();

        let mut occupied = 0;
        for piece in &pieces {
            if !piece.fits() {
                return Err(BoardError::OutOfBounds(*piece));
            }
            let mask = piece.mask();
            if occupied & mask != 0 {
                return Err(BoardError::Overlap(*piece));
            }
            occupied |= mask;
        }

        check_inventory(&pieces)?;

        pieces.sort_unstable();
        let pieces: [Piece; PIECES] = pieces
            .try_into()
            .map_err(|found: Vec<Piece>| BoardError::Inventory {
                kind: "total",
                expected: PIECES,
                found: found.len(),
            })?;

        Ok(Board { pieces, occupied })
    }

    /// Pieces in canonical order.
    pub fn pieces(&self) -> &[Piece; PIECES] {
        &self.pieces
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    pub fn empty_mask(&self) -> u32 {
        !self.occupied & FULL
    }

    pub fn empties(&self) -> [(usize, usize); 2] {
        let mut result = [(0, 0); 2];
        let mut empty = self.empty_mask();
        for slot in &mut result {
            let ix = empty.trailing_zeros() as usize;
            *slot = (ix / WIDTH, ix % WIDTH);
            empty &= empty - 1;
        }

        result
    }

    /// The 2x2 piece. Always first in canonical order.
    pub fn big(&self) -> Piece {
        self.pieces[0]
    }

    pub fn is_goal(&self) -> bool {
        self.big().anchor() == EXIT
    }

    /// The board as text symbols, row-major.
    pub fn grid(&self) -> [u8; CELLS] {
        let mut grid = [b'.'; CELLS];
        for piece in &self.pieces {
            let (row, col) = piece.anchor();
            for (r, c) in piece.cells() {
                grid[r * WIDTH + c] = piece.kind.symbol(r - row, c - col);
            }
        }
        grid
    }

    pub fn signature(&self) -> Signature {
        // canonical order is the 2x2, the horizontals, the verticals and then
        // the 1x1s, so the horizontal count fixes the kind at every position
        let horizontals = self
            .pieces
            .iter()
            .filter(|piece| piece.kind == Kind::Horizontal)
            .count() as u64;
        let packed = self.pieces.iter().fold(horizontals, |acc, piece| {
            (acc << 5) | (piece.row as u64 * WIDTH as u64 + piece.col as u64)
        });
        Signature(packed)
    }

    /// Replaces the piece at `ix` and restores canonical order.
    ///
    /// The caller guarantees the new footprint only covers cells that were
    /// empty or belonged to the replaced piece.
    pub(crate) fn with_piece(&self, ix: usize, piece: Piece) -> Board {
        let mut next = *self;
        next.occupied = (self.occupied & !self.pieces[ix].mask()) | piece.mask();
        next.pieces[ix] = piece;
        next.pieces.sort_unstable();

        debug_assert_eq!(next.occupied.count_ones(), self.occupied.count_ones());
        next
    }
}

fn check_inventory(pieces: &[Piece]) -> Result<(), BoardError> {
    let count = |kinds: &[Kind]| pieces.iter().filter(|p| kinds.contains(&p.kind)).count();

    let tallies = [
        ("2x2", 1, count(&[Kind::Big])),
        ("1x2", 5, count(&[Kind::Horizontal, Kind::Vertical])),
        ("1x1", 4, count(&[Kind::Single])),
    ];
    for (kind, expected, found) in tallies {
        if found != expected {
            return Err(BoardError::Inventory {
                kind,
                expected,
                found,
            });
        }
    }

    Ok(())
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in self.grid().chunks(WIDTH) {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            for c in line {
                f.write_char(*c as char)?;
            }
        }

        Ok(())
    }
}
