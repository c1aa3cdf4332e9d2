//! Text board format.
//!
//! Five rows of four symbols: `1` for the 2x2 piece, `2` for a 1x1,
//! `<` `>` for a horizontal 1x2, `^` `v` for a vertical 1x2 and `.` for an
//! empty cell. Blank lines around the grid and trailing whitespace are ignored.

use std::fs;
use std::io;
use std::path::Path;

use crate::board::{Board, BoardError, Kind, Piece, HEIGHT, WIDTH};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("expected 5 rows, found {0}")]
    RowCount(usize),
    #[error("row {row}: expected 4 cells, found {found}")]
    RowWidth { row: usize, found: usize },
    #[error("unknown symbol {symbol:?} at ({row},{col})")]
    Symbol { symbol: char, row: usize, col: usize },
    #[error("unpaired {symbol:?} at ({row},{col})")]
    Unpaired { symbol: char, row: usize, col: usize },
    #[error("2x2 block at ({row},{col}) is not a square")]
    Square { row: usize, col: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Reads and validates a board file.
pub fn load(path: impl AsRef<Path>) -> Result<Board, LoadError> {
    parse_board(&fs::read_to_string(path)?)
}

pub fn parse_board(b: &str) -> Result<Board, LoadError> {
    let rows: Vec<&[u8]> = b
        .trim()
        .lines()
        .map(|row| row.trim_end().as_bytes())
        .collect();

    if rows.len() != HEIGHT {
        return Err(LoadError::RowCount(rows.len()));
    }
    for (row, line) in rows.iter().enumerate() {
        if line.len() != WIDTH {
            return Err(LoadError::RowWidth {
                row,
                found: line.len(),
            });
        }
    }

    let at = |row: usize, col: usize| rows.get(row).and_then(|line| line.get(col)).copied();

    let mut claimed = [[false; WIDTH]; HEIGHT];
    let mut pieces = Vec::new();

    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            if claimed[row][col] {
                continue;
            }

            let symbol = rows[row][col];
            let kind = match symbol {
                b'.' => continue,
                b'2' => Kind::Single,
                b'<' => Kind::Horizontal,
                b'^' => Kind::Vertical,
                b'1' => Kind::Big,
                b'>' | b'v' => {
                    return Err(LoadError::Unpaired {
                        symbol: symbol as char,
                        row,
                        col,
                    })
                }
                _ => {
                    return Err(LoadError::Symbol {
                        symbol: symbol as char,
                        row,
                        col,
                    })
                }
            };

            let piece = Piece::new(kind, row, col);
            // the rest of the footprint has to carry the matching symbols and be unclaimed
            for (r, c) in piece.cells() {
                let expected = match (kind, r - row, c - col) {
                    (Kind::Horizontal, _, 1) => b'>',
                    (Kind::Vertical, 1, _) => b'v',
                    _ => symbol,
                };
                let intact = at(r, c) == Some(expected)
                    && !claimed.get(r).and_then(|line| line.get(c)).copied().unwrap_or(true);
                if !intact {
                    return Err(match kind {
                        Kind::Big => LoadError::Square { row, col },
                        _ => LoadError::Unpaired {
                            symbol: symbol as char,
                            row,
                            col,
                        },
                    });
                }
            }

            for (r, c) in piece.cells() {
                claimed[r][c] = true;
            }
            pieces.push(piece);
        }
    }

    Ok(Board::new(pieces)?)
}
