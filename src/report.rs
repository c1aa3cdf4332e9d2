//! Writing search results out.

use std::fs;
use std::io;
use std::iter;
use std::path::Path;

use itertools::Itertools;

use crate::search::Outcome;

/// Written in place of a move list when the search came back empty.
pub const NO_SOLUTION: &str = "no solution";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One numbered move per line, then the total.
    #[default]
    Moves,
    /// Every board along the path, separated by blank lines.
    Boards,
}

/// Output lines without their terminating newlines.
#[auto_enums::auto_enum(Iterator)]
pub fn lines(outcome: &Outcome, format: Format) -> impl Iterator<Item = String> + '_ {
    match (outcome, format) {
        (Outcome::NoSolution, _) => iter::once(NO_SOLUTION.to_string()),
        (Outcome::Solved(solution), Format::Moves) => solution
            .moves()
            .enumerate()
            .map(|(i, mv)| format!("{}. {}", i + 1, mv))
            .chain(iter::once(format!("solved in {} moves", solution.len()))),
        (Outcome::Solved(solution), Format::Boards) => {
            solution.boards().map(|board| format!("{board}\n"))
        }
    }
}

pub fn render(outcome: &Outcome, format: Format) -> String {
    let mut text = lines(outcome, format).join("\n");
    text.push('\n');
    text
}

pub fn write(path: impl AsRef<Path>, outcome: &Outcome, format: Format) -> io::Result<()> {
    fs::write(path, render(outcome, format))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::parse_board;
    use crate::search::{AStar, Search};

    fn one_move() -> Outcome {
        let board = parse_board("^<>^\nv22v\n^11^\nv11v\n2..2").unwrap();
        AStar::default().search(&board)
    }

    #[test]
    fn move_list() {
        insta::assert_snapshot!(lines(&one_move(), Format::Moves).join("\n"), @r"
        1. 2x2 at (2,1) down
        solved in 1 moves
        ");
    }

    #[test]
    fn board_trace() {
        insta::assert_snapshot!(render(&one_move(), Format::Boards).trim_end(), @r"
        ^<>^
        v22v
        ^11^
        v11v
        2..2

        ^<>^
        v22v
        ^..^
        v11v
        2112
        ");
    }

    #[test]
    fn failure_is_explicit() {
        for format in [Format::Moves, Format::Boards] {
            assert_eq!(render(&Outcome::NoSolution, format), "no solution\n");
        }
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join(format!("hua-rong-dao-{}.txt", std::process::id()));
        write(&path, &one_move(), Format::Moves).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(written, "1. 2x2 at (2,1) down\nsolved in 1 moves\n");
    }
}
