use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use hua_rong_dao::report::{self, Format};
use hua_rong_dao::{load, solve, Outcome, Strategy};

// Input format:
// `1` is a cell of the 2x2 piece, `2` a 1x1 piece,
// `<>` a horizontal 1x2, `^` over `v` a vertical 1x2, `.` an empty cell.
// Five rows of four cells; the 2x2 piece has to end up at row 3, column 1.

/// Solves a Hua Rong Dao board and writes out the moves.
#[derive(Parser)]
#[command(name = "hua-rong-dao")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The input file that contains the puzzle.
    #[arg(long)]
    inputfile: PathBuf,

    /// The output file that receives the solution.
    #[arg(long)]
    outputfile: PathBuf,

    /// The searching algorithm.
    #[arg(long, value_enum)]
    algo: Algo,

    /// With `--algo dfs`, stop at the first solution instead of the shortest one.
    #[arg(long)]
    first_found: bool,

    /// How the solution is written.
    #[arg(long, value_enum, default_value_t = Format::Moves)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algo {
    Astar,
    Dfs,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let board = load(&cli.inputfile)
        .with_context(|| format!("failed to load board from {}", cli.inputfile.display()))?;
    log::info!("Source:\n{board}");

    let strategy = match (cli.algo, cli.first_found) {
        (Algo::Astar, first_found) => {
            if first_found {
                log::warn!("--first-found only applies to dfs, ignoring it");
            }
            Strategy::AStar
        }
        (Algo::Dfs, false) => Strategy::Dfs,
        (Algo::Dfs, true) => Strategy::DfsFirstFound,
    };

    let (_, outcome) = solve(&board, strategy);
    match &outcome {
        Outcome::Solved(solution) => log::info!("Goal:\n{}", solution.goal()),
        Outcome::NoSolution => log::warn!("No solution found"),
    }

    report::write(&cli.outputfile, &outcome, cli.format)
        .with_context(|| format!("failed to write {}", cli.outputfile.display()))?;
    log::info!("Wrote {}", cli.outputfile.display());

    Ok(())
}
