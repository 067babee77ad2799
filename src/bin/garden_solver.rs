use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use garden_solver::engine::Board;
use garden_solver::layout::GardenLayout;
use garden_solver::utils::board_from_text;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// Accept either full layout.
    Auto,
    Standard,
    Extended,
    /// Solve whatever is on the board, full or not.
    Any,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Which garden distribution the board must match before solving
    #[clap(short, long, value_enum, default_value_t = LayoutArg::Auto)]
    layout: LayoutArg,

    /// Stop after this many solutions
    #[clap(short = 'n', long, default_value_t = 1)]
    max_solutions: usize,

    /// Validate the board bookkeeping before searching
    #[clap(long)]
    check: bool,

    /// Path to the garden file (11 rows of two-letter labels, `__` for empty)
    board_file: PathBuf,
}

fn read_board_file(path: &PathBuf) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    board_from_text(&content).with_context(|| format!("invalid garden in {}", path.display()))
}

fn check_layout(board: &Board, wanted: LayoutArg) -> Result<()> {
    let detected = board.detect_layout();
    match (wanted, detected) {
        (LayoutArg::Any, _) => {
            if detected.is_none() {
                warn!("board matches no full garden, solving it anyway");
            }
            Ok(())
        }
        (LayoutArg::Auto, Some(layout)) => {
            println!("Solving the {} garden", layout);
            Ok(())
        }
        (LayoutArg::Standard, Some(layout @ GardenLayout::Standard))
        | (LayoutArg::Extended, Some(layout @ GardenLayout::Extended)) => {
            println!("Solving the {} garden", layout);
            Ok(())
        }
        _ => bail!(
            "board does not match the requested garden ({} tiles); \
             it was probably not read correctly",
            board.len()
        ),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut board = read_board_file(&args.board_file)?;
    println!("Loaded garden from {}\n", args.board_file.display());
    println!("{}\n", board);

    let counts: Vec<String> = board
        .counts()
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(e, n)| format!("{}={}", e, n))
        .collect();
    println!("Tiles ({}): {}", board.len(), counts.join(" "));

    if args.check {
        board.check_invariants().context("board failed its consistency check")?;
        info!("board invariants hold");
    }
    check_layout(&board, args.layout)?;

    let started = Instant::now();
    let mut solutions = board.solve();
    let mut found = 0;
    for solution in solutions.by_ref().take(args.max_solutions) {
        found += 1;
        println!("\nSolution {} ({} moves):", found, solution.moves.len());
        for (i, mv) in solution.moves.iter().enumerate() {
            println!("  Move {}: {}", i + 1, mv);
        }
        let clicks: Vec<String> = solution.clicks().map(|p| p.to_string()).collect();
        println!("Clicks: {}", clicks.join(" "));
    }
    let stats = solutions.stats();
    drop(solutions);
    info!("search took {:?}: {}", started.elapsed(), stats);

    if found == 0 {
        println!("\nNo solution found.");
    }
    Ok(())
}
