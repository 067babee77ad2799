use anyhow::Result;
use clap::{Parser, ValueEnum};
use garden_solver::generator::Generator;
use garden_solver::layout::GardenLayout;
use garden_solver::utils::board_to_text;
use log::warn;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Standard,
    Extended,
}

impl From<LayoutArg> for GardenLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Standard => GardenLayout::Standard,
            LayoutArg::Extended => GardenLayout::Extended,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Seed of the first garden; each further garden uses the next seed
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of gardens to deal
    #[clap(short, long, default_value_t = 1)]
    count: usize,

    /// Tile distribution of the dealt gardens
    #[clap(short, long, value_enum, default_value_t = LayoutArg::Standard)]
    layout: LayoutArg,

    /// Run the solver on each garden and report how long it took
    #[clap(long)]
    solve: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let layout = GardenLayout::from(args.layout);

    for i in 0..args.count {
        let seed = args.seed + i as u64;
        let (mut board, witness) = match Generator::with_seed(seed).generate(layout) {
            Ok(dealt) => dealt,
            Err(e) => {
                warn!("skipping seed {}: failed to deal a {} garden: {}", seed, layout, e);
                continue;
            }
        };

        println!("# {} garden, seed {}", layout, seed);
        println!("{}", board_to_text(&board));

        if args.solve {
            let started = Instant::now();
            let mut solutions = board.solve();
            let found = solutions.next();
            let elapsed = started.elapsed();
            let stats = solutions.stats();
            drop(solutions);
            match found {
                Some(solution) => println!(
                    "# solved in {:?} ({} moves), {}",
                    elapsed,
                    solution.moves.len(),
                    stats
                ),
                None => println!(
                    "# no solution found in {:?}, {}, dealt with {}",
                    elapsed, stats, witness
                ),
            }
        }
        println!();
    }
    Ok(())
}
