use std::path::PathBuf;

use clap::Parser;
use simulate::Options;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of readings to generate
    ticks: usize,

    #[arg(long, default_value_t = 10)]
    interval_secs: u64,

    #[arg(long)]
    seed: Option<u64>,

    /// Use the wider emergency ranges
    #[arg(long)]
    demo: bool,

    #[arg(long, default_value_t = 3)]
    limit: usize,

    /// Write a JSON snapshot here
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    simulate::run(Options {
        ticks: args.ticks,
        interval_secs: args.interval_secs,
        seed: args.seed,
        demo: args.demo,
        limit: args.limit,
        output: args.output,
    })
}
