//! Reads a feed and prints how many objects of each kind it holds
//!
//! ```sh
//! RUST_LOG=info cargo run --example feed_stats -- [--default] [--drop] [--dry-run] <path>
//! ```
use clap::Parser;
use gtfs_feed_parser::ParseOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feed_stats")]
#[command(about = "Reads a GTFS feed and prints how many objects it holds", long_about = None)]
struct Cli {
    /// Replace invalid values by their default when there is one
    #[arg(long = "default")]
    use_default_on_error: bool,
    /// Skip the records that are still invalid
    #[arg(long = "drop")]
    drop_erroneous: bool,
    /// Only validate shapes, routes, services and trips
    #[arg(long)]
    dry_run: bool,
    /// Directory or zip file of the feed
    path: PathBuf,
}

fn main() -> Result<(), gtfs_feed_parser::Error> {
    env_logger::init();
    let cli = Cli::parse();

    let feed = ParseOptions::default()
        .use_default_on_error(cli.use_default_on_error)
        .drop_erroneous(cli.drop_erroneous)
        .dry_run(cli.dry_run)
        .parse(&cli.path)?;
    feed.print_stats();
    Ok(())
}
