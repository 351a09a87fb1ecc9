// crates/commp-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context, Result};
use clap::Parser;
use commp_core::PieceCommitter;
use std::fs::File;
use std::io::{self, BufReader};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "commp-cli",
    about = "Streaming piece-commitment (commP) calculator",
    long_about = "Streaming piece-commitment (commP) calculator.\n\nSplits the input into fixed-size segments, hashes them concurrently, and folds the ordered segment commitments into a single piece CID.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    /// Input file to commit
    file: PathBuf,

    /// Concurrent segment hashers (defaults to available CPU parallelism)
    #[arg(long)]
    concurrency: Option<NonZeroUsize>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let f = File::open(&cli.file)
        .with_context(|| format!("opening input file {}", cli.file.display()))?;
    let mut reader = BufReader::new(f);

    let mut committer = cli
        .concurrency
        .map_or_else(PieceCommitter::new, PieceCommitter::with_concurrency);

    let start = Instant::now();
    let streamed = io::copy(&mut reader, &mut committer)
        .with_context(|| format!("reading input file {}", cli.file.display()))?;
    let read_elapsed = start.elapsed();
    info!(bytes = streamed, ?read_elapsed, "streamed input");
    println!("Elapsed read+hash time: {read_elapsed:?}");

    let finalize_start = Instant::now();
    let commitment = committer
        .finalize()
        .context("finalizing piece commitment")?;
    println!("Elapsed commP time: {:?}", finalize_start.elapsed());
    println!("commP: {}", commitment.piece_cid);

    let rendered =
        serde_json::to_string_pretty(&commitment).context("rendering result as JSON")?;
    println!("{rendered}");

    Ok(())
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
