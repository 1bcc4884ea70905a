//! Box office command line.
//!
//! ```bash
//! box-office schedule.txt journal.txt
//! RUST_LOG=box_office=debug box-office schedule.txt journal.txt --stagger-ms 0
//! ```

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use box_office::{parse, BoxOffice, Config};
use clap::Parser;

/// Serve a schedule of clients with three tellers and journal the reservations.
#[derive(Parser)]
#[command(name = "box-office")]
#[command(version)]
struct Cli {
    /// Schedule: theater name, client count, then `name,arrival_ms,service_ms,seat` per client
    input: PathBuf,

    /// Where to write the journal
    output: PathBuf,

    /// Pause between teller starts, in milliseconds
    #[arg(long, default_value_t = 100)]
    stagger_ms: u64,

    /// Grace period at closing time, in milliseconds
    #[arg(long, default_value_t = 100)]
    grace_ms: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let schedule = parse(&text).with_context(|| format!("Failed to parse {}", cli.input.display()))?;
    let out = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;

    let config = Config::default()
        .with_teller_stagger(Duration::from_millis(cli.stagger_ms))
        .with_grace(Duration::from_millis(cli.grace_ms));
    let office = BoxOffice::open(&schedule.venue, config, BufWriter::new(out))?;
    office.run(schedule.clients)?;
    Ok(())
}
