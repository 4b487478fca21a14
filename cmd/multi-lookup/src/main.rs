//! multi-lookup command line
//!
//! Resolves every hostname in the input files and writes one
//! `hostname,address` line per name to the resolver log, plus one statistics
//! line per requester thread to the requester log.
//!
//! # Environment Variables
//!
//! - `MLOOKUP_LOG=<filter>` - log filter (off, error, warn, info, debug, trace)
//! - `MLOOKUP_BUFFER_CAPACITY=16` - bounded buffer slots
//! - `MLOOKUP_MAX_LINE_LENGTH=1025` - longest accepted input line, exclusive
//! - `MLOOKUP_ADDRESS_FAMILY=ipv4` - any, ipv4 or ipv6
// MLOOKUP_LOG=debug cargo run -p multi-lookup-cli -- 2 4 serviced.txt results.txt names1.txt names2.txt

use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use multi_lookup::{init_logging, AddressFamily, LookupConfig, Runtime};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Resolve hostnames from input files with requester and resolver thread pools"
)]
struct Args {
    /// Number of requester threads (1-10)
    requesters: usize,

    /// Number of resolver threads (1-10)
    resolvers: usize,

    /// Per-requester statistics are written here
    requester_log: PathBuf,

    /// One `hostname,address` line per input hostname is written here
    resolver_log: PathBuf,

    /// Input files, one hostname per line (1-10)
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Buffer slots between requesters and resolvers [env: MLOOKUP_BUFFER_CAPACITY]
    #[arg(long)]
    buffer_capacity: Option<usize>,

    /// Address family to report [env: MLOOKUP_ADDRESS_FAMILY]
    #[arg(long)]
    family: Option<AddressFamily>,
}

impl Args {
    fn config(&self) -> LookupConfig {
        let mut config = LookupConfig::from_env()
            .requesters(self.requesters)
            .resolvers(self.resolvers);
        if let Some(capacity) = self.buffer_capacity {
            config = config.buffer_capacity(capacity);
        }
        if let Some(family) = self.family {
            config = config.address_family(family);
        }
        config
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let runtime = Runtime::new(args.config());
    let start = Instant::now();
    let report = runtime
        .run(&args.files, &args.requester_log, &args.resolver_log)
        .context("multi-lookup failed")?;

    info!(
        "{} hostnames handled in {:.3}s",
        report.lines_serviced(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
