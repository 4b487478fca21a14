//! Batch orchestration
//!
//! Lifecycle of one run:
//!
//! 1. Build the buffer; it outlives every worker (scoped threads).
//! 2. Start all resolvers, then all requesters.
//! 3. Join every requester. Only this yields the proof needed to shut down.
//! 4. Set the shutdown flag under the buffer lock and broadcast.
//! 5. Join every resolver; each exits once the buffer is empty and shut down.
//!
//! Resolvers start first so that a failure to spawn a requester can never
//! leave the remaining requesters parked on a full buffer with nobody
//! draining it. Steps 3-5 run even when spawning failed part way through.

use std::fmt;
use std::io::Write;
use std::thread;
use log::{debug, error, info};
use lookup_core::{BoundedBuffer, BufferStats, Resolve, Result};
use crate::config::LookupConfig;
use crate::input::InputFile;
use crate::requester::{run_requester, RequesterStats};
use crate::resolver::{run_resolver, ResolverStats};
use crate::sink::LogSink;
use crate::worker::{Role, WorkerPool};

/// Totals of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per requester, by index
    pub requesters: Vec<RequesterStats>,
    /// One entry per resolver, by index
    pub resolvers: Vec<ResolverStats>,
    /// Buffer counters at the end of the run
    pub buffer: BufferStats,
}

impl RunReport {
    /// Lines pushed by all requesters
    pub fn lines_serviced(&self) -> usize {
        self.requesters.iter().map(|r| r.lines_serviced).sum()
    }

    /// Blank lines dropped by requesters without being pushed
    pub fn blank_lines(&self) -> usize {
        self.requesters.iter().map(|r| r.blank_lines).sum()
    }

    /// Every input line read, blank or not
    pub fn lines_read(&self) -> usize {
        self.lines_serviced() + self.blank_lines()
    }

    pub fn resolved(&self) -> usize {
        self.resolvers.iter().map(|r| r.resolved).sum()
    }

    pub fn failed(&self) -> usize {
        self.resolvers.iter().map(|r| r.failed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.resolvers.iter().map(|r| r.skipped).sum()
    }

    /// Every pushed line was handled by exactly one resolver
    pub fn is_balanced(&self) -> bool {
        let handled: usize = self.resolvers.iter().map(ResolverStats::handled).sum();
        handled == self.lines_serviced()
            && self.buffer.pushed == self.buffer.popped
            && self.buffer.pushed as usize == handled
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines serviced by {} requesters ({} blank dropped): ",
            self.lines_serviced(),
            self.requesters.len(),
            self.blank_lines(),
        )?;
        write!(
            f,
            "{} resolved, {} failed, {} skipped (peak buffer use {})",
            self.resolved(),
            self.failed(),
            self.skipped(),
            self.buffer.peak,
        )
    }
}

/// Run every requester and resolver to completion
///
/// The configuration is validated first; nothing is started on error. Worker
/// panics are reported once every worker has been joined.
pub fn run_batch<R, S, W>(
    config: &LookupConfig,
    files: &[InputFile],
    resolver: &R,
    stats_log: &LogSink<S>,
    result_log: &LogSink<W>,
) -> Result<RunReport>
where
    R: Resolve + ?Sized,
    S: Write + Send,
    W: Write + Send,
{
    config.validate(files.len())?;
    let buffer = BoundedBuffer::<String>::new(config.buffer_capacity);
    let max_line_length = config.max_line_length;

    let (requester_results, resolver_results, spawned) = thread::scope(|s| {
        let buffer = &buffer;
        let mut requesters = WorkerPool::new(Role::Requester, config.requesters);
        let mut resolvers = WorkerPool::new(Role::Resolver, config.resolvers);

        let spawned = (|| -> Result<()> {
            for id in 0..config.resolvers {
                resolvers.spawn(s, id, move || {
                    run_resolver(id, buffer, resolver, result_log, max_line_length)
                })?;
            }
            for id in 0..config.requesters {
                requesters.spawn(s, id, move || run_requester(id, files, buffer, stats_log))?;
            }
            Ok(())
        })();
        debug!("started {} resolvers and {} requesters", resolvers.len(), requesters.len());

        let (proof, requester_results) = requesters.join_producers();
        debug!("all {} requesters joined", proof.producers());

        if !buffer.shut_down(proof) {
            error!("shutdown flag was already set");
        }

        let resolver_results = resolvers.join();
        debug!("all resolvers joined");
        (requester_results, resolver_results, spawned)
    });

    spawned?;
    let requesters = requester_results.into_iter().collect::<Result<Vec<_>>>()?;
    let resolvers = resolver_results.into_iter().collect::<Result<Vec<_>>>()?;

    let report = RunReport {
        requesters,
        resolvers,
        buffer: buffer.stats(),
    };
    debug_assert!(report.is_balanced(), "lines lost between requesters and resolvers: {report:?}");
    debug_assert!(report.buffer.peak <= config.buffer_capacity);
    info!("{report}");
    Ok(report)
}
