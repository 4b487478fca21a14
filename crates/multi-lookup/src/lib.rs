//! # multi-lookup - batch hostname resolver
//!
//! Reads hostnames from a fixed set of input files, resolves each one and
//! records the result, using a pool of requester threads feeding a pool of
//! resolver threads through one bounded buffer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use multi_lookup::{LookupConfig, Runtime};
//!
//! multi_lookup::init_logging();
//! let config = LookupConfig::from_env().requesters(2).resolvers(4);
//! let report = Runtime::new(config).run(
//!     &["names1.txt".into(), "names2.txt".into()],
//!     "serviced.txt".as_ref(),
//!     "results.txt".as_ref(),
//! )?;
//! println!("{report}");
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   names1.txt  names2.txt  ...        (one lock per file)
//!        │           │
//!        ▼           ▼
//!   ┌──────────┐ ┌──────────┐
//!   │requester0│ │requester1│ ...      ──► serviced log (own lock)
//!   └──────────┘ └──────────┘
//!        │ push (blocks when full)
//!        ▼
//!   ┌─────────────────────────────┐
//!   │ BoundedBuffer               │    one mutex, not_full / not_empty
//!   │ + shutdown flag             │    flag set once all requesters joined
//!   └─────────────────────────────┘
//!        │ pop (None once drained and shut down)
//!        ▼
//!   ┌─────────┐ ┌─────────┐
//!   │resolver0│ │resolver1│ ...        ──► results log (own lock)
//!   └─────────┘ └─────────┘
//! ```

use std::path::{Path, PathBuf};
use log::info;

// Re-export core types
pub use lookup_core::{
    BoundedBuffer,
    BufferStats,
    LookupError,
    PushError,
    Resolution,
    Resolve,
    Result,
    ResultRecord,
    StatsRecord,
};
pub use lookup_core::constants;

// Re-export runtime types
pub use lookup_runtime::{
    run_batch,
    AddressFamily,
    InputFile,
    LogSink,
    LookupConfig,
    RequesterStats,
    ResolverStats,
    RunReport,
    SystemResolver,
};
pub use lookup_runtime::logging::init as init_logging;

/// Runs one batch: validates, opens inputs and logs, resolves, flushes.
pub struct Runtime {
    config: LookupConfig,
}

impl Runtime {
    pub fn new(config: LookupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Resolve every hostname in `inputs` with the system resolver
    pub fn run(
        &self,
        inputs: &[PathBuf],
        requester_log: &Path,
        resolver_log: &Path,
    ) -> Result<RunReport> {
        let resolver = SystemResolver::new(self.config.address_family);
        self.run_with(inputs, requester_log, resolver_log, &resolver)
    }

    /// Resolve every hostname in `inputs` with a caller-supplied resolver
    ///
    /// Counts, inputs and logs are all checked before any thread starts. Logs
    /// are truncated on open and flushed once every worker has been joined.
    pub fn run_with<R: Resolve + ?Sized>(
        &self,
        inputs: &[PathBuf],
        requester_log: &Path,
        resolver_log: &Path,
        resolver: &R,
    ) -> Result<RunReport> {
        self.config.validate(inputs.len())?;

        let files = lookup_runtime::open_inputs(inputs)?;
        let stats_log = LogSink::create("requester", requester_log)?;
        let result_log = LogSink::create("resolver", resolver_log)?;

        info!(
            "Processing {} files with {} requesters, {} resolvers: {}",
            files.len(),
            self.config.requesters,
            self.config.resolvers,
            lookup_runtime::input::describe(inputs),
        );
        info!(
            "Output will be placed in {} for requesters, and {} for resolvers",
            requester_log.display(),
            resolver_log.display(),
        );

        let report = run_batch(&self.config, &files, resolver, &stats_log, &result_log)?;
        stats_log.finish()?;
        result_log.finish()?;
        Ok(report)
    }
}
