//! Diagnostic logging setup
//!
//! Everything logs through the `log` facade. `init()` installs an
//! `env_logger` backend whose lines carry the level and the worker tag of
//! the emitting thread (`requester-0`, `resolver-2`, or `main`).
//!
//! # Environment Variables
//!
//! - `MLOOKUP_LOG=<filter>` - env_logger filter, e.g. `warn` or
//!   `lookup_runtime=debug` (default `info`)

use std::io::Write;
use env_logger::Env;
use crate::worker::current_worker;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "MLOOKUP_LOG";

/// Initialize logging from `MLOOKUP_LOG`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .format(|buf, record| {
            let tag = match current_worker() {
                Some(id) => id.to_string(),
                None => "main".to_string(),
            };
            writeln!(buf, "[{:<5}] [{}] {}", record.level(), tag, record.args())
        })
        .try_init();
}
