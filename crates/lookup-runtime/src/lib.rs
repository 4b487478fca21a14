//! # lookup-runtime
//!
//! OS-facing implementation of the multi-lookup batch resolver.
//!
//! This crate provides:
//! - Configuration with environment overrides
//! - Requester and resolver thread pools
//! - Input file reading and serialized log sinks
//! - The system name resolver (getaddrinfo on unix)
//! - Logging setup

pub mod config;
pub mod worker;
pub mod input;
pub mod sink;
pub mod dns;
pub mod requester;
pub mod resolver;
pub mod batch;
pub mod logging;

// Re-exports
pub use config::LookupConfig;
pub use worker::{current_worker, Role, WorkerId, WorkerPool};
pub use input::{open_inputs, InputFile};
pub use sink::LogSink;
pub use dns::{AddressFamily, SystemResolver};
pub use requester::{run_requester, Assignment, RequesterStats};
pub use resolver::{run_resolver, ResolverStats};
pub use batch::{run_batch, RunReport};
