//! Worker thread management
//!
//! Requesters and resolvers are plain OS threads spawned inside a
//! `std::thread::scope`, so the buffer, the input files and the logs they
//! borrow outlive every worker by construction. Each worker records its role
//! and index in a thread-local for log tagging.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::thread::{self, Scope, ScopedJoinHandle};
use log::error;
use lookup_core::{join_producers, LookupError, ProducersJoined, Result};

/// Which pool a worker belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Producer reading input files
    Requester,
    /// Consumer performing lookups
    Resolver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Requester => "requester",
            Role::Resolver => "resolver",
        }
    }
}

/// Role plus index within the pool, e.g. `resolver-3`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerId {
    /// Pool the worker belongs to
    pub role: Role,
    /// Position within the pool, from 0
    pub index: usize,
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.role.as_str(), self.index)
    }
}

thread_local! {
    static CURRENT_WORKER: Cell<Option<WorkerId>> = const { Cell::new(None) };
}

/// Set the worker identity for this thread
pub fn set_current_worker(id: Option<WorkerId>) {
    CURRENT_WORKER.with(|cell| cell.set(id));
}

/// Get the worker identity for this thread, `None` on the main thread
#[inline]
pub fn current_worker() -> Option<WorkerId> {
    CURRENT_WORKER.with(|cell| cell.get())
}

/// Fixed-size pool of scoped worker threads
pub struct WorkerPool<'scope, R> {
    role: Role,
    handles: Vec<(usize, ScopedJoinHandle<'scope, R>)>,
}

impl<'scope, R: Send + 'scope> WorkerPool<'scope, R> {
    /// Create an empty pool expecting `size` workers
    pub fn new(role: Role, size: usize) -> Self {
        Self {
            role,
            handles: Vec::with_capacity(size),
        }
    }

    /// Start one worker thread named after its role and index
    pub fn spawn<'env, F>(
        &mut self,
        scope: &'scope Scope<'scope, 'env>,
        index: usize,
        f: F,
    ) -> Result<()>
    where
        F: FnOnce() -> R + Send + 'scope,
    {
        let id = WorkerId { role: self.role, index };
        let handle = thread::Builder::new()
            .name(id.to_string())
            .spawn_scoped(scope, move || {
                set_current_worker(Some(id));
                f()
            })
            .map_err(|source| LookupError::Spawn {
                role: self.role.as_str(),
                id: index,
                source,
            })?;

        self.handles.push((index, handle));
        Ok(())
    }

    /// Number of workers started
    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Join every worker of a producer pool
    ///
    /// The returned proof is what allows the buffer to be shut down.
    pub fn join_producers(self) -> (ProducersJoined, Vec<Result<R>>) {
        let role = self.role;
        let (indices, handles): (Vec<_>, Vec<_>) = self.handles.into_iter().unzip();
        let (proof, results) = join_producers(handles);
        let results = indices
            .into_iter()
            .zip(results)
            .map(|(index, result)| result.map_err(|payload| panicked(role, index, payload)))
            .collect();
        (proof, results)
    }

    /// Wait for all workers to finish
    pub fn join(self) -> Vec<Result<R>> {
        let role = self.role;
        self.handles
            .into_iter()
            .map(|(index, handle)| handle.join().map_err(|payload| panicked(role, index, payload)))
            .collect()
    }
}

fn panicked(role: Role, id: usize, payload: Box<dyn Any + Send>) -> LookupError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    };
    error!("{}-{} panicked: {}", role.as_str(), id, message);
    LookupError::WorkerPanicked { role: role.as_str(), id, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_id_display() {
        let id = WorkerId { role: Role::Resolver, index: 3 };
        assert_eq!(id.to_string(), "resolver-3");
    }

    #[test]
    fn test_main_thread_has_no_worker_id() {
        assert_eq!(current_worker(), None);
    }

    #[test]
    fn test_workers_see_their_identity() {
        let results = thread::scope(|s| {
            let mut pool = WorkerPool::new(Role::Requester, 3);
            for i in 0..3 {
                pool.spawn(s, i, || (current_worker(), thread::current().name().map(String::from)))
                    .unwrap();
            }
            assert_eq!(pool.len(), 3);
            pool.join()
        });

        for (i, result) in results.into_iter().enumerate() {
            let (id, name) = result.unwrap();
            assert_eq!(id, Some(WorkerId { role: Role::Requester, index: i }));
            assert_eq!(name, Some(format!("requester-{i}")));
        }
    }

    #[test]
    fn test_panic_becomes_error() {
        let (proof, results) = thread::scope(|s| {
            let mut pool = WorkerPool::new(Role::Requester, 2);
            pool.spawn(s, 0, || 1usize).unwrap();
            pool.spawn(s, 1, || -> usize { panic!("bad file") }).unwrap();
            pool.join_producers()
        });

        assert_eq!(proof.producers(), 2);
        assert_eq!(*results[0].as_ref().unwrap(), 1);
        match &results[1] {
            Err(LookupError::WorkerPanicked { role, id, message }) => {
                assert_eq!(*role, "requester");
                assert_eq!(*id, 1);
                assert_eq!(message, "bad file");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
