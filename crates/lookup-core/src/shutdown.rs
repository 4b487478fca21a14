//! Shutdown coordination
//!
//! Resolvers learn that no more work will arrive through a single flag that
//! lives under the buffer lock. The flag may only be set with a
//! [`ProducersJoined`] proof, and that proof is only handed out by
//! [`join_producers`].
//!
//! The proof attests that the handles passed in were joined, nothing more.
//! It cannot tell whether other producers exist: joining an empty set yields
//! a proof for zero producers. The ordering guarantee therefore holds when
//! the caller joins the handles of every producer sharing the buffer, as the
//! batch runner does with its whole requester pool.

use std::thread;
use crate::buffer::BoundedBuffer;

/// Proof that a set of producer threads has been joined
///
/// Cannot be constructed outside this module. [`producers`](Self::producers)
/// tells how many handles it covers.
#[derive(Debug)]
#[must_use = "the buffer is only shut down by passing this to `BoundedBuffer::shut_down`"]
pub struct ProducersJoined {
    producers: usize,
}

impl ProducersJoined {
    /// Number of producer threads that were joined
    pub fn producers(&self) -> usize {
        self.producers
    }
}

/// A thread handle that can be joined
///
/// Implemented for both plain and scoped join handles.
pub trait Joinable<R> {
    fn join_thread(self) -> thread::Result<R>;
}

impl<R> Joinable<R> for thread::JoinHandle<R> {
    fn join_thread(self) -> thread::Result<R> {
        self.join()
    }
}

impl<'scope, R> Joinable<R> for thread::ScopedJoinHandle<'scope, R> {
    fn join_thread(self) -> thread::Result<R> {
        self.join()
    }
}

/// Join every producer handle, in order
///
/// A producer that panicked still counts as joined: it will never push again.
/// Its panic payload is returned in place of its result.
pub fn join_producers<R, H, I>(handles: I) -> (ProducersJoined, Vec<thread::Result<R>>)
where
    H: Joinable<R>,
    I: IntoIterator<Item = H>,
{
    let results: Vec<_> = handles.into_iter().map(|h| h.join_thread()).collect();
    (ProducersJoined { producers: results.len() }, results)
}

impl<T> BoundedBuffer<T> {
    /// Set the shutdown flag and broadcast to every parked consumer
    ///
    /// Broadcast rather than signal: any number of resolvers may be parked on
    /// an empty buffer. Returns `true` if this call flipped the flag; the flag
    /// never reverts.
    pub fn shut_down(&self, _proof: ProducersJoined) -> bool {
        let mut state = self.state.lock();
        let flipped = !state.shutdown;
        state.shutdown = true;
        self.not_empty.notify_all();
        self.wake_producers();
        flipped
    }
}
