//! Request-scoped deadline and cancellation token.
//!
//! Every upstream call goes through [`RequestContext::run`]: the blocking
//! exchange runs on a worker thread while the caller waits for whichever comes
//! first of the reply, the deadline, or `cancel()`. Cancelling or timing out
//! the inbound request therefore releases the caller at once; the abandoned
//! worker ends at its own HTTP timeout and its reply is dropped.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::UpstreamError;

type Wake = Box<dyn Fn() + Send>;

#[derive(Default)]
struct Cancellation {
    cancelled: AtomicBool,
    next_waiter: AtomicU64,
    waiters: Mutex<Vec<(u64, Wake)>>,
}

impl Cancellation {
    fn waiters(&self) -> MutexGuard<'_, Vec<(u64, Wake)>> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancellation")
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

/// Deregisters a waiting call when it returns, however it returns.
struct Waiter<'a> {
    state: &'a Cancellation,
    id: u64,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        self.state.waiters().retain(|(id, _)| *id != self.id);
    }
}

enum Outcome<T> {
    Finished(thread::Result<Result<T, UpstreamError>>),
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    state: Arc<Cancellation>,
}

impl RequestContext {
    /// Context with no deadline; only explicit cancellation stops it.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            state: Arc::default(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and every clone of it, waking calls in flight.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        for (_, wake) in self.state.waiters().iter() {
            wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Time left before the deadline, or `None` when unbounded.
    ///
    /// Fails once the context is cancelled or the deadline has passed.
    pub fn remaining(&self) -> Result<Option<Duration>, UpstreamError> {
        if self.is_cancelled() {
            return Err(UpstreamError::Cancelled);
        }
        match self.deadline {
            None => Ok(None),
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    Err(UpstreamError::DeadlineExceeded)
                } else {
                    Ok(Some(left))
                }
            }
        }
    }

    /// Runs a blocking upstream call bounded by this context.
    ///
    /// `call` receives the time left (its HTTP timeout) and runs on a worker
    /// thread. Returns `Cancelled` as soon as the context is cancelled and
    /// `DeadlineExceeded` when the deadline passes first. A panic in `call`
    /// resumes on the caller's thread.
    pub fn run<T, F>(&self, call: F) -> Result<T, UpstreamError>
    where
        T: Send + 'static,
        F: FnOnce(Option<Duration>) -> Result<T, UpstreamError> + Send + 'static,
    {
        let remaining = self.remaining()?;
        let (tx, rx) = mpsc::sync_channel::<Outcome<T>>(1);

        let wake = tx.clone();
        let id = self.state.next_waiter.fetch_add(1, Ordering::Relaxed);
        self.state.waiters().push((
            id,
            Box::new(move || {
                let _ = wake.try_send(Outcome::Cancelled);
            }),
        ));
        let _waiter = Waiter { state: &self.state, id };

        // cancel() may have fired before the waker was registered.
        if self.is_cancelled() {
            return Err(UpstreamError::Cancelled);
        }

        let span = tracing::Span::current();
        thread::spawn(move || {
            let _entered = span.enter();
            let result = panic::catch_unwind(AssertUnwindSafe(|| call(remaining)));
            let _ = tx.try_send(Outcome::Finished(result));
        });

        // The waker keeps a sender alive, so the channel never disconnects here.
        let outcome = match remaining {
            Some(left) => rx.recv_timeout(left).map_err(|_| UpstreamError::DeadlineExceeded)?,
            None => rx.recv().map_err(|_| UpstreamError::Cancelled)?,
        };

        match outcome {
            Outcome::Finished(Ok(result)) => result,
            Outcome::Finished(Err(payload)) => panic::resume_unwind(payload),
            Outcome::Cancelled => Err(UpstreamError::Cancelled),
        }
    }
}
