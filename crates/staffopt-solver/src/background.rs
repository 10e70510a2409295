//! Single-flight background solving
//!
//! A solve blocks for up to its time limit, so interactive callers run it on
//! a worker thread. Only one solve may be in flight per
//! [`BackgroundSolver`]; a second request while busy is refused instead of
//! queued, which keeps two solves from racing over a configuration that is
//! still being edited.

use staffopt_core::{normalize, Staffer, StaffingError, StaffingRequest, StaffingSolution};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a background solve could not start
#[derive(Debug, Error)]
pub enum StartError {
    #[error("A solve is already in progress")]
    Busy,

    #[error("Failed to spawn solver thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Runs solves off the calling thread, one at a time
pub struct BackgroundSolver<S> {
    staffer: Arc<S>,
    busy: Arc<AtomicBool>,
}

impl<S> Clone for BackgroundSolver<S> {
    fn clone(&self) -> Self {
        Self {
            staffer: Arc::clone(&self.staffer),
            busy: Arc::clone(&self.busy),
        }
    }
}

/// Releases the busy flag on drop, including on panic.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusyGuard(Arc::clone(flag)))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A solve running on a worker thread
pub struct SolveHandle {
    handle: JoinHandle<Result<StaffingSolution, StaffingError>>,
}

impl SolveHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the solve completes.
    pub fn join(self) -> Result<StaffingSolution, StaffingError> {
        self.handle.join().unwrap_or_else(|_| {
            warn!("solver thread panicked");
            Err(StaffingError::Solver("solver thread panicked".into()))
        })
    }
}

impl<S: Staffer + 'static> BackgroundSolver<S> {
    pub fn new(staffer: S) -> Self {
        Self {
            staffer: Arc::new(staffer),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `true` while a solve is running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }

    /// Start the full pipeline for `request` on a worker thread.
    ///
    /// The request is an owned snapshot; later edits to the caller's copy
    /// do not affect the running solve.
    pub fn try_start(&self, request: StaffingRequest) -> Result<SolveHandle, StartError> {
        let guard = BusyGuard::try_acquire(&self.busy).ok_or(StartError::Busy)?;
        let staffer = Arc::clone(&self.staffer);

        let handle = thread::Builder::new()
            .name("staffopt-solve".into())
            .spawn(move || {
                let _guard = guard;
                debug!("background solve started");
                let problem = normalize(&request)?;
                staffer.solve(&problem)
            })?;

        Ok(SolveHandle { handle })
    }
}
