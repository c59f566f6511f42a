#![forbid(unsafe_code)]

//! Nested message-loop pumping for flush completion.
//!
//! The surface's owner runs a single logical thread; a pending flush only
//! completes when that thread pumps the loop. A scenario that needs to wait
//! for a flush installs a callback that trips a [`LoopSignal`] and then
//! calls [`run_message_loop`], which steps the host's pump until the signal
//! fires.
//!
//! Unlike a raw nested loop, the wait is bounded: a callback that can never
//! fire surfaces as [`LoopError::Idle`] and a deadline converts a wedged
//! host into [`LoopError::TimedOut`] instead of a hung test run.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::host::HostHandle;

/// Shared quit flag for one nested loop run.
///
/// Cloned into flush callbacks; `quit` asks the innermost
/// [`run_message_loop`] waiting on this signal to return.
#[derive(Debug, Clone, Default)]
pub struct LoopSignal(Rc<Cell<bool>>);

impl LoopSignal {
    /// Create a new, untripped signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop waiting on this signal to return.
    pub fn quit(&self) {
        self.0.set(true);
    }

    /// Consume the quit flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Why a nested loop run gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopError {
    /// The deadline elapsed before the signal fired.
    TimedOut,
    /// No flush is pending and nothing can ever fire the signal.
    Idle,
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => write!(f, "message loop timed out awaiting a flush completion"),
            Self::Idle => write!(f, "message loop went idle with no pending flush"),
        }
    }
}

impl std::error::Error for LoopError {}

/// Pump the host until `signal` quits, a `timeout` elapses, or the loop
/// goes idle.
///
/// Completion callbacks run with no host borrow held, so a callback may
/// freely call back into the host.
pub fn run_message_loop(
    host: &HostHandle,
    signal: &LoopSignal,
    timeout: Duration,
) -> Result<(), LoopError> {
    let deadline = Instant::now() + timeout;
    loop {
        if signal.take() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            trace!("nested loop deadline elapsed");
            return Err(LoopError::TimedOut);
        }

        let ready = host.borrow_mut().take_ready_completions();
        if ready.is_empty() {
            if !host.borrow().has_pending_flush() {
                trace!("nested loop idle: no pending flush");
                return Err(LoopError::Idle);
            }
            // A host may pend work without it being ready yet; back off
            // briefly rather than spinning until the deadline.
            std::thread::sleep(Duration::from_millis(1));
            continue;
        }
        for callback in ready {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_take_consumes() {
        let signal = LoopSignal::new();
        assert!(!signal.take());
        signal.quit();
        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn signal_clones_share_state() {
        let signal = LoopSignal::new();
        let clone = signal.clone();
        clone.quit();
        assert!(signal.take());
    }

    #[test]
    fn loop_error_display() {
        assert!(LoopError::TimedOut.to_string().contains("timed out"));
        assert!(LoopError::Idle.to_string().contains("idle"));
    }
}
