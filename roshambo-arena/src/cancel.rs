//! One-shot cooperative cancellation
//!
//! A [`CancelToken`] pairs a flag (for poll points) with a channel that
//! is never written and whose closure is the broadcast (for blocking
//! waits). Cancelling drops the channel's only sender; every current and
//! future `recv` on [`CancelToken::closed`] then returns promptly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Cloneable one-shot cancellation token
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: AtomicBool,
    // Held only so that dropping it closes the channel.
    gate: Mutex<Option<Sender<()>>>,
    closed: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                gate: Mutex::new(Some(tx)),
                closed: rx,
            }),
        }
    }

    /// Request cancellation. The first call closes the broadcast channel;
    /// later calls observe the flag already set and do nothing.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.gate.lock().unwrap().take();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Receiver that disconnects when the token is cancelled; intended
    /// for `select!` arms guarding blocking waits.
    pub fn closed(&self) -> &Receiver<()> {
        &self.inner.closed
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
