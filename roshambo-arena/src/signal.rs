//! Per-worker wake signals
//!
//! Each worker owns the receiving end of a private unbounded channel; the
//! orchestrator holds all the sending ends, indexed by player id. Sends
//! never block and are counting, so a wake posted fractionally before the
//! worker blocks is queued, not lost. Same property as an array of
//! counting semaphores.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Wake payload. Deliberately empty: the shared match state says why the
/// wake happened, the signal only says "look now".
#[derive(Clone, Copy, Debug)]
pub struct Wake;

/// The orchestrator's addressable wake slots, one per worker
pub struct WakeBoard {
    slots: Vec<Sender<Wake>>,
}

impl WakeBoard {
    /// Build one wake channel per worker; returns the board and the
    /// per-worker receiving ends in id order.
    pub fn new(players: usize) -> (WakeBoard, Vec<Receiver<Wake>>) {
        let (slots, receivers) = (0..players).map(|_| unbounded()).unzip();
        (WakeBoard { slots }, receivers)
    }

    /// Wake a single worker. A failed send means that worker is already
    /// gone, which only happens after termination; it is ignored.
    pub fn wake(&self, id: usize) {
        let _ = self.slots[id].send(Wake);
    }

    /// Wake every worker: the shutdown broadcast, so even players that
    /// were never selected again observe termination.
    pub fn wake_all(&self) {
        for slot in &self.slots {
            let _ = slot.send(Wake);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_wake_before_wait_is_not_lost() {
        let (board, receivers) = WakeBoard::new(2);
        board.wake(1);
        // The receiver was not blocked when the wake was posted; it must
        // still see it.
        assert!(receivers[1].recv_timeout(Duration::from_millis(50)).is_ok());
        assert!(receivers[0].try_recv().is_err());
    }

    #[test]
    fn test_wakes_accumulate() {
        let (board, receivers) = WakeBoard::new(1);
        board.wake(0);
        board.wake(0);
        assert!(receivers[0].try_recv().is_ok());
        assert!(receivers[0].try_recv().is_ok());
        assert!(receivers[0].try_recv().is_err());
    }

    #[test]
    fn test_wake_all_reaches_everyone() {
        let (board, receivers) = WakeBoard::new(4);
        board.wake_all();
        for rx in &receivers {
            assert!(rx.try_recv().is_ok());
        }
    }

    #[test]
    fn test_wake_after_receiver_dropped_is_ignored() {
        let (board, receivers) = WakeBoard::new(2);
        drop(receivers);
        // Must not panic.
        board.wake(0);
        board.wake_all();
    }

    #[test]
    fn test_len() {
        let (board, _receivers) = WakeBoard::new(7);
        assert_eq!(board.len(), 7);
    }
}
