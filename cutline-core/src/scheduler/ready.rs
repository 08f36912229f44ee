//! One-shot readiness handshake between the host and the store.
//!
//! The host keeps the [`ReadySignal`] and fires it once the document root
//! exists; the store keeps the [`ReadyGate`] and waits on it, for a bounded
//! time, before each mutation until the first success.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

pub struct ReadySignal {
    tx: Sender<()>,
}

impl ReadySignal {
    /// Mark the document root as available. Consumes the signal.
    pub fn mark_ready(self) {
        // The gate may already be gone; nothing is waiting then.
        let _ = self.tx.send(());
    }
}

pub struct ReadyGate {
    rx: Receiver<()>,
    open: bool,
}

/// Create a linked signal/gate pair.
pub fn readiness() -> (ReadySignal, ReadyGate) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (ReadySignal { tx }, ReadyGate { rx, open: false })
}

impl ReadyGate {
    /// A gate that is already open.
    pub fn open() -> Self {
        let (signal, mut gate) = readiness();
        drop(signal);
        gate.open = true;
        gate
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Wait up to `budget` for the signal. Once open, the gate stays open and
    /// returns immediately. A signal dropped without firing never opens it.
    pub fn wait(&mut self, budget: Duration) -> bool {
        if self.open {
            return true;
        }
        match self.rx.recv_timeout(budget) {
            Ok(()) => {
                self.open = true;
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}
