//! Trailing-edge debouncer on a dedicated thread.
//!
//! Each [`Debouncer::request`] re-arms a single deadline instead of stacking
//! another timer; the action fires once the requests have been quiet for the
//! settle delay. Dropping the debouncer cancels any pending firing.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender};

enum DebounceCmd {
    Arm,
    Cancel,
    Flush,
    Shutdown,
}

pub struct Debouncer {
    tx: Sender<DebounceCmd>,
    join_handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn spawn<F>(delay: Duration, action: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded();
        let join_handle = thread::spawn(move || {
            let mut deadline: Option<Instant> = None;
            loop {
                let cmd = match deadline {
                    Some(at) => match rx.recv_deadline(at) {
                        Ok(cmd) => cmd,
                        Err(RecvTimeoutError::Timeout) => {
                            deadline = None;
                            action();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    },
                    None => match rx.recv() {
                        Ok(cmd) => cmd,
                        Err(_) => break,
                    },
                };
                match cmd {
                    DebounceCmd::Arm => deadline = Some(Instant::now() + delay),
                    DebounceCmd::Cancel => deadline = None,
                    DebounceCmd::Flush => {
                        if deadline.take().is_some() {
                            action();
                        }
                    }
                    DebounceCmd::Shutdown => break,
                }
            }
        });
        Self {
            tx,
            join_handle: Some(join_handle),
        }
    }

    /// Arm, or re-arm, the deadline.
    pub fn request(&self) {
        self.send(DebounceCmd::Arm);
    }

    /// Drop a pending firing, if any.
    pub fn cancel(&self) {
        self.send(DebounceCmd::Cancel);
    }

    /// Fire now if a firing is pending.
    pub fn flush(&self) {
        self.send(DebounceCmd::Flush);
    }

    fn send(&self, cmd: DebounceCmd) {
        if self.tx.send(cmd).is_err() {
            log::warn!(target: "scheduler", "debounce worker gone; request dropped");
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let _ = self.tx.send(DebounceCmd::Shutdown);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}
