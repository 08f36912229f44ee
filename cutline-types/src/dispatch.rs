//! Dispatch abstraction.

use crate::TimelineAction;

/// What happened to a dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The action ran inside a batch boundary.
    Applied,
    /// The document root never became ready; the action was discarded.
    Dropped,
}

impl DispatchOutcome {
    pub fn applied(self) -> bool {
        self == DispatchOutcome::Applied
    }
}

/// Trait for dispatching actions to a timeline document.
///
/// The host uses this trait to abstract over where the document lives.
pub trait Dispatcher {
    fn dispatch(&mut self, action: TimelineAction) -> DispatchOutcome;
}
