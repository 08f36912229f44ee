//! LocalDispatcher: Dispatcher implementation over an in-process store.

use serde_json::Value;

use cutline_types::{DispatchOutcome, Dispatcher, TimelineAction};

use crate::store::ProjectStore;

/// Dispatcher that applies actions directly to a [`ProjectStore`].
pub struct LocalDispatcher<'a> {
    pub store: &'a mut ProjectStore,
}

impl<'a> LocalDispatcher<'a> {
    pub fn new(store: &'a mut ProjectStore) -> Self {
        Self { store }
    }
}

impl<'a> Dispatcher for LocalDispatcher<'a> {
    fn dispatch(&mut self, action: TimelineAction) -> DispatchOutcome {
        self.store.dispatch(action)
    }
}

/// Decode a host call by method name and apply it.
pub fn dispatch_invoke(
    dispatcher: &mut impl Dispatcher,
    method: &str,
    args: &[Value],
) -> Result<DispatchOutcome, String> {
    let action = TimelineAction::from_invoke(method, args)?;
    Ok(dispatcher.dispatch(action))
}
