//! Collaborators notified after a mutation batch closes.

/// Rendering-side refreshes. Every method defaults to a no-op so hosts only
/// implement what they render.
///
/// `rebuild_index` is called from the debounce worker thread, never from the
/// thread that mutated the document.
pub trait RefreshHooks: Send + Sync {
    /// Reorder rendered items to match the document.
    fn sort_items(&self) {}

    /// Re-lay out the timeline for the given aggregate duration.
    fn resize_timeline(&self, _duration: f64) {}

    /// Rebuild lookup indices once layout has settled.
    fn rebuild_index(&self) {}
}

/// Hooks for a headless store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl RefreshHooks for NoopHooks {}
