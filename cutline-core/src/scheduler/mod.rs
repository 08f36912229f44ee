//! Batch boundary, readiness wait and post-batch refresh.
//!
//! A mutation runs inside exactly one boundary. Nested `enter` calls only
//! deepen the counter; refresh requests recorded at any depth are merged and
//! executed once, after the outermost `exit`.

mod debounce;
mod ready;

pub use debounce::Debouncer;
pub use ready::{readiness, ReadyGate, ReadySignal};

use std::sync::Arc;

use cutline_types::timing::recompute_aggregate_duration;
use cutline_types::{DurationRefresh, Project, RefreshRequest};

use crate::config::{ReadinessConfig, RefreshConfig};
use crate::hooks::RefreshHooks;

pub struct MutationScheduler {
    depth: usize,
    pending: RefreshRequest,
    gate: ReadyGate,
    readiness: ReadinessConfig,
    refresh: RefreshConfig,
    hooks: Arc<dyn RefreshHooks>,
    index_rebuild: Debouncer,
}

impl MutationScheduler {
    pub fn new(
        gate: ReadyGate,
        readiness: ReadinessConfig,
        refresh: RefreshConfig,
        hooks: Arc<dyn RefreshHooks>,
    ) -> Self {
        let rebuild_hooks = Arc::clone(&hooks);
        let index_rebuild = Debouncer::spawn(refresh.rebuild_settle, move || {
            log::debug!(target: "scheduler", "rebuilding index");
            rebuild_hooks.rebuild_index();
        });
        Self {
            depth: 0,
            pending: RefreshRequest::none(),
            gate,
            readiness,
            refresh,
            hooks,
            index_rebuild,
        }
    }

    pub fn in_batch(&self) -> bool {
        self.depth > 0
    }

    /// Wait for the document root before running `op`. Returns false, after
    /// logging, when the wait budget runs out; the caller drops the mutation.
    pub fn ensure_ready(&mut self, op: &str) -> bool {
        let budget = self.readiness.budget();
        if self.gate.wait(budget) {
            return true;
        }
        log::warn!(
            target: "scheduler",
            "timeline root unavailable after {} attempts ({}ms); dropping {}",
            self.readiness.attempts,
            budget.as_millis(),
            op
        );
        false
    }

    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn record(&mut self, request: RefreshRequest) {
        self.pending.merge(request);
    }

    /// Close one level. Returns the merged request when the outermost
    /// boundary closes with something to refresh.
    pub fn exit(&mut self) -> Option<RefreshRequest> {
        debug_assert!(self.depth > 0, "exit without matching enter");
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return None;
        }
        let request = std::mem::take(&mut self.pending);
        (!request.is_empty()).then_some(request)
    }

    /// Run the refreshes `request` asks for, masked by the configured toggles.
    /// The duration is settled first so the resize sees the final value.
    pub fn refresh(&self, project: &mut Project, request: RefreshRequest) {
        let cfg = &self.refresh;
        if cfg.recompute_duration {
            match request.duration {
                DurationRefresh::Skip => {}
                DurationRefresh::Grow => {
                    recompute_aggregate_duration(project, false);
                }
                DurationRefresh::Exact => {
                    recompute_aggregate_duration(project, true);
                }
            }
        }
        if cfg.sort_items && request.sort_items {
            self.hooks.sort_items();
        }
        if cfg.resize_timeline && request.resize_timeline {
            self.hooks.resize_timeline(project.duration);
        }
        if cfg.rebuild_index && request.rebuild_index {
            self.index_rebuild.request();
        }
        log::debug!(
            target: "scheduler",
            "refreshed: {:?}, duration now {}",
            request,
            project.duration
        );
    }

    /// Fire a pending index rebuild now instead of after the settle delay.
    pub fn flush_index(&self) {
        self.index_rebuild.flush();
    }

    /// Drop a pending index rebuild.
    pub fn cancel_index(&self) {
        self.index_rebuild.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoopHooks;
    use cutline_types::normalize::normalize_clip;
    use cutline_types::ClipDraft;
    use std::time::Duration;

    fn scheduler(gate: ReadyGate) -> MutationScheduler {
        let readiness = ReadinessConfig {
            poll_interval: Duration::from_millis(1),
            attempts: 5,
        };
        MutationScheduler::new(gate, readiness, RefreshConfig::default(), Arc::new(NoopHooks))
    }

    #[test]
    fn test_nested_exit_returns_merged_request_once() {
        let mut s = scheduler(ReadyGate::open());
        s.enter();
        s.record(RefreshRequest::layout());
        s.enter();
        s.record(RefreshRequest::full_with(DurationRefresh::Exact));
        assert_eq!(s.exit(), None);
        assert!(s.in_batch());
        let merged = s.exit().unwrap();
        assert_eq!(merged.duration, DurationRefresh::Exact);
        assert!(merged.sort_items);
        assert!(!s.in_batch());
    }

    #[test]
    fn test_empty_batch_yields_nothing() {
        let mut s = scheduler(ReadyGate::open());
        s.enter();
        s.record(RefreshRequest::none());
        assert_eq!(s.exit(), None);
    }

    #[test]
    fn test_ensure_ready_times_out() {
        let (_signal, gate) = readiness();
        let mut s = scheduler(gate);
        assert!(!s.ensure_ready("addClip"));
    }

    #[test]
    fn test_refresh_grow_and_exact() {
        let s = scheduler(ReadyGate::open());
        let mut project = Project::new();
        project.duration = 20.0;
        project.clips.push(normalize_clip(ClipDraft {
            id: Some("c1".into()),
            position: Some(2.0),
            duration: Some(5.0),
            ..Default::default()
        }));

        s.refresh(&mut project, RefreshRequest::full());
        assert_eq!(project.duration, 20.0);

        s.refresh(&mut project, RefreshRequest::full_with(DurationRefresh::Exact));
        assert_eq!(project.duration, 7.0);
    }

    #[test]
    fn test_refresh_respects_duration_toggle() {
        let mut s = scheduler(ReadyGate::open());
        s.refresh.recompute_duration = false;
        let mut project = Project::new();
        project.duration = 20.0;
        s.refresh(&mut project, RefreshRequest::full_with(DurationRefresh::Exact));
        assert_eq!(project.duration, 20.0);
    }
}
