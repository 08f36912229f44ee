//! The document holder and its public operations.

use std::sync::Arc;

use serde_json::Value;

use cutline_types::reduce::reduce_action;
use cutline_types::{
    collect_timeline_info, ClipDraft, ClipId, ClipPatch, DispatchOutcome, FrameRateInput,
    Identifier, NormalizeDefaults, Project, RemoveTrackOptions, ResizeOptions, TimelineAction,
    TimelineInfo, TimingPatch, TrackDraft,
};

use crate::config::Config;
use crate::hooks::RefreshHooks;
use crate::scheduler::{MutationScheduler, ReadyGate};
use crate::transport::{Transport, PROJECT_STATE_METHOD};

/// Owns the project and is its only writer. Every mutation goes through
/// [`ProjectStore::dispatch`], which opens the batch boundary, waits for
/// readiness on the outermost call, and runs refreshes when it closes.
pub struct ProjectStore {
    project: Project,
    scheduler: MutationScheduler,
    transport: Option<Box<dyn Transport>>,
    defaults: NormalizeDefaults,
}

impl ProjectStore {
    pub fn new(config: &Config, gate: ReadyGate, hooks: Arc<dyn RefreshHooks>) -> Self {
        let defaults = config.normalize_defaults();
        let mut project = Project::new();
        project.frame_rate = defaults.frame_rate;
        Self {
            project,
            scheduler: MutationScheduler::new(gate, config.readiness(), config.refresh(), hooks),
            transport: None,
            defaults,
        }
    }

    /// A store whose document root is available from the start.
    pub fn ready(config: &Config, hooks: Arc<dyn RefreshHooks>) -> Self {
        Self::new(config, ReadyGate::open(), hooks)
    }

    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn set_transport(&mut self, transport: Option<Box<dyn Transport>>) {
        self.transport = transport;
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Deep copy of the current document.
    pub fn snapshot(&self) -> Project {
        self.project.clone()
    }

    pub fn defaults(&self) -> &NormalizeDefaults {
        &self.defaults
    }

    pub fn in_batch(&self) -> bool {
        self.scheduler.in_batch()
    }

    /// Apply one mutation. Inside a batch it runs inline; otherwise it opens
    /// its own boundary, which may wait for the document root and drop the
    /// mutation if the root never appears.
    pub fn dispatch(&mut self, action: TimelineAction) -> DispatchOutcome {
        let outermost = !self.scheduler.in_batch();
        if outermost && !self.scheduler.ensure_ready(action.name()) {
            return DispatchOutcome::Dropped;
        }
        log::debug!(target: "dispatch", "{}", action.name());
        self.scheduler.enter();
        let request = reduce_action(&action, &mut self.project, &self.defaults);
        self.scheduler.record(request);
        self.close_boundary();
        DispatchOutcome::Applied
    }

    /// Run several mutations inside one boundary; refreshes run once at the
    /// end. Returns `None` when the document root never became ready.
    pub fn batch<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> Option<R> {
        if !self.scheduler.in_batch() && !self.scheduler.ensure_ready("batch") {
            return None;
        }
        self.scheduler.enter();
        let result = body(self);
        self.close_boundary();
        Some(result)
    }

    fn close_boundary(&mut self) {
        if let Some(request) = self.scheduler.exit() {
            self.scheduler.refresh(&mut self.project, request);
        }
    }

    pub fn add_clip(&mut self, clip: ClipDraft) -> DispatchOutcome {
        self.dispatch(TimelineAction::AddClip(clip))
    }

    pub fn update_clip(&mut self, id: impl Into<ClipId>, patch: ClipPatch) -> DispatchOutcome {
        self.dispatch(TimelineAction::UpdateClip {
            id: id.into(),
            patch,
        })
    }

    pub fn move_clip(
        &mut self,
        id: impl Into<ClipId>,
        track: Option<Identifier>,
        position: Option<f64>,
        timing: TimingPatch,
    ) -> DispatchOutcome {
        self.dispatch(TimelineAction::MoveClip {
            id: id.into(),
            track,
            position,
            timing,
        })
    }

    pub fn remove_clip(&mut self, id: impl Into<ClipId>) -> DispatchOutcome {
        self.dispatch(TimelineAction::RemoveClip(id.into()))
    }

    pub fn set_clip_color(
        &mut self,
        id: impl Into<ClipId>,
        color: impl Into<Value>,
        text_color: Option<String>,
    ) -> DispatchOutcome {
        self.dispatch(TimelineAction::SetClipColor {
            id: id.into(),
            color: color.into(),
            text_color,
        })
    }

    pub fn add_track(&mut self, track: TrackDraft) -> DispatchOutcome {
        self.dispatch(TimelineAction::AddTrack(track))
    }

    pub fn remove_track(
        &mut self,
        track: impl Into<Identifier>,
        options: RemoveTrackOptions,
    ) -> DispatchOutcome {
        self.dispatch(TimelineAction::RemoveTrack {
            track: track.into(),
            options,
        })
    }

    pub fn resize_timeline(&mut self, duration: f64, options: ResizeOptions) -> DispatchOutcome {
        self.dispatch(TimelineAction::ResizeTimeline { duration, options })
    }

    pub fn set_project_state(&mut self, state: Project) -> DispatchOutcome {
        self.dispatch(TimelineAction::SetProjectState(Box::new(state)))
    }

    pub fn set_frame_rate(&mut self, input: impl Into<FrameRateInput>) -> DispatchOutcome {
        self.dispatch(TimelineAction::SetFrameRate(input.into()))
    }

    /// Snapshot of the timeline with each track's clips attached. Never waits.
    pub fn collect_timeline_info(&self) -> TimelineInfo {
        collect_timeline_info(&self.project)
    }

    /// Publish a deep copy of the document through the transport and return
    /// the host's reply. Without a transport this only logs.
    pub fn emit_project_state(&self) -> Option<Value> {
        let Some(transport) = self.transport.as_ref() else {
            log::warn!(target: "transport", "no transport attached; project state not emitted");
            return None;
        };
        transport.invoke(PROJECT_STATE_METHOD, vec![self.project.to_json()])
    }

    /// Run a pending index rebuild now.
    pub fn flush_index(&self) {
        self.scheduler.flush_index();
    }

    /// Drop a pending index rebuild, e.g. before tearing the view down.
    pub fn cancel_index(&self) {
        self.scheduler.cancel_index();
    }
}
