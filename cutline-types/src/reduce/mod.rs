//! Pure document reducers.
//!
//! These functions are the single source of truth for action → document
//! mutations. They mutate the [`Project`] only. They do NOT:
//! - open or close batch boundaries
//! - recompute the aggregate duration (the returned request asks for it)
//! - call refresh hooks or the transport
//!
//! Resolution misses are silent no-ops that return [`RefreshRequest::none`].

mod clip;
mod document;
mod track;

use crate::normalize::NormalizeDefaults;
use crate::{Project, RefreshRequest, TimelineAction};

pub fn reduce_action(
    action: &TimelineAction,
    project: &mut Project,
    defaults: &NormalizeDefaults,
) -> RefreshRequest {
    match action {
        TimelineAction::AddClip(draft) => clip::add(draft, project, defaults),
        TimelineAction::UpdateClip { id, patch } => clip::update(id, patch, project),
        TimelineAction::MoveClip { id, track, position, timing } => {
            clip::move_to(id, track.as_ref(), *position, timing, project)
        }
        TimelineAction::RemoveClip(id) => clip::remove(id, project),
        TimelineAction::SetClipColor { id, color, text_color } => {
            clip::set_color(id, color.clone(), text_color.as_deref(), project)
        }
        TimelineAction::AddTrack(draft) => track::add(draft, project, defaults),
        TimelineAction::RemoveTrack { track, options } => track::remove(track, options, project),
        TimelineAction::ResizeTimeline { duration, options } => {
            document::resize(*duration, options, project)
        }
        TimelineAction::SetProjectState(state) => document::replace(state, project),
        TimelineAction::SetFrameRate(input) => document::set_frame_rate(input, project),
    }
}
