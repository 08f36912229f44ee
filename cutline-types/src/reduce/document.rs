use crate::state::{normalize_frame_rate, FrameRateInput, Project};
use crate::timing::max_clip_end;
use crate::value::to_number;
use crate::{RefreshRequest, ResizeOptions};

/// Set the timeline length. Never below 0, never below the furthest clip end,
/// and never below the current length unless shrinking is allowed.
pub(super) fn resize(duration: f64, options: &ResizeOptions, project: &mut Project) -> RefreshRequest {
    let mut target = to_number(Some(duration), 0.0).max(0.0);
    if !options.allow_shrink {
        target = target.max(to_number(Some(project.duration), 0.0));
    }
    project.duration = target.max(max_clip_end(&project.clips));
    RefreshRequest::layout()
}

/// Wholesale replacement from a host snapshot.
pub(super) fn replace(state: &Project, project: &mut Project) -> RefreshRequest {
    *project = state.clone();
    RefreshRequest::full()
}

pub(super) fn set_frame_rate(input: &FrameRateInput, project: &mut Project) -> RefreshRequest {
    project.frame_rate = normalize_frame_rate(input);
    RefreshRequest::layout()
}
