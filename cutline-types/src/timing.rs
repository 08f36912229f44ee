//! Keeps clip timing self-consistent and derives the project's total length.

use crate::state::{Clip, Project, TimingPatch};
use crate::value::to_number;

/// Restore `end == start + duration` with `duration >= 0`.
///
/// A non-finite `start` becomes 0; a non-finite `duration` is re-derived from
/// `end - start`. Idempotent.
pub fn reconcile_clip_timing(clip: &mut Clip) {
    clip.start = to_number(Some(clip.start), 0.0);
    let derived = to_number(Some(clip.end - clip.start), 0.0);
    clip.duration = to_number(Some(clip.duration), derived).max(0.0);
    clip.end = clip.start + clip.duration;
}

/// Apply explicit timing overrides, then reconcile.
///
/// `duration` wins when present; an `end` on its own re-derives the duration
/// from the (possibly updated) start; a `start` on its own keeps the duration
/// and moves the end.
pub fn apply_timing_patch(clip: &mut Clip, patch: &TimingPatch) {
    if let Some(start) = patch.start {
        clip.start = to_number(Some(start), 0.0);
    }
    match (patch.duration, patch.end) {
        (Some(duration), _) => clip.duration = to_number(Some(duration), 0.0),
        (None, Some(end)) => {
            let end = to_number(Some(end), clip.start + clip.duration);
            clip.duration = (end - clip.start).max(0.0);
        }
        (None, None) => {}
    }
    reconcile_clip_timing(clip);
}

/// Furthest timeline point any clip reaches; 0 with no clips.
pub fn max_clip_end(clips: &[Clip]) -> f64 {
    clips.iter().map(Clip::timeline_end).fold(0.0, f64::max)
}

/// Re-derive `project.duration` from its clips.
///
/// Without `allow_shrink` the duration only grows. With it, the duration is
/// set to exactly the furthest clip end.
pub fn recompute_aggregate_duration(project: &mut Project, allow_shrink: bool) -> f64 {
    let max_end = max_clip_end(&project.clips);
    project.duration = if allow_shrink {
        max_end
    } else {
        to_number(Some(project.duration), 0.0).max(max_end)
    };
    project.duration
}
