use crate::identifier::Identifier;
use crate::normalize::{normalize_track_with, NormalizeDefaults};
use crate::resolve::find_track;
use crate::state::{Project, TrackDraft};
use crate::{DurationRefresh, RefreshRequest, RemoveTrackOptions};

/// Upsert by resolved identity (id or number), keeping tracks sorted by number.
pub(super) fn add(draft: &TrackDraft, project: &mut Project, defaults: &NormalizeDefaults) -> RefreshRequest {
    let track = normalize_track_with(draft.clone(), defaults);
    let identity = Identifier::either(track.id.clone(), track.number);
    match find_track(project, &identity).map(|(index, _)| index) {
        Some(index) => project.tracks[index] = track,
        None => project.tracks.push(track),
    }
    project.sort_tracks();
    RefreshRequest::layout()
}

pub(super) fn remove(identifier: &Identifier, options: &RemoveTrackOptions, project: &mut Project) -> RefreshRequest {
    let Some(index) = find_track(project, identifier).map(|(index, _)| index) else {
        log::debug!(target: "dispatch", "removeTrack: no track {}", identifier);
        return RefreshRequest::none();
    };
    let removed = project.tracks.remove(index);
    if !options.keep_clips {
        project.clips.retain(|clip| clip.layer != removed.number);
    }
    RefreshRequest::full_with(if options.allow_shrink {
        DurationRefresh::Exact
    } else {
        DurationRefresh::Grow
    })
}
