use crate::identifier::Identifier;
use crate::normalize::{normalize_clip_with, NormalizeDefaults};
use crate::resolve::{clip_mut, find_clip, find_track};
use crate::state::{normalize_frame_rate, Clip, ClipDraft, ClipPatch, Keyframes, Project, TimingPatch};
use crate::timing::{apply_timing_patch, reconcile_clip_timing};
use crate::value::{is_truthy, to_integer, to_number};
use crate::RefreshRequest;
use serde_json::{Map, Value};

pub(super) fn add(draft: &ClipDraft, project: &mut Project, defaults: &NormalizeDefaults) -> RefreshRequest {
    upsert(normalize_clip_with(draft.clone(), defaults), project)
}

/// An existing clip with the same id is replaced in place.
fn upsert(mut clip: Clip, project: &mut Project) -> RefreshRequest {
    reconcile_clip_timing(&mut clip);
    match find_clip(project, &clip.id).map(|(index, _)| index) {
        Some(index) => project.clips[index] = clip,
        None => project.clips.push(clip),
    }
    RefreshRequest::full()
}

pub(super) fn update(id: &str, patch: &ClipPatch, project: &mut Project) -> RefreshRequest {
    let Some(clip) = clip_mut(project, id) else {
        log::debug!(target: "dispatch", "updateClip: no clip {}", id);
        return RefreshRequest::none();
    };

    if let Some(layer) = patch.layer {
        clip.layer = to_integer(Some(layer), 0);
    }
    if let Some(position) = patch.position {
        clip.position = to_number(Some(position), 0.0);
    }
    if let Some(color) = &patch.color {
        clip.color = color_value(color);
    }
    if let Some(text_color) = &patch.text_color {
        clip.text_color = color_value(text_color);
    }
    if let Some(title) = &patch.title {
        clip.title = title.clone();
    }
    if let Some(locked) = patch.locked {
        clip.locked = locked;
    }
    if let Some(image) = &patch.image {
        clip.image = match image {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        };
    }
    if let Some(show_audio) = patch.show_audio {
        clip.show_audio = show_audio;
    }
    if let Some(reader) = &patch.reader {
        if let Some(has_video) = reader.has_video {
            clip.reader.has_video = has_video;
        }
        if let Some(has_audio) = reader.has_audio {
            clip.reader.has_audio = has_audio;
        }
        if let Some(fps) = &reader.fps {
            clip.reader.fps = normalize_frame_rate(fps);
        }
    }
    if let Some(effects) = &patch.effects {
        clip.effects = effects.clone();
    }
    if let Some(ui) = &patch.ui {
        clip.ui = ui.clone();
    }
    merge_extra(clip, &patch.extra);
    apply_timing_patch(clip, &patch.timing);
    RefreshRequest::full()
}

/// Animation point lists go to their keyframes; other keys are stored as
/// sent. The id is never patched.
fn merge_extra(clip: &mut Clip, extra: &Map<String, Value>) {
    for (key, value) in extra {
        if key == "id" {
            continue;
        }
        if let Some(keyframes) = clip.animation.keyframes_mut(key) {
            match serde_json::from_value::<Keyframes>(value.clone()) {
                Ok(parsed) => *keyframes = parsed,
                Err(e) => log::debug!(target: "dispatch", "updateClip: ignoring {}: {}", key, e),
            }
            continue;
        }
        clip.extra.insert(key.clone(), value.clone());
    }
}

/// Falsy clears the field; anything else is stored as a string.
fn color_value(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

pub(super) fn move_to(
    id: &str,
    track: Option<&Identifier>,
    position: Option<f64>,
    timing: &TimingPatch,
    project: &mut Project,
) -> RefreshRequest {
    if find_clip(project, id).is_none() {
        log::debug!(target: "dispatch", "moveClip: no clip {}", id);
        return RefreshRequest::none();
    }
    let target_layer = track.and_then(|identifier| match find_track(project, identifier) {
        Some((_, track)) => Some(track.number),
        None => {
            log::debug!(target: "dispatch", "moveClip: no track {}", identifier);
            None
        }
    });

    let Some(clip) = clip_mut(project, id) else {
        return RefreshRequest::none();
    };
    if let Some(layer) = target_layer {
        clip.layer = layer;
    }
    if let Some(position) = position {
        clip.position = to_number(Some(position), clip.position);
    }
    apply_timing_patch(clip, timing);
    RefreshRequest::full()
}

pub(super) fn remove(id: &str, project: &mut Project) -> RefreshRequest {
    match find_clip(project, id).map(|(index, _)| index) {
        Some(index) => {
            project.clips.remove(index);
            RefreshRequest::full()
        }
        None => RefreshRequest::none(),
    }
}

/// Shorthand for an update carrying only `color` and `text_color`. A missing
/// text color is sent as an explicit null, so it clears the clip's text color.
pub(super) fn set_color(
    id: &str,
    color: Value,
    text_color: Option<&str>,
    project: &mut Project,
) -> RefreshRequest {
    update(id, &ClipPatch::colors(color, text_color), project)
}
