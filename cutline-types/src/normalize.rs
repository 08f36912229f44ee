//! Fill defaults and resolve timing for raw clip and track records.
//!
//! Both normalizers are pure: the same draft and defaults always produce the
//! same record, except for the generated clip id when none is supplied.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::state::{normalize_frame_rate, Clip, ClipDraft, FrameRate, Reader, Track, TrackDraft};
use crate::timing::reconcile_clip_timing;
use crate::value::{to_integer, to_number};

/// Duration given to a clip that supplies neither `duration` nor `end`.
pub const DEFAULT_CLIP_DURATION: f64 = 1.0;

/// Values normalization falls back to. Hosts override these from config.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeDefaults {
    pub frame_rate: FrameRate,
    pub track_height: f64,
    pub track_color: String,
    pub clip_color: Option<String>,
    pub clip_text_color: Option<String>,
}

impl Default for NormalizeDefaults {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::DEFAULT,
            track_height: 60.0,
            track_color: "#d9d9d9".to_string(),
            clip_color: Some("#5b8def".to_string()),
            clip_text_color: Some("#ffffff".to_string()),
        }
    }
}

/// Time-based clip id.
///
/// Not collision-proof: two clips created in the same millisecond without an
/// explicit id get the same id, and the second upserts over the first.
/// Callers that create clips in bulk must supply their own ids.
pub fn generate_clip_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    clip_id_at(millis)
}

pub fn clip_id_at(epoch_millis: u128) -> String {
    format!("clip-{}", epoch_millis)
}

pub fn normalize_clip(draft: ClipDraft) -> Clip {
    normalize_clip_with(draft, &NormalizeDefaults::default())
}

pub fn normalize_clip_with(draft: ClipDraft, defaults: &NormalizeDefaults) -> Clip {
    normalize_clip_using(draft, defaults, generate_clip_id)
}

/// Like [`normalize_clip_with`], drawing a missing id from `next_id`.
pub fn normalize_clip_using(
    draft: ClipDraft,
    defaults: &NormalizeDefaults,
    next_id: impl FnOnce() -> String,
) -> Clip {
    let start = to_number(draft.start, 0.0);

    // Explicit-field precedence. Supplying both duration and end takes the
    // duration-driven branch, the same as supplying neither.
    let duration = match (draft.duration, draft.end) {
        (Some(duration), None) => to_number(Some(duration), 0.0),
        (None, Some(end)) => (to_number(Some(end), start) - start).max(0.0),
        (duration, _) => to_number(duration.or(Some(DEFAULT_CLIP_DURATION)), 0.0),
    };

    let reader = draft.reader.unwrap_or_default();
    let mut clip = Clip {
        id: draft
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(next_id),
        layer: to_integer(draft.layer, 0),
        position: to_number(draft.position, 0.0),
        start,
        duration,
        end: start + duration,
        reader: Reader {
            has_video: reader.has_video.unwrap_or(true),
            has_audio: reader.has_audio.unwrap_or(true),
            fps: reader
                .fps
                .as_ref()
                .map(normalize_frame_rate)
                .unwrap_or(defaults.frame_rate),
        },
        effects: draft.effects.unwrap_or_default(),
        ui: draft.ui.unwrap_or_default(),
        color: draft.color.or_else(|| defaults.clip_color.clone()),
        text_color: draft.text_color.or_else(|| defaults.clip_text_color.clone()),
        locked: draft.locked.unwrap_or(false),
        title: draft.title.unwrap_or_default(),
        image: draft.image,
        show_audio: draft.show_audio.unwrap_or(false),
        animation: draft.animation,
        extra: draft.extra,
    };
    reconcile_clip_timing(&mut clip);
    clip
}

pub fn normalize_track(draft: TrackDraft) -> Track {
    normalize_track_with(draft, &NormalizeDefaults::default())
}

pub fn normalize_track_with(draft: TrackDraft, defaults: &NormalizeDefaults) -> Track {
    let number = to_integer(draft.number, 0);
    Track {
        id: draft
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("L{}", number)),
        number,
        y: to_number(draft.y, 0.0),
        label: draft.label.unwrap_or_default(),
        lock: draft.lock.unwrap_or(false),
        height: to_number(draft.height, defaults.track_height),
        color: draft.color.unwrap_or_else(|| defaults.track_color.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: serde_json::Value) -> ClipDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_duration_only_derives_end() {
        let clip = normalize_clip(draft(json!({"id": "a", "start": 2, "duration": 5})));
        assert_eq!(clip.end, 7.0);
        assert_eq!(clip.duration, 5.0);
    }

    #[test]
    fn test_end_only_derives_duration() {
        let clip = normalize_clip(draft(json!({"id": "a", "start": 2, "end": 10})));
        assert_eq!(clip.duration, 8.0);
        assert_eq!(clip.end, 10.0);
    }

    #[test]
    fn test_end_before_start_clamps_duration() {
        let clip = normalize_clip(draft(json!({"id": "a", "start": 4, "end": 1})));
        assert_eq!(clip.duration, 0.0);
        assert_eq!(clip.end, 4.0);
    }

    #[test]
    fn test_both_supplied_is_duration_driven() {
        // An explicit end is ignored when duration is also present.
        let clip = normalize_clip(draft(json!({"id": "a", "start": 1, "duration": 3, "end": 100})));
        assert_eq!(clip.duration, 3.0);
        assert_eq!(clip.end, 4.0);
    }

    #[test]
    fn test_neither_supplied_uses_default_duration() {
        let clip = normalize_clip(draft(json!({"id": "a", "start": 1})));
        assert_eq!(clip.duration, DEFAULT_CLIP_DURATION);
        assert_eq!(clip.end, 2.0);
    }

    #[test]
    fn test_garbage_numbers_fall_back() {
        let clip = normalize_clip(draft(json!({
            "id": "a", "start": "soon", "position": {}, "layer": "x", "duration": "long"
        })));
        assert_eq!(clip.start, 0.0);
        assert_eq!(clip.position, 0.0);
        assert_eq!(clip.layer, 0);
        assert_eq!(clip.duration, 0.0);
        assert_eq!(clip.end, 0.0);
    }

    #[test]
    fn test_layer_truncates_to_integer() {
        let clip = normalize_clip(draft(json!({"id": "a", "layer": "3.7"})));
        assert_eq!(clip.layer, 3);
    }

    #[test]
    fn test_reader_defaults_and_fps_validation() {
        let clip = normalize_clip(draft(json!({"id": "a"})));
        assert!(clip.reader.has_video);
        assert!(clip.reader.has_audio);
        assert_eq!(clip.reader.fps, FrameRate::DEFAULT);

        let clip = normalize_clip(draft(json!({
            "id": "a", "reader": {"has_audio": false, "fps": {"num": 25, "den": 0}}
        })));
        assert!(clip.reader.has_video);
        assert!(!clip.reader.has_audio);
        assert_eq!(clip.reader.fps, FrameRate::new(25, 1));
    }

    #[test]
    fn test_missing_id_is_generated() {
        let clip = normalize_clip(draft(json!({"duration": 2})));
        assert!(clip.id.starts_with("clip-"));
        let clip = normalize_clip(draft(json!({"id": ""})));
        assert!(clip.id.starts_with("clip-"));
    }

    #[test]
    fn test_clips_normalized_in_the_same_millisecond_share_an_id() {
        let defaults = NormalizeDefaults::default();
        let at = || clip_id_at(1_700_000_000_000);
        let first = normalize_clip_using(draft(json!({"duration": 1})), &defaults, at);
        let second = normalize_clip_using(draft(json!({"duration": 2, "title": "b"})), &defaults, at);
        assert_eq!(first.id, "clip-1700000000000");
        assert_eq!(first.id, second.id);

        let explicit = normalize_clip_using(draft(json!({"id": "mine"})), &defaults, at);
        assert_eq!(explicit.id, "mine");
    }

    #[test]
    fn test_default_colors_and_animation() {
        let clip = normalize_clip(draft(json!({"id": "a"})));
        assert_eq!(clip.color.as_deref(), Some("#5b8def"));
        assert_eq!(clip.text_color.as_deref(), Some("#ffffff"));
        assert!(clip.animation.rotation.points.is_empty());

        let clip = normalize_clip(draft(json!({"id": "a", "color": "#000"})));
        assert_eq!(clip.color.as_deref(), Some("#000"));
    }

    #[test]
    fn test_track_defaults_and_synthesized_id() {
        let track = normalize_track(TrackDraft::numbered(3));
        assert_eq!(track.id, "L3");
        assert_eq!(track.number, 3);
        assert_eq!(track.height, 60.0);
        assert!(!track.lock);

        let track = normalize_track(serde_json::from_value(json!({"number": "2.9", "id": "fx"})).unwrap());
        assert_eq!(track.id, "fx");
        assert_eq!(track.number, 2);

        let track = normalize_track(TrackDraft::default());
        assert_eq!(track.id, "L0");
    }
}
