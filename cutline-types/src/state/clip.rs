//! Clip records: the stored form, the partial draft used to create one, and
//! the patches used to edit one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::frame_rate::{deserialize_frame_rate, FrameRate, FrameRateInput};
use crate::value::{lenient, lenient_f64, lenient_i64, nan, present};

/// Identifier for a clip. Clip ids are caller-chosen strings.
pub type ClipId = String;

/// Source capabilities of the media behind a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reader {
    #[serde(default = "default_true")]
    pub has_video: bool,
    #[serde(default = "default_true")]
    pub has_audio: bool,
    #[serde(default, deserialize_with = "deserialize_frame_rate")]
    pub fps: FrameRate,
}

impl Default for Reader {
    fn default() -> Self {
        Self {
            has_video: true,
            has_audio: true,
            fps: FrameRate::DEFAULT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReaderDraft {
    #[serde(default)]
    pub has_video: Option<bool>,
    #[serde(default)]
    pub has_audio: Option<bool>,
    #[serde(default)]
    pub fps: Option<FrameRateInput>,
}

/// Animation points for one animated property. Points are opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframes {
    #[serde(rename = "Points", default)]
    pub points: Vec<Value>,
}

/// The animated properties every clip carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    #[serde(default)]
    pub alpha: Keyframes,
    #[serde(default)]
    pub location_x: Keyframes,
    #[serde(default)]
    pub location_y: Keyframes,
    #[serde(default)]
    pub scale_x: Keyframes,
    #[serde(default)]
    pub scale_y: Keyframes,
    #[serde(default)]
    pub rotation: Keyframes,
    #[serde(default)]
    pub time: Keyframes,
    #[serde(default)]
    pub volume: Keyframes,
}

impl Animation {
    /// The keyframes stored under a host key such as `"alpha"`.
    pub fn keyframes_mut(&mut self, key: &str) -> Option<&mut Keyframes> {
        match key {
            "alpha" => Some(&mut self.alpha),
            "location_x" => Some(&mut self.location_x),
            "location_y" => Some(&mut self.location_y),
            "scale_x" => Some(&mut self.scale_x),
            "scale_y" => Some(&mut self.scale_y),
            "rotation" => Some(&mut self.rotation),
            "time" => Some(&mut self.time),
            "volume" => Some(&mut self.volume),
            _ => None,
        }
    }
}

/// A timed segment placed on a track.
///
/// `start`/`duration`/`end` describe the span within the clip's own source;
/// `position` places it on the project timeline. `layer` refers to a
/// [`Track::number`](super::Track) but is not enforced as a foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default)]
    pub id: ClipId,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub layer: i64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub position: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub start: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub end: f64,
    #[serde(default)]
    pub reader: Reader,
    #[serde(default)]
    pub effects: Vec<Value>,
    #[serde(default)]
    pub ui: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub show_audio: bool,
    #[serde(flatten)]
    pub animation: Animation,
    /// Host fields the core does not interpret, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Clip {
    /// Where the clip sits on the timeline: `position` when numeric, else `start`.
    pub fn placement(&self) -> f64 {
        if self.position.is_finite() {
            self.position
        } else {
            self.start
        }
    }

    /// Timeline point at which the clip stops occupying its track.
    pub fn timeline_end(&self) -> f64 {
        self.placement() + self.duration.max(0.0)
    }
}

/// Partial clip record as supplied to `addClip`.
///
/// Numeric fields accept loose host values (numeric strings, booleans); a
/// field that is present but unreadable still counts as "supplied".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClipDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub layer: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub start: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub end: Option<f64>,
    #[serde(default)]
    pub reader: Option<ReaderDraft>,
    #[serde(default)]
    pub effects: Option<Vec<Value>>,
    #[serde(default)]
    pub ui: Option<Map<String, Value>>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub show_audio: Option<bool>,
    #[serde(flatten)]
    pub animation: Animation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Optional overrides for the local timing triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct TimingPatch {
    #[serde(default, deserialize_with = "lenient")]
    pub start: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub end: Option<f64>,
}

/// Field updates for `updateClip`.
///
/// `color`/`text_color` distinguish "not mentioned" (`None`) from an explicit
/// value; an explicit falsy value (`null`, `""`, `false`, `0`) removes the
/// field from the clip. `image` is cleared by an explicit `null`.
///
/// Keys without a field of their own land in `extra`: animation point lists
/// are routed to the clip's keyframes, everything else is carried onto
/// [`Clip::extra`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClipPatch {
    #[serde(default, deserialize_with = "lenient")]
    pub layer: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<f64>,
    #[serde(flatten)]
    pub timing: TimingPatch,
    #[serde(default, deserialize_with = "present")]
    pub color: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub text_color: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Value>,
    #[serde(default)]
    pub show_audio: Option<bool>,
    #[serde(default)]
    pub reader: Option<ReaderDraft>,
    #[serde(default)]
    pub effects: Option<Vec<Value>>,
    #[serde(default)]
    pub ui: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClipPatch {
    pub fn duration(duration: f64) -> Self {
        Self {
            timing: TimingPatch {
                duration: Some(duration),
                ..TimingPatch::default()
            },
            ..Self::default()
        }
    }

    /// `color` is taken as sent, so a falsy value clears the clip's color.
    pub fn colors(color: Value, text_color: Option<&str>) -> Self {
        Self {
            color: Some(color),
            text_color: Some(
                text_color
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or(Value::Null),
            ),
            ..Self::default()
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placement_prefers_position() {
        let clip: Clip = serde_json::from_value(json!({"id": "a", "position": 3, "start": 1})).unwrap();
        assert_eq!(clip.placement(), 3.0);
        let clip: Clip = serde_json::from_value(json!({"id": "a", "start": 1})).unwrap();
        assert_eq!(clip.placement(), 1.0);
        let clip: Clip = serde_json::from_value(json!({"id": "a", "position": "soon", "start": 4})).unwrap();
        assert_eq!(clip.placement(), 4.0);
    }

    #[test]
    fn test_timeline_end_ignores_negative_duration() {
        let clip: Clip =
            serde_json::from_value(json!({"id": "a", "position": 2, "duration": -5})).unwrap();
        assert_eq!(clip.timeline_end(), 2.0);
    }

    #[test]
    fn test_clip_keeps_unknown_host_fields() {
        let raw = json!({
            "id": "a",
            "images": {"start": 1, "end": 1},
            "alpha": {"Points": [{"co": {"X": 1, "Y": 0.5}}]},
        });
        let clip: Clip = serde_json::from_value(raw).unwrap();
        assert_eq!(clip.animation.alpha.points.len(), 1);
        assert_eq!(clip.extra.get("images"), Some(&json!({"start": 1, "end": 1})));

        let out = serde_json::to_value(&clip).unwrap();
        assert_eq!(out["images"]["start"], json!(1));
        assert!(out["volume"]["Points"].as_array().unwrap().is_empty());
        assert!(out.get("color").is_none());
    }

    #[test]
    fn test_patch_distinguishes_null_from_missing() {
        let patch: ClipPatch = serde_json::from_value(json!({"color": null})).unwrap();
        assert_eq!(patch.color, Some(Value::Null));
        assert_eq!(patch.text_color, None);
    }

    #[test]
    fn test_patch_reads_loose_numbers() {
        let patch: ClipPatch =
            serde_json::from_value(json!({"layer": "2", "duration": "3.5", "end": null})).unwrap();
        assert_eq!(patch.layer, Some(2.0));
        assert_eq!(patch.timing.duration, Some(3.5));
        assert_eq!(patch.timing.end, None);
    }
}
