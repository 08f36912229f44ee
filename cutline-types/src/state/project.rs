use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::clip::Clip;
use super::frame_rate::{deserialize_frame_rate, FrameRate};
use super::track::Track;
use crate::value::lenient_f64;

/// The timeline document. Single instance per session, exclusively owned by
/// the store; everything handed outward is a clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Ordered ascending by `number`.
    #[serde(default, alias = "layers")]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub clips: Vec<Clip>,
    /// Project-level effects; opaque to the core.
    #[serde(default)]
    pub effects: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
    #[serde(
        rename = "frameRate",
        alias = "fps",
        default,
        deserialize_with = "deserialize_frame_rate"
    )]
    pub frame_rate: FrameRate,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            clips: Vec::new(),
            effects: Vec::new(),
            duration: 0.0,
            frame_rate: FrameRate::DEFAULT,
            extra: Map::new(),
        }
    }

    /// Load a project from a host snapshot. Shapes are coerced leniently; the
    /// contents are otherwise taken as given.
    pub fn from_json(value: Value) -> Result<Self, String> {
        serde_json::from_value(value).map_err(|e| format!("invalid project snapshot: {}", e))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Stable sort by track number; equal numbers keep insertion order.
    pub fn sort_tracks(&mut self) {
        self.tracks.sort_by_key(|t| t.number);
    }

    pub fn clips_on_layer(&self, number: i64) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(move |c| c.layer == number)
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            tracks: self.tracks.len(),
            clips: self.clips.len(),
        }
    }
}

/// Entity counts, as printed by hosts when a state snapshot arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub tracks: usize,
    pub clips: usize,
}

impl ProjectSummary {
    /// Counts from an arbitrary state payload; missing collections count as zero.
    pub fn from_payload(state: &Value) -> Self {
        let count = |key: &str| state.get(key).and_then(Value::as_array).map_or(0, Vec::len);
        let tracks = match count("tracks") {
            0 => count("layers"),
            n => n,
        };
        Self {
            tracks,
            clips: count("clips"),
        }
    }
}

impl std::fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tracks={} clips={}", self.tracks, self.clips)
    }
}
