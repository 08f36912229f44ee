//! Action types for the dispatch system.
//!
//! Every document mutation is expressed as a [`TimelineAction`]. Reducers
//! answer with a [`RefreshRequest`] describing which downstream refreshes the
//! mutation needs; the scheduler merges those across a batch.

use serde::Deserialize;
use serde_json::Value;

use crate::identifier::Identifier;
use crate::state::{ClipDraft, ClipId, ClipPatch, FrameRateInput, Project, TimingPatch, TrackDraft};
use crate::value::coerce;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTrackOptions {
    /// Leave the track's clips in place (their `layer` is not changed).
    #[serde(default)]
    pub keep_clips: bool,
    #[serde(default)]
    pub allow_shrink: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOptions {
    #[serde(default = "default_true")]
    pub allow_shrink: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self { allow_shrink: true }
    }
}

/// Document mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    AddClip(ClipDraft),
    UpdateClip {
        id: ClipId,
        patch: ClipPatch,
    },
    MoveClip {
        id: ClipId,
        track: Option<Identifier>,
        position: Option<f64>,
        timing: TimingPatch,
    },
    RemoveClip(ClipId),
    /// `color` is kept as sent; a falsy value clears it, as in `UpdateClip`.
    SetClipColor {
        id: ClipId,
        color: Value,
        text_color: Option<String>,
    },
    AddTrack(TrackDraft),
    RemoveTrack {
        track: Identifier,
        options: RemoveTrackOptions,
    },
    ResizeTimeline {
        duration: f64,
        options: ResizeOptions,
    },
    SetProjectState(Box<Project>),
    SetFrameRate(FrameRateInput),
}

impl TimelineAction {
    /// Host-facing method name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TimelineAction::AddClip(_) => "addClip",
            TimelineAction::UpdateClip { .. } => "updateClip",
            TimelineAction::MoveClip { .. } => "moveClip",
            TimelineAction::RemoveClip(_) => "removeClip",
            TimelineAction::SetClipColor { .. } => "setClipColor",
            TimelineAction::AddTrack(_) => "addTrack",
            TimelineAction::RemoveTrack { .. } => "removeTrack",
            TimelineAction::ResizeTimeline { .. } => "resizeTimeline",
            TimelineAction::SetProjectState(_) => "setProjectState",
            TimelineAction::SetFrameRate(_) => "setFrameRate",
        }
    }

    /// Decode a host call: a method name plus positional JSON arguments.
    pub fn from_invoke(method: &str, args: &[Value]) -> Result<Self, String> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or(Value::Null);
        let action = match method {
            "addClip" => TimelineAction::AddClip(decode(method, arg(0))?),
            "updateClip" => TimelineAction::UpdateClip {
                id: clip_id(method, &arg(0))?,
                patch: decode_or_default(method, arg(1))?,
            },
            "moveClip" => TimelineAction::MoveClip {
                id: clip_id(method, &arg(0))?,
                track: optional(method, arg(1))?,
                position: coerce(&arg(2)),
                timing: decode_or_default(method, arg(3))?,
            },
            "removeClip" => TimelineAction::RemoveClip(clip_id(method, &arg(0))?),
            "setClipColor" => TimelineAction::SetClipColor {
                id: clip_id(method, &arg(0))?,
                color: arg(1),
                text_color: match arg(2) {
                    Value::String(s) => Some(s),
                    _ => None,
                },
            },
            "addTrack" => TimelineAction::AddTrack(decode(method, arg(0))?),
            "removeTrack" => TimelineAction::RemoveTrack {
                track: decode(method, arg(0))?,
                options: decode_or_default(method, arg(1))?,
            },
            "resizeTimeline" => TimelineAction::ResizeTimeline {
                duration: coerce(&arg(0)).unwrap_or(f64::NAN),
                options: decode_or_default(method, arg(1))?,
            },
            "setProjectState" => {
                let state = match arg(0) {
                    Value::String(s) => serde_json::from_str(&s)
                        .map_err(|e| format!("{}: invalid state JSON: {}", method, e))?,
                    other => other,
                };
                TimelineAction::SetProjectState(Box::new(Project::from_json(state)?))
            }
            "setFrameRate" => TimelineAction::SetFrameRate(decode(method, arg(0))?),
            _ => return Err(format!("unknown timeline method: {}", method)),
        };
        Ok(action)
    }
}

fn decode<T: for<'de> Deserialize<'de>>(method: &str, value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| format!("{}: {}", method, e))
}

fn decode_or_default<T: for<'de> Deserialize<'de> + Default>(
    method: &str,
    value: Value,
) -> Result<T, String> {
    if value.is_null() {
        Ok(T::default())
    } else {
        decode(method, value)
    }
}

fn optional<T: for<'de> Deserialize<'de>>(method: &str, value: Value) -> Result<Option<T>, String> {
    if value.is_null() {
        Ok(None)
    } else {
        decode(method, value).map(Some)
    }
}

fn clip_id(method: &str, value: &Value) -> Result<ClipId, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("{}: clip id must be a string, got {}", method, other)),
    }
}

fn default_true() -> bool {
    true
}

/// How the aggregate duration should be re-derived after a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DurationRefresh {
    #[default]
    Skip,
    /// Grow to cover every clip; never shrink.
    Grow,
    /// Set to exactly the furthest clip end.
    Exact,
}

/// Downstream refreshes a mutation asks for. Merged across a batch and
/// executed once when the outermost boundary closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshRequest {
    pub sort_items: bool,
    pub resize_timeline: bool,
    pub duration: DurationRefresh,
    pub rebuild_index: bool,
}

impl RefreshRequest {
    pub fn none() -> Self {
        Self::default()
    }

    /// Every refresh, with a non-shrinking duration recompute.
    pub fn full() -> Self {
        Self::full_with(DurationRefresh::Grow)
    }

    pub fn full_with(duration: DurationRefresh) -> Self {
        Self {
            sort_items: true,
            resize_timeline: true,
            duration,
            rebuild_index: true,
        }
    }

    /// Every refresh except re-deriving the duration.
    pub fn layout() -> Self {
        Self::full_with(DurationRefresh::Skip)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    pub fn merge(&mut self, other: RefreshRequest) {
        self.sort_items |= other.sort_items;
        self.resize_timeline |= other.resize_timeline;
        self.duration = self.duration.max(other.duration);
        self.rebuild_index |= other.rebuild_index;
    }
}
