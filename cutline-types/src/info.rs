//! Read-only snapshots handed to renderers and hosts.

use serde::{Deserialize, Serialize};

use crate::state::{Clip, FrameRate, Project, Track};

/// A track together with the clips placed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    #[serde(flatten)]
    pub track: Track,
    pub clips: Vec<Clip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineInfo {
    pub fps: FrameRate,
    pub duration: f64,
    pub tracks: Vec<TrackInfo>,
    pub clips: Vec<Clip>,
}

/// Deep copy of the document, with each track annotated by its clips.
pub fn collect_timeline_info(project: &Project) -> TimelineInfo {
    TimelineInfo {
        fps: project.frame_rate,
        duration: project.duration,
        tracks: project
            .tracks
            .iter()
            .map(|track| TrackInfo {
                track: track.clone(),
                clips: project.clips_on_layer(track.number).cloned().collect(),
            })
            .collect(),
        clips: project.clips.clone(),
    }
}
