//! Locate tracks and clips in a project. Both resolvers return the position
//! alongside the entity so callers can remove or replace in place.

use crate::identifier::Identifier;
use crate::state::{Clip, Project, Track};

/// First track whose id or number matches, in list order.
pub fn find_track<'a>(project: &'a Project, identifier: &Identifier) -> Option<(usize, &'a Track)> {
    project
        .tracks
        .iter()
        .enumerate()
        .find(|(_, track)| identifier.matches(track))
}

pub fn find_clip<'a>(project: &'a Project, clip_id: &str) -> Option<(usize, &'a Clip)> {
    project
        .clips
        .iter()
        .enumerate()
        .find(|(_, clip)| clip.id == clip_id)
}

pub fn clip_mut<'a>(project: &'a mut Project, clip_id: &str) -> Option<&'a mut Clip> {
    project.clips.iter_mut().find(|c| c.id == clip_id)
}
