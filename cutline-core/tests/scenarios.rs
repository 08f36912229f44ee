mod common;

use cutline_types::resolve::find_track;
use cutline_types::{
    ClipPatch, FrameRate, Identifier, RemoveTrackOptions, ResizeOptions, TimingPatch, TrackDraft,
};

#[test]
fn test_add_clip_sets_end_and_grows_duration() {
    let (mut store, _) = common::recording_store();
    store.add_clip(common::clip("c1", 1, 2.0, 5.0));

    let clip = &store.project().clips[0];
    assert_eq!(clip.end, 5.0);
    assert_eq!(store.project().duration, 7.0);
}

#[test]
fn test_update_duration_moves_end_without_shrinking_project() {
    let (mut store, _) = common::recording_store();
    store.add_clip(common::clip("c1", 1, 2.0, 5.0));
    store.update_clip("c1", ClipPatch::duration(3.0));

    let clip = &store.project().clips[0];
    assert_eq!(clip.end, 3.0);
    assert_eq!(clip.duration, 3.0);
    assert!(store.project().duration >= 5.0);
    assert_eq!(store.project().duration, 7.0);
}

fn two_layer_store() -> cutline_core::store::ProjectStore {
    let (mut store, _) = common::recording_store();
    store.batch(|s| {
        s.add_track(TrackDraft::numbered(1));
        s.add_track(TrackDraft::numbered(2));
        s.add_clip(common::clip("a", 1, 0.0, 2.0));
        s.add_clip(common::clip("b", 1, 2.0, 2.0));
        s.add_clip(common::clip("c", 2, 0.0, 1.0));
    });
    store
}

#[test]
fn test_remove_track_deletes_its_clips() {
    let mut store = two_layer_store();
    let track = Identifier::Composite {
        id: None,
        number: Some(1),
    };
    store.remove_track(track, RemoveTrackOptions::default());

    let project = store.project();
    assert_eq!(project.tracks.len(), 1);
    assert!(project.clips.iter().all(|c| c.layer != 1));
    assert_eq!(project.clips.len(), 1);
}

#[test]
fn test_remove_track_keeping_clips() {
    let mut store = two_layer_store();
    store.remove_track(
        1i64,
        RemoveTrackOptions {
            keep_clips: true,
            allow_shrink: false,
        },
    );

    let project = store.project();
    assert_eq!(project.tracks.len(), 1);
    assert_eq!(project.clips.iter().filter(|c| c.layer == 1).count(), 2);
}

#[test]
fn test_remove_track_with_shrink_recomputes_exactly() {
    let mut store = two_layer_store();
    assert_eq!(store.project().duration, 4.0);
    store.remove_track(
        1i64,
        RemoveTrackOptions {
            keep_clips: false,
            allow_shrink: true,
        },
    );
    assert_eq!(store.project().duration, 1.0);
}

#[test]
fn test_set_frame_rate_normalizes() {
    let (mut store, _) = common::recording_store();
    store.set_frame_rate(29.97);
    assert_eq!(store.project().frame_rate, FrameRate::new(29970, 1000));

    store.set_frame_rate(FrameRate { num: 24, den: 0 });
    assert_eq!(store.project().frame_rate, FrameRate::new(24, 1));
}

#[test]
fn test_resize_never_cuts_clips() {
    let (mut store, _) = common::recording_store();
    store.add_clip(common::clip("c1", 1, 2.0, 5.0));
    store.resize_timeline(1.0, ResizeOptions { allow_shrink: true });
    assert_eq!(store.project().duration, 7.0);

    store.resize_timeline(30.0, ResizeOptions::default());
    assert_eq!(store.project().duration, 30.0);
    store.resize_timeline(10.0, ResizeOptions { allow_shrink: false });
    assert_eq!(store.project().duration, 30.0);
    store.resize_timeline(10.0, ResizeOptions { allow_shrink: true });
    assert_eq!(store.project().duration, 10.0);
}

#[test]
fn test_add_track_twice_updates_in_place() {
    let (mut store, _) = common::recording_store();
    store.add_track(TrackDraft::numbered(1).with_label("First"));
    store.add_track(TrackDraft::numbered(1).with_label("Renamed"));

    let tracks = &store.project().tracks;
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].label, "Renamed");
}

#[test]
fn test_tracks_stay_sorted_by_number() {
    let (mut store, _) = common::recording_store();
    for n in [3, 1, 2] {
        store.add_track(TrackDraft::numbered(n));
    }
    let numbers: Vec<i64> = store.project().tracks.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_find_track_by_id_number_or_label() {
    let (mut store, _) = common::recording_store();
    store.add_track(TrackDraft::numbered(3));
    store.add_track(TrackDraft::numbered(4).with_id("music"));
    let project = store.project();

    for track in &project.tracks {
        let by_id = find_track(project, &Identifier::ById(track.id.clone()));
        let by_number = find_track(project, &Identifier::ByNumber(track.number));
        let by_label = find_track(project, &Identifier::parse(&format!("L{}", track.number)));
        assert_eq!(by_id.map(|(i, _)| i), by_number.map(|(i, _)| i));
        assert_eq!(by_number.map(|(i, _)| i), by_label.map(|(i, _)| i));
        assert!(by_id.is_some());
    }
}

#[test]
fn test_move_clip_to_another_track() {
    let mut store = two_layer_store();
    store.move_clip(
        "a",
        Some(Identifier::parse("L2")),
        Some(6.0),
        TimingPatch {
            duration: Some(3.0),
            ..Default::default()
        },
    );

    let clip = store.project().clips.iter().find(|c| c.id == "a").unwrap();
    assert_eq!(clip.layer, 2);
    assert_eq!(clip.position, 6.0);
    assert_eq!(clip.end, 3.0);
    assert_eq!(store.project().duration, 9.0);
}

#[test]
fn test_set_clip_color_and_clear_text_color() {
    let (mut store, _) = common::recording_store();
    store.add_clip(common::clip("c1", 1, 0.0, 1.0));
    store.set_clip_color("c1", "#ff0000", None);

    let clip = &store.project().clips[0];
    assert_eq!(clip.color.as_deref(), Some("#ff0000"));
    assert_eq!(clip.text_color, None);
}

#[test]
fn test_misses_are_silent_noops() {
    let (mut store, hooks) = common::recording_store();
    store.add_clip(common::clip("c1", 1, 0.0, 1.0));
    let before = store.snapshot();
    let sorts = hooks.sorts();

    assert!(store.update_clip("nope", ClipPatch::duration(9.0)).applied());
    assert!(store.remove_clip("nope").applied());
    assert!(store
        .remove_track("missing", RemoveTrackOptions::default())
        .applied());

    assert_eq!(store.snapshot(), before);
    assert_eq!(hooks.sorts(), sorts);
}

#[test]
fn test_set_project_state_replaces_document() {
    let (mut store, _) = common::recording_store();
    store.add_clip(common::clip("old", 1, 0.0, 1.0));

    let state = cutline_types::Project::from_json(serde_json::json!({
        "layers": [{"id": "L1", "number": 1}],
        "clips": [{"id": "new", "layer": 1, "position": 0, "start": 0, "duration": 4, "end": 4}],
        "duration": 2,
        "fps": {"num": 30, "den": 1},
    }))
    .unwrap();
    store.set_project_state(state);

    let project = store.project();
    assert_eq!(project.clips[0].id, "new");
    assert_eq!(project.tracks.len(), 1);
    assert_eq!(project.frame_rate, FrameRate::new(30, 1));
    assert_eq!(project.duration, 4.0);
}

#[test]
fn test_id_less_clips_added_together_collapse() {
    let (mut store, _) = common::recording_store();
    store.batch(|s| {
        for _ in 0..50 {
            s.add_clip(cutline_types::ClipDraft {
                duration: Some(1.0),
                ..Default::default()
            });
        }
    });
    // Generated ids are per-millisecond, so a burst reuses them.
    assert!(store.project().clips.len() < 50);
    assert!(store.project().clips.iter().all(|c| c.id.starts_with("clip-")));
}

#[test]
fn test_update_clip_keeps_host_fields() {
    let (mut store, _) = common::recording_store();
    store.add_clip(cutline_types::ClipDraft {
        image: Some("a.png".into()),
        ..common::clip("c1", 1, 0.0, 1.0)
    });
    let patch: ClipPatch = serde_json::from_value(serde_json::json!({
        "image": "b.png",
        "show_audio": true,
        "reader": {"has_audio": false},
        "custom": 7,
    }))
    .unwrap();
    store.update_clip("c1", patch);

    let clip = &store.project().clips[0];
    assert_eq!(clip.image.as_deref(), Some("b.png"));
    assert!(clip.show_audio);
    assert!(!clip.reader.has_audio);
    assert_eq!(clip.extra.get("custom"), Some(&serde_json::json!(7)));
}
