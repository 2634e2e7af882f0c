//! Playback Core Tests
//!
//! Tests for:
//! - SceneModelBuilder: scene layout, group index, atomic failure
//! - Frame mapping: monotonicity, looping, clamping, pre-roll, speed
//! - Pose application: writes, missing poses, detached groups
//! - PlaybackClock throttling
//! - PlaybackState: pause, seek, speed rebasing

use glam::{Quat, Vec3};

use kinescope::errors::{MissingGroupPoseError, PlaybackError, ValidationError};
use kinescope::playback::{
    PlaybackClock, PlaybackModel, PlaybackState, SceneModelBuilder, apply, map_frame,
};
use kinescope::scene::Scene;
use kinescope::schema::{AnimationLog, Color, Frame, GroupSpec, Pose, PrimitiveKind, PrimitiveSpec};

fn pose_x(x: f32) -> Pose {
    Pose::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY)
}

fn group(name: &str) -> GroupSpec {
    GroupSpec {
        name: name.into(),
        primitives: vec![PrimitiveSpec {
            kind: PrimitiveKind::Box,
            scale: vec![1.0, 1.0, 1.0],
            diameter: None,
            color: Color(0x336699),
        }],
    }
}

/// `step = 0.1, start = 0, stop = 1.0`, one group `arm`, frame `i` at `[i, 0, 0]`.
fn arm_log() -> AnimationLog {
    AnimationLog {
        step: 0.1,
        start: 0.0,
        stop: 1.0,
        groups: vec![group("arm")],
        frames: (0..10)
            .map(|i| Frame::new().with_pose("arm", pose_x(i as f32)))
            .collect(),
    }
}

/// Two groups; frame 2 lacks a pose for `b`.
fn gapped_log() -> AnimationLog {
    let frames = (0..4)
        .map(|i| {
            let frame = Frame::new().with_pose("a", pose_x(i as f32));
            if i == 2 {
                frame
            } else {
                frame.with_pose("b", pose_x(-(i as f32)))
            }
        })
        .collect();
    AnimationLog {
        step: 0.25,
        start: 0.0,
        stop: 1.0,
        groups: vec![group("a"), group("b")],
        frames,
    }
}

fn build(log: &AnimationLog) -> (Scene, PlaybackModel) {
    let mut scene = Scene::new();
    let model = SceneModelBuilder::build(&mut scene, log).unwrap();
    (scene, model)
}

fn group_position(scene: &Scene, model: &PlaybackModel, name: &str) -> Vec3 {
    let handle = model.group_handle(name).unwrap();
    scene.get_node(handle).unwrap().transform.position
}

// ============================================================================
// SceneModelBuilder
// ============================================================================

#[test]
fn build_group_handles_match_declared_names() {
    let (scene, model) = build(&gapped_log());

    let names: Vec<_> = model.group_names().collect();
    assert_eq!(names, ["a", "b"]);
    for name in names {
        let handle = model.group_handle(name).unwrap();
        assert_eq!(scene.get_name(handle), Some(name));
    }
}

#[test]
fn build_registers_model_root_with_scene() {
    let (scene, model) = build(&arm_log());
    assert_eq!(scene.root_nodes, vec![model.root()]);

    let arm = model.group_handle("arm").unwrap();
    assert_eq!(scene.get_node(arm).unwrap().parent(), Some(model.root()));
}

#[test]
fn build_creates_one_mesh_per_primitive() {
    let (scene, model) = build(&gapped_log());

    assert_eq!(scene.meshes.len(), 2);
    assert_eq!(scene.meshes_under(model.root()).len(), 2);
    let a = model.group_handle("a").unwrap();
    assert_eq!(scene.get_node(a).unwrap().children().len(), 1);
}

#[test]
fn build_copies_timing_and_frame_table() {
    let (_, model) = build(&arm_log());

    assert_eq!(model.frame_count(), 10);
    assert_eq!(model.frames().group_count(), 1);
    assert_eq!(model.timing().step, 0.1);
    assert_eq!(model.current_frame(), 0);
    assert!(!model.is_halted());
}

#[test]
fn build_unknown_group_lookup_is_none() {
    let (_, model) = build(&arm_log());
    assert!(model.group_handle("leg").is_none());
}

#[test]
fn build_invalid_log_leaves_scene_untouched() {
    let mut log = arm_log();
    log.frames.pop();

    let mut scene = Scene::new();
    let err = SceneModelBuilder::build(&mut scene, &log).unwrap_err();

    assert!(matches!(err, ValidationError::FrameCountMismatch { .. }));
    assert_eq!(scene.node_count(), 0);
    assert!(scene.root_nodes.is_empty());
}

#[test]
fn build_invalid_primitive_leaves_scene_untouched() {
    let mut log = arm_log();
    log.groups[0].primitives[0].scale.truncate(1);

    let mut scene = Scene::new();
    assert!(SceneModelBuilder::build(&mut scene, &log).is_err());
    assert_eq!(scene.node_count(), 0);
    assert!(scene.meshes.is_empty());
}

// ============================================================================
// Frame Mapping
// ============================================================================

#[test]
fn map_reference_scenario() {
    let (mut scene, mut model) = build(&arm_log());

    let frame = map_frame(&model, 0.35, 1.0);
    assert_eq!(frame, 3);
    apply(&mut scene, &mut model, frame).unwrap();
    assert_eq!(group_position(&scene, &model, "arm"), Vec3::new(3.0, 0.0, 0.0));

    assert_eq!(map_frame(&model, 1.25, 1.0), 2);
}

#[test]
fn map_is_monotonic_over_the_recording() {
    let (_, model) = build(&arm_log());

    let mut previous = 0;
    for i in 0..=1000 {
        let elapsed = f64::from(i) * 0.001;
        let frame = map_frame(&model, elapsed, 1.0);
        assert!(frame >= previous, "frame went back at {elapsed}: {previous} -> {frame}");
        previous = frame;
    }
    assert_eq!(previous, 9);
}

#[test]
fn map_loops_after_stop() {
    let (_, model) = build(&arm_log());

    for delta in [0.05, 0.35, 0.72, 0.93] {
        let expected = map_frame(&model, delta, 1.0);
        for k in 0..5 {
            let offset = 1.0 + f64::from(k) * 1.0 + delta;
            assert_eq!(map_frame(&model, offset, 1.0), expected, "offset {offset}");
        }
    }
}

#[test]
fn map_stop_boundary_is_last_frame() {
    let (_, model) = build(&arm_log());
    assert_eq!(map_frame(&model, 1.0, 1.0), 9);
}

#[test]
fn map_never_leaves_valid_range() {
    let (_, model) = build(&arm_log());

    for i in -500..500 {
        let elapsed = f64::from(i) * 0.037;
        for speed in [-3.0, -1.0, 0.5, 1.0, 7.5] {
            assert!(map_frame(&model, elapsed, speed) < model.frame_count());
        }
    }
}

#[test]
fn map_before_start_holds_first_frame() {
    let mut log = arm_log();
    log.start = 2.0;
    log.stop = 3.0;
    let (_, model) = build(&log);

    assert_eq!(map_frame(&model, 0.5, 1.0), 0);
    assert_eq!(map_frame(&model, 1.99, 1.0), 0);
    assert_eq!(map_frame(&model, 2.45, 1.0), 4);
}

#[test]
fn map_speed_scales_offset() {
    let (_, model) = build(&arm_log());
    assert_eq!(map_frame(&model, 0.2, 2.0), 4);
    assert_eq!(map_frame(&model, 0.8, 0.5), 4);
}

#[test]
fn map_negative_speed_with_negative_elapsed_plays_forward_offsets() {
    let (_, model) = build(&arm_log());
    assert_eq!(map_frame(&model, -0.55, -1.0), 5);
    assert_eq!(map_frame(&model, -0.45, -1.0), 4);
}

#[test]
fn map_negative_offset_holds_first_frame() {
    let (_, model) = build(&arm_log());
    assert_eq!(map_frame(&model, 0.5, -1.0), 0);
}

#[test]
fn map_zero_speed_holds_current_frame() {
    let (mut scene, mut model) = build(&arm_log());
    apply(&mut scene, &mut model, 6).unwrap();

    assert_eq!(map_frame(&model, 0.0, 0.0), 6);
    assert_eq!(map_frame(&model, 123.0, 0.0), 6);
}

// ============================================================================
// Pose Application
// ============================================================================

#[test]
fn apply_writes_position_and_orientation() {
    let mut log = arm_log();
    let turn = Quat::from_rotation_z(0.5);
    log.frames[4].insert("arm", Pose::new(Vec3::new(1.0, 2.0, 3.0), turn));
    let (mut scene, mut model) = build(&log);

    apply(&mut scene, &mut model, 4).unwrap();

    let node = scene.get_node(model.group_handle("arm").unwrap()).unwrap();
    assert_eq!(node.transform.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(node.transform.rotation, turn);
    assert_eq!(model.current_frame(), 4);
}

#[test]
fn apply_missing_pose_reports_group_and_frame() {
    let (mut scene, mut model) = build(&gapped_log());

    let err = apply(&mut scene, &mut model, 2).unwrap_err();
    assert_eq!(
        err,
        PlaybackError::MissingGroupPose(MissingGroupPoseError {
            group_name: "b".into(),
            frame_index: 2
        })
    );
}

#[test]
fn apply_missing_pose_writes_nothing() {
    let (mut scene, mut model) = build(&gapped_log());
    apply(&mut scene, &mut model, 1).unwrap();

    assert!(apply(&mut scene, &mut model, 2).is_err());

    // `a` has a pose in frame 2 but must still show frame 1.
    assert_eq!(group_position(&scene, &model, "a"), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(group_position(&scene, &model, "b"), Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(model.current_frame(), 1);
}

#[test]
fn apply_frames_around_the_gap_still_work() {
    let (mut scene, mut model) = build(&gapped_log());
    assert!(apply(&mut scene, &mut model, 3).is_ok());
    assert_eq!(group_position(&scene, &model, "b"), Vec3::new(-3.0, 0.0, 0.0));
}

#[test]
fn apply_out_of_range_frame_is_missing_pose() {
    let (mut scene, mut model) = build(&arm_log());
    let err = apply(&mut scene, &mut model, 10).unwrap_err();

    assert!(matches!(
        err,
        PlaybackError::MissingGroupPose(MissingGroupPoseError { frame_index: 10, .. })
    ));
}

#[test]
fn apply_removed_group_node_is_detached_error() {
    let (mut scene, mut model) = build(&arm_log());
    scene.remove_node(model.group_handle("arm").unwrap());

    assert_eq!(
        apply(&mut scene, &mut model, 1),
        Err(PlaybackError::DetachedGroup("arm".into()))
    );
}

#[test]
fn apply_model_without_groups_clamps_frame() {
    let log = AnimationLog {
        step: 0.5,
        start: 0.0,
        stop: 1.0,
        groups: Vec::new(),
        frames: vec![Frame::new(), Frame::new()],
    };
    let (mut scene, mut model) = build(&log);

    assert!(apply(&mut scene, &mut model, 7).is_ok());
    assert_eq!(model.current_frame(), 1);
}

#[test]
fn apply_pose_reaches_world_matrix_of_primitives() {
    let (mut scene, mut model) = build(&arm_log());
    apply(&mut scene, &mut model, 5).unwrap();
    scene.update_matrix_world();

    let (_, _, world) = scene.iter_visible_meshes().next().unwrap();
    assert_eq!(Vec3::from(world.translation), Vec3::new(5.0, 0.0, 0.0));
}

// ============================================================================
// PlaybackClock
// ============================================================================

#[test]
fn clock_skips_polls_inside_interval() {
    let mut clock = PlaybackClock::new(10.0, 0.0);

    assert!(!clock.poll(0.05));
    assert_eq!(clock.last_tick(), 0.0);
    assert!(clock.poll(0.1));
    assert_eq!(clock.last_tick(), 0.1);
    assert!(!clock.poll(0.15));
    assert_eq!(clock.tick_count(), 1);
}

#[test]
fn clock_skipped_poll_does_not_delay_next_tick() {
    let mut clock = PlaybackClock::new(10.0, 0.0);
    assert!(!clock.poll(0.09));
    assert!(clock.poll(0.1));
}

#[test]
fn clock_throttles_fast_host_to_target_rate() {
    let mut clock = PlaybackClock::new(30.0, 0.0);

    // 1 second of a 120 Hz host
    let ticks = (1..=120).filter(|i| clock.poll(f64::from(*i) / 120.0)).count();
    assert_eq!(ticks, 30);
}

#[test]
fn clock_interval_follows_fps() {
    let clock = PlaybackClock::new(60.0, 0.0);
    assert!((clock.interval() - 1.0 / 60.0).abs() < 1e-12);
}

// ============================================================================
// PlaybackState
// ============================================================================

#[test]
fn state_elapsed_runs_from_origin_while_playing() {
    let state = PlaybackState::new(10.0, true, 1.0);
    assert_eq!(state.elapsed(12.5), 2.5);
}

#[test]
fn state_without_autoplay_stays_at_zero() {
    let state = PlaybackState::new(10.0, false, 1.0);
    assert_eq!(state.elapsed(20.0), 0.0);
}

#[test]
fn state_pause_freezes_elapsed() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.pause(2.0);

    assert!(!state.is_playing());
    assert_eq!(state.elapsed(2.0), 2.0);
    assert_eq!(state.elapsed(9.0), 2.0);
}

#[test]
fn state_play_resumes_from_frozen_elapsed() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.pause(2.0);
    state.play(5.0);

    assert_eq!(state.elapsed(6.0), 3.0);
}

#[test]
fn state_seek_applies_on_next_advance() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.set_time(0.72);

    assert_eq!(state.advance(40.0), 0.72);
    assert!((state.elapsed(41.0) - 1.72).abs() < 1e-9);
}

#[test]
fn state_seek_while_paused_stays_frozen() {
    let mut state = PlaybackState::new(0.0, false, 1.0);
    state.set_time(3.0);

    assert_eq!(state.advance(10.0), 3.0);
    assert_eq!(state.advance(20.0), 3.0);
}

#[test]
fn state_seek_changes_nothing_else() {
    let mut state = PlaybackState::new(0.0, true, -2.0);
    state.set_time(1.0);

    assert!(state.is_playing());
    assert_eq!(state.speed(), -2.0);
}

#[test]
fn state_speed_change_keeps_offset_continuous() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.set_speed(5.0, -1.0);

    // offset was 5.0 at t=5 and now runs backwards
    assert!((state.elapsed(5.0) * state.speed() - 5.0).abs() < 1e-9);
    assert!((state.elapsed(6.0) * state.speed() - 4.0).abs() < 1e-9);
}

#[test]
fn state_zero_speed_holds_then_restores_offset() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.set_speed(5.0, 0.0);
    state.set_speed(7.0, 2.0);

    assert!((state.elapsed(7.0) * 2.0 - 5.0).abs() < 1e-9);
    assert!((state.elapsed(8.0) * 2.0 - 7.0).abs() < 1e-9);
}

#[test]
fn state_seek_replaces_held_offset() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.set_speed(5.0, 0.0);
    state.set_time(0.72);
    assert_eq!(state.advance(6.0), 0.72);

    state.set_speed(6.0, 1.0);
    assert!((state.elapsed(7.0) - 1.72).abs() < 1e-9);
}

#[test]
fn state_speed_change_leaves_pending_seek_alone() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.set_time(3.0);
    state.set_speed(1.0, -2.0);

    assert_eq!(state.elapsed(1.0), 3.0);
    assert_eq!(state.advance(2.0), 3.0);
    assert!((state.elapsed(3.0) - 4.0).abs() < 1e-9);
}

#[test]
fn state_non_finite_seek_is_ignored() {
    let mut state = PlaybackState::new(0.0, true, 1.0);
    state.set_time(f64::NAN);
    assert_eq!(state.advance(1.5), 1.5);
}
