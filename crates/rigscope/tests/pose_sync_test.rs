//! Integration tests for pose edits and UI synchronization.

use proptest::prelude::*;
use rigscope::*;

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");
const CAM: &str = "840412062035";

fn loaded_rig(options: &ViewerOptions) -> (HeadlessScene, RigRegistry) {
    let mut scene = HeadlessScene::with_asset_root(DATA_DIR);
    let mut registry = RigRegistry::new();
    let source = FileSource::new(format!("{DATA_DIR}/hand_rig.json"));
    pollster::block_on(load_rig(&source, &mut scene, &mut registry, options)).unwrap();
    scene.complete_pending_loads();
    registry.poll_assets(&mut scene);
    (scene, registry)
}

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-9
}

/// Checks that every visual of a camera matches its pose.
fn assert_camera_in_sync(scene: &HeadlessScene, device: &CameraDevice) {
    let pose = device.current_pose();
    let plane_pose = device.plane_pose();
    let placement = |h: ObjectHandle| scene.object(h).unwrap().placement;

    assert_eq!(placement(device.axes_handle()), pose);
    assert_eq!(placement(device.label_handle()).translation, pose.translation);
    assert_eq!(placement(device.model_handle().unwrap()), pose);
    assert_eq!(placement(device.plane_handle()), plane_pose);
    if let Some(image) = device.image_handle() {
        assert_eq!(placement(image), plane_pose);
    }
    for (ray, p) in device.ray_handles().iter().zip(device.points_world()) {
        assert_eq!(scene.object(*ray).unwrap().endpoints, Some((pose.translation, *p)));
    }
}

#[test]
fn test_pose_edit_moves_camera_visuals() {
    let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
    let before = registry.get(CAM).unwrap().points_world().to_vec();
    let marker = registry.get(CAM).unwrap().marker_handles()[7];

    let applied = on_pose_edited(
        &mut registry,
        &mut scene,
        CAM,
        DVec3::new(0.1, 0.2, 0.3),
        DVec3::new(30.0, -20.0, 10.0),
    )
    .unwrap();
    assert!(applied);

    let device = registry.get(CAM).unwrap();
    assert!(close(device.current_pose().translation, DVec3::new(0.1, 0.2, 0.3)));
    assert!(close(
        device.current_pose().rotation.to_degrees(),
        DVec3::new(30.0, -20.0, 10.0)
    ));
    assert_camera_in_sync(&scene, device);

    // Keypoints stay where they were observed.
    assert_eq!(device.points_world(), before.as_slice());
    assert_eq!(scene.object(marker).unwrap().placement.translation, before[7]);

    // Other cameras are untouched.
    for other in registry.iter().filter(|d| d.cam_id() != CAM) {
        assert_camera_in_sync(&scene, other);
    }
}

#[test]
fn test_follow_camera_policy_moves_keypoints() {
    let options = ViewerOptions::default().with_keypoint_policy(KeypointPolicy::FollowCamera);
    let (mut scene, mut registry) = loaded_rig(&options);
    let before = registry.get(CAM).unwrap().points_world().to_vec();
    let start = registry.get(CAM).unwrap().current_pose();

    let shift = DVec3::new(0.0, 0.0, 0.25);
    on_pose_edited(
        &mut registry,
        &mut scene,
        CAM,
        start.translation + shift,
        start.rotation.to_degrees(),
    )
    .unwrap();

    let device = registry.get(CAM).unwrap();
    for (p, q) in device.points_world().iter().zip(&before) {
        assert!((*p - (*q + shift)).length() < 1e-6);
    }
    let marker = device.marker_handles()[0];
    assert_eq!(scene.object(marker).unwrap().placement.translation, device.points_world()[0]);
    for (edge, [a, b]) in device.edge_handles() {
        assert_eq!(
            scene.object(edge).unwrap().endpoints,
            Some((device.points_world()[a], device.points_world()[b]))
        );
    }
    assert_camera_in_sync(&scene, device);
}

#[test]
fn test_unknown_camera() {
    let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
    let err = on_pose_edited(&mut registry, &mut scene, "nope", DVec3::ZERO, DVec3::ZERO)
        .unwrap_err();
    assert!(matches!(err, RigError::CameraNotFound(ref id) if id == "nope"));
    assert!(set_pose_field(&mut registry, &mut scene, "nope", PoseField::PosX, "1").is_err());
}

#[test]
fn test_non_finite_edit_is_ignored() {
    let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
    let before = registry.get(CAM).unwrap().current_pose();

    let applied = on_pose_edited(
        &mut registry,
        &mut scene,
        CAM,
        DVec3::new(f64::INFINITY, 0.0, 0.0),
        DVec3::ZERO,
    )
    .unwrap();
    assert!(!applied);
    assert_eq!(registry.get(CAM).unwrap().current_pose(), before);
    assert_camera_in_sync(&scene, registry.get(CAM).unwrap());
}

#[test]
fn test_single_field_edits() {
    let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
    let before = registry.get(CAM).unwrap().current_pose();

    for raw in ["", "abc", "1.0.0", "NaN"] {
        assert!(!set_pose_field(&mut registry, &mut scene, CAM, PoseField::PosY, raw).unwrap());
    }
    assert_eq!(registry.get(CAM).unwrap().current_pose(), before);

    assert!(set_pose_field(&mut registry, &mut scene, CAM, PoseField::PosY, " 0.75 ").unwrap());
    assert!(set_pose_field(&mut registry, &mut scene, CAM, PoseField::RotZ, "45").unwrap());
    let after = registry.get(CAM).unwrap().current_pose();
    assert_eq!(after.translation.x, before.translation.x);
    assert_eq!(after.translation.y, 0.75);
    assert_eq!(after.translation.z, before.translation.z);
    let degrees = after.rotation.to_degrees();
    assert!((degrees.z - 45.0).abs() < 1e-9);
    assert!((degrees.x - before.rotation.to_degrees().x).abs() < 1e-9);
    assert_camera_in_sync(&scene, registry.get(CAM).unwrap());
}

#[test]
fn test_global_toggle_fans_out() {
    let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
    let mut panel = build_control_panel(&registry);
    assert_eq!(panel.len(), 4);

    set_global_layer_visibility(
        &mut registry,
        &mut panel,
        &mut scene,
        VisualLayer::ProjectionLines,
        false,
    );
    set_global_layer_visibility(&mut registry, &mut panel, &mut scene, VisualLayer::Image, false);

    for device in registry.iter() {
        assert!(device
            .ray_handles()
            .iter()
            .all(|r| !scene.object(*r).unwrap().visible));
        assert!(scene.object(device.plane_handle()).unwrap().visible);
        if let Some(image) = device.image_handle() {
            assert!(!scene.object(image).unwrap().visible);
        }
    }
    assert!(!panel.global().projection_lines);
    assert!(panel
        .iter()
        .all(|c| !c.toggle(VisualLayer::ProjectionLines) && !c.toggle(VisualLayer::Image)));

    set_global_layer_visibility(
        &mut registry,
        &mut panel,
        &mut scene,
        VisualLayer::ProjectionLines,
        true,
    );
    let device = registry.get(CAM).unwrap();
    assert!(scene.object(device.ray_handles()[0]).unwrap().visible);
    assert!(panel.get(CAM).unwrap().toggle(VisualLayer::ProjectionLines));
}

#[test]
fn test_image_loaded_after_hide_stays_hidden() {
    let mut scene = HeadlessScene::with_asset_root(DATA_DIR);
    let mut registry = RigRegistry::new();
    let source = FileSource::new(format!("{DATA_DIR}/hand_rig.json"));
    let options = ViewerOptions::default();
    pollster::block_on(load_rig(&source, &mut scene, &mut registry, &options)).unwrap();
    let mut panel = build_control_panel(&registry);

    set_global_layer_visibility(&mut registry, &mut panel, &mut scene, VisualLayer::Image, false);
    scene.complete_pending_loads();
    registry.poll_assets(&mut scene);

    let image = registry.get("840412062076").unwrap().image_handle().unwrap();
    assert!(!scene.object(image).unwrap().visible);
}

#[test]
fn test_models_drawn_in_camera_colors() {
    let (scene, registry) = loaded_rig(&ViewerOptions::default());
    for device in registry.iter() {
        let model = scene.object(device.model_handle().unwrap()).unwrap();
        assert_eq!(model.color, Some(device.color()));
        assert_eq!(model.opacity, 0.2);
        assert!(model.wireframe);
    }
}

#[test]
fn test_assets_finishing_after_edit_land_at_new_pose() {
    let mut scene = HeadlessScene::with_asset_root(DATA_DIR);
    let mut registry = RigRegistry::new();
    let source = FileSource::new(format!("{DATA_DIR}/hand_rig.json"));
    let options = ViewerOptions::default();
    pollster::block_on(load_rig(&source, &mut scene, &mut registry, &options)).unwrap();

    let cam = "840412062076";
    let applied = on_pose_edited(
        &mut registry,
        &mut scene,
        cam,
        DVec3::new(-0.3, 0.1, 0.4),
        DVec3::new(5.0, 25.0, -40.0),
    )
    .unwrap();
    assert!(applied);

    scene.complete_pending_loads();
    let summary = registry.poll_assets(&mut scene);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.pending, 0);

    let device = registry.get(cam).unwrap();
    assert!(device.is_complete());
    assert!(device.image_handle().is_some());
    assert_camera_in_sync(&scene, device);
}

#[test]
fn test_camera_controls_round_trip() {
    let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
    let mut panel = build_control_panel(&registry);

    let mut controls = panel.get(CAM).unwrap().clone();
    assert_eq!(controls.label, "Cam 1");
    controls.set_field(PoseField::PosX, -0.4);
    controls.set_field(PoseField::RotY, 12.5);
    controls.set_toggle(VisualLayer::Axes, false);

    assert!(apply_camera_controls(&mut registry, &mut scene, &mut controls).unwrap());
    let device = registry.get(CAM).unwrap();
    assert_eq!(device.current_pose().translation.x, -0.4);
    assert!(!device.visibility().axes);
    assert!(!scene.object(device.axes_handle()).unwrap().visible);

    // An ignored edit snaps the fields back to the kept pose.
    controls.set_field(PoseField::PosZ, f64::NAN);
    assert!(!apply_camera_controls(&mut registry, &mut scene, &mut controls).unwrap());
    assert_eq!(controls.position(), registry.get(CAM).unwrap().current_pose().translation);

    set_camera_layer_visibility(
        &mut registry,
        &mut panel,
        &mut scene,
        CAM,
        VisualLayer::Plane,
        false,
    )
    .unwrap();
    assert!(!panel.get(CAM).unwrap().toggle(VisualLayer::Plane));
    let device = registry.get(CAM).unwrap();
    assert!(!scene.object(device.plane_handle()).unwrap().visible);
}

#[test]
fn test_refresh_controls_after_reload() {
    let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
    let mut panel = build_control_panel(&registry);

    let source = InlineSource::new(
        "single",
        r#"{ "cameras": [ {
            "cam_id": 7,
            "intrinsics": [600, 600, 320, 240],
            "extrinsics": [[1,0,0,100],[0,1,0,0],[0,0,1,0],[0,0,0,1]],
            "image": { "width": 640, "height": 480 },
            "trans_scale": 0.001
        } ] }"#,
    );
    let options = ViewerOptions::default().with_model_path(None);
    pollster::block_on(load_rig(&source, &mut scene, &mut registry, &options)).unwrap();
    refresh_controls(&mut panel, &registry);

    assert_eq!(panel.len(), 1);
    let controls = panel.get("7").unwrap();
    assert_eq!(controls.field_text(PoseField::PosX), "0.1000");
    assert_eq!(controls.rotation_degrees(), DVec3::ZERO);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_pose_edit_reads_back(
        x in -2.0f64..2.0, y in -2.0f64..2.0, z in -2.0f64..2.0,
        rx in -179.0f64..179.0, ry in -89.0f64..89.0, rz in -179.0f64..179.0,
    ) {
        let (mut scene, mut registry) = loaded_rig(&ViewerOptions::default());
        let translation = DVec3::new(x, y, z);
        let degrees = DVec3::new(rx, ry, rz);
        prop_assert!(on_pose_edited(&mut registry, &mut scene, CAM, translation, degrees).unwrap());

        let controls = controls_from_device(registry.get(CAM).unwrap());
        prop_assert_eq!(controls.position(), translation);
        prop_assert!((controls.rotation_degrees() - degrees).length() < 1e-9);
        assert_camera_in_sync(&scene, registry.get(CAM).unwrap());
    }
}
