//! Loads a rig into a headless scene, edits one camera and prints what changed.
//!
//! Usage: `cargo run --example rig_demo -- [dataset.json] [options.json]`
//! Defaults to the hand rig used by the integration tests.

use std::path::{Path, PathBuf};

use rigscope::*;

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let dataset = args.next().map_or_else(
        || PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/hand_rig.json")),
        PathBuf::from,
    );
    let options = match args.next() {
        Some(path) => ViewerOptions::from_json_file(path)?,
        None => ViewerOptions::default(),
    };

    let asset_root = dataset
        .parent()
        .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
    let mut scene = HeadlessScene::with_asset_root(asset_root);
    let mut registry = RigRegistry::new();

    let report = pollster::block_on(load_rig(
        &FileSource::new(&dataset),
        &mut scene,
        &mut registry,
        &options,
    ))?;
    println!(
        "Loaded {} cameras from {} ({} skipped)",
        report.loaded.len(),
        dataset.display(),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.cam_id, skipped.error);
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }

    // A couple of frames so the model and image loads can land.
    for frame in 0..2 {
        if frame == 1 {
            scene.complete_pending_loads();
        }
        let summary = registry.poll_assets(&mut scene);
        println!(
            "frame {frame}: {} attached, {} failed, {} pending",
            summary.attached,
            summary.failed.len(),
            summary.pending
        );
    }

    let mut panel = build_control_panel(&registry);
    for controls in panel.iter() {
        println!(
            "{:>14} {:<8} pos [{}] rot [{}] deg",
            controls.cam_id,
            controls.label,
            [PoseField::PosX, PoseField::PosY, PoseField::PosZ]
                .map(|f| controls.field_text(f))
                .join(", "),
            [PoseField::RotX, PoseField::RotY, PoseField::RotZ]
                .map(|f| controls.field_text(f))
                .join(", "),
        );
    }

    let Some(first) = registry.cam_ids().first().map(|id| (*id).to_string()) else {
        return Ok(());
    };

    // Nudge the first camera the way the UI would.
    set_pose_field(&mut registry, &mut scene, &first, PoseField::PosZ, "0.5")?;
    set_pose_field(&mut registry, &mut scene, &first, PoseField::RotY, "15")?;
    refresh_controls(&mut panel, &registry);
    set_global_layer_visibility(
        &mut registry,
        &mut panel,
        &mut scene,
        VisualLayer::ProjectionLines,
        false,
    );

    if let Some(device) = registry.get(&first) {
        let pose = device.current_pose();
        println!(
            "camera {first} moved to {:.4} rotated {:.2} deg",
            pose.translation,
            pose.rotation.to_degrees()
        );
        if let Some(Some(px)) = device.reprojection().first() {
            println!("  wrist keypoint reprojects to pixel ({:.1}, {:.1})", px.x, px.y);
        }
    }
    if let Some((min, max)) = registry.extents() {
        println!("rig extents: {min:.3} .. {max:.3}");
    }
    println!("scene holds {} objects", scene.num_objects());
    Ok(())
}
