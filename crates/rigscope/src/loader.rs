//! Loading a rig from a dataset.

use rigscope_core::{RecordPolicy, Result, RigError, ViewerOptions};
use rigscope_render::Renderer;
use rigscope_structures::CameraDevice;

use crate::dataset::{parse_cameras, parse_dataset, DatasetSource};
use crate::registry::RigRegistry;

/// A camera left out of the rig and why.
#[derive(Debug)]
pub struct SkippedCamera {
    pub cam_id: String,
    pub error: RigError,
}

/// The outcome of [`load_rig`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Ids of the cameras now in the registry, in dataset order.
    pub loaded: Vec<String>,
    /// Cameras skipped under [`RecordPolicy::SkipInvalid`].
    pub skipped: Vec<SkippedCamera>,
    /// Non-fatal problems, such as non-rigid extrinsics.
    pub warnings: Vec<String>,
    /// Model and image loads queued on the registry.
    pub pending_assets: usize,
}

/// Loads a rig, replacing whatever the registry held.
///
/// Fetch and parse failures leave the previous rig untouched. Every camera
/// is validated before the previous rig is cleared, so a
/// [`RecordPolicy::FailFast`] abort leaves it untouched too. The returned
/// future completes once every device is built; model and image loads are
/// queued on the registry and attached by [`RigRegistry::poll_assets`].
pub async fn load_rig<S: DatasetSource>(
    source: &S,
    renderer: &mut dyn Renderer,
    registry: &mut RigRegistry,
    options: &ViewerOptions,
) -> Result<LoadReport> {
    let location = source.location();
    let text = source
        .fetch()
        .await
        .map_err(|cause| RigError::DatasetFetch {
            location: location.clone(),
            cause,
        })?;
    let raw = parse_dataset(&text, &location)?;

    let mut report = LoadReport::default();
    let mut specs = Vec::new();
    for (cam_id, parsed) in parse_cameras(raw, options) {
        match parsed {
            Ok(parsed) => {
                report.warnings.extend(parsed.warning);
                specs.push(parsed.spec);
            }
            Err(error) => match options.record_policy {
                RecordPolicy::FailFast => return Err(error),
                RecordPolicy::SkipInvalid => {
                    log::warn!("skipping camera '{cam_id}': {error}");
                    report.skipped.push(SkippedCamera { cam_id, error });
                }
            },
        }
    }

    registry.clear(renderer);
    registry.set_options(options.clone());

    for spec in specs {
        let (device, pending) = CameraDevice::build(spec, renderer, options);
        report.loaded.push(device.cam_id().to_string());
        report.pending_assets += pending.len();
        registry.register(device)?;
        registry.queue_assets(pending);
    }

    log::info!(
        "loaded {} cameras from {location} ({} skipped, {} assets pending)",
        report.loaded.len(),
        report.skipped.len(),
        report.pending_assets
    );
    Ok(report)
}
