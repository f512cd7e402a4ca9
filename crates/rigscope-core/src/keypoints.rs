//! Keypoint projection and image-plane placement.

use glam::{DVec2, DVec3};

use crate::pose::{Placement, ResolvedPose};

/// Number of joints in the hand skeleton.
pub const HAND_JOINT_COUNT: usize = 21;

/// Hand skeleton: four edges per finger, each chain rooted at the wrist (0).
pub const HAND_EDGES: [[usize; 2]; 20] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 4],
    [0, 5],
    [5, 6],
    [6, 7],
    [7, 8],
    [0, 9],
    [9, 10],
    [10, 11],
    [11, 12],
    [0, 13],
    [13, 14],
    [14, 15],
    [15, 16],
    [0, 17],
    [17, 18],
    [18, 19],
    [19, 20],
];

/// Returns the skeleton edges for a keypoint set of the given size.
///
/// Only the 21-joint hand topology has edges; other sizes render as
/// unconnected markers.
#[must_use]
pub fn skeleton_edges(point_count: usize) -> &'static [[usize; 2]] {
    if point_count == HAND_JOINT_COUNT {
        &HAND_EDGES
    } else {
        log::debug!("no skeleton topology for {point_count} keypoints");
        &[]
    }
}

/// Maps camera-local keypoints into the world.
///
/// Each point is scaled by `points_scale`, rotated by the pose, then offset by
/// the camera center. Output order and length match the input.
#[must_use]
pub fn project_keypoints(local: &[DVec3], pose: &ResolvedPose, points_scale: f64) -> Vec<DVec3> {
    let placement = pose.placement();
    local
        .iter()
        .map(|p| placement.transform_point(*p * points_scale))
        .collect()
}

/// Places the image plane `fx * focal_scale` in front of the camera along its
/// local +Z, facing the same way as the camera.
#[must_use]
pub fn image_plane_pose(pose: &Placement, fx: f64, focal_scale: f64) -> Placement {
    let center = pose.transform_point(DVec3::new(0.0, 0.0, fx * focal_scale));
    Placement::new(center, pose.rotation)
}

/// Size of an image in scene units at the given pixel density.
#[must_use]
pub fn plane_size(width: u32, height: u32, pixels_per_unit: f64) -> DVec2 {
    DVec2::new(f64::from(width), f64::from(height)) / pixels_per_unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::euler::EulerXyz;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_hand_edges_valid() {
        assert_eq!(HAND_EDGES.len(), 20);
        for [a, b] in HAND_EDGES {
            assert!(a < HAND_JOINT_COUNT && b < HAND_JOINT_COUNT);
        }
        // Every finger chain starts at the wrist.
        let roots = HAND_EDGES.iter().filter(|[a, _]| *a == 0).count();
        assert_eq!(roots, 5);
    }

    #[test]
    fn test_skeleton_edges_only_for_hand() {
        assert_eq!(skeleton_edges(21).len(), 20);
        assert!(skeleton_edges(2).is_empty());
    }

    #[test]
    fn test_projection_preserves_order() {
        let pose = ResolvedPose::from_placement(Placement::new(
            DVec3::new(1.0, 0.0, 0.0),
            EulerXyz::new(0.0, 0.0, FRAC_PI_2),
        ));
        let local: Vec<DVec3> = (0..21)
            .map(|i| DVec3::new(f64::from(i), 0.0, 0.0))
            .collect();
        let world = project_keypoints(&local, &pose, 0.5);
        assert_eq!(world.len(), local.len());
        for (i, w) in world.iter().enumerate() {
            // +X local becomes +Y world after a quarter turn about Z.
            let expected = DVec3::new(1.0, local[i].x * 0.5, 0.0);
            assert!((*w - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_identity_projection_is_unchanged() {
        let pose = ResolvedPose::from_placement(Placement::IDENTITY);
        let local = vec![DVec3::ZERO, DVec3::X];
        assert_eq!(project_keypoints(&local, &pose, 1.0), local);
    }

    #[test]
    fn test_image_plane_in_front_of_camera() {
        let cam = Placement::new(DVec3::new(0.0, 0.0, 1.0), EulerXyz::new(0.0, FRAC_PI_2, 0.0));
        let plane = image_plane_pose(&cam, 600.0, 0.001);
        // Forward (+Z) rotated a quarter turn about Y points along +X.
        assert!((plane.translation - DVec3::new(0.6, 0.0, 1.0)).length() < 1e-12);
        assert_eq!(plane.rotation, cam.rotation);
    }

    #[test]
    fn test_plane_size() {
        assert_eq!(plane_size(640, 480, 1000.0), DVec2::new(0.64, 0.48));
    }
}
