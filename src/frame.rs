use glam::DVec2;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Rover pose at capture time.
///
/// `yaw_deg` is measured from the world +x axis, counter-clockwise positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec2,
    pub yaw_deg: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, yaw_deg: f64) -> Pose {
        Pose {
            position: DVec2::new(x, y),
            yaw_deg,
        }
    }
}

/// A single camera capture together with the pose it was taken at.
pub struct Frame {
    pub image: RgbImage,
    pub pose: Pose,
}

impl Frame {
    pub fn new(image: RgbImage, pose: Pose) -> Frame {
        Frame { image, pose }
    }
}
