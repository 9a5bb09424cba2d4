use image::RgbImage;

use crate::config::{Calibration, PerceptionConfig};
use crate::coordinates::{WorldProjection, rover_coords, to_polar};
use crate::error::{PerceptionError, Result};
use crate::frame::{Frame, Pose};
use crate::segmentation::TerrainMasks;
use crate::types::{PolarPointSet, RoverPointSet};
use crate::visualization::vision_image;
use crate::world_map::{SharedWorldGrid, WorldPoints};

/// Everything a single frame hands back to the rest of the robot.
#[derive(Debug, Clone)]
pub struct PerceptionOutput {
    /// Obstacle / marker / navigable masks as 0 or 255 in the R / G / B channels.
    pub vision_image: RgbImage,
    /// Navigable terrain relative to the rover, for this frame only.
    pub nav_polar: PolarPointSet,
    /// Navigable terrain in rover-centric pixels, parallel to `nav_polar`.
    pub nav_rover: RoverPointSet,
    /// Cells added to the world map by this frame.
    pub world_points: WorldPoints,
}

/// Per-frame perception pipeline: rectify, segment, project, accumulate.
#[derive(Debug, Clone)]
pub struct Perception {
    calibration: Calibration,
}

impl Perception {
    pub fn new(calibration: Calibration) -> Perception {
        Perception { calibration }
    }

    pub fn from_config(config: &PerceptionConfig) -> Result<Perception> {
        Ok(Perception::new(Calibration::from_config(config)?))
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    fn check_shape(&self, img: &RgbImage) -> Result<()> {
        let (expected_w, expected_h) = self.calibration.image_w_h();
        if img.width() != expected_w || img.height() != expected_h {
            log::warn!(
                "rejecting {}x{} frame, calibrated for {}x{}",
                img.width(),
                img.height(),
                expected_w,
                expected_h
            );
            return Err(PerceptionError::FrameShape {
                expected_w,
                expected_h,
                got_w: img.width(),
                got_h: img.height(),
            });
        }
        Ok(())
    }

    fn check_target(&self, pose: &Pose, grid: &SharedWorldGrid) -> Result<()> {
        if !pose.position.is_finite() || !pose.yaw_deg.is_finite() {
            log::warn!(
                "rejecting frame with non-finite pose ({}, {}) yaw {}",
                pose.position.x,
                pose.position.y,
                pose.yaw_deg
            );
            return Err(PerceptionError::NonFinitePose {
                position: pose.position,
                yaw_deg: pose.yaw_deg,
            });
        }
        let expected = self.calibration.world_size();
        let got = grid.size();
        if got != expected {
            log::warn!("rejecting frame, world grid is {got} cells wide, calibrated for {expected}");
            return Err(PerceptionError::GridSize { expected, got });
        }
        Ok(())
    }

    /// Empty world grid sized for this calibration.
    pub fn new_grid(&self) -> SharedWorldGrid {
        SharedWorldGrid::new(self.calibration.world_size())
    }

    /// Runs the full pipeline on a raw camera frame and folds it into `grid`.
    ///
    /// A frame of the wrong size, a non-finite pose or a grid of the wrong size
    /// is rejected before anything touches `grid`.
    pub fn process(&self, frame: Frame, grid: &SharedWorldGrid) -> Result<PerceptionOutput> {
        self.check_shape(&frame.image)?;
        self.check_target(&frame.pose, grid)?;
        let rectified = self.calibration.rectifier().warp(&frame.image);
        self.process_rectified(&rectified, &frame.pose, grid)
    }

    /// Same as [`Perception::process`] for an image that is already top-down.
    pub fn process_rectified(
        &self,
        rectified: &RgbImage,
        pose: &Pose,
        grid: &SharedWorldGrid,
    ) -> Result<PerceptionOutput> {
        self.check_shape(rectified)?;
        self.check_target(pose, grid)?;
        let masks = TerrainMasks::classify(rectified, self.calibration.bands());

        let nav_rover = rover_coords(&masks.navigable);
        let obstacle_rover = rover_coords(&masks.obstacle);
        let marker_rover = rover_coords(&masks.marker);

        let projection =
            WorldProjection::new(self.calibration.world_size(), self.calibration.scale());
        let world_points = WorldPoints {
            obstacle: projection.project(&obstacle_rover, pose),
            marker: projection.project(&marker_rover, pose),
            navigable: projection.project(&nav_rover, pose),
        };
        grid.accumulate(&world_points)?;

        log::debug!(
            "frame at ({:.2}, {:.2}) yaw {:.1}: navigable {}, obstacle {}, marker {}",
            pose.position.x,
            pose.position.y,
            pose.yaw_deg,
            nav_rover.len(),
            obstacle_rover.len(),
            marker_rover.len()
        );

        Ok(PerceptionOutput {
            vision_image: vision_image(&masks),
            nav_polar: to_polar(&nav_rover),
            nav_rover,
            world_points,
        })
    }
}
